use serde::{Deserialize, Serialize};

/// Publishable output formats the classifier chooses between.
///
/// Declaration order is the registration order used to break classifier ties: when two types
/// score the same, the one declared first wins. `Ord` follows the same order, so a
/// `BTreeMap<ContentType, _>` iterates deterministically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    HealthTip,
    PatientEducation,
    BlogPost,
    FacebookPost,
    InstagramPost,
    InstagramStory,
    LinkedinPost,
    NewsletterContent,
    VideoScript,
}

impl ContentType {
    /// All content types in registration order.
    pub const ALL: [ContentType; 9] = [
        ContentType::HealthTip,
        ContentType::PatientEducation,
        ContentType::BlogPost,
        ContentType::FacebookPost,
        ContentType::InstagramPost,
        ContentType::InstagramStory,
        ContentType::LinkedinPost,
        ContentType::NewsletterContent,
        ContentType::VideoScript,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::HealthTip => "health_tip",
            ContentType::PatientEducation => "patient_education",
            ContentType::BlogPost => "blog_post",
            ContentType::FacebookPost => "facebook_post",
            ContentType::InstagramPost => "instagram_post",
            ContentType::InstagramStory => "instagram_story",
            ContentType::LinkedinPost => "linkedin_post",
            ContentType::NewsletterContent => "newsletter_content",
            ContentType::VideoScript => "video_script",
        }
    }

    /// Human-readable name, e.g. for rationale strings.
    pub fn label(self) -> &'static str {
        match self {
            ContentType::HealthTip => "health tip",
            ContentType::PatientEducation => "patient education piece",
            ContentType::BlogPost => "blog post",
            ContentType::FacebookPost => "Facebook post",
            ContentType::InstagramPost => "Instagram post",
            ContentType::InstagramStory => "Instagram story",
            ContentType::LinkedinPost => "LinkedIn post",
            ContentType::NewsletterContent => "newsletter item",
            ContentType::VideoScript => "video script",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContentType {
    type Err = crate::TaxonomyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentType::ALL
            .into_iter()
            .find(|ct| ct.as_str() == s.trim())
            .ok_or_else(|| crate::TaxonomyError::InvalidInput(format!("unknown content type: {s}")))
    }
}
