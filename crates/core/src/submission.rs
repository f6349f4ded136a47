//! Analysis input: the caller's submission and its validated form.

use clarion_types::{NonEmptyText, SubmissionText};
use serde::{Deserialize, Serialize};
use taxonomy::ChannelKey;

/// Where the submitted text came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTag {
    Voice,
    Text,
    Image,
    Document,
}

impl SourceTag {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceTag::Voice => "voice",
            SourceTag::Text => "text",
            SourceTag::Image => "image",
            SourceTag::Document => "document",
        }
    }
}

impl std::fmt::Display for SourceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SourceTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "voice" => Ok(SourceTag::Voice),
            "text" => Ok(SourceTag::Text),
            "image" => Ok(SourceTag::Image),
            "document" => Ok(SourceTag::Document),
            other => Err(format!(
                "unknown source '{other}' (expected voice, text, image or document)"
            )),
        }
    }
}

/// How often the practice posts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostingCadence {
    /// Schedule on the channel's preferred hour, any day.
    Daily,
    /// Schedule on the channel's preferred weekday and hour.
    #[default]
    Weekly,
}

impl std::str::FromStr for PostingCadence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(PostingCadence::Daily),
            "weekly" => Ok(PostingCadence::Weekly),
            other => Err(format!("unknown cadence '{other}' (expected daily or weekly)")),
        }
    }
}

/// Optional caller preferences. Every field has a default and exactly one effect:
///
/// - `preferred_channels`: when non-empty and the derived channel is not listed, the first
///   listed channel with a platform profile is used instead.
/// - `posting_cadence`: see [`PostingCadence`].
/// - `target_audience`: replaces the derived audience label.
/// - `practice_specialty`: specialty context when the submission carries none.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    pub preferred_channels: Vec<ChannelKey>,
    pub posting_cadence: PostingCadence,
    pub target_audience: Option<String>,
    pub practice_specialty: Option<String>,
}

/// A piece of user input to analyse, as received from the caller. Not yet validated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSubmission {
    pub content: String,
    pub source: SourceTag,
    #[serde(default)]
    pub healthcare_context: Option<String>,
    #[serde(default)]
    pub user_preferences: Option<UserPreferences>,
}

impl ContentSubmission {
    pub fn new(content: impl Into<String>, source: SourceTag) -> Self {
        Self {
            content: content.into(),
            source,
            healthcare_context: None,
            user_preferences: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.healthcare_context = Some(context.into());
        self
    }

    pub fn with_preferences(mut self, preferences: UserPreferences) -> Self {
        self.user_preferences = Some(preferences);
        self
    }
}

/// A submission that passed validation, with the lower-cased text every analyzer scans.
///
/// Immutable once built; the orchestrator shares it between analyzer tasks behind an `Arc`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedSubmission {
    text: SubmissionText,
    lower: String,
    source: SourceTag,
    specialty: Option<NonEmptyText>,
    preferences: UserPreferences,
}

impl ValidatedSubmission {
    pub(crate) fn new(
        text: SubmissionText,
        source: SourceTag,
        specialty: Option<NonEmptyText>,
        preferences: UserPreferences,
    ) -> Self {
        let lower = text.as_str().to_lowercase();
        Self {
            text,
            lower,
            source,
            specialty,
            preferences,
        }
    }

    /// Trimmed original text.
    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    /// Lower-cased text used for phrase matching.
    pub fn lower(&self) -> &str {
        &self.lower
    }

    /// Length of the trimmed text in characters.
    pub fn char_len(&self) -> usize {
        self.text.char_len()
    }

    pub fn source(&self) -> SourceTag {
        self.source
    }

    /// Healthcare specialty context, falling back to the practice specialty preference.
    pub fn specialty(&self) -> Option<&str> {
        self.specialty.as_ref().map(NonEmptyText::as_str)
    }

    pub fn preferences(&self) -> &UserPreferences {
        &self.preferences
    }
}
