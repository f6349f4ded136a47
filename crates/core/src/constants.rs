//! Constants used throughout the Clarion core crate.
//!
//! Scoring points and vocabularies are not here; they belong to the rule set. These are the
//! fixed texts and presentation limits of the report itself.

/// Default practice time zone (AEST) when no offset is configured.
pub const DEFAULT_UTC_OFFSET: &str = "+10:00";

/// Maximum length of a generated title, in characters, before the ellipsis.
pub const TITLE_MAX_CHARS: usize = 60;

/// Engagement and educational scores below this add an improvement suggestion.
pub const LOW_SCORE_THRESHOLD: u8 = 60;

/// Appended by the enhancer when medical-advice language lacks a consult disclaimer.
pub const CONSULT_DISCLAIMER: &str = "This information is general in nature and is not a \
    substitute for personalised medical advice. Please consult your healthcare provider about \
    your individual situation.";

/// Appended by the enhancer to short posts that do not already ask a question.
pub const ENGAGEMENT_QUESTION: &str =
    "Have you experienced this? Share your questions in the comments.";

/// Always-present reminders closing every recommendation list.
pub const GENERAL_REMINDERS: [&str; 2] = [
    "Use plain language so the post is accessible to readers \
     with varying levels of health literacy.",
    "Check wording and imagery for cultural sensitivity and inclusiveness before publishing.",
];

/// Audience label when nothing more specific is known.
pub const DEFAULT_AUDIENCE: &str = "Patients and the general community";

/// Audience label for professional channels.
pub const PROFESSIONAL_AUDIENCE: &str = "Healthcare professionals";

/// Category label when no category rule matches and no specialty is known.
pub const DEFAULT_CATEGORY: &str = "General health";
