//! Input validation for submissions.
//!
//! Validation is the only check that happens before analyzers run. It fails fast and never
//! coerces: short or blank text is an error, not an empty report.

use crate::submission::{ContentSubmission, ValidatedSubmission};
use crate::{AnalysisError, AnalysisResult};
use clarion_types::{NonEmptyText, SubmissionText};

/// Validates a submission and prepares it for analysis.
///
/// The specialty context is the submission's `healthcare_context` when non-blank, otherwise
/// the `practice_specialty` preference when non-blank.
///
/// # Errors
///
/// Returns [`AnalysisError::Validation`] if the content is shorter than three characters
/// after trimming.
pub fn validate_submission(submission: ContentSubmission) -> AnalysisResult<ValidatedSubmission> {
    let text = SubmissionText::new(&submission.content)
        .map_err(|e| AnalysisError::Validation(format!("content: {e}")))?;

    let preferences = submission.user_preferences.unwrap_or_default();
    let specialty = NonEmptyText::optional(submission.healthcare_context)
        .or_else(|| NonEmptyText::optional(preferences.practice_specialty.as_deref()));

    Ok(ValidatedSubmission::new(
        text,
        submission.source,
        specialty,
        preferences,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::{SourceTag, UserPreferences};

    #[test]
    fn rejects_content_shorter_than_three_chars() {
        for content in ["", " ", "a", "ab", "  ab  ", "\n\t"] {
            let err = validate_submission(ContentSubmission::new(content, SourceTag::Text))
                .expect_err("should reject short content");
            assert!(
                matches!(&err, AnalysisError::Validation(msg) if msg.starts_with("content:")),
                "unexpected error for {content:?}: {err}"
            );
        }
    }

    #[test]
    fn accepts_three_non_whitespace_chars() {
        let sub = validate_submission(ContentSubmission::new(" flu ", SourceTag::Text))
            .expect("three chars is valid");
        assert_eq!(sub.text(), "flu");
        assert_eq!(sub.char_len(), 3);
    }

    #[test]
    fn lower_cases_text_for_matching() {
        let sub = validate_submission(ContentSubmission::new("Miracle CURE", SourceTag::Voice))
            .expect("valid");
        assert_eq!(sub.lower(), "miracle cure");
        assert_eq!(sub.text(), "Miracle CURE");
    }

    #[test]
    fn blank_context_falls_back_to_practice_specialty() {
        let prefs = UserPreferences {
            practice_specialty: Some("Physiotherapy".into()),
            ..UserPreferences::default()
        };
        let sub = validate_submission(
            ContentSubmission::new("Stretch daily", SourceTag::Text)
                .with_context("  ")
                .with_preferences(prefs),
        )
        .expect("valid");
        assert_eq!(sub.specialty(), Some("Physiotherapy"));
    }

    #[test]
    fn submission_context_wins_over_preference() {
        let prefs = UserPreferences {
            practice_specialty: Some("physiotherapy".into()),
            ..UserPreferences::default()
        };
        let sub = validate_submission(
            ContentSubmission::new("Stretch daily", SourceTag::Text)
                .with_context("dermatology")
                .with_preferences(prefs),
        )
        .expect("valid");
        assert_eq!(sub.specialty(), Some("dermatology"));
    }
}
