//! Analyzers: total functions over a validated submission and the rule set.
//!
//! None of these fail and none hold state. Each takes the immutable inputs it needs and returns
//! its findings; the orchestrator decides how they run and how findings combine.

pub mod classifier;
pub mod compliance;
pub mod enhancer;
pub mod presentation;
pub mod safety;
pub mod scheduling;
pub mod scoring;

pub use classifier::{classify, Classification};
pub use compliance::{analyse_compliance, ComplianceFindings, RiskLevel};
pub use enhancer::{enhance, EnhancedContent, Enhancement};
pub use safety::{analyse_safety, SafetyFindings};
pub use scheduling::{recommend_schedule, ChannelReason, ScheduleRecommendation};
pub use scoring::{score, ScoreBreakdown};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::submission::{ContentSubmission, SourceTag, ValidatedSubmission};
    use crate::validation::validate_submission;
    use taxonomy::RuleSet;

    pub fn rules() -> RuleSet {
        RuleSet::builtin().expect("builtin rule set parses")
    }

    pub fn submission(text: &str) -> ValidatedSubmission {
        validate_submission(ContentSubmission::new(text, SourceTag::Text)).expect("valid text")
    }

    pub fn submission_with_context(text: &str, context: &str) -> ValidatedSubmission {
        validate_submission(ContentSubmission::new(text, SourceTag::Text).with_context(context))
            .expect("valid text")
    }
}
