//! Rule taxonomy and platform profiles for Clarion content analysis.
//!
//! This crate is the boundary between the versioned rule-set document (YAML) and the analyzers
//! in `clarion-core`:
//! - strict wire models (`deny_unknown_fields`) with path-qualified schema errors
//! - translation into read-only domain types ([`RuleTaxonomy`], [`PlatformProfiles`], [`Lexicon`])
//! - an embedded default rule set ([`RuleSet::builtin`])
//!
//! Nothing in here mutates after construction. Adding a trigger phrase, a cue word or a channel
//! is a data edit to the rule-set document; no analyzer logic changes.

pub mod content_type;
pub mod lexicon;
pub mod platforms;
pub mod rules;
pub mod ruleset;
pub mod terms;

// Re-export facades
pub use ruleset::{RuleSet, BUILTIN_RULESET_YAML};

// Re-export public domain-level types
pub use content_type::ContentType;
pub use lexicon::{
    CategoryRule, ChannelCue, ClassifierCues, ComplianceCues, ConfidenceWeights, EnhancementCues,
    HashtagCues, KeywordCues, LengthAdjustment, LengthBand, Lexicon, LongFormRule, SafetyCues,
    SchedulingCues, ScoreCard, ScoreCue, SourcePoints, TopScoreBonus, TypeBoost, TypeCue,
};
pub use platforms::{ChannelKey, Hashtag, PlatformProfile, PlatformProfiles};
pub use rules::{RuleCategory, RuleEntry, RuleTaxonomy, Severity};
pub use terms::TermSet;

/// Errors returned by the `taxonomy` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum TaxonomyError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("rule set schema mismatch at {path}: {message}")]
    Schema { path: String, message: String },
}

/// Type alias for Results that can fail with a [`TaxonomyError`].
pub type TaxonomyResult<T> = Result<T, TaxonomyError>;
