//! # Clarion Core
//!
//! Content idea analysis for healthcare practices.
//!
//! This crate takes a short piece of user input and produces one [`AnalysisReport`]:
//! - content type classification and channel/schedule recommendation
//! - AHPRA-style compliance screening and patient-safety screening
//! - engagement and educational value scores
//! - an enhanced draft with disclaimers and calls to action where they are missing
//!
//! Every decision is explainable from the versioned rule set in the `taxonomy` crate.
//!
//! **No API concerns**: HTTP servers, authentication and wire DTOs belong in `api-rest` and
//! `api-shared`.

pub mod analyzers;
pub mod config;
pub mod constants;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod submission;
pub mod validation;

pub use analyzers::{ChannelReason, Enhancement, RiskLevel};
pub use config::{
    parse_utc_offset, resolve_rule_set, utc_offset_from_env_value, CoreConfig,
};
pub use error::{AnalysisError, AnalysisResult};
pub use pipeline::ContentAnalyser;
pub use report::AnalysisReport;
pub use submission::{
    ContentSubmission, PostingCadence, SourceTag, UserPreferences, ValidatedSubmission,
};
pub use validation::validate_submission;

// Re-exported so callers do not need a direct dependency for common rule-set types.
pub use taxonomy::{ChannelKey, ContentType, RuleSet};
