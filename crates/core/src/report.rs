//! The analysis report: the one artifact returned per submission.

use crate::analyzers::{Enhancement, RiskLevel};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use taxonomy::{ChannelKey, ContentType};

/// Built once by the orchestrator and never patched afterwards. Edited text means a new
/// submission and a new report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub ruleset_version: String,

    // Classification and channel
    pub content_type: ContentType,
    pub content_type_scores: BTreeMap<ContentType, i32>,
    pub channel: ChannelKey,
    pub tone: String,
    pub confidence: u8,

    // Generated content
    pub title: String,
    pub enhanced_content: String,
    pub applied_enhancements: Vec<Enhancement>,
    pub keywords: Vec<String>,
    pub hashtags: Vec<String>,
    pub target_audience: String,
    pub category: String,

    // Screening
    pub compliance_risk: RiskLevel,
    pub compliance_notes: String,
    pub requires_review: bool,
    pub safety_considerations: Vec<String>,
    pub safe_for_publication: bool,

    // Scores
    pub engagement_score: u8,
    pub educational_value: u8,

    // Scheduling
    pub scheduled_for: DateTime<FixedOffset>,
    pub schedule_label: String,
    pub schedule_rationale: String,

    pub recommendations: Vec<String>,
    pub warnings: Vec<String>,
}
