//! Wire DTOs for the REST contract.
//!
//! Success: `{ "success": true, "analysis": {...}, "recommendations": [...], "warnings": [...] }`
//! Failure: `{ "success": false, "error": "...", "analysis": null }`

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// A content idea to analyse.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AnalyseReq {
    /// Raw text; at least 3 characters after trimming.
    #[schema(example = "Tips for managing eczema flare-ups in winter")]
    pub content: String,
    /// One of `voice`, `text`, `image`, `document`.
    #[schema(example = "text")]
    pub source: String,
    #[serde(default)]
    #[schema(example = "dermatology")]
    pub healthcare_context: Option<String>,
    #[serde(default)]
    pub user_preferences: Option<UserPreferencesDto>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct UserPreferencesDto {
    /// Channel keys such as `facebook` or `linkedin`, in order of preference.
    pub preferred_channels: Vec<String>,
    /// `daily` or `weekly` (default).
    pub posting_cadence: Option<String>,
    pub target_audience: Option<String>,
    pub practice_specialty: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AnalysisReportDto {
    pub ruleset_version: String,
    pub content_type: String,
    pub content_type_scores: BTreeMap<String, i32>,
    pub channel: String,
    pub tone: String,
    pub confidence: u8,
    pub title: String,
    pub enhanced_content: String,
    pub applied_enhancements: Vec<String>,
    pub keywords: Vec<String>,
    pub hashtags: Vec<String>,
    pub target_audience: String,
    pub category: String,
    /// `low`, `medium` or `high`.
    pub compliance_risk: String,
    pub compliance_notes: String,
    pub requires_review: bool,
    pub safety_considerations: Vec<String>,
    pub safe_for_publication: bool,
    pub engagement_score: u8,
    pub educational_value: u8,
    /// RFC 3339 timestamp in the practice's local offset.
    pub scheduled_for: String,
    pub schedule_label: String,
    pub schedule_rationale: String,
    pub recommendations: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AnalyseRes {
    pub success: bool,
    pub analysis: Option<AnalysisReportDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalyseRes {
    pub fn success(analysis: AnalysisReportDto) -> Self {
        Self {
            success: true,
            recommendations: Some(analysis.recommendations.clone()),
            warnings: Some(analysis.warnings.clone()),
            analysis: Some(analysis),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            analysis: None,
            recommendations: None,
            warnings: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_serializes_with_null_analysis() {
        let json = serde_json::to_value(AnalyseRes::failure("validation failed: content"))
            .expect("serializes");
        assert_eq!(
            json,
            serde_json::json!({
                "success": false,
                "error": "validation failed: content",
                "analysis": null
            })
        );
    }

    #[test]
    fn request_accepts_minimal_payload() {
        let req: AnalyseReq =
            serde_json::from_str(r#"{"content":"Flu shots now open","source":"text"}"#)
                .expect("valid payload");
        assert!(req.user_preferences.is_none());

        let prefs: UserPreferencesDto =
            serde_json::from_str(r#"{"posting_cadence":"daily"}"#).expect("valid payload");
        assert!(prefs.preferred_channels.is_empty());
        assert_eq!(prefs.posting_cadence.as_deref(), Some("daily"));
    }
}
