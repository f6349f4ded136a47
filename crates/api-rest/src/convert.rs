//! DTO ⇄ domain translation.

use api_shared::{AnalyseReq, AnalysisReportDto, UserPreferencesDto};
use clarion_core::{
    AnalysisReport, ChannelKey, ContentSubmission, PostingCadence, SourceTag, UserPreferences,
};

/// Translate a request body into a submission.
///
/// Errors are human-readable and returned to the caller as-is.
pub fn submission_from_req(req: AnalyseReq) -> Result<ContentSubmission, String> {
    let source: SourceTag = req.source.parse()?;
    let user_preferences = req
        .user_preferences
        .map(preferences_from_dto)
        .transpose()?;

    Ok(ContentSubmission {
        content: req.content,
        source,
        healthcare_context: req.healthcare_context,
        user_preferences,
    })
}

fn preferences_from_dto(dto: UserPreferencesDto) -> Result<UserPreferences, String> {
    let preferred_channels = dto
        .preferred_channels
        .iter()
        .map(|c| {
            ChannelKey::new(c).map_err(|e| format!("user_preferences.preferred_channels: {e}"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let posting_cadence = match dto.posting_cadence.as_deref().map(str::trim) {
        None | Some("") => PostingCadence::default(),
        Some(value) => value.parse()?,
    };

    Ok(UserPreferences {
        preferred_channels,
        posting_cadence,
        target_audience: dto.target_audience,
        practice_specialty: dto.practice_specialty,
    })
}

pub fn report_to_dto(report: AnalysisReport) -> AnalysisReportDto {
    AnalysisReportDto {
        ruleset_version: report.ruleset_version,
        content_type: report.content_type.to_string(),
        content_type_scores: report
            .content_type_scores
            .into_iter()
            .map(|(t, score)| (t.to_string(), score))
            .collect(),
        channel: report.channel.to_string(),
        tone: report.tone,
        confidence: report.confidence,
        title: report.title,
        enhanced_content: report.enhanced_content,
        applied_enhancements: report
            .applied_enhancements
            .iter()
            .map(|e| e.as_str().to_string())
            .collect(),
        keywords: report.keywords,
        hashtags: report.hashtags,
        target_audience: report.target_audience,
        category: report.category,
        compliance_risk: report.compliance_risk.to_string(),
        compliance_notes: report.compliance_notes,
        requires_review: report.requires_review,
        safety_considerations: report.safety_considerations,
        safe_for_publication: report.safe_for_publication,
        engagement_score: report.engagement_score,
        educational_value: report.educational_value,
        scheduled_for: report.scheduled_for.to_rfc3339(),
        schedule_label: report.schedule_label,
        schedule_rationale: report.schedule_rationale,
        recommendations: report.recommendations,
        warnings: report.warnings,
    }
}
