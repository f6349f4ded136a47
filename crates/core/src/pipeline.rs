//! Pipeline orchestrator.
//!
//! Validates a submission, fans it out to the analyzers and assembles one [`AnalysisReport`].
//!
//! Analyzers run as tasks on a [`JoinSet`] in two waves:
//! - wave 1: classifier, compliance, safety, engagement, educational value
//! - wave 2: scheduling (needs the classification), enhancement (needs compliance and safety)
//!
//! Results are slotted by stage, not by completion order. Dropping the `analyse` future drops
//! the set, which aborts any analyzer still in flight. An analyzer that panics fails the whole
//! analysis with [`AnalysisError::InternalAnalysis`]; there is no partial report.

use crate::analyzers::scoring::clamp_score;
use crate::analyzers::{
    analyse_compliance, analyse_safety, classify, enhance, presentation, recommend_schedule,
    score, Classification, ComplianceFindings, EnhancedContent, RiskLevel, SafetyFindings,
    ScheduleRecommendation, ScoreBreakdown,
};
use crate::config::CoreConfig;
use crate::constants::{GENERAL_REMINDERS, LOW_SCORE_THRESHOLD};
use crate::report::AnalysisReport;
use crate::submission::{ContentSubmission, SourceTag, ValidatedSubmission};
use crate::validation::validate_submission;
use crate::{AnalysisError, AnalysisResult};
use chrono::{DateTime, Datelike, Utc};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use taxonomy::{ConfidenceWeights, RuleSet};
use tokio::task::JoinSet;

/// Runs content analysis against one rule set.
///
/// Cheap to clone; holds only the shared configuration.
#[derive(Clone, Debug)]
pub struct ContentAnalyser {
    config: Arc<CoreConfig>,
}

impl ContentAnalyser {
    pub fn new(config: Arc<CoreConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Arc<CoreConfig> {
        &self.config
    }

    /// Analyse one submission.
    ///
    /// `now` is the moment the schedule is computed from; it is converted to the configured
    /// practice offset, whose calendar month also drives seasonal engagement cues. Identical
    /// inputs (including `now`) give identical reports.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::Validation`] if the content is shorter than three characters after
    ///   trimming.
    /// - [`AnalysisError::InternalAnalysis`] if an analyzer task fails.
    pub async fn analyse(
        &self,
        submission: ContentSubmission,
        now: DateTime<Utc>,
    ) -> AnalysisResult<AnalysisReport> {
        let submission = Arc::new(validate_submission(submission)?);
        let rules = Arc::clone(self.config.rules());
        let local_now = now.with_timezone(&self.config.utc_offset());
        let month = local_now.month();

        tracing::debug!(
            source = %submission.source(),
            chars = submission.char_len(),
            ruleset = rules.version(),
            "analysing submission"
        );

        // ====================================================================
        // Wave 1: independent analyzers
        // ====================================================================

        let mut set = JoinSet::new();
        {
            let (sub, rules) = (Arc::clone(&submission), Arc::clone(&rules));
            spawn_stage(&mut set, Stage::Classifier, move || {
                StageOutput::Classification(classify(
                    sub.lower(),
                    sub.char_len(),
                    &rules.lexicon().classifier,
                ))
            });
        }
        {
            let (sub, rules) = (Arc::clone(&submission), Arc::clone(&rules));
            spawn_stage(&mut set, Stage::Compliance, move || {
                StageOutput::Compliance(analyse_compliance(
                    sub.lower(),
                    sub.specialty(),
                    rules.taxonomy(),
                    &rules.lexicon().compliance,
                ))
            });
        }
        {
            let (sub, rules) = (Arc::clone(&submission), Arc::clone(&rules));
            spawn_stage(&mut set, Stage::Safety, move || {
                StageOutput::Safety(analyse_safety(
                    sub.lower(),
                    rules.taxonomy(),
                    &rules.lexicon().safety,
                ))
            });
        }
        {
            let (sub, rules) = (Arc::clone(&submission), Arc::clone(&rules));
            spawn_stage(&mut set, Stage::Engagement, move || {
                StageOutput::Engagement(score(
                    sub.lower(),
                    sub.char_len(),
                    month,
                    &rules.lexicon().engagement,
                ))
            });
        }
        {
            let (sub, rules) = (Arc::clone(&submission), Arc::clone(&rules));
            spawn_stage(&mut set, Stage::Educational, move || {
                StageOutput::Educational(score(
                    sub.lower(),
                    sub.char_len(),
                    month,
                    &rules.lexicon().educational,
                ))
            });
        }

        let mut findings = Findings::default();
        for output in join_stages(&mut set).await? {
            findings.slot(output);
        }

        let classification = Stage::Classifier.take(findings.classification)?;
        let compliance = Arc::new(Stage::Compliance.take(findings.compliance)?);
        let safety = Arc::new(Stage::Safety.take(findings.safety)?);
        let engagement = Stage::Engagement.take(findings.engagement)?;
        let educational = Stage::Educational.take(findings.educational)?;

        // ====================================================================
        // Wave 2: analyzers that depend on wave 1
        // ====================================================================

        {
            let (sub, rules) = (Arc::clone(&submission), Arc::clone(&rules));
            let content_type = classification.suggested;
            spawn_stage(&mut set, Stage::Scheduling, move || {
                StageOutput::Schedule(recommend_schedule(
                    sub.lower(),
                    sub.char_len(),
                    content_type,
                    sub.preferences(),
                    &rules.lexicon().scheduling,
                    rules.profiles(),
                    local_now,
                ))
            });
        }
        {
            let (sub, rules) = (Arc::clone(&submission), Arc::clone(&rules));
            let (compliance, safety) = (Arc::clone(&compliance), Arc::clone(&safety));
            spawn_stage(&mut set, Stage::Enhancement, move || {
                StageOutput::Enhanced(enhance(
                    sub.text(),
                    sub.lower(),
                    sub.specialty(),
                    &compliance,
                    &safety,
                    &rules.lexicon().compliance,
                    &rules.lexicon().enhancement,
                ))
            });
        }

        let mut findings = Findings::default();
        for output in join_stages(&mut set).await? {
            findings.slot(output);
        }

        let schedule = Stage::Scheduling.take(findings.schedule)?.ok_or_else(|| {
            AnalysisError::InternalAnalysis {
                stage: Stage::Scheduling.as_str(),
                message: "chosen channel has no platform profile".into(),
            }
        })?;
        let enhanced = Stage::Enhancement.take(findings.enhanced)?;

        let report = assemble(Assembly {
            submission: &submission,
            rules: &rules,
            classification,
            compliance: &compliance,
            safety: &safety,
            engagement,
            educational,
            schedule,
            enhanced,
        })?;

        if report.compliance_risk == RiskLevel::High {
            tracing::warn!(
                issues = compliance.issues.len(),
                "submission carries high compliance risk"
            );
        }
        if !report.safe_for_publication {
            tracing::warn!(
                considerations = report.safety_considerations.len(),
                "submission is not safe for publication as written"
            );
        }

        Ok(report)
    }
}

// ============================================================================
// Stages
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Classifier,
    Compliance,
    Safety,
    Engagement,
    Educational,
    Scheduling,
    Enhancement,
}

impl Stage {
    fn as_str(self) -> &'static str {
        match self {
            Stage::Classifier => "classifier",
            Stage::Compliance => "compliance",
            Stage::Safety => "safety",
            Stage::Engagement => "engagement",
            Stage::Educational => "educational",
            Stage::Scheduling => "scheduling",
            Stage::Enhancement => "enhancement",
        }
    }

    fn take<T>(self, slot: Option<T>) -> AnalysisResult<T> {
        slot.ok_or_else(|| AnalysisError::InternalAnalysis {
            stage: self.as_str(),
            message: "stage produced no output".into(),
        })
    }
}

enum StageOutput {
    Classification(Classification),
    Compliance(ComplianceFindings),
    Safety(SafetyFindings),
    Engagement(ScoreBreakdown),
    Educational(ScoreBreakdown),
    Schedule(Option<ScheduleRecommendation>),
    Enhanced(EnhancedContent),
}

type StageResult = (Stage, Result<StageOutput, String>);

#[derive(Default)]
struct Findings {
    classification: Option<Classification>,
    compliance: Option<ComplianceFindings>,
    safety: Option<SafetyFindings>,
    engagement: Option<ScoreBreakdown>,
    educational: Option<ScoreBreakdown>,
    schedule: Option<Option<ScheduleRecommendation>>,
    enhanced: Option<EnhancedContent>,
}

impl Findings {
    fn slot(&mut self, output: StageOutput) {
        match output {
            StageOutput::Classification(c) => {
                tracing::debug!(
                    stage = "classifier",
                    suggested = %c.suggested,
                    score = c.top_score,
                    "stage complete"
                );
                self.classification = Some(c);
            }
            StageOutput::Compliance(c) => {
                tracing::debug!(
                    stage = "compliance",
                    risk = %c.risk,
                    issues = c.issues.len(),
                    "stage complete"
                );
                self.compliance = Some(c);
            }
            StageOutput::Safety(s) => {
                tracing::debug!(stage = "safety", safe = s.safe_for_publication, "stage complete");
                self.safety = Some(s);
            }
            StageOutput::Engagement(s) => {
                tracing::debug!(stage = "engagement", score = s.value, "stage complete");
                self.engagement = Some(s);
            }
            StageOutput::Educational(s) => {
                tracing::debug!(stage = "educational", score = s.value, "stage complete");
                self.educational = Some(s);
            }
            StageOutput::Schedule(s) => {
                tracing::debug!(
                    stage = "scheduling",
                    channel = s.as_ref().map(|r| r.channel.as_str()),
                    "stage complete"
                );
                self.schedule = Some(s);
            }
            StageOutput::Enhanced(e) => {
                tracing::debug!(stage = "enhancement", applied = e.applied.len(), "stage complete");
                self.enhanced = Some(e);
            }
        }
    }
}

fn spawn_stage<F>(set: &mut JoinSet<StageResult>, stage: Stage, run: F)
where
    F: FnOnce() -> StageOutput + Send + 'static,
{
    set.spawn(async move {
        let outcome = std::panic::catch_unwind(AssertUnwindSafe(run)).map_err(panic_message);
        (stage, outcome)
    });
}

/// Join every task in the set. The first failure ends the join; the caller drops the set,
/// which aborts the rest.
async fn join_stages(set: &mut JoinSet<StageResult>) -> AnalysisResult<Vec<StageOutput>> {
    let mut outputs = Vec::with_capacity(set.len());
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((_, Ok(output))) => outputs.push(output),
            Ok((stage, Err(message))) => {
                tracing::error!(stage = stage.as_str(), %message, "analyzer failed");
                return Err(AnalysisError::InternalAnalysis {
                    stage: stage.as_str(),
                    message,
                });
            }
            Err(err) => {
                tracing::error!(error = %err, "analyzer task did not complete");
                return Err(AnalysisError::InternalAnalysis {
                    stage: "orchestrator",
                    message: err.to_string(),
                });
            }
        }
    }
    Ok(outputs)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "analyzer panicked".to_string()
    }
}

// ============================================================================
// Assembly
// ============================================================================

struct Assembly<'a> {
    submission: &'a ValidatedSubmission,
    rules: &'a RuleSet,
    classification: Classification,
    compliance: &'a ComplianceFindings,
    safety: &'a SafetyFindings,
    engagement: ScoreBreakdown,
    educational: ScoreBreakdown,
    schedule: ScheduleRecommendation,
    enhanced: EnhancedContent,
}

fn assemble(parts: Assembly<'_>) -> AnalysisResult<AnalysisReport> {
    let Assembly {
        submission,
        rules,
        classification,
        compliance,
        safety,
        engagement,
        educational,
        schedule,
        enhanced,
    } = parts;
    let lexicon = rules.lexicon();
    let specialty = submission.specialty();

    let profile = rules
        .profiles()
        .profile_for(&schedule.channel)
        .ok_or_else(|| AnalysisError::InternalAnalysis {
            stage: "orchestrator",
            message: format!("no platform profile for channel '{}'", schedule.channel),
        })?;

    let keywords = presentation::keywords(submission.lower(), specialty, &lexicon.keywords);
    let hashtags = presentation::hashtags(&keywords, specialty, profile, &lexicon.hashtags);

    let mut recommendations: Vec<String> = compliance.suggestions.clone();
    recommendations.extend(safety.considerations.iter().cloned());
    if engagement.value < LOW_SCORE_THRESHOLD {
        recommendations.push(
            "Boost engagement: ask readers a question or add a practical, easy-to-follow tip."
                .to_string(),
        );
    }
    if educational.value < LOW_SCORE_THRESHOLD {
        recommendations.push(
            "Increase educational value: explain why this matters \
             or outline simple steps readers can take."
                .to_string(),
        );
    }
    recommendations.push(schedule.rationale.clone());
    if !enhanced.applied.is_empty() {
        let applied: Vec<&str> = enhanced.applied.iter().map(|e| e.as_str()).collect();
        recommendations.push(format!(
            "Review the added wording before publishing ({}).",
            applied.join(", ")
        ));
    }
    recommendations.extend(GENERAL_REMINDERS.iter().map(|r| r.to_string()));

    let mut warnings = Vec::new();
    if compliance.risk != RiskLevel::Low {
        warnings.extend(compliance.issues.iter().cloned());
    }
    warnings.extend(safety.warnings.iter().cloned());

    Ok(AnalysisReport {
        ruleset_version: rules.version().to_string(),
        content_type: classification.suggested,
        confidence: confidence(
            submission.source(),
            submission.char_len(),
            classification.top_score,
            &lexicon.confidence,
        ),
        content_type_scores: classification.scores,
        tone: profile.tone.clone(),
        title: presentation::title(submission.text(), classification.suggested),
        enhanced_content: enhanced.text,
        applied_enhancements: enhanced.applied,
        keywords,
        hashtags,
        target_audience: presentation::audience(submission.preferences(), profile, specialty),
        category: presentation::category(submission.lower(), specialty, &lexicon.categories),
        compliance_risk: compliance.risk,
        compliance_notes: compliance.notes.clone(),
        requires_review: compliance.requires_review,
        safety_considerations: safety.considerations.clone(),
        safe_for_publication: safety.safe_for_publication,
        engagement_score: engagement.value,
        educational_value: educational.value,
        channel: schedule.channel,
        scheduled_for: schedule.at,
        schedule_label: schedule.label,
        schedule_rationale: schedule.rationale,
        recommendations,
        warnings,
    })
}

fn confidence(
    source: SourceTag,
    char_len: usize,
    top_score: i32,
    weights: &ConfidenceWeights,
) -> u8 {
    let source_points = match source {
        SourceTag::Voice => weights.source.voice,
        SourceTag::Text => weights.source.text,
        SourceTag::Image => weights.source.image,
        SourceTag::Document => weights.source.document,
    };

    let mut total = i64::from(weights.baseline) + i64::from(source_points);
    total += weights
        .length
        .iter()
        .filter(|adj| adj.applies(char_len))
        .map(|adj| i64::from(adj.points))
        .sum::<i64>();
    total += weights
        .top_score
        .iter()
        .filter(|bonus| top_score > bonus.above)
        .map(|bonus| i64::from(bonus.points))
        .sum::<i64>();

    clamp_score(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::UserPreferences;
    use chrono::TimeZone;
    use taxonomy::{ChannelKey, ContentType};

    fn analyser() -> ContentAnalyser {
        ContentAnalyser::new(Arc::new(CoreConfig::builtin().expect("builtin config")))
    }

    /// Wednesday 15 January 2025, 15:00 AEST.
    fn wednesday_afternoon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 5, 0, 0)
            .single()
            .expect("valid instant")
    }

    /// Wednesday 16 July 2025, 15:00 AEST (southern winter).
    fn winter_afternoon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 16, 5, 0, 0)
            .single()
            .expect("valid instant")
    }

    #[tokio::test]
    async fn eczema_tip_scenario() {
        let submission = ContentSubmission::new(
            "Tips for managing eczema flare-ups in winter",
            SourceTag::Text,
        )
        .with_context("dermatology");

        let report = analyser()
            .analyse(submission, winter_afternoon())
            .await
            .expect("analysis succeeds");

        assert!(matches!(
            report.content_type,
            ContentType::HealthTip | ContentType::PatientEducation
        ));
        assert_eq!(report.compliance_risk, RiskLevel::Low);
        assert!(!report.requires_review);
        assert!(matches!(report.channel.as_str(), "instagram" | "facebook"));
        assert!(report.keywords.iter().any(|k| k == "health" || k == "care"));
        assert!(report.hashtags.contains(&"#AusHealth".to_string()));
        assert!(report.hashtags.contains(&"#HealthcareAustralia".to_string()));
        assert_eq!(report.engagement_score, 75);
        assert_eq!(report.category, "Seasonal health");
        assert_eq!(report.title, "Health Tip: Tips for managing eczema flare-ups in winter");
        assert_eq!(report.target_audience, "Patients seeking dermatology care");
        assert!(report.warnings.is_empty());
        assert_eq!(report.ruleset_version, "2025.1");
    }

    #[tokio::test]
    async fn winter_bonus_depends_on_supplied_month() {
        let text = "Tips for managing eczema flare-ups in winter";
        let summer = analyser()
            .analyse(ContentSubmission::new(text, SourceTag::Text), wednesday_afternoon())
            .await
            .expect("analysis succeeds");
        let winter = analyser()
            .analyse(ContentSubmission::new(text, SourceTag::Text), winter_afternoon())
            .await
            .expect("analysis succeeds");
        assert_eq!(winter.engagement_score - summer.engagement_score, 15);
    }

    #[tokio::test]
    async fn miracle_cure_scenario() {
        let submission = ContentSubmission::new(
            "This miracle cure cured my patient's eczema instantly, guaranteed!",
            SourceTag::Text,
        );
        let report = analyser()
            .analyse(submission, wednesday_afternoon())
            .await
            .expect("analysis succeeds");

        assert_eq!(report.compliance_risk, RiskLevel::High);
        assert!(report.requires_review);
        for phrase in ["miracle", "cure", "guaranteed", "my patient"] {
            assert!(
                report.compliance_notes.contains(&format!("\"{phrase}\"")),
                "notes missing {phrase}: {}",
                report.compliance_notes
            );
            assert!(report.warnings.iter().any(|w| w.contains(phrase)));
        }
    }

    #[tokio::test]
    async fn short_content_fails_validation() {
        for content in ["", "  ", "a", "ab", " ab "] {
            let err = analyser()
                .analyse(ContentSubmission::new(content, SourceTag::Voice), wednesday_afternoon())
                .await
                .expect_err("should fail validation");
            assert!(err.is_validation(), "{content:?}: {err}");
        }
        analyser()
            .analyse(ContentSubmission::new("abc", SourceTag::Voice), wednesday_afternoon())
            .await
            .expect("three characters is valid");
    }

    #[tokio::test]
    async fn identical_input_gives_identical_report() {
        let submission = ContentSubmission::new(
            "How to prevent sunburn this summer: simple steps for the whole family. \
             Ask your pharmacist about sunscreen?",
            SourceTag::Document,
        )
        .with_context("general practice");

        let a = analyser()
            .analyse(submission.clone(), wednesday_afternoon())
            .await
            .expect("analysis succeeds");
        let b = analyser()
            .analyse(submission, wednesday_afternoon())
            .await
            .expect("analysis succeeds");

        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).expect("serializes"),
            serde_json::to_string(&b).expect("serializes")
        );
    }

    #[tokio::test]
    async fn scores_stay_in_bounds_for_huge_input() {
        let content = "Quick question? Important tips for health, wellness and care. ".repeat(170);
        let report = analyser()
            .analyse(ContentSubmission::new(content, SourceTag::Text), wednesday_afternoon())
            .await
            .expect("analysis succeeds");
        assert!(report.engagement_score <= 100);
        assert!(report.educational_value <= 100);
        assert!(report.confidence <= 100);
        assert_eq!(report.channel.as_str(), "blog");
    }

    #[tokio::test]
    async fn safe_flag_matches_considerations() {
        for content in [
            "Drink more water",
            "Chest pain is an emergency",
            "You probably have a cold, take paracetamol",
        ] {
            let report = analyser()
                .analyse(ContentSubmission::new(content, SourceTag::Text), wednesday_afternoon())
                .await
                .expect("analysis succeeds");
            assert_eq!(
                report.safe_for_publication,
                report.safety_considerations.is_empty(),
                "{content}"
            );
        }
    }

    #[tokio::test]
    async fn recommendations_end_with_general_reminders() {
        let report = analyser()
            .analyse(
                ContentSubmission::new("Drink more water", SourceTag::Text),
                wednesday_afternoon(),
            )
            .await
            .expect("analysis succeeds");
        let n = report.recommendations.len();
        assert!(n >= 3);
        assert_eq!(report.recommendations[n - 2], GENERAL_REMINDERS[0]);
        assert_eq!(report.recommendations[n - 1], GENERAL_REMINDERS[1]);
        assert!(report.recommendations.contains(&report.schedule_rationale));
    }

    #[tokio::test]
    async fn preferences_flow_into_the_report() {
        let prefs = UserPreferences {
            preferred_channels: vec![ChannelKey::new("linkedin").expect("valid key")],
            target_audience: Some("Referring GPs".into()),
            practice_specialty: Some("physiotherapy".into()),
            ..UserPreferences::default()
        };
        let report = analyser()
            .analyse(
                ContentSubmission::new("Stretch breaks help desk workers", SourceTag::Voice)
                    .with_preferences(prefs),
                wednesday_afternoon(),
            )
            .await
            .expect("analysis succeeds");

        assert_eq!(report.channel.as_str(), "linkedin");
        assert_eq!(report.tone, "professional and evidence-focused");
        assert_eq!(report.target_audience, "Referring GPs");
        assert!(report.keywords.contains(&"physiotherapy".to_string()));
        assert_eq!(report.schedule_label, "10:00 Tuesday");
    }

    #[test]
    fn confidence_follows_weights() {
        let rules = RuleSet::builtin().expect("builtin");
        let weights = &rules.lexicon().confidence;
        assert_eq!(confidence(SourceTag::Text, 10, 0, weights), 80);
        assert_eq!(confidence(SourceTag::Voice, 51, 6, weights), 100);
        assert_eq!(confidence(SourceTag::Image, 201, 0, weights), 75);
        assert_eq!(confidence(SourceTag::Document, 50, 9, weights), 85);
    }

    #[tokio::test]
    async fn panicking_stage_becomes_internal_error() {
        let mut set = JoinSet::new();
        spawn_stage(&mut set, Stage::Engagement, || panic!("scorer blew up"));
        let err = join_stages(&mut set)
            .await
            .err()
            .expect("panic should fail the join");
        assert!(matches!(
            err,
            AnalysisError::InternalAnalysis { stage: "engagement", ref message }
                if message.contains("scorer blew up")
        ));
    }

    #[tokio::test]
    async fn dropped_analysis_leaves_analyser_usable() {
        let analyser = analyser();
        let submission = ContentSubmission::new("Flu shots now open for winter", SourceTag::Text);

        let elapsed = tokio::time::timeout(
            std::time::Duration::ZERO,
            analyser.analyse(submission.clone(), wednesday_afternoon()),
        )
        .await;
        assert!(elapsed.is_err(), "zero deadline should cancel the analysis");

        let report = analyser
            .analyse(submission, wednesday_afternoon())
            .await
            .expect("analysis succeeds after a cancelled run");
        assert!(!report.recommendations.is_empty());
    }
}
