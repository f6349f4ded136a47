//! Cue vocabularies and scoring points.
//!
//! These structures deserialize directly from the rule-set document. Every point value the
//! analyzers apply lives here rather than in code, so tuning is a data edit. The shipped values
//! are starting points for product review, not tuned weights.

use crate::platforms::{ChannelKey, Hashtag, PlatformProfiles};
use crate::terms::TermSet;
use crate::{ContentType, TaxonomyError, TaxonomyResult};
use serde::Deserialize;
use std::collections::BTreeMap;

/// All non-taxonomy vocabularies and weights of a rule set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lexicon {
    pub classifier: ClassifierCues,
    pub engagement: ScoreCard,
    pub educational: ScoreCard,
    pub confidence: ConfidenceWeights,
    pub compliance: ComplianceCues,
    pub safety: SafetyCues,
    pub scheduling: SchedulingCues,
    pub enhancement: EnhancementCues,
    pub keywords: KeywordCues,
    pub hashtags: HashtagCues,
    pub categories: Vec<CategoryRule>,
}

// ============================================================================
// Classifier
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierCues {
    /// Evaluated in order; the first band whose `max_chars` covers the length applies.
    pub length_bands: Vec<LengthBand>,
    /// Evaluated in order; every cue whose terms occur adds its points.
    pub cues: Vec<TypeCue>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LengthBand {
    /// Inclusive upper bound in characters; `None` means unbounded.
    #[serde(default)]
    pub max_chars: Option<usize>,
    pub favours: Vec<TypeBoost>,
}

impl LengthBand {
    pub fn covers(&self, len: usize) -> bool {
        self.max_chars.map_or(true, |max| len <= max)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeBoost {
    pub content_type: ContentType,
    pub points: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeCue {
    pub content_type: ContentType,
    pub terms: TermSet,
    pub points: i32,
}

// ============================================================================
// Additive score cards (engagement, educational value)
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoreCard {
    pub baseline: i32,
    pub cues: Vec<ScoreCue>,
    #[serde(default)]
    pub length: Vec<LengthAdjustment>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoreCue {
    pub id: String,
    pub terms: TermSet,
    pub points: i32,
    /// Calendar months (1-12) in which the cue is active. Empty means always active.
    #[serde(default)]
    pub months: Vec<u32>,
}

impl ScoreCue {
    pub fn active_in(&self, month: u32) -> bool {
        self.months.is_empty() || self.months.contains(&month)
    }
}

/// Points applied when the text length falls inside an inclusive character range.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LengthAdjustment {
    #[serde(default)]
    pub min_chars: Option<usize>,
    #[serde(default)]
    pub max_chars: Option<usize>,
    pub points: i32,
}

impl LengthAdjustment {
    pub fn applies(&self, len: usize) -> bool {
        self.min_chars.map_or(true, |min| len >= min)
            && self.max_chars.map_or(true, |max| len <= max)
    }
}

// ============================================================================
// Confidence
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfidenceWeights {
    pub baseline: i32,
    pub source: SourcePoints,
    /// Cumulative: every adjustment whose range covers the length applies.
    #[serde(default)]
    pub length: Vec<LengthAdjustment>,
    /// Cumulative: every bonus whose threshold the top classifier score exceeds applies.
    #[serde(default)]
    pub top_score: Vec<TopScoreBonus>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourcePoints {
    #[serde(default)]
    pub voice: i32,
    #[serde(default)]
    pub text: i32,
    #[serde(default)]
    pub image: i32,
    #[serde(default)]
    pub document: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TopScoreBonus {
    /// Strict lower bound on the top classifier score.
    pub above: i32,
    pub points: i32,
}

// ============================================================================
// Screening helpers
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComplianceCues {
    /// Language that reads as medical advice ("should", "must", "diagnosis").
    pub obligation_terms: TermSet,
    /// Language that counts as a consultation disclaimer.
    pub disclaimer_terms: TermSet,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SafetyCues {
    /// A medication mention is acceptable when one of these also appears.
    pub medication_qualifiers: TermSet,
}

// ============================================================================
// Scheduling
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchedulingCues {
    /// Evaluated in order; the first cue whose terms occur picks the channel.
    pub channel_cues: Vec<ChannelCue>,
    pub long_form: LongFormRule,
    pub default_channel: ChannelKey,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelCue {
    pub channel: ChannelKey,
    pub terms: TermSet,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LongFormRule {
    /// Texts strictly longer than this go to `channel`.
    pub over_chars: usize,
    pub channel: ChannelKey,
}

// ============================================================================
// Enhancement, keywords, hashtags, categories
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnhancementCues {
    /// Texts up to this many characters count as short for the engagement question.
    pub short_text_max_chars: usize,
    /// Existing contact or appointment language suppresses the booking call to action.
    pub contact_terms: TermSet,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeywordCues {
    pub max_keywords: usize,
    pub vocabulary: TermSet,
    /// Added for any specialty context.
    pub specialty_common: TermSet,
    /// Extra terms per specialty, keyed by lower-case specialty name.
    #[serde(default)]
    pub specialties: BTreeMap<String, TermSet>,
}

impl KeywordCues {
    pub fn specialty_terms(&self, specialty: &str) -> Option<&TermSet> {
        self.specialties.get(&specialty.trim().to_lowercase())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HashtagCues {
    /// Always included, ahead of topic tags.
    pub locale: Vec<Hashtag>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryRule {
    pub label: String,
    pub terms: TermSet,
}

// ============================================================================
// Semantic validation
// ============================================================================

impl Lexicon {
    /// Cross-checks that serde cannot express: month ranges, band ordering, and that every
    /// channel the scheduling cues can produce has a platform profile.
    pub(crate) fn validate(&self, profiles: &PlatformProfiles) -> TaxonomyResult<()> {
        let mut previous: Option<usize> = None;
        for (i, band) in self.classifier.length_bands.iter().enumerate() {
            match (previous, band.max_chars) {
                (Some(prev), Some(max)) if max <= prev => {
                    return Err(TaxonomyError::InvalidInput(format!(
                        "classifier.length_bands[{i}].max_chars must be greater \
                         than the previous band"
                    )));
                }
                (None, _) if i > 0 => {
                    return Err(TaxonomyError::InvalidInput(format!(
                        "classifier.length_bands[{i}] follows an unbounded band"
                    )));
                }
                _ => {}
            }
            previous = band.max_chars;
        }

        for (name, card) in [("engagement", &self.engagement), ("educational", &self.educational)] {
            for cue in &card.cues {
                if let Some(month) = cue.months.iter().find(|m| !(1..=12).contains(*m)) {
                    return Err(TaxonomyError::InvalidInput(format!(
                        "{name}.cues '{}' has invalid month {month}",
                        cue.id
                    )));
                }
            }
            validate_length_ranges(name, &card.length)?;
        }
        validate_length_ranges("confidence", &self.confidence.length)?;

        let scheduled = self
            .scheduling
            .channel_cues
            .iter()
            .map(|cue| &cue.channel)
            .chain([
                &self.scheduling.long_form.channel,
                &self.scheduling.default_channel,
            ]);
        for channel in scheduled {
            if !profiles.contains(channel) {
                return Err(TaxonomyError::InvalidInput(format!(
                    "scheduling references channel '{channel}' which has no platform profile"
                )));
            }
        }

        if self.keywords.max_keywords == 0 {
            return Err(TaxonomyError::InvalidInput(
                "keywords.max_keywords must be at least 1".into(),
            ));
        }
        if let Some(key) = self
            .keywords
            .specialties
            .keys()
            .find(|k| k.trim().is_empty() || **k != k.to_lowercase())
        {
            return Err(TaxonomyError::InvalidInput(format!(
                "keywords.specialties key '{key}' must be lower-case and non-empty"
            )));
        }

        if self.hashtags.locale.is_empty() {
            return Err(TaxonomyError::InvalidInput(
                "hashtags.locale must contain at least one hashtag".into(),
            ));
        }

        if let Some(rule) = self.categories.iter().find(|r| r.label.trim().is_empty()) {
            return Err(TaxonomyError::InvalidInput(format!(
                "category rule with terms {:?} has an empty label",
                rule.terms.iter().collect::<Vec<_>>()
            )));
        }

        Ok(())
    }
}

fn validate_length_ranges(section: &str, ranges: &[LengthAdjustment]) -> TaxonomyResult<()> {
    for range in ranges {
        if let (Some(min), Some(max)) = (range.min_chars, range.max_chars) {
            if min > max {
                return Err(TaxonomyError::InvalidInput(format!(
                    "{section}.length range {min}..={max} is empty"
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_band_covers_inclusive_upper_bound() {
        let band = LengthBand {
            max_chars: Some(99),
            favours: vec![],
        };
        assert!(band.covers(99));
        assert!(!band.covers(100));

        let open = LengthBand {
            max_chars: None,
            favours: vec![],
        };
        assert!(open.covers(10_000));
    }

    #[test]
    fn length_adjustment_ranges_are_inclusive() {
        let adj = LengthAdjustment {
            min_chars: Some(50),
            max_chars: Some(200),
            points: 10,
        };
        assert!(adj.applies(50));
        assert!(adj.applies(200));
        assert!(!adj.applies(49));
        assert!(!adj.applies(201));

        let open_ended = LengthAdjustment {
            min_chars: Some(501),
            max_chars: None,
            points: -5,
        };
        assert!(open_ended.applies(501));
        assert!(!open_ended.applies(500));
    }

    #[test]
    fn score_cue_without_months_is_always_active() {
        let cue = ScoreCue {
            id: "tips".into(),
            terms: TermSet::from_terms(["tip"]).expect("valid terms"),
            points: 10,
            months: vec![],
        };
        assert!((1..=12).all(|m| cue.active_in(m)));

        let seasonal = ScoreCue {
            months: vec![6, 7, 8],
            ..cue
        };
        assert!(seasonal.active_in(7));
        assert!(!seasonal.active_in(1));
    }
}
