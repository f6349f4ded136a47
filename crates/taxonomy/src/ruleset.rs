//! Versioned rule-set document.
//!
//! A rule set bundles the trigger-phrase taxonomy, the platform profiles and every cue
//! vocabulary and point value into one YAML document with a `version` string. The document is
//! parsed once at process start; the resulting [`RuleSet`] is immutable and is shared by
//! reference with the analyzers.

use crate::lexicon::{
    CategoryRule, ClassifierCues, ComplianceCues, ConfidenceWeights, EnhancementCues, HashtagCues,
    KeywordCues, Lexicon, SafetyCues, SchedulingCues, ScoreCard,
};
use crate::platforms::{PlatformProfiles, PlatformWire};
use crate::rules::{RuleTaxonomy, RulesWire};
use crate::{TaxonomyError, TaxonomyResult};
use serde::Deserialize;
use std::path::Path;

/// The rule set compiled into the binary.
pub const BUILTIN_RULESET_YAML: &str = include_str!("../data/ruleset.yaml");

// ============================================================================
// Public RuleSet
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleSet {
    version: String,
    taxonomy: RuleTaxonomy,
    profiles: PlatformProfiles,
    lexicon: Lexicon,
}

impl RuleSet {
    /// Parse a rule set from YAML text.
    ///
    /// This uses `serde_path_to_error` to surface a best-effort "path" (e.g.
    /// `platforms[1].preferred_hour`) to the failing field when the YAML does not match the
    /// wire schema.
    ///
    /// # Errors
    ///
    /// Returns [`TaxonomyError`] if:
    /// - the YAML does not match the rule-set schema (unknown keys included),
    /// - a phrase, channel key or hashtag is invalid,
    /// - a cross-reference fails (for example a scheduling cue naming a channel with no profile).
    pub fn parse(yaml_text: &str) -> TaxonomyResult<Self> {
        let deserializer = serde_yaml::Deserializer::from_str(yaml_text);

        let wire = match serde_path_to_error::deserialize::<_, RuleSetWire>(deserializer) {
            Ok(parsed) => parsed,
            Err(err) => {
                let path = err.path().to_string();
                let source = err.into_inner();
                let path = if path.is_empty() || path == "." {
                    "<root>".to_owned()
                } else {
                    path
                };
                return Err(TaxonomyError::Schema {
                    path,
                    message: source.to_string(),
                });
            }
        };

        wire_to_domain(wire)
    }

    /// Parse the embedded default rule set.
    pub fn builtin() -> TaxonomyResult<Self> {
        Self::parse(BUILTIN_RULESET_YAML)
    }

    /// Read and parse a rule-set file.
    pub fn from_file(path: &Path) -> TaxonomyResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn taxonomy(&self) -> &RuleTaxonomy {
        &self.taxonomy
    }

    pub fn profiles(&self) -> &PlatformProfiles {
        &self.profiles
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleSetWire {
    version: String,
    rules: RulesWire,
    platforms: Vec<PlatformWire>,
    classifier: ClassifierCues,
    engagement: ScoreCard,
    educational: ScoreCard,
    confidence: ConfidenceWeights,
    compliance: ComplianceCues,
    safety: SafetyCues,
    scheduling: SchedulingCues,
    enhancement: EnhancementCues,
    keywords: KeywordCues,
    hashtags: HashtagCues,
    #[serde(default)]
    categories: Vec<CategoryRule>,
}

fn wire_to_domain(wire: RuleSetWire) -> TaxonomyResult<RuleSet> {
    let version = wire.version.trim().to_owned();
    if version.is_empty() {
        return Err(TaxonomyError::InvalidInput(
            "rule set version cannot be empty".into(),
        ));
    }

    let taxonomy = wire.rules.into_domain()?;

    let profiles = wire
        .platforms
        .into_iter()
        .map(PlatformWire::into_domain)
        .collect::<TaxonomyResult<Vec<_>>>()?;
    let profiles = PlatformProfiles::new(profiles)?;

    let lexicon = Lexicon {
        classifier: wire.classifier,
        engagement: wire.engagement,
        educational: wire.educational,
        confidence: wire.confidence,
        compliance: wire.compliance,
        safety: wire.safety,
        scheduling: wire.scheduling,
        enhancement: wire.enhancement,
        keywords: wire.keywords,
        hashtags: wire.hashtags,
        categories: wire.categories,
    };
    lexicon.validate(&profiles)?;

    Ok(RuleSet {
        version,
        taxonomy,
        profiles,
        lexicon,
    })
}
