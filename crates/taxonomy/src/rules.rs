//! Trigger-phrase taxonomy for compliance and patient-safety screening.
//!
//! Responsibilities:
//! - Define rule categories and their implicit severity
//! - Define the strict wire model for the `rules:` section of a rule set
//! - Translate wire phrases into normalised, immutable [`RuleEntry`] values
//!
//! Notes:
//! - Phrases are stored lower-cased; callers scan lower-cased text
//! - Matching is substring-based, so `cure` also fires on `cured`

use crate::{TaxonomyError, TaxonomyResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Public domain-level types
// ============================================================================

/// Category a trigger phrase belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleCategory {
    ProhibitedTerm,
    TherapeuticClaim,
    Testimonial,
    MedicationReference,
    EmergencySymptom,
    SelfDiagnosis,
}

impl RuleCategory {
    pub const ALL: [RuleCategory; 6] = [
        RuleCategory::ProhibitedTerm,
        RuleCategory::TherapeuticClaim,
        RuleCategory::Testimonial,
        RuleCategory::MedicationReference,
        RuleCategory::EmergencySymptom,
        RuleCategory::SelfDiagnosis,
    ];

    /// Categories screened by the compliance analyzer.
    pub const COMPLIANCE: [RuleCategory; 3] = [
        RuleCategory::ProhibitedTerm,
        RuleCategory::TherapeuticClaim,
        RuleCategory::Testimonial,
    ];

    /// Categories screened by the patient-safety analyzer.
    pub const SAFETY: [RuleCategory; 3] = [
        RuleCategory::MedicationReference,
        RuleCategory::EmergencySymptom,
        RuleCategory::SelfDiagnosis,
    ];

    /// Implicit severity: testimonial and emergency-symptom phrases are always high severity,
    /// everything else only escalates in combination with other findings.
    pub fn severity(self) -> Severity {
        match self {
            RuleCategory::Testimonial | RuleCategory::EmergencySymptom => Severity::High,
            RuleCategory::ProhibitedTerm
            | RuleCategory::TherapeuticClaim
            | RuleCategory::MedicationReference
            | RuleCategory::SelfDiagnosis => Severity::Escalating,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RuleCategory::ProhibitedTerm => "prohibited-term",
            RuleCategory::TherapeuticClaim => "therapeutic-claim",
            RuleCategory::Testimonial => "testimonial",
            RuleCategory::MedicationReference => "medication-reference",
            RuleCategory::EmergencySymptom => "emergency-symptom",
            RuleCategory::SelfDiagnosis => "self-diagnosis",
        }
    }
}

impl std::fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RuleCategory {
    type Err = TaxonomyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        RuleCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| TaxonomyError::InvalidInput(format!("unknown rule category: {s}")))
    }
}

/// Severity derived from a rule category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Contributes to risk, escalating only in combination.
    Escalating,
    /// High severity on its own.
    High,
}

/// One trigger phrase and the category it belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RuleEntry {
    phrase: String,
    category: RuleCategory,
}

impl RuleEntry {
    /// Create a rule entry. The phrase is trimmed and lower-cased.
    ///
    /// # Errors
    ///
    /// Returns [`TaxonomyError::InvalidInput`] if the phrase is blank.
    pub fn new(phrase: impl AsRef<str>, category: RuleCategory) -> TaxonomyResult<Self> {
        let phrase = phrase.as_ref().trim().to_lowercase();
        if phrase.is_empty() {
            return Err(TaxonomyError::InvalidInput(format!(
                "blank phrase in category {category}"
            )));
        }
        Ok(Self { phrase, category })
    }

    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    pub fn category(&self) -> RuleCategory {
        self.category
    }

    pub fn severity(&self) -> Severity {
        self.category.severity()
    }

    /// True if the phrase occurs in `text_lower` (already lower-cased).
    pub fn matches(&self, text_lower: &str) -> bool {
        text_lower.contains(self.phrase.as_str())
    }
}

/// Read-only collection of rule entries, grouped by category.
///
/// Entries keep their declaration order within a category, which fixes the order of issues
/// reported by the analyzers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleTaxonomy {
    by_category: BTreeMap<RuleCategory, Vec<RuleEntry>>,
}

impl RuleTaxonomy {
    /// Build a taxonomy from entries.
    ///
    /// # Errors
    ///
    /// Returns [`TaxonomyError::InvalidInput`] if a phrase appears twice in the same category.
    pub fn new(entries: impl IntoIterator<Item = RuleEntry>) -> TaxonomyResult<Self> {
        let mut by_category: BTreeMap<RuleCategory, Vec<RuleEntry>> = BTreeMap::new();
        for entry in entries {
            let bucket = by_category.entry(entry.category).or_default();
            if bucket.iter().any(|e| e.phrase == entry.phrase) {
                return Err(TaxonomyError::InvalidInput(format!(
                    "duplicate phrase '{}' in category {}",
                    entry.phrase, entry.category
                )));
            }
            bucket.push(entry);
        }
        Ok(Self { by_category })
    }

    /// All entries of `category`, in declaration order. Empty if the category has none.
    pub fn entries_by_category(&self, category: RuleCategory) -> &[RuleEntry] {
        self.by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Entries of `category` whose phrase occurs in `text_lower`.
    pub fn scan<'a>(
        &'a self,
        category: RuleCategory,
        text_lower: &'a str,
    ) -> impl Iterator<Item = &'a RuleEntry> + 'a {
        self.entries_by_category(category)
            .iter()
            .filter(move |entry| entry.matches(text_lower))
    }

    pub fn len(&self) -> usize {
        self.by_category.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Wire types (crate-internal)
// ============================================================================

/// Wire representation of the `rules:` section: one phrase list per category.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub(crate) struct RulesWire {
    #[serde(default)]
    prohibited_term: Vec<String>,
    #[serde(default)]
    therapeutic_claim: Vec<String>,
    #[serde(default)]
    testimonial: Vec<String>,
    #[serde(default)]
    medication_reference: Vec<String>,
    #[serde(default)]
    emergency_symptom: Vec<String>,
    #[serde(default)]
    self_diagnosis: Vec<String>,
}

impl RulesWire {
    pub(crate) fn into_domain(self) -> TaxonomyResult<RuleTaxonomy> {
        let groups = [
            (RuleCategory::ProhibitedTerm, self.prohibited_term),
            (RuleCategory::TherapeuticClaim, self.therapeutic_claim),
            (RuleCategory::Testimonial, self.testimonial),
            (RuleCategory::MedicationReference, self.medication_reference),
            (RuleCategory::EmergencySymptom, self.emergency_symptom),
            (RuleCategory::SelfDiagnosis, self.self_diagnosis),
        ];

        let mut entries = Vec::new();
        for (category, phrases) in groups {
            for phrase in phrases {
                entries.push(RuleEntry::new(phrase, category)?);
            }
        }
        RuleTaxonomy::new(entries)
    }
}
