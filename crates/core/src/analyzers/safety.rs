//! Patient safety screening.
//!
//! One consideration per flagged category, in taxonomy order. A medication mention counts only
//! when no qualifier ("doctor", "pharmacist") appears alongside it.

use serde::Serialize;
use taxonomy::{RuleCategory, RuleTaxonomy, SafetyCues, Severity};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SafetyFindings {
    pub considerations: Vec<String>,
    pub warnings: Vec<String>,
    /// True iff `considerations` is empty.
    pub safe_for_publication: bool,
    /// Medication was mentioned without a doctor or pharmacist qualifier.
    pub unqualified_medication: bool,
}

pub fn analyse_safety(
    text_lower: &str,
    taxonomy: &RuleTaxonomy,
    cues: &SafetyCues,
) -> SafetyFindings {
    let mut considerations = Vec::new();
    let mut warnings = Vec::new();
    let mut escalating = 0usize;
    let mut unqualified_medication = false;

    for category in RuleCategory::SAFETY {
        let Some(entry) = taxonomy.scan(category, text_lower).next() else {
            continue;
        };
        let phrase = entry.phrase();

        match category {
            RuleCategory::MedicationReference => {
                if cues.medication_qualifiers.matches_any(text_lower) {
                    continue;
                }
                unqualified_medication = true;
                considerations.push(format!(
                    "Mentions medication (\"{phrase}\"): add a disclaimer to consult a doctor \
                     or pharmacist before starting or changing any medication."
                ));
                warnings.push(
                    "Medication is discussed without directing readers to a doctor or pharmacist."
                        .to_string(),
                );
            }
            RuleCategory::EmergencySymptom => {
                considerations.push(format!(
                    "Mentions an emergency symptom (\"{phrase}\"): include an instruction \
                     to call 000 or seek immediate medical care."
                ));
                warnings.push(format!(
                    "Emergency symptom \"{phrase}\" must be accompanied \
                     by clear urgent-care instructions."
                ));
            }
            RuleCategory::SelfDiagnosis => {
                considerations.push(format!(
                    "Encourages self-diagnosis (\"{phrase}\"): emphasise the importance \
                     of a professional diagnosis."
                ));
            }
            _ => continue,
        }

        if category.severity() == Severity::Escalating {
            escalating += 1;
        }
    }

    if escalating >= 2 {
        warnings.push(
            "Combines medication and self-diagnosis language; have a clinician review this post."
                .to_string(),
        );
    }

    SafetyFindings {
        safe_for_publication: considerations.is_empty(),
        considerations,
        warnings,
        unqualified_medication,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::test_support::rules;

    fn run(text: &str) -> SafetyFindings {
        let rules = rules();
        analyse_safety(&text.to_lowercase(), rules.taxonomy(), &rules.lexicon().safety)
    }

    #[test]
    fn clean_text_is_safe() {
        let findings = run("Tips for managing eczema flare-ups in winter");
        assert!(findings.safe_for_publication);
        assert!(findings.considerations.is_empty());
        assert!(findings.warnings.is_empty());
    }

    #[test]
    fn qualified_medication_is_not_a_consideration() {
        let findings = run("Ask your pharmacist which antihistamine suits you");
        assert!(findings.safe_for_publication);
        assert!(!findings.unqualified_medication);
    }

    #[test]
    fn unqualified_medication_is_flagged() {
        let findings = run("Take ibuprofen for the swelling");
        assert!(!findings.safe_for_publication);
        assert!(findings.unqualified_medication);
        assert_eq!(findings.considerations.len(), 1);
        assert!(findings.considerations[0].contains("\"ibuprofen\""));
    }

    #[test]
    fn emergency_symptom_always_warns() {
        let findings = run("Chest pain after exercise is common");
        assert!(!findings.safe_for_publication);
        assert_eq!(findings.warnings.len(), 1);
        assert!(findings.considerations[0].contains("000"));
    }

    #[test]
    fn medication_with_self_diagnosis_adds_combination_warning() {
        let findings = run("You probably have hay fever, so grab an antihistamine");
        assert_eq!(findings.considerations.len(), 2);
        assert_eq!(findings.warnings.len(), 2);
        assert!(findings.warnings[1].contains("clinician review"));
    }

    #[test]
    fn safe_flag_tracks_considerations() {
        for text in [
            "Drink water",
            "Check if you have a rash",
            "Seizure first aid",
            "Ask your doctor about dosage",
        ] {
            let findings = run(text);
            assert_eq!(
                findings.safe_for_publication,
                findings.considerations.is_empty(),
                "{text}"
            );
        }
    }
}
