//! Advertising compliance screening.
//!
//! Risk starts at `low` and only ever rises:
//! - a prohibited term or testimonial sets `high`,
//! - each therapeutic claim escalates one level,
//! - medical-advice language without a consultation disclaimer escalates one level.

use serde::{Deserialize, Serialize};
use taxonomy::{ComplianceCues, RuleCategory, RuleTaxonomy};

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// One level up, saturating at `High`.
    pub fn escalate(self) -> Self {
        match self {
            RiskLevel::Low => RiskLevel::Medium,
            RiskLevel::Medium | RiskLevel::High => RiskLevel::High,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ComplianceFindings {
    pub risk: RiskLevel,
    pub issues: Vec<String>,
    pub notes: String,
    /// True iff at least one issue was recorded.
    pub requires_review: bool,
    /// Medical-advice language was found without a consultation disclaimer.
    pub missing_disclaimer: bool,
    pub suggestions: Vec<String>,
}

pub fn analyse_compliance(
    text_lower: &str,
    specialty: Option<&str>,
    taxonomy: &RuleTaxonomy,
    cues: &ComplianceCues,
) -> ComplianceFindings {
    let mut risk = RiskLevel::Low;
    let mut issues = Vec::new();
    let mut prohibited = false;

    for category in RuleCategory::COMPLIANCE {
        for entry in taxonomy.scan(category, text_lower) {
            issues.push(issue_for(category, entry.phrase()));
            risk = match category {
                RuleCategory::TherapeuticClaim => risk.escalate(),
                _ => {
                    prohibited = true;
                    RiskLevel::High
                }
            };
        }
    }

    let obligation = cues.obligation_terms.first_match(text_lower);
    let missing_disclaimer = match obligation {
        Some(term) if !cues.disclaimer_terms.matches_any(text_lower) => {
            issues.push(format!(
                "Medical advice language (\"{term}\") without a recommendation \
                 to consult a health professional"
            ));
            risk = risk.escalate();
            true
        }
        _ => false,
    };

    let requires_review = !issues.is_empty();
    let notes = if requires_review {
        issues.join("; ")
    } else {
        match specialty {
            Some(specialty) => format!(
                "Content appears compliant with AHPRA advertising guidelines \
                 for {specialty} practice."
            ),
            None => "Content appears compliant with AHPRA advertising guidelines.".to_string(),
        }
    };

    let mut suggestions = Vec::new();
    if prohibited {
        suggestions.push(
            "Remove prohibited claims and testimonials \
             and have the post reviewed before publishing."
                .to_string(),
        );
    } else if risk == RiskLevel::High {
        suggestions.push(
            "Support or soften therapeutic claims and have the post reviewed before publishing."
                .to_string(),
        );
    } else if requires_review {
        suggestions.push(
            "Review flagged wording against AHPRA advertising guidelines before publishing."
                .to_string(),
        );
    }
    if missing_disclaimer {
        suggestions.push(
            "Add a recommendation to consult a health professional for individual advice."
                .to_string(),
        );
    }

    ComplianceFindings {
        risk,
        issues,
        notes,
        requires_review,
        missing_disclaimer,
        suggestions,
    }
}

fn issue_for(category: RuleCategory, phrase: &str) -> String {
    match category {
        RuleCategory::ProhibitedTerm => format!(
            "Prohibited term \"{phrase}\": \
             AHPRA guidelines prohibit misleading or exaggerated claims"
        ),
        RuleCategory::TherapeuticClaim => format!(
            "Therapeutic claim \"{phrase}\": \
             claims about treatment outcomes need supporting evidence"
        ),
        RuleCategory::Testimonial => format!(
            "Testimonial language \"{phrase}\": \
             AHPRA guidelines prohibit testimonials in health advertising"
        ),
        other => format!("Flagged phrase \"{phrase}\" ({other})"),
    }
}
