//! Content enhancement.
//!
//! Transformations apply in a fixed order and each only when the text does not already carry
//! an equivalent construct. Running the enhancer over its own output adds nothing.

use crate::analyzers::compliance::ComplianceFindings;
use crate::analyzers::safety::SafetyFindings;
use crate::constants::{CONSULT_DISCLAIMER, ENGAGEMENT_QUESTION};
use serde::{Deserialize, Serialize};
use taxonomy::{ComplianceCues, EnhancementCues};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Enhancement {
    ConsultDisclaimer,
    EngagementQuestion,
    BookingCallToAction,
}

impl Enhancement {
    pub fn as_str(self) -> &'static str {
        match self {
            Enhancement::ConsultDisclaimer => "consult_disclaimer",
            Enhancement::EngagementQuestion => "engagement_question",
            Enhancement::BookingCallToAction => "booking_call_to_action",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EnhancedContent {
    pub text: String,
    pub applied: Vec<Enhancement>,
}

pub fn enhance(
    text: &str,
    text_lower: &str,
    specialty: Option<&str>,
    compliance: &ComplianceFindings,
    safety: &SafetyFindings,
    compliance_cues: &ComplianceCues,
    cues: &EnhancementCues,
) -> EnhancedContent {
    let mut out = text.to_string();
    let mut applied = Vec::new();

    let has_disclaimer = compliance_cues.disclaimer_terms.matches_any(text_lower);
    if compliance.missing_disclaimer || (safety.unqualified_medication && !has_disclaimer) {
        append(&mut out, CONSULT_DISCLAIMER);
        applied.push(Enhancement::ConsultDisclaimer);
    }

    if text.chars().count() <= cues.short_text_max_chars && !text.contains('?') {
        append(&mut out, ENGAGEMENT_QUESTION);
        applied.push(Enhancement::EngagementQuestion);
    }

    if let Some(specialty) = specialty {
        if !cues.contact_terms.matches_any(text_lower) {
            append(
                &mut out,
                &format!(
                    "Book an appointment with our {} team to find out more.",
                    specialty.trim().to_lowercase()
                ),
            );
            applied.push(Enhancement::BookingCallToAction);
        }
    }

    EnhancedContent { text: out, applied }
}

fn append(out: &mut String, paragraph: &str) {
    out.push_str("\n\n");
    out.push_str(paragraph);
}
