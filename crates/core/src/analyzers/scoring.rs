//! Additive heuristic scorers (engagement, educational value).
//!
//! Both run the same evaluation over their own [`ScoreCard`]: baseline, plus every cue active
//! in the month whose terms occur, plus every length adjustment covering the length, clamped
//! to 0..=100.

use serde::Serialize;
use taxonomy::ScoreCard;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub value: u8,
    /// Ids of the cues that contributed, in card order.
    pub applied: Vec<String>,
}

/// Score `text_lower` against `card`. `month` is the local calendar month (1-12).
pub fn score(text_lower: &str, char_len: usize, month: u32, card: &ScoreCard) -> ScoreBreakdown {
    let mut total = i64::from(card.baseline);
    let mut applied = Vec::new();

    for cue in &card.cues {
        if cue.active_in(month) && cue.terms.matches_any(text_lower) {
            total += i64::from(cue.points);
            applied.push(cue.id.clone());
        }
    }

    total += card
        .length
        .iter()
        .filter(|adj| adj.applies(char_len))
        .map(|adj| i64::from(adj.points))
        .sum::<i64>();

    ScoreBreakdown {
        value: clamp_score(total),
        applied,
    }
}

pub(crate) fn clamp_score(total: i64) -> u8 {
    u8::try_from(total.clamp(0, 100)).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::test_support::rules;
    use taxonomy::{ScoreCue, TermSet};

    const JULY: u32 = 7;
    const JANUARY: u32 = 1;

    fn engagement(text: &str, month: u32) -> ScoreBreakdown {
        let rules = rules();
        score(
            &text.to_lowercase(),
            text.chars().count(),
            month,
            &rules.lexicon().engagement,
        )
    }

    fn educational(text: &str) -> ScoreBreakdown {
        let rules = rules();
        score(
            &text.to_lowercase(),
            text.chars().count(),
            JULY,
            &rules.lexicon().educational,
        )
    }

    #[test]
    fn winter_tip_gets_tip_and_seasonal_bonus() {
        let result = engagement("Tips for managing eczema flare-ups in winter", JULY);
        assert_eq!(result.applied, vec!["tips", "winter"]);
        assert_eq!(result.value, 75);
    }

    #[test]
    fn seasonal_cue_is_inactive_out_of_season() {
        let result = engagement("Tips for managing eczema flare-ups in winter", JANUARY);
        assert_eq!(result.applied, vec!["tips"]);
        assert_eq!(result.value, 60);
    }

    #[test]
    fn length_adjustments_apply() {
        let medium = "a".repeat(120);
        assert_eq!(engagement(&medium, JULY).value, 60);

        let long = "a".repeat(600);
        assert_eq!(engagement(&long, JULY).value, 45);
    }

    #[test]
    fn educational_cues_accumulate() {
        let result = educational("Learn how to prevent sunburn: why research matters");
        assert_eq!(
            result.applied,
            vec!["education", "prevention", "how_to", "importance", "evidence"]
        );
        assert_eq!(result.value, 100);
    }

    #[test]
    fn scores_clamp_for_extreme_input() {
        let huge = "Quick question? Important tips for health and care. ".repeat(200);
        let result = engagement(&huge, JULY);
        assert!(result.value <= 100);

        let card = ScoreCard {
            baseline: 10,
            cues: vec![ScoreCue {
                id: "penalty".into(),
                terms: TermSet::from_terms(["spam"]).expect("valid terms"),
                points: -500,
                months: vec![],
            }],
            length: vec![],
        };
        assert_eq!(score("spam", 4, JULY, &card).value, 0);
    }

    #[test]
    fn clamp_score_bounds() {
        assert_eq!(clamp_score(-3), 0);
        assert_eq!(clamp_score(42), 42);
        assert_eq!(clamp_score(250), 100);
    }
}
