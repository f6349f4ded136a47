//! Content type classifier.
//!
//! Scores every candidate type additively, in a fixed order:
//! 1. the first length band covering the text length,
//! 2. every lexical cue whose terms occur, in declaration order.
//!
//! The suggestion is the highest score; ties go to the type declared first in
//! [`ContentType::ALL`].

use serde::Serialize;
use std::collections::BTreeMap;
use taxonomy::{ClassifierCues, ContentType};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Score for every candidate type, including those left at zero.
    pub scores: BTreeMap<ContentType, i32>,
    pub suggested: ContentType,
    pub top_score: i32,
}

pub fn classify(text_lower: &str, char_len: usize, cues: &ClassifierCues) -> Classification {
    let mut scores: BTreeMap<ContentType, i32> =
        ContentType::ALL.iter().map(|t| (*t, 0)).collect();

    if let Some(band) = cues.length_bands.iter().find(|band| band.covers(char_len)) {
        for boost in &band.favours {
            *scores.entry(boost.content_type).or_insert(0) += boost.points;
        }
    }

    for cue in &cues.cues {
        if cue.terms.matches_any(text_lower) {
            *scores.entry(cue.content_type).or_insert(0) += cue.points;
        }
    }

    let mut suggested = ContentType::ALL[0];
    let mut top_score = scores.get(&suggested).copied().unwrap_or(0);
    for content_type in ContentType::ALL.iter().skip(1) {
        let score = scores.get(content_type).copied().unwrap_or(0);
        if score > top_score {
            suggested = *content_type;
            top_score = score;
        }
    }

    Classification {
        scores,
        suggested,
        top_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::test_support::rules;

    fn run(text: &str) -> Classification {
        let rules = rules();
        let lower = text.to_lowercase();
        classify(&lower, text.chars().count(), &rules.lexicon().classifier)
    }

    #[test]
    fn short_tip_is_a_health_tip() {
        let result = run("Tips for managing eczema flare-ups in winter");
        assert_eq!(result.suggested, ContentType::HealthTip);
        assert_eq!(result.top_score, 7);
        assert_eq!(result.scores[&ContentType::InstagramStory], 2);
    }

    #[test]
    fn every_type_has_a_score() {
        let result = run("abc");
        assert_eq!(result.scores.len(), ContentType::ALL.len());
    }

    #[test]
    fn ties_go_to_first_declared_type() {
        let cues = ClassifierCues {
            length_bands: vec![],
            cues: vec![],
        };
        let result = classify("anything", 8, &cues);
        assert_eq!(result.suggested, ContentType::HealthTip);
        assert_eq!(result.top_score, 0);
    }

    #[test]
    fn video_cue_outweighs_length_band() {
        let result = run("Record a quick video on hand washing at the clinic");
        assert_eq!(result.suggested, ContentType::VideoScript);
    }

    #[test]
    fn long_text_favours_long_form() {
        let text = "Regular movement keeps joints supple. ".repeat(20);
        let result = run(&text);
        assert_eq!(result.suggested, ContentType::BlogPost);
        assert_eq!(result.scores[&ContentType::NewsletterContent], 2);
    }

    #[test]
    fn length_band_boundaries_follow_declared_bands() {
        let at_99 = run(&"a".repeat(99));
        assert_eq!(at_99.suggested, ContentType::HealthTip);

        let at_100 = run(&"a".repeat(100));
        assert_eq!(at_100.suggested, ContentType::FacebookPost);

        let at_301 = run(&"a".repeat(301));
        assert_eq!(at_301.suggested, ContentType::LinkedinPost);
    }
}
