//! Channel and posting-time recommendation.
//!
//! The channel comes from the first rule that fires, in this order:
//! 1. a channel cue whose terms occur,
//! 2. the long-form rule,
//! 3. the default channel.
//!
//! A caller's preferred channels then override the derived channel when it is not among them.
//! The time is the next occurrence of the channel profile's preferred slot strictly after `now`.

use crate::submission::{PostingCadence, UserPreferences};
use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveTime, Weekday};
use serde::Serialize;
use taxonomy::{ChannelKey, ContentType, PlatformProfile, PlatformProfiles, SchedulingCues};

/// Why a channel was chosen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChannelReason {
    Cue { term: String },
    LongForm { chars: usize },
    Default,
    Preference { derived: ChannelKey },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScheduleRecommendation {
    pub channel: ChannelKey,
    pub at: DateTime<FixedOffset>,
    /// `HH:MM Weekday` in practice local time.
    pub label: String,
    pub rationale: String,
    pub reason: ChannelReason,
}

/// Recommend a channel and slot. `now` must already be in the practice's offset.
///
/// Returns `None` only if a channel has no platform profile, which a validated rule set rules
/// out.
pub fn recommend_schedule(
    text_lower: &str,
    char_len: usize,
    content_type: ContentType,
    preferences: &UserPreferences,
    cues: &SchedulingCues,
    profiles: &PlatformProfiles,
    now: DateTime<FixedOffset>,
) -> Option<ScheduleRecommendation> {
    let (derived, mut reason) = derive_channel(text_lower, char_len, cues);

    let mut channel = derived.clone();
    if !preferences.preferred_channels.is_empty()
        && !preferences.preferred_channels.contains(&derived)
    {
        if let Some(preferred) = preferences
            .preferred_channels
            .iter()
            .find(|c| profiles.contains(c))
        {
            channel = preferred.clone();
            reason = ChannelReason::Preference { derived };
        }
    }

    let profile = profiles.profile_for(&channel)?;
    let weekday = match preferences.posting_cadence {
        PostingCadence::Weekly => Some(profile.preferred_day),
        PostingCadence::Daily => None,
    };
    let at = next_occurrence(now, weekday, profile.preferred_hour, profile.preferred_minute)?;
    let label = at.format("%H:%M %A").to_string();
    let rationale = rationale(profile, profiles, &reason, &label, content_type);

    Some(ScheduleRecommendation {
        channel,
        at,
        label,
        rationale,
        reason,
    })
}

fn derive_channel(
    text_lower: &str,
    char_len: usize,
    cues: &SchedulingCues,
) -> (ChannelKey, ChannelReason) {
    for cue in &cues.channel_cues {
        if let Some(term) = cue.terms.first_match(text_lower) {
            return (
                cue.channel.clone(),
                ChannelReason::Cue {
                    term: term.to_string(),
                },
            );
        }
    }
    if char_len > cues.long_form.over_chars {
        return (
            cues.long_form.channel.clone(),
            ChannelReason::LongForm { chars: char_len },
        );
    }
    (cues.default_channel.clone(), ChannelReason::Default)
}

/// Next local `hour:minute` strictly after `now`, on `weekday` when given, otherwise on any day.
pub fn next_occurrence(
    now: DateTime<FixedOffset>,
    weekday: Option<Weekday>,
    hour: u32,
    minute: u32,
) -> Option<DateTime<FixedOffset>> {
    let local = now.naive_local();
    let today = local.date();
    let slot = NaiveTime::from_hms_opt(hour, minute, 0)?;

    let days_ahead = weekday.map_or(0, |target| {
        (7 + target.num_days_from_monday() - today.weekday().num_days_from_monday()) % 7
    });
    let mut candidate = today
        .checked_add_days(Days::new(u64::from(days_ahead)))?
        .and_time(slot);
    if candidate <= local {
        let step = if weekday.is_some() { 7 } else { 1 };
        candidate = candidate.checked_add_days(Days::new(step))?;
    }

    candidate.and_local_timezone(*now.offset()).single()
}

fn rationale(
    profile: &PlatformProfile,
    profiles: &PlatformProfiles,
    reason: &ChannelReason,
    label: &str,
    content_type: ContentType,
) -> String {
    let why = match reason {
        ChannelReason::Cue { term } => {
            format!("\"{term}\" suggests {} content", profile.display_name)
        }
        ChannelReason::LongForm { chars } => {
            format!("at {chars} characters this reads best as long-form content")
        }
        ChannelReason::Default => "short community content performs well here".to_string(),
        ChannelReason::Preference { derived } => {
            let derived_name = profiles
                .profile_for(derived)
                .map_or(derived.as_str(), |p| p.display_name.as_str());
            format!("it is one of your preferred channels ({derived_name} was not)")
        }
    };
    format!(
        "Post this {} on {} at {label}: {why}.",
        content_type.label(),
        profile.display_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::test_support::rules;
    use chrono::TimeZone;

    fn aest() -> FixedOffset {
        FixedOffset::east_opt(10 * 3600).expect("valid offset")
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<FixedOffset> {
        aest()
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .single()
            .expect("valid local time")
    }

    fn recommend(
        text: &str,
        prefs: &UserPreferences,
        now: DateTime<FixedOffset>,
    ) -> ScheduleRecommendation {
        let rules = rules();
        recommend_schedule(
            &text.to_lowercase(),
            text.chars().count(),
            ContentType::HealthTip,
            prefs,
            &rules.lexicon().scheduling,
            rules.profiles(),
            now,
        )
        .expect("builtin channels have profiles")
    }

    // 2025-01-15 is a Wednesday.
    #[test]
    fn tuesday_slot_from_wednesday_afternoon_is_next_tuesday() {
        let next = next_occurrence(at(2025, 1, 15, 15, 0), Some(Weekday::Tue), 10, 0)
            .expect("slot exists");
        assert_eq!(next, at(2025, 1, 21, 10, 0));
    }

    #[test]
    fn same_day_before_the_hour_stays_today() {
        let next = next_occurrence(at(2025, 1, 15, 9, 0), Some(Weekday::Wed), 13, 0)
            .expect("slot exists");
        assert_eq!(next, at(2025, 1, 15, 13, 0));
    }

    #[test]
    fn same_day_after_the_hour_moves_a_week() {
        let next = next_occurrence(at(2025, 1, 15, 14, 0), Some(Weekday::Wed), 13, 0)
            .expect("slot exists");
        assert_eq!(next, at(2025, 1, 22, 13, 0));
    }

    #[test]
    fn exactly_at_the_slot_is_not_strictly_after() {
        let next = next_occurrence(at(2025, 1, 15, 13, 0), Some(Weekday::Wed), 13, 0)
            .expect("slot exists");
        assert_eq!(next, at(2025, 1, 22, 13, 0));
    }

    #[test]
    fn daily_cadence_uses_next_hour_on_any_day() {
        let before = next_occurrence(at(2025, 1, 15, 9, 0), None, 13, 0).expect("slot");
        assert_eq!(before, at(2025, 1, 15, 13, 0));

        let after = next_occurrence(at(2025, 1, 15, 14, 0), None, 13, 0).expect("slot");
        assert_eq!(after, at(2025, 1, 16, 13, 0));
    }

    #[test]
    fn professional_language_goes_to_linkedin() {
        let rec = recommend(
            "A note for colleague referrals",
            &UserPreferences::default(),
            at(2025, 1, 15, 15, 0),
        );
        assert_eq!(rec.channel.as_str(), "linkedin");
        assert_eq!(rec.at, at(2025, 1, 21, 10, 0));
        assert_eq!(rec.label, "10:00 Tuesday");
        assert!(matches!(rec.reason, ChannelReason::Cue { ref term } if term == "colleague"));
    }

    #[test]
    fn visual_language_goes_to_instagram() {
        let rec = recommend(
            "Share a photo of the new clinic garden",
            &UserPreferences::default(),
            at(2025, 1, 15, 15, 0),
        );
        assert_eq!(rec.channel.as_str(), "instagram");
        assert_eq!(rec.label, "11:00 Thursday");
    }

    #[test]
    fn long_text_goes_to_blog_and_short_to_facebook() {
        let now = at(2025, 1, 15, 15, 0);
        let long = "Regular movement keeps joints supple. ".repeat(20);
        let rec = recommend(&long, &UserPreferences::default(), now);
        assert_eq!(rec.channel.as_str(), "blog");
        assert!(matches!(rec.reason, ChannelReason::LongForm { .. }));

        let rec = recommend("Drink more water in summer", &UserPreferences::default(), now);
        assert_eq!(rec.channel.as_str(), "facebook");
        assert_eq!(rec.reason, ChannelReason::Default);
        assert!(rec.rationale.starts_with("Post this health tip on Facebook at 13:00 Wednesday"));
    }

    #[test]
    fn preferred_channels_override_derived_channel() {
        let prefs = UserPreferences {
            preferred_channels: vec![
                ChannelKey::new("tiktok").expect("valid key"),
                ChannelKey::new("newsletter").expect("valid key"),
            ],
            ..UserPreferences::default()
        };
        let rec = recommend("Drink more water in summer", &prefs, at(2025, 1, 15, 15, 0));
        assert_eq!(rec.channel.as_str(), "newsletter");
        assert_eq!(rec.label, "18:00 Sunday");
        assert!(rec.rationale.contains("preferred channels"));
    }

    #[test]
    fn derived_channel_kept_when_preferred() {
        let prefs = UserPreferences {
            preferred_channels: vec![
                ChannelKey::new("instagram").expect("valid key"),
                ChannelKey::new("facebook").expect("valid key"),
            ],
            ..UserPreferences::default()
        };
        let rec = recommend("Drink more water in summer", &prefs, at(2025, 1, 15, 15, 0));
        assert_eq!(rec.channel.as_str(), "facebook");
        assert_eq!(rec.reason, ChannelReason::Default);
    }

    #[test]
    fn daily_cadence_preference_schedules_tomorrow() {
        let prefs = UserPreferences {
            posting_cadence: PostingCadence::Daily,
            ..UserPreferences::default()
        };
        let rec = recommend("Drink more water in summer", &prefs, at(2025, 1, 15, 15, 0));
        assert_eq!(rec.at, at(2025, 1, 16, 13, 0));
        assert_eq!(rec.label, "13:00 Thursday");
    }
}
