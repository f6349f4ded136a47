//! Per-channel platform profiles.
//!
//! Responsibilities:
//! - Define channel keys and hashtags as validated newtypes
//! - Define the strict wire model for the `platforms:` section of a rule set
//! - Translate wire profiles into [`PlatformProfile`] values (weekday parsing, range checks)
//!
//! Channels are data: a new channel is a new entry in the rule-set document.

use crate::{TaxonomyError, TaxonomyResult};
use chrono::Weekday;
use serde::{Deserialize, Serialize};

// ============================================================================
// Public domain-level types
// ============================================================================

/// Lower-case identifier of a publication channel, e.g. `facebook`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChannelKey(String);

impl ChannelKey {
    /// Parse a channel key. Input is trimmed and lower-cased.
    ///
    /// # Errors
    ///
    /// Returns [`TaxonomyError::InvalidInput`] if the key is blank or contains anything other
    /// than ASCII letters, digits, `-` or `_`.
    pub fn new(input: impl AsRef<str>) -> TaxonomyResult<Self> {
        let key = input.as_ref().trim().to_lowercase();
        if key.is_empty() {
            return Err(TaxonomyError::InvalidInput(
                "channel key cannot be empty".into(),
            ));
        }
        let ok = key
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'z' | b'-' | b'_'));
        if !ok {
            return Err(TaxonomyError::InvalidInput(format!(
                "channel key '{key}' contains invalid characters \
                 (only alphanumeric, '-', '_' allowed)"
            )));
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ChannelKey {
    type Error = TaxonomyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ChannelKey> for String {
    fn from(value: ChannelKey) -> Self {
        value.0
    }
}

impl std::fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A hashtag body without the leading `#`. Displays with the `#`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Hashtag(String);

impl Hashtag {
    /// Parse a hashtag; an optional leading `#` is stripped.
    ///
    /// # Errors
    ///
    /// Returns [`TaxonomyError::InvalidInput`] if the body is empty or contains characters
    /// other than letters and digits.
    pub fn new(input: impl AsRef<str>) -> TaxonomyResult<Self> {
        let body = input.as_ref().trim().trim_start_matches('#');
        if body.is_empty() {
            return Err(TaxonomyError::InvalidInput("hashtag cannot be empty".into()));
        }
        if !body.chars().all(char::is_alphanumeric) {
            return Err(TaxonomyError::InvalidInput(format!(
                "hashtag '{body}' must contain only letters and digits"
            )));
        }
        Ok(Self(body.to_owned()))
    }

    /// Build a hashtag from a free-text phrase by upper-casing each word and joining them,
    /// e.g. `skin health` becomes `#SkinHealth`. Returns `None` if nothing usable remains.
    pub fn from_phrase(phrase: &str) -> Option<Self> {
        let body: String = phrase
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect();
        Self::new(body).ok()
    }

    pub fn body(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Hashtag {
    type Error = TaxonomyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Hashtag> for String {
    fn from(value: Hashtag) -> Self {
        value.0
    }
}

impl std::fmt::Display for Hashtag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Static metadata for one publication channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlatformProfile {
    pub channel: ChannelKey,
    pub display_name: String,
    pub preferred_day: Weekday,
    /// Hour of day, 0-23, in the practice's local time.
    pub preferred_hour: u32,
    /// Minute, 0-59.
    pub preferred_minute: u32,
    pub max_hashtags: usize,
    pub tone: String,
    /// Audience on this channel is other practitioners rather than patients.
    pub professional: bool,
    /// Channel-specific topic hashtags appended after keyword-derived ones.
    pub extra_hashtags: Vec<Hashtag>,
}

/// Read-only lookup of profiles by channel key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlatformProfiles {
    profiles: Vec<PlatformProfile>,
}

impl PlatformProfiles {
    /// # Errors
    ///
    /// Returns [`TaxonomyError::InvalidInput`] if two profiles share a channel key.
    pub fn new(profiles: Vec<PlatformProfile>) -> TaxonomyResult<Self> {
        for (i, profile) in profiles.iter().enumerate() {
            if profiles[..i].iter().any(|p| p.channel == profile.channel) {
                return Err(TaxonomyError::InvalidInput(format!(
                    "duplicate platform profile for channel '{}'",
                    profile.channel
                )));
            }
        }
        Ok(Self { profiles })
    }

    pub fn profile_for(&self, channel: &ChannelKey) -> Option<&PlatformProfile> {
        self.profiles.iter().find(|p| &p.channel == channel)
    }

    pub fn contains(&self, channel: &ChannelKey) -> bool {
        self.profile_for(channel).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlatformProfile> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

// ============================================================================
// Wire types (crate-internal)
// ============================================================================

/// Wire representation of one entry of the `platforms:` list.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct PlatformWire {
    channel: String,
    display_name: String,
    preferred_day: String,
    preferred_hour: u32,
    #[serde(default)]
    preferred_minute: u32,
    max_hashtags: usize,
    tone: String,
    #[serde(default)]
    professional: bool,
    #[serde(default)]
    extra_hashtags: Vec<String>,
}

impl PlatformWire {
    pub(crate) fn into_domain(self) -> TaxonomyResult<PlatformProfile> {
        let channel = ChannelKey::new(&self.channel)?;

        let preferred_day = self.preferred_day.trim().parse::<Weekday>().map_err(|_| {
            TaxonomyError::InvalidInput(format!(
                "invalid preferred_day '{}' for channel '{channel}'",
                self.preferred_day
            ))
        })?;

        if self.preferred_hour > 23 {
            return Err(TaxonomyError::InvalidInput(format!(
                "preferred_hour {} for channel '{channel}' must be 0-23",
                self.preferred_hour
            )));
        }
        if self.preferred_minute > 59 {
            return Err(TaxonomyError::InvalidInput(format!(
                "preferred_minute {} for channel '{channel}' must be 0-59",
                self.preferred_minute
            )));
        }

        let tone = self.tone.trim().to_owned();
        if tone.is_empty() {
            return Err(TaxonomyError::InvalidInput(format!(
                "tone for channel '{channel}' cannot be empty"
            )));
        }

        let extra_hashtags = self
            .extra_hashtags
            .iter()
            .map(Hashtag::new)
            .collect::<TaxonomyResult<Vec<_>>>()?;

        Ok(PlatformProfile {
            channel,
            display_name: self.display_name.trim().to_owned(),
            preferred_day,
            preferred_hour: self.preferred_hour,
            preferred_minute: self.preferred_minute,
            max_hashtags: self.max_hashtags,
            tone,
            professional: self.professional,
            extra_hashtags,
        })
    }
}
