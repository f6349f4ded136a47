//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Core code never reads environment variables; binaries read them
//! and hand the raw values to the `*_from_env_value` helpers here.

use crate::constants::DEFAULT_UTC_OFFSET;
use crate::{AnalysisError, AnalysisResult};
use chrono::FixedOffset;
use std::path::PathBuf;
use std::sync::Arc;
use taxonomy::RuleSet;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    rules: Arc<RuleSet>,
    utc_offset: FixedOffset,
}

impl CoreConfig {
    pub fn new(rules: RuleSet, utc_offset: FixedOffset) -> Self {
        Self {
            rules: Arc::new(rules),
            utc_offset,
        }
    }

    /// Embedded rule set in the default practice time zone.
    pub fn builtin() -> AnalysisResult<Self> {
        Ok(Self::new(RuleSet::builtin()?, parse_utc_offset(DEFAULT_UTC_OFFSET)?))
    }

    pub fn rules(&self) -> &Arc<RuleSet> {
        &self.rules
    }

    /// Practice time zone used for scheduling and seasonal windows.
    pub fn utc_offset(&self) -> FixedOffset {
        self.utc_offset
    }
}

/// Resolve the rule set: the override file when given, otherwise the embedded default.
pub fn resolve_rule_set(override_path: Option<PathBuf>) -> AnalysisResult<RuleSet> {
    match override_path {
        Some(path) => {
            if !path.is_file() {
                return Err(AnalysisError::Config(format!(
                    "rule set override is not a file: {}",
                    path.display()
                )));
            }
            let rules = RuleSet::from_file(&path)?;
            tracing::info!(path = %path.display(), version = rules.version(), "loaded rule set");
            Ok(rules)
        }
        None => Ok(RuleSet::builtin()?),
    }
}

/// Parse the practice UTC offset from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default offset (`+10:00`).
pub fn utc_offset_from_env_value(value: Option<String>) -> AnalysisResult<FixedOffset> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    parse_utc_offset(value.as_deref().unwrap_or(DEFAULT_UTC_OFFSET))
}

/// Parse `+HH:MM`, `-HH:MM`, `+HHMM` or `+HH` into a fixed offset (at most 14 hours).
pub fn parse_utc_offset(value: &str) -> AnalysisResult<FixedOffset> {
    let invalid = || {
        AnalysisError::Config(format!(
            "invalid UTC offset '{value}' (expected e.g. +10:00 or -03:30)"
        ))
    };

    let value = value.trim();
    let (sign, rest) = match value.chars().next() {
        Some('+') => (1, &value[1..]),
        Some('-') => (-1, &value[1..]),
        _ => return Err(invalid()),
    };

    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let (hours, minutes) = match digits.len() {
        2 => (&digits[..2], "0"),
        4 => (&digits[..2], &digits[2..]),
        _ => return Err(invalid()),
    };
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if hours > 14 || minutes > 59 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_offset_is_aest() {
        let offset = utc_offset_from_env_value(None).expect("default offset");
        assert_eq!(offset.local_minus_utc(), 10 * 3600);

        let offset = utc_offset_from_env_value(Some("   ".into())).expect("blank is default");
        assert_eq!(offset.local_minus_utc(), 10 * 3600);
    }

    #[test]
    fn parses_supported_offset_forms() {
        assert_eq!(
            parse_utc_offset("+09:30").expect("valid").local_minus_utc(),
            9 * 3600 + 1800
        );
        assert_eq!(
            parse_utc_offset("-0330").expect("valid").local_minus_utc(),
            -(3 * 3600 + 1800)
        );
        assert_eq!(parse_utc_offset("+08").expect("valid").local_minus_utc(), 8 * 3600);
    }

    #[test]
    fn rejects_malformed_offsets() {
        for bad in ["10:00", "+1", "+15:00", "+10:75", "+ab:cd", ""] {
            let err = parse_utc_offset(bad).expect_err(bad);
            assert!(matches!(
                err,
                AnalysisError::Config(msg) if msg.contains("invalid UTC offset")
            ));
        }
    }

    #[test]
    fn resolve_rule_set_defaults_to_builtin() {
        let rules = resolve_rule_set(None).expect("builtin");
        assert_eq!(rules.version(), RuleSet::builtin().expect("builtin").version());
    }

    #[test]
    fn resolve_rule_set_rejects_missing_override() {
        let err = resolve_rule_set(Some(PathBuf::from("/no/such/ruleset.yaml")))
            .expect_err("missing file");
        assert!(matches!(err, AnalysisError::Config(msg) if msg.contains("not a file")));
    }

    #[test]
    fn resolve_rule_set_reads_override_file() {
        let yaml = taxonomy::BUILTIN_RULESET_YAML.replacen("2025.1", "override-1", 1);
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(yaml.as_bytes()).expect("write");

        let rules = resolve_rule_set(Some(file.path().to_path_buf())).expect("override");
        assert_eq!(rules.version(), "override-1");
    }

    #[test]
    fn resolve_rule_set_surfaces_schema_errors() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"version: x\n").expect("write");

        let err = resolve_rule_set(Some(file.path().to_path_buf())).expect_err("incomplete");
        assert!(matches!(err, AnalysisError::Taxonomy(_)));
    }
}
