//! Validated text primitives shared across the Clarion crates.
//!
//! Both types trim their input on construction and refuse to exist in an invalid state, so a
//! value that has been built can be passed around without re-checking.

/// Errors that can occur when creating validated text types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// The trimmed input was shorter than the required minimum
    #[error("Text must be at least {min} characters after trimming (got {actual})")]
    TooShort { min: usize, actual: usize },
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, an error is returned.
    ///
    /// # Arguments
    ///
    /// * `input` - Any type that can be converted to a string reference
    ///
    /// # Returns
    ///
    /// Returns `Ok(NonEmptyText)` if the trimmed input is non-empty,
    /// or `Err(TextError::Empty)` if it's empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Like [`NonEmptyText::new`], but maps blank input to `None` instead of an error.
    ///
    /// Useful for optional free-text fields where an empty string means "not supplied".
    pub fn optional(input: Option<impl AsRef<str>>) -> Option<Self> {
        input.and_then(|s| Self::new(s).ok())
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Submission text: trimmed, and at least [`SubmissionText::MIN_CHARS`] characters long.
///
/// Length is measured in Unicode scalar values, not bytes, so a three-letter word in any
/// script is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubmissionText(String);

impl SubmissionText {
    pub const MIN_CHARS: usize = 3;

    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }

        let actual = trimmed.chars().count();
        if actual < Self::MIN_CHARS {
            return Err(TextError::TooShort {
                min: Self::MIN_CHARS,
                actual,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Character count of the trimmed text.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl std::fmt::Display for SubmissionText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SubmissionText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for SubmissionText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for SubmissionText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        SubmissionText::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_input() {
        let text = NonEmptyText::new("  dermatology \n").expect("valid text");
        assert_eq!(text.as_str(), "dermatology");
    }

    #[test]
    fn non_empty_text_rejects_whitespace() {
        assert_eq!(NonEmptyText::new("   "), Err(TextError::Empty));
    }

    #[test]
    fn optional_maps_blank_to_none() {
        assert!(NonEmptyText::optional(Some("  ")).is_none());
        assert!(NonEmptyText::optional(None::<&str>).is_none());
        assert_eq!(
            NonEmptyText::optional(Some("physio")).map(|t| t.to_string()),
            Some("physio".to_string())
        );
    }

    #[test]
    fn submission_text_rejects_short_input() {
        assert_eq!(SubmissionText::new(""), Err(TextError::Empty));
        assert_eq!(
            SubmissionText::new(" a "),
            Err(TextError::TooShort { min: 3, actual: 1 })
        );
        assert_eq!(
            SubmissionText::new("ab\t"),
            Err(TextError::TooShort { min: 3, actual: 2 })
        );
    }

    #[test]
    fn submission_text_accepts_three_characters() {
        let text = SubmissionText::new("  flu  ").expect("three chars is enough");
        assert_eq!(text.as_str(), "flu");
        assert_eq!(text.char_len(), 3);
    }

    #[test]
    fn submission_text_counts_chars_not_bytes() {
        let text = SubmissionText::new("été").expect("three scalar values");
        assert_eq!(text.char_len(), 3);
    }

    #[test]
    fn submission_text_deserialize_validates() {
        let err = serde_json::from_str::<SubmissionText>("\"hi\"").expect_err("too short");
        assert!(err.to_string().contains("at least 3 characters"));
    }
}
