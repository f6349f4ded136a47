//! Lower-cased phrase lists used for substring matching.

use serde::{Deserialize, Serialize};

/// A non-empty list of lower-cased, trimmed phrases.
///
/// Matching is plain substring search against text that the caller has already lower-cased.
/// Order is preserved so "first match" is well defined.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct TermSet(Vec<String>);

impl TryFrom<Vec<String>> for TermSet {
    type Error = String;

    fn try_from(raw: Vec<String>) -> Result<Self, Self::Error> {
        if raw.is_empty() {
            return Err("term list must not be empty".into());
        }

        let mut terms = Vec::with_capacity(raw.len());
        for term in raw {
            let normalised = term.trim().to_lowercase();
            if normalised.is_empty() {
                return Err("terms must not be blank".into());
            }
            if !terms.contains(&normalised) {
                terms.push(normalised);
            }
        }

        Ok(Self(terms))
    }
}

impl From<TermSet> for Vec<String> {
    fn from(value: TermSet) -> Self {
        value.0
    }
}

impl TermSet {
    /// Build a term set from string literals. Blank entries are rejected.
    pub fn from_terms<I, S>(terms: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::try_from(terms.into_iter().map(Into::into).collect::<Vec<_>>())
    }

    /// First term (in declaration order) found in `haystack_lower`.
    pub fn first_match(&self, haystack_lower: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|term| haystack_lower.contains(term.as_str()))
            .map(String::as_str)
    }

    pub fn matches_any(&self, haystack_lower: &str) -> bool {
        self.first_match(haystack_lower).is_some()
    }

    /// Every term found in `haystack_lower`, in declaration order.
    pub fn matching<'a>(&'a self, haystack_lower: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |term| haystack_lower.contains(term.as_str()))
            .map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
