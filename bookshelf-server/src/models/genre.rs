//! Genre name normalisation
//!
//! Canonical form: first character uppercase, the rest lowercase.

use std::fmt;

/// Normalised genre name, the lookup key for `genres.name`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenreName(String);

impl GenreName {
    /// Normalise a raw genre name.
    ///
    /// # Example
    /// ```
    /// use bookshelf_server::models::GenreName;
    ///
    /// assert_eq!(GenreName::new("sCIENCE fiction").as_str(), "Science fiction");
    /// assert_eq!(GenreName::new("DRAMA").as_str(), "Drama");
    /// ```
    pub fn new(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        let mut chars = lower.chars();
        let normalized = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
        Self(normalized)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for GenreName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GenreName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
