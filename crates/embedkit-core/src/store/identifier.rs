//! Case-insensitive store keys.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EmbedError, Result};

/// A normalized document name: surrounding whitespace trimmed, Unicode
/// default case folding applied.
///
/// `"  Welcome "` and `"welcome"` are the same identifier, and so are
/// `"Straße"` and `"STRASSE"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Normalizes `raw`, rejecting names that are empty after trimming.
    pub fn parse(raw: &str) -> Result<Self> {
        let normalized = caseless::default_case_fold_str(raw.trim());
        if normalized.is_empty() {
            return Err(EmbedError::invalid_identifier(raw));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A file name stem for exports.
    ///
    /// Anything other than letters, digits, `-` and `_` becomes `_`, so the
    /// stem never contains a path separator or a leading dot.
    pub fn file_stem(&self) -> String {
        self.0
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Identifier {
    type Error = EmbedError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_case_and_whitespace() {
        let id = Identifier::parse("  Welcome ").unwrap();
        assert_eq!(id.as_str(), "welcome");
        assert_eq!(id, Identifier::parse("WELCOME").unwrap());
    }

    #[test]
    fn test_unicode_case_folding() {
        assert_eq!(Identifier::parse("ÉTÉ").unwrap().as_str(), "été");
    }

    #[test]
    fn test_full_case_folding() {
        let sharp = Identifier::parse("Straße").unwrap();
        assert_eq!(sharp.as_str(), "strasse");
        assert_eq!(sharp, Identifier::parse("STRASSE").unwrap());
        assert_eq!(
            Identifier::parse("ΣΊΣΥΦΟΣ").unwrap(),
            Identifier::parse("σίσυφος").unwrap()
        );
    }

    #[test]
    fn test_file_stem_has_no_path_parts() {
        assert_eq!(Identifier::parse("rules-v2").unwrap().file_stem(), "rules-v2");
        assert_eq!(Identifier::parse("/tmp/pwned").unwrap().file_stem(), "_tmp_pwned");
        assert_eq!(
            Identifier::parse("../../escape").unwrap().file_stem(),
            "______escape"
        );
        assert_eq!(Identifier::parse("Été 2024").unwrap().file_stem(), "été_2024");
    }

    #[test]
    fn test_empty_rejected() {
        assert!(Identifier::parse("").unwrap_err().is_invalid_identifier());
        assert!(Identifier::parse(" \t ").unwrap_err().is_invalid_identifier());
    }

    #[test]
    fn test_inner_whitespace_kept() {
        assert_eq!(Identifier::parse("Rules Page").unwrap().as_str(), "rules page");
    }
}
