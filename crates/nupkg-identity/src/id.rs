//! Package ids.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Word groups joined by single `_`, `.` or `-` separators.
pub const ID_PATTERN: &str = r"^\w+([_.-]\w+)*$";

static ID_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(&format!("(?i){ID_PATTERN}")).unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid package id '{0}'")]
pub struct InvalidIdError(pub String);

/// A validated package id.
///
/// Ids compare case-insensitively; the original spelling is kept for display
/// and the lowercase form is used on disk.
#[derive(Debug, Clone)]
pub struct PackageId {
    original: String,
    lower: String,
}

impl PackageId {
    pub fn parse(s: &str) -> Result<Self, InvalidIdError> {
        if s.is_empty() || !ID_REGEX.is_match(s) {
            return Err(InvalidIdError(s.to_string()));
        }
        Ok(Self {
            original: s.to_string(),
            lower: s.to_lowercase(),
        })
    }

    /// Lowercase form used as the install path segment.
    pub fn to_lowercase(&self) -> &str {
        &self.lower
    }
}

impl PartialEq for PackageId {
    fn eq(&self, other: &Self) -> bool {
        self.lower == other.lower
    }
}

impl Eq for PackageId {}

impl Hash for PackageId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lower.hash(state);
    }
}

impl FromStr for PackageId {
    type Err = InvalidIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> { PackageId::parse(s) }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.original) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_ids() {
        for id in ["test", "Newtonsoft.Json", "xunit.runner.visualstudio", "My_Pkg-2", "a"] {
            assert!(PackageId::parse(id).is_ok(), "{id} should be valid");
        }
    }

    #[test]
    fn test_rejects_bad_separators() {
        for id in ["", "test.", ".test", "a..b", "a.-b", "-a", "a b", "a/b", "..", "a\\b"] {
            assert_eq!(PackageId::parse(id), Err(InvalidIdError(id.to_string())));
        }
    }

    #[test]
    fn test_rejects_trailing_newline() {
        assert!(PackageId::parse("test\n").is_err());
    }

    #[test]
    fn test_case_insensitive_equality() {
        let a = PackageId::parse("Newtonsoft.Json").unwrap();
        let b = PackageId::parse("newtonsoft.json").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_lowercase(), "newtonsoft.json");
        assert_eq!(a.to_string(), "Newtonsoft.Json");
    }

    #[test]
    fn test_unicode_word_characters() {
        assert!(PackageId::parse("paquete_ñ").is_ok());
    }
}
