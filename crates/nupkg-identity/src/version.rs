//! Dotted numeric package versions.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static VERSION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?<major>[0-9]+)\.(?<minor>[0-9]+)(?:\.(?<patch>[0-9]+))?(?:\.(?<revision>[0-9]+))?$")
        .unwrap()
});

const MAX_COMPONENT: u32 = i32::MAX as u32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid package version '{0}'")]
pub struct InvalidVersionError(pub String);

/// A `major.minor[.patch[.revision]]` version.
///
/// Missing components are zero, so `1.0`, `1.0.0` and `1.0.0.0` are the same
/// version. Each component must fit in an `i32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PackageVersion {
    major: u32,
    minor: u32,
    patch: u32,
    revision: u32,
}

impl PackageVersion {
    /// Build a version from its components, each of which must fit in an `i32`.
    pub fn new(major: u32, minor: u32, patch: u32, revision: u32) -> Result<Self, InvalidVersionError> {
        if [major, minor, patch, revision].iter().any(|&c| c > MAX_COMPONENT) {
            return Err(InvalidVersionError(format!("{major}.{minor}.{patch}.{revision}")));
        }
        Ok(Self {
            major,
            minor,
            patch,
            revision,
        })
    }

    pub fn parse(s: &str) -> Result<Self, InvalidVersionError> {
        let err = || InvalidVersionError(s.to_string());
        let caps = VERSION_REGEX.captures(s).ok_or_else(err)?;

        let component = |name: &str| -> Result<u32, InvalidVersionError> {
            match caps.name(name) {
                None => Ok(0),
                Some(m) => m.as_str().parse::<u32>().map_err(|_| err()),
            }
        };

        Self::new(
            component("major")?,
            component("minor")?,
            component("patch")?,
            component("revision")?,
        )
        .map_err(|_| err())
    }
}

impl FromStr for PackageVersion {
    type Err = InvalidVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> { PackageVersion::parse(s) }
}

/// Normalized form: three components, plus the revision when it is non-zero.
impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if self.revision > 0 {
            write!(f, ".{}", self.revision)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(s: &str) -> String {
        PackageVersion::parse(s).unwrap().to_string()
    }

    #[test]
    fn test_normalization() {
        assert_eq!(normalized("2.4.2"), "2.4.2");
        assert_eq!(normalized("1.0"), "1.0.0");
        assert_eq!(normalized("1.0.0.0"), "1.0.0");
        assert_eq!(normalized("1.2.3.4"), "1.2.3.4");
        assert_eq!(normalized("01.02.003"), "1.2.3");
    }

    #[test]
    fn test_rejects_non_versions() {
        for v in ["invalidVersion", "", "1", "1.", ".1", "1..2", "1.2.3.4.5", "1.2-beta", "v1.2", " 1.2", "1.2 ", "+1.2", "1.+2", "1.2.٣"] {
            assert_eq!(PackageVersion::parse(v), Err(InvalidVersionError(v.to_string())), "{v:?}");
        }
    }

    #[test]
    fn test_rejects_component_overflow() {
        assert!(PackageVersion::parse("2147483647.0").is_ok());
        assert!(PackageVersion::parse("2147483648.0").is_err());
        assert!(PackageVersion::parse("1.0.0.99999999999").is_err());
    }

    #[test]
    fn test_new_enforces_component_range() {
        assert_eq!(PackageVersion::new(1, 2, 3, 0).unwrap(), PackageVersion::parse("1.2.3").unwrap());
        assert!(PackageVersion::new(i32::MAX as u32, 0, 0, 0).is_ok());
        assert_eq!(
            PackageVersion::new(1, 0, i32::MAX as u32 + 1, 0),
            Err(InvalidVersionError("1.0.2147483648.0".to_string()))
        );
        assert!(PackageVersion::new(0, 0, 0, u32::MAX).is_err());
    }

    #[test]
    fn test_equality_by_numeric_tuple() {
        assert_eq!(PackageVersion::parse("1.0").unwrap(), PackageVersion::parse("1.0.0.0").unwrap());
        assert_ne!(PackageVersion::parse("1.0.0.1").unwrap(), PackageVersion::parse("1.0.0").unwrap());
    }

    #[test]
    fn test_ordering() {
        let v = |s| PackageVersion::parse(s).unwrap();
        assert!(v("1.2.10") > v("1.2.9"));
        assert!(v("2.0") > v("1.99.99.99"));
        assert!(v("1.0.0.1") > v("1.0"));
    }
}
