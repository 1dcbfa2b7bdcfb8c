//! Version types for persisted document compatibility.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Schema version using semantic versioning.
///
/// Serialized as a `"major.minor.patch"` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchemaVersion {
    /// Major version (breaking changes)
    pub major: u16,
    /// Minor version (backwards-compatible additions)
    pub minor: u16,
    /// Patch version (bug fixes)
    pub patch: u16,
}

impl SchemaVersion {
    /// Creates a new schema version.
    #[must_use]
    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Current inventory/discovered document version.
    pub const DOCUMENT: Self = Self::new(1, 0, 0);

    /// Checks if this version can read data from another version.
    /// Only a major version bump breaks readability.
    #[must_use]
    pub const fn can_read(&self, data_version: &Self) -> bool {
        self.major == data_version.major
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::DOCUMENT
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for SchemaVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('.');
        let mut next = |name: &str| -> Result<u16, String> {
            parts
                .next()
                .ok_or_else(|| format!("missing {name} in version '{s}'"))?
                .parse()
                .map_err(|e| format!("bad {name} in version '{s}': {e}"))
        };
        let version = Self::new(next("major")?, next("minor")?, next("patch")?);
        if parts.next().is_some() {
            return Err(format!("trailing data in version '{s}'"));
        }
        Ok(version)
    }
}

impl TryFrom<String> for SchemaVersion {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SchemaVersion> for String {
    fn from(value: SchemaVersion) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version() {
        assert_eq!("1.2.3".parse::<SchemaVersion>(), Ok(SchemaVersion::new(1, 2, 3)));
        assert!("1.2".parse::<SchemaVersion>().is_err());
        assert!("1.2.3.4".parse::<SchemaVersion>().is_err());
        assert!("a.b.c".parse::<SchemaVersion>().is_err());
    }

    #[test]
    fn test_version_serializes_as_string() {
        let json = serde_json::to_string(&SchemaVersion::DOCUMENT).expect("serialize");
        assert_eq!(json, "\"1.0.0\"");
    }
}
