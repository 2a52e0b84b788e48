use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const MAX_IDENTIFIER_LENGTH: usize = 255;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidApplicationId {
    #[error("application identifier is empty")]
    Empty,

    #[error("application identifier contains whitespace or control characters: {value:?}")]
    IllegalCharacter { value: String },

    #[error("application identifier exceeds 255 bytes")]
    TooLong,
}

/// Opaque token naming an installed application (package or bundle id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(String);

impl ApplicationId {
    pub fn parse(value: impl Into<String>) -> Result<Self, InvalidApplicationId> {
        let value = value.into();

        if value.is_empty() {
            return Err(InvalidApplicationId::Empty);
        }

        if value.len() > MAX_IDENTIFIER_LENGTH {
            return Err(InvalidApplicationId::TooLong);
        }

        if value
            .chars()
            .any(|character| character.is_whitespace() || character.is_control())
        {
            return Err(InvalidApplicationId::IllegalCharacter { value });
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl AsRef<str> for ApplicationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledApp {
    pub identifier: ApplicationId,
    pub display_name: String,
    pub is_system: bool,
}

/// An installed application as reported by a catalog, before launchability filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub app: InstalledApp,
    pub launchable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_package_names() {
        let identifier = ApplicationId::parse("com.evil.app").unwrap();

        assert_eq!(identifier.as_str(), "com.evil.app");
        assert_eq!(identifier.to_string(), "com.evil.app");
    }

    #[test]
    fn parse_rejects_empty_identifier() {
        assert_eq!(ApplicationId::parse(""), Err(InvalidApplicationId::Empty));
    }

    #[test]
    fn parse_rejects_whitespace() {
        assert!(matches!(
            ApplicationId::parse("com.evil app"),
            Err(InvalidApplicationId::IllegalCharacter { .. })
        ));
        assert!(matches!(
            ApplicationId::parse("com.evil.app\n"),
            Err(InvalidApplicationId::IllegalCharacter { .. })
        ));
    }

    #[test]
    fn parse_rejects_overlong_identifier() {
        let value = "a".repeat(MAX_IDENTIFIER_LENGTH + 1);

        assert_eq!(ApplicationId::parse(value), Err(InvalidApplicationId::TooLong));
    }

    #[test]
    fn identifiers_order_lexicographically() {
        let first = ApplicationId::parse("com.a").unwrap();
        let second = ApplicationId::parse("com.b").unwrap();

        assert!(first < second);
    }
}
