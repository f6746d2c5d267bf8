//! NonBlank Value Object
//!
//! Trimmed, non-empty free text. Every user-supplied name and description
//! goes through here; the field name travels into the validation error.

use derive_more::Display;

use crate::error::{MetaverseError, MetaverseResult};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display("{_0}")]
pub struct NonBlank(String);

impl NonBlank {
    pub fn parse(field: &'static str, raw: &str) -> MetaverseResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(MetaverseError::validation(field, "must not be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for NonBlank {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims() {
        let text = NonBlank::parse("name", "  Neo  ").unwrap();
        assert_eq!(text.as_str(), "Neo");
    }

    #[test]
    fn test_parse_rejects_blank() {
        for raw in ["", "   ", "\t\n"] {
            let err = NonBlank::parse("event name", raw).unwrap_err();
            assert!(matches!(
                err,
                MetaverseError::Validation {
                    field: "event name",
                    ..
                }
            ));
        }
    }
}
