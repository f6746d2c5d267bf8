//! Principal Value Object
//!
//! Opaque identity of an authenticated user. Comparable as text and never
//! mutated once issued by the identity provider.
//!
//! ## Usage
//! ```rust
//! use metaverse::models::Principal;
//!
//! let principal = Principal::generate();
//! // IC-style grouped text: xxxxx-xxxxx-xxxxx-xxxxx-xxx
//! assert_eq!(principal.as_str().len(), 27);
//! ```
use std::str::FromStr;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::error::{MetaverseError, MetaverseResult};

const ALPHABET: &[u8; 32] = b"abcdefghijklmnopqrstuvwxyz234567";
const GROUPS: [usize; 5] = [5, 5, 5, 5, 3];

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[display("{_0}")]
pub struct Principal(String);

impl Principal {
    pub fn parse(raw: &str) -> MetaverseResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(MetaverseError::validation("principal", "must not be empty"));
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(MetaverseError::validation(
                "principal",
                "must not contain whitespace",
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Fresh random principal, used by the local replica's identity registry
    pub fn generate() -> Self {
        let total: usize = GROUPS.iter().sum();
        let bytes = platform::crypto::random_bytes(total);
        let mut chars = bytes.iter().map(|b| ALPHABET[usize::from(b % 32)] as char);

        let groups: Vec<String> = GROUPS
            .iter()
            .map(|&len| chars.by_ref().take(len).collect())
            .collect();
        Self(groups.join("-"))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Principal {
    type Err = MetaverseError;

    fn from_str(s: &str) -> MetaverseResult<Self> {
        Principal::parse(s)
    }
}

impl TryFrom<String> for Principal {
    type Error = MetaverseError;

    fn try_from(value: String) -> MetaverseResult<Self> {
        Principal::parse(&value)
    }
}

impl From<Principal> for String {
    fn from(value: Principal) -> Self {
        value.0
    }
}
