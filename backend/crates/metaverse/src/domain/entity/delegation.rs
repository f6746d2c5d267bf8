//! Delegation Entity
//!
//! What the identity provider hands back after a successful authorization:
//! the principal plus a bearer credential for subsequent remote calls.

use std::fmt;

use crate::domain::value_object::Principal;

/// Bearer credential. `Debug` prints only a fingerprint.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct DelegatedCredential(String);

impl DelegatedCredential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Raw secret, for the Authorization header only
    #[inline]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Log-safe tag
    pub fn fingerprint(&self) -> String {
        platform::crypto::fingerprint(&self.0)
    }
}

impl fmt::Debug for DelegatedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DelegatedCredential({})", self.fingerprint())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delegation {
    pub principal: Principal,
    pub credential: DelegatedCredential,
    /// Expiration (Unix timestamp ms)
    pub expires_at_ms: u64,
}

impl Delegation {
    pub fn new(principal: Principal, credential: DelegatedCredential, expires_at_ms: u64) -> Self {
        Self {
            principal,
            credential,
            expires_at_ms,
        }
    }

    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at_ms
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(platform::clock::now_ms())
    }

    /// Get remaining time until expiration
    pub fn remaining_ms(&self) -> u64 {
        self.expires_at_ms.saturating_sub(platform::clock::now_ms())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_secret() {
        let credential = DelegatedCredential::new("super-secret-token");
        let debug = format!("{credential:?}");
        assert!(!debug.contains("super-secret-token"));
        assert!(debug.contains(&credential.fingerprint()));
    }

    #[test]
    fn test_expiry() {
        let delegation = Delegation::new(
            Principal::parse("user-1").unwrap(),
            DelegatedCredential::new("c"),
            1_000,
        );
        assert!(!delegation.is_expired_at(999));
        assert!(delegation.is_expired_at(1_000));
        assert!(delegation.is_expired());
        assert_eq!(delegation.remaining_ms(), 0);
    }
}
