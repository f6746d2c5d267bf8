//! In-memory identity
//!
//! `MemoryIdentityRegistry` issues and resolves delegated credentials for
//! the local replica. `ScriptedIdentityProvider` is an `IdentityProvider`
//! whose login outcomes are queued up front.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use platform::clock::now_ms;
use platform::crypto::random_token;
use tokio::sync::{Mutex, RwLock};

use crate::domain::entity::delegation::{DelegatedCredential, Delegation};
use crate::domain::port::IdentityProvider;
use crate::domain::value_object::Principal;
use crate::error::{MetaverseError, MetaverseResult};

/// Credential length in random bytes
const CREDENTIAL_BYTES: usize = 32;

// ============================================================================
// Registry
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryIdentityRegistry {
    sessions: RwLock<HashMap<String, Delegation>>,
}

impl MemoryIdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh delegation for `principal`
    pub async fn issue(&self, principal: Principal, ttl: Duration) -> Delegation {
        let credential = DelegatedCredential::new(random_token(CREDENTIAL_BYTES));
        let expires_at_ms = now_ms().saturating_add(ttl.as_millis() as u64);
        let delegation = Delegation::new(principal, credential, expires_at_ms);

        self.sessions
            .write()
            .await
            .insert(delegation.credential.expose().to_string(), delegation.clone());

        tracing::info!(
            principal = %delegation.principal,
            credential = %delegation.credential.fingerprint(),
            "Delegation issued"
        );
        delegation
    }

    /// Look up a live delegation; expired entries are dropped
    pub async fn resolve(&self, credential: &str) -> Option<Delegation> {
        let found = self.sessions.read().await.get(credential).cloned();
        match found {
            Some(delegation) if delegation.is_expired() => {
                self.sessions.write().await.remove(credential);
                None
            }
            other => other,
        }
    }

    /// Returns whether a delegation was removed
    pub async fn revoke(&self, credential: &str) -> bool {
        self.sessions.write().await.remove(credential).is_some()
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions
            .read()
            .await
            .values()
            .filter(|d| !d.is_expired())
            .count()
    }
}

// ============================================================================
// Scripted provider
// ============================================================================

/// Outcome of one interactive login
#[derive(Debug, Clone)]
pub enum LoginScript {
    /// The user approves as this principal
    Approve(Principal),
    /// The user closes the authorization window
    Cancel,
    /// The authorization step never completes
    Hang,
}

#[derive(Debug, Default)]
pub struct ScriptedIdentityProvider {
    registry: MemoryIdentityRegistry,
    script: Mutex<VecDeque<LoginScript>>,
    stored: RwLock<Option<Delegation>>,
    logouts: AtomicUsize,
}

impl ScriptedIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider that already holds a delegation for `principal`
    pub async fn with_existing_session(principal: Principal, ttl: Duration) -> Self {
        let provider = Self::new();
        let delegation = provider.registry.issue(principal, ttl).await;
        *provider.stored.write().await = Some(delegation);
        provider
    }

    /// Queue the outcome of the next login
    pub async fn push(&self, step: LoginScript) {
        self.script.lock().await.push_back(step);
    }

    pub fn logout_count(&self) -> usize {
        self.logouts.load(Ordering::SeqCst)
    }

    pub fn registry(&self) -> &MemoryIdentityRegistry {
        &self.registry
    }
}

impl IdentityProvider for ScriptedIdentityProvider {
    async fn probe(&self) -> MetaverseResult<Option<Delegation>> {
        Ok(self.stored.read().await.clone())
    }

    async fn login(&self, max_time_to_live: Duration) -> MetaverseResult<Delegation> {
        let step = self.script.lock().await.pop_front();

        match step {
            Some(LoginScript::Approve(principal)) => {
                let delegation = self.registry.issue(principal, max_time_to_live).await;
                *self.stored.write().await = Some(delegation.clone());
                Ok(delegation)
            }
            Some(LoginScript::Cancel) | None => Err(MetaverseError::LoginCancelled),
            Some(LoginScript::Hang) => std::future::pending().await,
        }
    }

    async fn logout(&self, credential: &DelegatedCredential) -> MetaverseResult<()> {
        self.logouts.fetch_add(1, Ordering::SeqCst);
        self.registry.revoke(credential.expose()).await;

        let mut stored = self.stored.write().await;
        if stored.as_ref().is_some_and(|d| &d.credential == credential) {
            *stored = None;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(raw: &str) -> Principal {
        Principal::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn test_issue_and_resolve() {
        let registry = MemoryIdentityRegistry::new();
        let delegation = registry
            .issue(principal("alice"), Duration::from_secs(60))
            .await;

        let resolved = registry
            .resolve(delegation.credential.expose())
            .await
            .unwrap();
        assert_eq!(resolved.principal, principal("alice"));
        assert_eq!(registry.active_sessions().await, 1);

        assert!(registry.revoke(delegation.credential.expose()).await);
        assert!(registry.resolve(delegation.credential.expose()).await.is_none());
        assert!(!registry.revoke(delegation.credential.expose()).await);
    }

    #[tokio::test]
    async fn test_expired_delegation_is_not_resolved() {
        let registry = MemoryIdentityRegistry::new();
        let delegation = registry.issue(principal("alice"), Duration::ZERO).await;

        tokio::time::sleep(Duration::from_millis(5)).await;

        assert!(registry.resolve(delegation.credential.expose()).await.is_none());
        assert_eq!(registry.active_sessions().await, 0);
    }

    #[tokio::test]
    async fn test_credentials_are_unique() {
        let registry = MemoryIdentityRegistry::new();
        let a = registry.issue(principal("alice"), Duration::from_secs(60)).await;
        let b = registry.issue(principal("alice"), Duration::from_secs(60)).await;
        assert_ne!(a.credential, b.credential);
    }

    #[tokio::test]
    async fn test_scripted_login_outcomes() {
        let provider = ScriptedIdentityProvider::new();
        provider.push(LoginScript::Cancel).await;
        provider.push(LoginScript::Approve(principal("bob"))).await;

        assert!(matches!(
            provider.login(Duration::from_secs(60)).await,
            Err(MetaverseError::LoginCancelled)
        ));
        let delegation = provider.login(Duration::from_secs(60)).await.unwrap();
        assert_eq!(delegation.principal, principal("bob"));
        assert_eq!(provider.probe().await.unwrap(), Some(delegation.clone()));

        provider.logout(&delegation.credential).await.unwrap();
        assert_eq!(provider.probe().await.unwrap(), None);
        assert_eq!(provider.logout_count(), 1);
    }

    #[tokio::test]
    async fn test_hanging_login_never_resolves() {
        let provider = ScriptedIdentityProvider::new();
        provider.push(LoginScript::Hang).await;

        let attempt =
            tokio::time::timeout(Duration::from_millis(20), provider.login(Duration::from_secs(60)))
                .await;
        assert!(attempt.is_err());
    }
}
