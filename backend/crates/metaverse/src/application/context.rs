//! Session Context
//!
//! Explicit handle on the current session, shared by the session manager,
//! the gateway and the entity cache.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::entity::{
    delegation::Delegation,
    session::{SessionPhase, SessionSnapshot, SessionState},
};
use crate::domain::port::CallContext;
use crate::domain::value_object::Principal;
use crate::error::{MetaverseError, MetaverseResult};

#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    inner: Arc<RwLock<SessionState>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.inner.read().await.snapshot()
    }

    pub async fn phase(&self) -> SessionPhase {
        self.inner.read().await.phase()
    }

    pub async fn generation(&self) -> u64 {
        self.inner.read().await.generation()
    }

    /// Whether no login/logout happened since `generation` was read
    pub async fn is_current(&self, generation: u64) -> bool {
        self.generation().await == generation
    }

    pub async fn principal(&self) -> Option<Principal> {
        let state = self.inner.read().await;
        state.principal().filter(|_| state.is_authenticated()).cloned()
    }

    pub async fn delegation(&self) -> Option<Delegation> {
        self.inner.read().await.delegation().cloned()
    }

    pub async fn enter(&self, phase: SessionPhase) {
        self.inner.write().await.enter(phase);
    }

    pub async fn authenticate(&self, delegation: Delegation) -> u64 {
        self.inner.write().await.authenticate(delegation)
    }

    pub async fn clear(&self) -> u64 {
        self.inner.write().await.clear()
    }

    /// Caller identity for a remote call; requires a ready, authenticated session
    pub async fn call_context(&self) -> MetaverseResult<CallContext> {
        let state = self.inner.read().await;
        match state.delegation() {
            Some(delegation) if state.is_authenticated() => Ok(CallContext::from(delegation)),
            _ => Err(MetaverseError::Unauthenticated),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::delegation::DelegatedCredential;

    fn delegation(principal: &str) -> Delegation {
        Delegation::new(
            Principal::parse(principal).unwrap(),
            DelegatedCredential::new(format!("cred-{principal}")),
            u64::MAX,
        )
    }

    #[tokio::test]
    async fn test_call_context_requires_authentication() {
        let context = SessionContext::new();
        assert!(matches!(
            context.call_context().await,
            Err(MetaverseError::Unauthenticated)
        ));

        context.authenticate(delegation("alice")).await;
        let caller = context.call_context().await.unwrap();
        assert_eq!(caller.principal.as_str(), "alice");
        assert_eq!(caller.credential.expose(), "cred-alice");
    }

    #[tokio::test]
    async fn test_logging_out_blocks_calls() {
        let context = SessionContext::new();
        context.authenticate(delegation("alice")).await;
        context.enter(SessionPhase::LoggingOut).await;

        assert!(context.call_context().await.is_err());
        assert!(context.principal().await.is_none());
        assert!(context.delegation().await.is_some());
    }

    #[tokio::test]
    async fn test_generation_tracks_session_changes() {
        let context = SessionContext::new();
        let before = context.generation().await;

        context.authenticate(delegation("alice")).await;
        assert!(!context.is_current(before).await);

        let during = context.generation().await;
        context.clear().await;
        assert!(!context.is_current(during).await);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let context = SessionContext::new();
        let other = context.clone();
        context.authenticate(delegation("alice")).await;
        assert_eq!(other.principal().await.unwrap().as_str(), "alice");
    }
}
