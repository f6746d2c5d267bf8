//! Session Manager
//!
//! Top-level controller of the authentication lifecycle. Owns the session
//! context, the identity provider and the entity cache; `init`, `login`
//! and `logout` are serialized by a single lifecycle lock.

use std::sync::Arc;

use tokio::sync::{Mutex, broadcast};

use crate::application::cache::EntityCache;
use crate::application::config::MetaverseConfig;
use crate::application::context::SessionContext;
use crate::application::gateway::ActorGateway;
use crate::application::notice::{Notice, Notifier};
use crate::domain::entity::{
    delegation::Delegation,
    session::{SessionPhase, SessionSnapshot},
};
use crate::domain::port::{IdentityProvider, RemoteActor};
use crate::domain::value_object::Principal;
use crate::error::{MetaverseError, MetaverseResult};

pub struct SessionManager<I, A> {
    identity: Arc<I>,
    context: SessionContext,
    gateway: Arc<ActorGateway<A>>,
    cache: Arc<EntityCache<A>>,
    notifier: Notifier,
    config: Arc<MetaverseConfig>,
    lifecycle: Mutex<()>,
}

impl<I, A> SessionManager<I, A>
where
    I: IdentityProvider + Send + Sync + 'static,
    A: RemoteActor + Send + Sync + 'static,
{
    pub fn new(identity: Arc<I>, actor: Arc<A>, config: MetaverseConfig) -> Self {
        let context = SessionContext::new();
        let notifier = Notifier::new();
        let gateway = Arc::new(ActorGateway::new(
            actor,
            context.clone(),
            config.strict_mode,
        ));
        let cache = Arc::new(EntityCache::new(
            gateway.clone(),
            context.clone(),
            notifier.clone(),
        ));

        Self {
            identity,
            context,
            gateway,
            cache,
            notifier,
            config: Arc::new(config),
            lifecycle: Mutex::new(()),
        }
    }

    /// Probe for an existing session.
    ///
    /// Only the first call probes; later calls return the current snapshot.
    pub async fn init(&self) -> SessionSnapshot {
        let _guard = self.lifecycle.lock().await;

        if self.context.phase().await != SessionPhase::Uninitialized {
            return self.context.snapshot().await;
        }
        self.context.enter(SessionPhase::Initializing).await;

        match self.identity.probe().await {
            Ok(Some(delegation)) if !delegation.is_expired() => {
                tracing::info!(principal = %delegation.principal, "Restored existing session");
                self.establish(delegation).await;
            }
            Ok(Some(delegation)) => {
                tracing::info!(principal = %delegation.principal, "Stored session expired");
                self.context.enter(SessionPhase::Unauthenticated).await;
            }
            Ok(None) => {
                tracing::debug!("No existing session");
                self.context.enter(SessionPhase::Unauthenticated).await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Session probe failed");
                self.context.enter(SessionPhase::Unauthenticated).await;
            }
        }

        self.context.snapshot().await
    }

    /// Run the interactive login.
    ///
    /// Never fails: cancellation, timeout and provider errors resolve to
    /// `false` with a `LoginFailed` notice.
    pub async fn login(&self) -> bool {
        let _guard = self.lifecycle.lock().await;

        match self.context.phase().await {
            SessionPhase::Authenticated => return true,
            SessionPhase::Unauthenticated => {}
            phase => {
                tracing::warn!(phase = %phase, "Login rejected in current phase");
                self.notifier.publish(Notice::LoginFailed {
                    reason: format!("cannot log in while {phase}"),
                });
                return false;
            }
        }
        self.context.enter(SessionPhase::LoggingIn).await;

        let attempt = tokio::time::timeout(
            self.config.login_timeout,
            self.identity.login(self.config.delegation_ttl),
        )
        .await;

        let delegation = match attempt {
            Ok(Ok(delegation)) if !delegation.is_expired() => delegation,
            Ok(Ok(_)) => {
                return self.reject(MetaverseError::validation(
                    "delegation",
                    "already expired",
                ))
                .await;
            }
            Ok(Err(e)) => return self.reject(e).await,
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.config.login_timeout.as_secs(),
                    "Login did not complete in time"
                );
                return self.reject(MetaverseError::LoginCancelled).await;
            }
        };

        let principal = delegation.principal.clone();
        self.establish(delegation).await;

        tracing::info!(principal = %principal, "Logged in");
        self.notifier.publish(Notice::LoggedIn { principal });
        true
    }

    /// End the session; a no-op unless authenticated
    pub async fn logout(&self) {
        let _guard = self.lifecycle.lock().await;

        if self.context.phase().await != SessionPhase::Authenticated {
            tracing::debug!("Logout without a session, nothing to do");
            return;
        }

        let delegation = self.context.delegation().await;
        self.context.enter(SessionPhase::LoggingOut).await;

        if let Some(delegation) = &delegation {
            if let Err(e) = self.identity.logout(&delegation.credential).await {
                tracing::warn!(
                    error = %e,
                    credential = %delegation.credential.fingerprint(),
                    "Failed to invalidate remote session"
                );
            }
        }

        self.context.clear().await;
        self.cache.clear().await;

        tracing::info!(
            principal = delegation.as_ref().map(|d| d.principal.as_str()).unwrap_or("-"),
            "Logged out"
        );
        self.notifier.publish(Notice::LoggedOut);
    }

    pub async fn session(&self) -> SessionSnapshot {
        self.context.snapshot().await
    }

    pub async fn principal(&self) -> Option<Principal> {
        self.context.principal().await
    }

    pub fn cache(&self) -> &Arc<EntityCache<A>> {
        &self.cache
    }

    pub fn gateway(&self) -> &Arc<ActorGateway<A>> {
        &self.gateway
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn config(&self) -> &MetaverseConfig {
        &self.config
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.notifier.subscribe()
    }

    async fn establish(&self, delegation: Delegation) {
        self.context.authenticate(delegation).await;

        if let Err(e) = self.load_user_data().await {
            tracing::warn!(error = %e, "Initial user data load failed");
        }
    }

    async fn load_user_data(&self) -> MetaverseResult<()> {
        let report = self.cache.load_user_data().await?;
        if !report.is_complete() {
            tracing::warn!(
                failed = ?report.failures.iter().map(|(field, _)| *field).collect::<Vec<_>>(),
                "User data partially loaded"
            );
        }
        Ok(())
    }

    async fn reject(&self, error: MetaverseError) -> bool {
        tracing::warn!(error = %error, "Login failed");
        self.context.enter(SessionPhase::Unauthenticated).await;
        self.notifier.publish(Notice::LoginFailed {
            reason: error.to_string(),
        });
        false
    }
}
