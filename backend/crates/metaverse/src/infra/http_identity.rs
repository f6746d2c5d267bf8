//! HTTP Identity Provider
//!
//! Live `IdentityProvider` against `{identity}/identity/*`. Keeps the last
//! delegation it obtained so a later `probe` can restore the session.

use std::time::Duration;

use platform::transport::{JsonTransport, TransportError};
use tokio::sync::RwLock;

use crate::application::config::MetaverseConfig;
use crate::domain::entity::delegation::{DelegatedCredential, Delegation};
use crate::domain::port::IdentityProvider;
use crate::domain::value_object::Principal;
use crate::error::{MetaverseError, MetaverseResult};
use crate::presentation::dto::{AuthorizeRequest, DelegationDto, LogoutResponse};

#[derive(Debug)]
pub struct HttpIdentityProvider {
    transport: JsonTransport,
    principal_hint: Option<Principal>,
    stored: RwLock<Option<Delegation>>,
}

impl HttpIdentityProvider {
    pub fn new(transport: JsonTransport) -> Self {
        Self {
            transport,
            principal_hint: None,
            stored: RwLock::new(None),
        }
    }

    pub fn from_config(config: &MetaverseConfig) -> MetaverseResult<Self> {
        let transport = JsonTransport::new(&config.identity_provider_url, config.request_timeout)?;
        Ok(Self::new(transport))
    }

    /// Ask the provider to approve as this principal
    pub fn with_principal_hint(mut self, principal: Principal) -> Self {
        self.principal_hint = Some(principal);
        self
    }

    /// Start from a delegation persisted elsewhere
    pub fn with_delegation(self, delegation: Delegation) -> Self {
        Self {
            stored: RwLock::new(Some(delegation)),
            ..self
        }
    }

    pub async fn stored(&self) -> Option<Delegation> {
        self.stored.read().await.clone()
    }
}

impl IdentityProvider for HttpIdentityProvider {
    async fn probe(&self) -> MetaverseResult<Option<Delegation>> {
        let Some(current) = self.stored().await else {
            return Ok(None);
        };

        let result: Result<DelegationDto, TransportError> = self
            .transport
            .get_json("identity/session", Some(current.credential.expose()))
            .await;

        match result {
            Ok(dto) => {
                let delegation = Delegation::try_from(dto)?;
                *self.stored.write().await = Some(delegation.clone());
                Ok(Some(delegation))
            }
            Err(e) if e.is_unauthorized() => {
                tracing::debug!(
                    credential = %current.credential.fingerprint(),
                    "Stored delegation rejected"
                );
                *self.stored.write().await = None;
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn login(&self, max_time_to_live: Duration) -> MetaverseResult<Delegation> {
        let request = AuthorizeRequest {
            max_time_to_live_ms: Some(max_time_to_live.as_millis() as u64),
            principal: self.principal_hint.as_ref().map(|p| p.to_string()),
            cancel: false,
        };

        let dto: DelegationDto = self
            .transport
            .post_json("identity/authorize", None, &request)
            .await
            .map_err(|e| match e.status() {
                Some(403) => MetaverseError::LoginCancelled,
                _ => MetaverseError::Transport(e),
            })?;

        let delegation = Delegation::try_from(dto)?;
        *self.stored.write().await = Some(delegation.clone());

        tracing::debug!(
            principal = %delegation.principal,
            credential = %delegation.credential.fingerprint(),
            "Delegation obtained"
        );
        Ok(delegation)
    }

    async fn logout(&self, credential: &DelegatedCredential) -> MetaverseResult<()> {
        {
            let mut stored = self.stored.write().await;
            if stored.as_ref().is_some_and(|d| &d.credential == credential) {
                *stored = None;
            }
        }

        let result: Result<LogoutResponse, TransportError> = self
            .transport
            .post_json("identity/logout", Some(credential.expose()), &serde_json::json!({}))
            .await;

        match result {
            Ok(response) => {
                tracing::debug!(revoked = response.revoked, "Remote session invalidated");
                Ok(())
            }
            // Already gone on the provider side
            Err(e) if e.is_unauthorized() => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
