//! Infrastructure Layer
//!
//! Implementations of the identity provider and remote actor ports.

pub mod http_actor;
pub mod http_identity;
pub mod memory_actor;
pub mod memory_identity;

use std::sync::Arc;

pub use http_actor::HttpActor;
pub use http_identity::HttpIdentityProvider;
pub use memory_actor::{ActorStats, InMemoryActor, UserProfile};
pub use memory_identity::{LoginScript, MemoryIdentityRegistry, ScriptedIdentityProvider};

use crate::application::{config::MetaverseConfig, session_manager::SessionManager};
use crate::error::MetaverseResult;

/// Session manager wired to the live HTTP adapters
pub fn connect(
    config: MetaverseConfig,
) -> MetaverseResult<SessionManager<HttpIdentityProvider, HttpActor>> {
    let identity = Arc::new(HttpIdentityProvider::from_config(&config)?);
    let actor = Arc::new(HttpActor::from_config(&config)?);

    tracing::info!(
        environment = ?config.environment,
        service = %config.service_address,
        strict_mode = config.strict_mode,
        "Connecting metaverse client"
    );
    Ok(SessionManager::new(identity, actor, config))
}
