//! Metaverse Client Core
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, and the ports to the outside world
//! - `application/` - Session manager, remote actor gateway, entity cache
//! - `infra/` - In-memory and HTTP implementations of the ports
//! - `presentation/` - Wire DTOs and the axum router of the local replica
//!
//! ## Features
//! - Delegated-identity login/logout with a bounded, cancellable login step
//! - Avatar (one per principal), append-only tickets, VR worlds with participants
//! - Per-session entity cache, cleared on logout
//! - Optional fallback that masks transport failures with synthesized data
//!   (disabled by `strict_mode`)

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::{
    ActorGateway, EntityCache, MetaverseConfig, Notice, SessionContext, SessionManager,
};
pub use error::{MetaverseError, MetaverseResult};
pub use infra::{HttpActor, HttpIdentityProvider, InMemoryActor};
pub use presentation::router::replica_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use kernel::id::{AvatarId, TicketId, WorldId};
}
