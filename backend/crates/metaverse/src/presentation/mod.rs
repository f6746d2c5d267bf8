//! Presentation Layer
//!
//! Wire DTOs plus the handlers, middleware and router of the local replica.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::ReplicaState;
pub use middleware::require_delegation;
pub use router::replica_router;
