//! Domain Layer
//!
//! Contains entities, value objects, and the ports to the remote service
//! and the identity provider.

pub mod entity;
pub mod port;
pub mod value_object;

// Re-exports
pub use entity::{
    avatar::Avatar, delegation::Delegation, session::SessionState, ticket::Ticket,
    vr_world::VrWorld,
};
pub use port::{CallContext, IdentityProvider, RemoteActor};
