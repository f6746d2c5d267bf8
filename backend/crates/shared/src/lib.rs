//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of vocabulary shared by the
//! metaverse client and the local replica:
//! - Common error types and result aliases
//! - Typed identifiers for avatars, tickets and VR worlds
//!
//! Only things with the same meaning on both sides of the wire live here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
