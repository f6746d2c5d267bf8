//! Application Layer
//!
//! Session lifecycle, the remote actor gateway, and the per-session
//! entity cache.

pub mod cache;
pub mod config;
pub mod context;
pub mod gateway;
pub mod notice;
pub mod session_manager;

// Re-exports
pub use cache::{CacheSnapshot, EntityCache, LoadReport};
pub use config::{Environment, MetaverseConfig};
pub use context::SessionContext;
pub use gateway::ActorGateway;
pub use notice::{Notice, Notifier};
pub use session_manager::SessionManager;
