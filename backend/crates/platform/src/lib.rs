//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - JSON-over-HTTP transport used by the live remote actor and identity provider
//! - Cryptographic utilities (random tokens, SHA-256, credential fingerprints)
//! - Wall clock helpers

pub mod clock;
pub mod crypto;
pub mod transport;
