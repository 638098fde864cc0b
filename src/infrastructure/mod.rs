//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: harness config loading and plugin config documents
//! - HTTP: the blocking transport
//! - Providers: wire formats of the remote APIs

pub mod config;
pub mod http;
pub mod providers;
