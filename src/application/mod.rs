//! Application layer - Use cases and orchestration
//!
//! This layer contains:
//! - Errors: endpoint and configuration errors
//! - Services: local skill execution
//! - Console: the developer harness command language

pub mod console;
pub mod errors;
pub mod services;
