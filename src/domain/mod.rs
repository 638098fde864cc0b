//! Domain layer - Core types with no network or host dependencies
//!
//! This layer contains:
//! - Entities: synthetic tree, response cache, audit log, file info
//! - Traits: abstractions for the clock, HTTP transport and skill runner

pub mod entities;
pub mod traits;
