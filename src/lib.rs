//! endpointfs - synthetic filesystem endpoints over remote APIs
//!
//! Each endpoint exposes a small fixed file tree. Writing a trigger file
//! submits a request; reading the response files returns the cached outcome
//! of the latest request.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod plugins;
