//! Infrastructure layer - external service integrations
//!
//! This layer contains:
//! - The reqwest-backed admin API client
//! - The Tokio runtime bridge and worker that execute API commands

pub mod api;
pub mod runtime;
