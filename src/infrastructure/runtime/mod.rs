//! Runtime infrastructure - Tokio runtime bridge for async API calls

mod bridge;
mod worker;

pub use bridge::{ApiCommand, ApiEvent, MutationKind, RuntimeBridge};
pub use worker::run_worker;
