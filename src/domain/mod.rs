//! Domain layer - entity rows, pagination, search, and the table controller
//!
//! Everything here is plain state and pure functions; nothing talks to the
//! network. Remote effects are expressed as request values the runtime
//! worker executes.

pub mod entity;
pub mod menu;
pub mod pagination;
pub mod search;
pub mod table;
