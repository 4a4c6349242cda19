//! Steward - a terminal admin console for CRM-style backend APIs
//!
//! The binary wires a ratatui shell around the library; integration tests
//! drive the controller, form, and app state directly through these modules.

pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod modules;
pub mod store;
pub mod ui;
