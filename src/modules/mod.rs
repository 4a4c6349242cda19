//! UI Modules
//!
//! - form: the create/edit entity modal with confirm-before-delete
//! - export: CSV export of the currently loaded page

pub mod export;
pub mod form;
