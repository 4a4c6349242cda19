//! Actions that UI pieces return to communicate with the app

/// Actions returned to the app loop to communicate state changes
#[derive(Debug, Clone)]
pub enum Action {
    /// Show notification in the status line
    Notify(String, NotifyLevel),

    /// Close current overlay/popup
    CloseOverlay,

    /// Request quit
    Quit,
}

/// Notification levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Warn,
    Error,
}
