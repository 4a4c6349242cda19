//! Admin API layer - error taxonomy and the entity service client

mod client;

pub use client::{EntityApi, HttpEntityApi, Page, Profile};

use thiserror::Error;

/// Error taxonomy for remote calls.
///
/// The UI collapses all of these to one message string; the kind is kept so
/// callers can tell credential problems apart from transport or service
/// failures without parsing text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No bearer token in the session store; the request was never issued
    #[error("authentication token not found")]
    MissingCredential,

    /// The request could not complete
    #[error("network error: {0}")]
    Transport(String),

    /// The service answered but rejected the request
    #[error("{message}")]
    Rejected {
        status: Option<u16>,
        message: String,
    },

    /// A required field was left blank; caught before any network call
    #[error("{0} is required")]
    Validation(&'static str),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_read_like_the_ui_shows_them() {
        assert_eq!(
            ApiError::MissingCredential.to_string(),
            "authentication token not found"
        );
        assert_eq!(
            ApiError::Rejected {
                status: Some(401),
                message: "Invalid token".to_string(),
            }
            .to_string(),
            "Invalid token"
        );
        assert_eq!(ApiError::Validation("name").to_string(), "name is required");
    }
}
