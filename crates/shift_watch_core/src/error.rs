//! crates/shift_watch_core/src/error.rs
//!
//! Error taxonomy for talking to the portal. Parse problems are deliberately
//! absent: malformed markup is skipped where it is found, never raised.

/// Failures while establishing a portal session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Login page did not contain an anti-forgery token")]
    MissingToken,
    #[error("Portal login failed: {0}")]
    LoginFailed(String),
}

/// Failures while fetching a page through an established session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("Portal responded with HTTP {0}")]
    NonSuccessStatus(u16),
    #[error("Portal request timed out")]
    Timeout,
    #[error("Portal redirected too many times")]
    TooManyRedirects,
    #[error("Portal request failed: {0}")]
    Transport(String),
}

/// Failures that end a single user's check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrchestrationError {
    #[error("Could not log into the portal: {0}")]
    LoginFailed(#[from] AuthError),
}
