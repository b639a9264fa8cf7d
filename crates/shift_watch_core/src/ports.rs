//! crates/shift_watch_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the shift watcher's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to stay independent of the HTTP client, the database and the secret store.

use async_trait::async_trait;
use crate::domain::{MatchResult, Preference, UserAccount, UserId, UserPreferences};
use crate::error::{AuthError, FetchError};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for store, secret and sink operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Portal Ports
//=========================================================================================

/// Opens authenticated sessions against the co-op portal.
#[async_trait]
pub trait PortalClient: Send + Sync {
    /// Logs in with the given credentials. Each call yields an independent session.
    async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Box<dyn PortalSession>, AuthError>;
}

/// One logged-in session. Owned by a single user's check and dropped afterwards.
#[async_trait]
pub trait PortalSession: Send + Sync {
    /// GETs `url` with the session's cookies and returns the HTML body.
    async fn fetch_document(&self, url: &str) -> Result<String, FetchError>;
}

//=========================================================================================
// Store Ports
//=========================================================================================

#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Active preferences of one user, in the store's natural order.
    async fn list_active_preferences(&self, user_id: UserId) -> PortResult<Vec<Preference>>;

    /// Every user that has at least one active preference.
    async fn list_users_with_active_preferences(&self) -> PortResult<Vec<UserPreferences>>;

    async fn get_user(&self, user_id: UserId) -> PortResult<UserAccount>;
}

#[async_trait]
pub trait SecretSource: Send + Sync {
    /// The portal password for a user, if one can be resolved.
    async fn resolve_portal_password(&self, user_id: UserId) -> PortResult<Option<String>>;
}

#[async_trait]
pub trait ShiftSink: Send + Sync {
    /// Persists the shifts found for a user and records that they are due a notification.
    async fn record_available_shifts(
        &self,
        user: &UserAccount,
        matches: &[MatchResult],
    ) -> PortResult<()>;
}
