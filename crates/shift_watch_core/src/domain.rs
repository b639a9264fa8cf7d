//! crates/shift_watch_core/src/domain.rs
//!
//! Defines the pure, core data structures for the shift watcher.
//! These structs are independent of any database or HTTP client; the ones that
//! leave the process through the API carry camelCase serde names.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Primary key of a user row in the external store.
pub type UserId = i32;

/// A user's stored rule describing which shifts they want to hear about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preference {
    pub id: i32,
    pub user_id: UserId,
    /// Key into the shift-type catalog.
    pub shift_type: String,
    /// Weekday names, in the order the user picked them.
    pub days: Vec<String>,
    /// "HH:MM", 24-hour, inclusive.
    pub time_range_start: String,
    /// "HH:MM", 24-hour, inclusive.
    pub time_range_end: String,
    pub notification_email: String,
    pub is_active: bool,
}

/// Portal login for one user. Only ever held for the duration of a check.
#[derive(Clone)]
pub struct PortalCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for PortalCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortalCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// One bookable shift pulled out of a listing page cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedShiftEntry {
    /// e.g. "Mon"
    pub day: String,
    /// e.g. "3/17/2025"
    pub date: String,
    /// e.g. "9:00 AM"
    pub time: String,
    pub description: String,
    /// Absolute link to the shift's sign-up page.
    pub href: String,
    pub shift_type: String,
}

/// The shifts that satisfied one preference during one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub preference: Preference,
    pub shifts: Vec<ParsedShiftEntry>,
}

// Represents a user as the batch runner sees it - no secrets in here
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub notification_email: Option<String>,
    /// The user's login name on the portal, if they have linked one.
    pub portal_username: Option<String>,
}

/// A user together with their active preferences.
#[derive(Debug, Clone)]
pub struct UserPreferences {
    pub user: UserAccount,
    pub preferences: Vec<Preference>,
}

/// Per-user entry of a batch summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMatches {
    pub user_id: UserId,
    pub user_email: String,
    pub matches: Vec<MatchResult>,
}

/// Outcome of one batch run, serialized as-is by the API layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub users_checked: usize,
    pub users_with_shifts: usize,
    pub results: Vec<UserMatches>,
}
