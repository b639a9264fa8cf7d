//! crates/shift_watch_core/src/checker.rs
//!
//! Runs one user's check: a single portal login, then one scan per active preference.

use crate::availability::ShiftScanner;
use crate::domain::{MatchResult, Preference};
use crate::error::OrchestrationError;
use crate::ports::PortalClient;
use chrono::{Local, NaiveDate};
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Matches a user's preferences against what the portal currently lists.
#[derive(Clone)]
pub struct ShiftChecker {
    portal: Arc<dyn PortalClient>,
    scanner: ShiftScanner,
}

impl ShiftChecker {
    pub fn new(portal: Arc<dyn PortalClient>, scanner: ShiftScanner) -> Self {
        Self { portal, scanner }
    }

    /// Checks the user's preferences using today's date as the reference.
    pub async fn check_user(
        &self,
        username: &str,
        password: &str,
        preferences: &[Preference],
    ) -> Result<Vec<MatchResult>, OrchestrationError> {
        self.check_user_on(username, password, preferences, Local::now().date_naive())
            .await
    }

    /// Logs in once, scans each active preference in order, and returns the
    /// preferences that produced at least one shift.
    ///
    /// A failed login ends the check before anything is scanned.
    #[instrument(skip(self, password, preferences), fields(preferences = preferences.len()))]
    pub async fn check_user_on(
        &self,
        username: &str,
        password: &str,
        preferences: &[Preference],
        reference_date: NaiveDate,
    ) -> Result<Vec<MatchResult>, OrchestrationError> {
        let session = self.portal.login(username, password).await.map_err(|e| {
            error!("Portal login failed: {}", e);
            OrchestrationError::LoginFailed(e)
        })?;

        let mut results = Vec::new();
        for preference in preferences.iter().filter(|p| p.is_active) {
            let shifts = self
                .scanner
                .scan(session.as_ref(), preference, reference_date)
                .await;
            if shifts.is_empty() {
                continue;
            }
            info!(
                preference_id = preference.id,
                "Found {} shift(s) for '{}'",
                shifts.len(),
                preference.shift_type
            );
            results.push(MatchResult {
                preference: preference.clone(),
                shifts,
            });
        }

        Ok(results)
    }
}
