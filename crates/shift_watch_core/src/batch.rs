//! crates/shift_watch_core/src/batch.rs
//!
//! Checks every user with an active preference. One user's failure is logged
//! and never stops the rest of the run.

use crate::checker::ShiftChecker;
use crate::domain::{BatchSummary, PortalCredentials, UserMatches, UserPreferences};
use crate::ports::{PortResult, PreferenceStore, SecretSource, ShiftSink};
use futures::{future, stream, StreamExt};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

pub struct BatchRunner {
    store: Arc<dyn PreferenceStore>,
    secrets: Arc<dyn SecretSource>,
    checker: ShiftChecker,
    sink: Option<Arc<dyn ShiftSink>>,
    max_concurrent_sessions: usize,
}

impl BatchRunner {
    /// Creates a runner that checks one user at a time and persists nothing.
    pub fn new(
        store: Arc<dyn PreferenceStore>,
        secrets: Arc<dyn SecretSource>,
        checker: ShiftChecker,
    ) -> Self {
        Self {
            store,
            secrets,
            checker,
            sink: None,
            max_concurrent_sessions: 1,
        }
    }

    /// Hands every non-empty set of matches to `sink` as it is found.
    pub fn with_sink(mut self, sink: Arc<dyn ShiftSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Caps how many portal sessions may be live at once. Zero is treated as one.
    pub fn with_max_concurrent_sessions(mut self, limit: usize) -> Self {
        self.max_concurrent_sessions = limit.max(1);
        self
    }

    /// Runs one batch. Only failing to enumerate users is an error; everything
    /// after that is handled per user.
    #[instrument(skip(self))]
    pub async fn run_all(&self) -> PortResult<BatchSummary> {
        let users = self.store.list_users_with_active_preferences().await?;
        let users_checked = users.len();
        info!("Checking shifts for {} user(s)", users_checked);

        // `buffered` keeps results in enumeration order.
        let results: Vec<UserMatches> = stream::iter(users)
            .map(|entry| self.check_one(entry))
            .buffered(self.max_concurrent_sessions)
            .filter_map(future::ready)
            .collect()
            .await;

        info!(
            "Batch finished: {} checked, {} with shifts",
            users_checked,
            results.len()
        );
        Ok(BatchSummary {
            users_checked,
            users_with_shifts: results.len(),
            results,
        })
    }

    #[instrument(skip(self, entry), fields(user_id = entry.user.id))]
    async fn check_one(&self, entry: UserPreferences) -> Option<UserMatches> {
        let UserPreferences { user, preferences } = entry;

        let Some(username) = user.portal_username.clone() else {
            warn!("No portal username on file, skipping");
            return None;
        };
        let password = match self.secrets.resolve_portal_password(user.id).await {
            Ok(Some(password)) => password,
            Ok(None) => {
                warn!("No portal password available, skipping");
                return None;
            }
            Err(e) => {
                error!("Failed to resolve portal password: {}", e);
                return None;
            }
        };

        let credentials = PortalCredentials { username, password };

        let matches = match self
            .checker
            .check_user(&credentials.username, &credentials.password, &preferences)
            .await
        {
            Ok(matches) => matches,
            Err(e) => {
                error!("Shift check failed: {}", e);
                return None;
            }
        };
        if matches.is_empty() {
            return None;
        }

        if let Some(sink) = &self.sink {
            if let Err(e) = sink.record_available_shifts(&user, &matches).await {
                error!("Failed to record available shifts: {}", e);
            }
        }

        Some(UserMatches {
            user_id: user.id,
            user_email: user.email,
            matches,
        })
    }
}
