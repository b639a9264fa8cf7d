//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use shift_watch_core::{BatchRunner, PreferenceStore, SecretSource, ShiftChecker};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PreferenceStore>,
    pub secrets: Arc<dyn SecretSource>,
    pub checker: ShiftChecker,
    pub runner: Arc<BatchRunner>,
}
