//! services/api/src/app.rs
//!
//! Startup wiring shared by the server and the cron binary.

use crate::adapters::{DbAdapter, EnvSecretSource, ReqwestPortalClient};
use crate::config::Config;
use crate::error::ApiError;
use crate::web::AppState;
use shift_watch_core::{BatchRunner, ShiftChecker, ShiftScanner};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global tracing subscriber at the configured level.
pub fn init_tracing(config: &Config) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Connects to the database and builds every adapter the core needs.
pub async fn build_state(config: &Config) -> Result<AppState, ApiError> {
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let db_adapter = Arc::new(DbAdapter::new(db_pool));

    let secrets = Arc::new(EnvSecretSource::from_env());
    info!("Portal password sources: {:?}", secrets);

    let portal = Arc::new(ReqwestPortalClient::new(config.coop_login_url.clone()));
    let checker = ShiftChecker::new(portal, ShiftScanner::new(config.coop_base_url.clone()));

    let runner = BatchRunner::new(db_adapter.clone(), secrets.clone(), checker.clone())
        .with_sink(db_adapter.clone())
        .with_max_concurrent_sessions(config.max_concurrent_sessions);

    Ok(AppState {
        store: db_adapter,
        secrets,
        checker,
        runner: Arc::new(runner),
    })
}
