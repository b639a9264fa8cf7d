//! services/api/src/bin/check_shifts.rs
//!
//! One batch run for cron: checks every user with an active preference, records
//! what was found, and prints the summary as JSON on stdout.

use api_lib::{
    app::{build_state, init_tracing},
    config::Config,
    error::ApiError,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    let config = Config::from_env()?;
    init_tracing(&config);

    let app_state = build_state(&config).await?;
    info!("Starting shift check...");
    let summary = app_state.runner.run_all().await?;

    if summary.results.is_empty() {
        info!("No matching shifts found for any users");
    } else {
        info!(
            "Found matches for {} of {} user(s)",
            summary.users_with_shifts, summary.users_checked
        );
    }

    let json = serde_json::to_string_pretty(&summary)
        .map_err(|e| ApiError::Internal(format!("Failed to serialize summary: {}", e)))?;
    println!("{}", json);
    Ok(())
}
