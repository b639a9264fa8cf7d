//! services/api/src/bin/api.rs

use api_lib::{
    app::{build_state, init_tracing},
    config::Config,
    error::ApiError,
    web::router,
};
use axum::http::HeaderValue;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    init_tracing(&config);
    info!("Configuration loaded. Starting server...");

    // --- 2. Build Adapters and the Shared AppState ---
    let app_state = Arc::new(build_state(&config).await?);

    // --- 3. Create the Web Router ---
    let frontend_origin = config.frontend_url.parse::<HeaderValue>().map_err(|e| {
        ApiError::Internal(format!("Invalid FRONTEND_URL '{}': {}", config.frontend_url, e))
    })?;
    let app = router(app_state, frontend_origin);

    // --- 4. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
