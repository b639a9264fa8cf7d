pub mod rest;
pub mod state;

use axum::{
    http::{header::{ACCEPT, CONTENT_TYPE}, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use rest::{check_all_handler, check_user_handler, health_handler, list_shift_types_handler};
pub use state::AppState;

/// Builds the full HTTP surface: API routes, CORS for the dashboard, and Swagger UI.
pub fn router(app_state: Arc<AppState>, frontend_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(frontend_origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT, HeaderName::from_static("x-user-id")]);

    let api_router = Router::new()
        .route("/health", get(health_handler))
        .route("/shifts/types", get(list_shift_types_handler))
        .route("/shifts/check", post(check_user_handler))
        .route("/shifts/check-all", post(check_all_handler))
        .layer(cors)
        .with_state(app_state);

    Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", rest::ApiDoc::openapi()))
}
