//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::state::AppState;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::Utc;
use serde::Serialize;
use shift_watch_core::{catalog::SHIFT_CATALOG, MatchResult, PortError, UserId};
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        list_shift_types_handler,
        check_user_handler,
        check_all_handler,
    ),
    components(
        schemas(HealthResponse, ShiftTypeResponse, CheckUserResponse)
    ),
    tags(
        (name = "Coop Shift Watcher API", description = "Checks the co-op portal for shifts matching member preferences.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
}

/// One entry of the shift-type catalog.
#[derive(Serialize, ToSchema)]
pub struct ShiftTypeResponse {
    name: String,
    id: u32,
}

/// The response payload of a single-user check.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckUserResponse {
    #[schema(value_type = Vec<Object>)]
    matches: Vec<MatchResult>,
    checked_at: String,
}

type HandlerError = (StatusCode, String);

/// Reads the caller's user id from the `x-user-id` header.
fn user_id_from(headers: &HeaderMap) -> Result<UserId, HandlerError> {
    let raw = headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                "x-user-id header is required".to_string(),
            )
        })?;
    raw.trim().parse::<UserId>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            "Invalid x-user-id format".to_string(),
        )
    })
}

fn port_failure(context: &str, e: PortError) -> HandlerError {
    match e {
        PortError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        PortError::Unexpected(_) => {
            error!("{}: {:?}", context, e);
            (StatusCode::INTERNAL_SERVER_ERROR, context.to_string())
        }
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Liveness check.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Lists the shift types a preference can name.
#[utoipa::path(
    get,
    path = "/shifts/types",
    responses((status = 200, description = "The shift-type catalog", body = Vec<ShiftTypeResponse>))
)]
pub async fn list_shift_types_handler() -> Json<Vec<ShiftTypeResponse>> {
    Json(
        SHIFT_CATALOG
            .iter()
            .map(|(name, id)| ShiftTypeResponse {
                name: name.to_string(),
                id: *id,
            })
            .collect(),
    )
}

/// Check the portal right now for one user's active preferences.
#[utoipa::path(
    post,
    path = "/shifts/check",
    responses(
        (status = 200, description = "Preferences with at least one matching shift", body = CheckUserResponse),
        (status = 400, description = "Missing header, missing portal credentials, or portal login failed"),
        (status = 404, description = "Unknown user"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("x-user-id" = i32, Header, description = "The id of the user to check.")
    )
)]
pub async fn check_user_handler(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, HandlerError> {
    let user_id = user_id_from(&headers)?;

    let user = app_state
        .store
        .get_user(user_id)
        .await
        .map_err(|e| port_failure("Failed to load user", e))?;
    let username = user.portal_username.ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            "No portal username is linked to this account".to_string(),
        )
    })?;
    let password = app_state
        .secrets
        .resolve_portal_password(user_id)
        .await
        .map_err(|e| port_failure("Failed to resolve portal password", e))?
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                "No portal password is available for this account".to_string(),
            )
        })?;
    let preferences = app_state
        .store
        .list_active_preferences(user_id)
        .await
        .map_err(|e| port_failure("Failed to load preferences", e))?;

    match app_state
        .checker
        .check_user(&username, &password, &preferences)
        .await
    {
        Ok(matches) => {
            info!(user_id, "Manual check found {} matching preference(s)", matches.len());
            Ok(Json(CheckUserResponse {
                matches,
                checked_at: Utc::now().to_rfc3339(),
            }))
        }
        Err(e) => {
            warn!(user_id, "Manual check failed: {}", e);
            Err((StatusCode::BAD_REQUEST, e.to_string()))
        }
    }
}

/// Check every user with an active preference. Called by the external scheduler.
#[utoipa::path(
    post,
    path = "/shifts/check-all",
    responses(
        (status = 200, description = "Batch summary: usersChecked, usersWithShifts and per-user results"),
        (status = 500, description = "Users could not be enumerated")
    )
)]
pub async fn check_all_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HandlerError> {
    let summary = app_state
        .runner
        .run_all()
        .await
        .map_err(|e| port_failure("Failed to check shifts", e))?;
    Ok(Json(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn user_id_header_is_required_and_numeric() {
        let mut headers = HeaderMap::new();
        assert_eq!(user_id_from(&headers).unwrap_err().0, StatusCode::BAD_REQUEST);

        headers.insert("x-user-id", HeaderValue::from_static("abc"));
        assert_eq!(user_id_from(&headers).unwrap_err().0, StatusCode::BAD_REQUEST);

        headers.insert("x-user-id", HeaderValue::from_static(" 42 "));
        assert_eq!(user_id_from(&headers).unwrap(), 42);
    }

    #[test]
    fn port_errors_map_to_statuses() {
        let (status, _) = port_failure("ctx", PortError::NotFound("User 9 not found".to_string()));
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, message) = port_failure("ctx", PortError::Unexpected("boom".to_string()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "ctx");
    }

    #[test]
    fn openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in ["/health", "/shifts/types", "/shifts/check", "/shifts/check-all"] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
