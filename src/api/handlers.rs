//! API request handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::session::ChatSession;
use crate::settings::Setting;

use super::error::{ApiError, ApiResult};
use super::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Get or create the caller's chat session for an agent.
///
/// POST /api/agents/{agent_id}/session
///
/// The returned session key is the continuation token the browser presents
/// over the relay socket; it is only ever handed to the session owner.
pub async fn get_or_create_session(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(agent_id): Path<String>,
) -> ApiResult<Json<ChatSession>> {
    if agent_id.trim().is_empty() {
        return Err(ApiError::bad_request("agent id must not be empty"));
    }

    let session = state.sessions.get_or_create(user.id(), &agent_id).await?;
    Ok(Json(session))
}

/// List all settings.
///
/// GET /api/settings
pub async fn list_settings(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> ApiResult<Json<Vec<Setting>>> {
    let settings = state.settings.all().await?;
    Ok(Json(settings))
}

/// Setting value response.
#[derive(Debug, Serialize)]
pub struct SettingValueResponse {
    pub key: String,
    pub value: String,
}

/// Get a single setting.
///
/// GET /api/settings/{key}
pub async fn get_setting(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(key): Path<String>,
) -> ApiResult<Json<SettingValueResponse>> {
    let value = state
        .settings
        .get(&key)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("setting not found: {key}")))?;

    Ok(Json(SettingValueResponse { key, value }))
}

/// Setting update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateSettingRequest {
    pub value: String,
    #[serde(default)]
    pub encrypted: bool,
}

/// Create or update a setting.
///
/// PUT /api/settings/{key}
pub async fn update_setting(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(key): Path<String>,
    Json(request): Json<UpdateSettingRequest>,
) -> ApiResult<StatusCode> {
    if key.trim().is_empty() {
        return Err(ApiError::bad_request("setting key must not be empty"));
    }

    state
        .settings
        .set(&key, &request.value, request.encrypted)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
