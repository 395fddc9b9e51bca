//! Test utilities and common setup.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use skiff::api::{self, AppState, GatewayOptions};
use skiff::db::Database;
use skiff::ids::SequentialIds;
use skiff::session::{ChatSessionRepository, SessionService};
use skiff::settings::SettingsRepository;

/// Create application state backed by an in-memory database and
/// deterministic ids.
pub async fn test_state(gateway_ws_url: &str, sessions_dir: &Path) -> AppState {
    let db = Database::in_memory().await.unwrap();

    let ids = Arc::new(SequentialIds::new());
    let session_repo = ChatSessionRepository::new(db.pool().clone());
    let session_service = SessionService::new(session_repo, ids.clone());
    let settings_repo = SettingsRepository::new(db.pool().clone());

    let gateway = GatewayOptions {
        ws_url: gateway_ws_url.to_string(),
        agent: "main".to_string(),
        sessions_dir: sessions_dir.to_path_buf(),
    };

    AppState::new(session_service, settings_repo, gateway, ids)
}

/// Create a test application router.
pub async fn test_app(gateway_ws_url: &str, sessions_dir: &Path) -> Router {
    api::create_router(test_state(gateway_ws_url, sessions_dir).await)
}
