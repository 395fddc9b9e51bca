//! Application state shared across handlers.

use std::path::PathBuf;
use std::sync::Arc;

use crate::ids::IdGenerator;
use crate::session::SessionService;
use crate::settings::SettingsRepository;
use crate::ws::HistoryLocation;

/// Gateway collaborator configuration.
#[derive(Debug, Clone)]
pub struct GatewayOptions {
    /// WebSocket URL of the gateway's chat endpoint.
    pub ws_url: String,
    /// Agent name used in the gateway's session index keys.
    pub agent: String,
    /// Directory holding the gateway's session index and JSONL logs.
    pub sessions_dir: PathBuf,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self {
            ws_url: "ws://localhost:18789".to_string(),
            agent: "main".to_string(),
            sessions_dir: PathBuf::from("/gateway/agents/main/sessions"),
        }
    }
}

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Chat session continuity service.
    pub sessions: Arc<SessionService>,
    /// Application settings store.
    pub settings: Arc<SettingsRepository>,
    /// Gateway collaborator configuration.
    pub gateway: GatewayOptions,
    /// Token source for correlation ids.
    pub ids: Arc<dyn IdGenerator>,
    /// CORS origins; empty means local dev defaults.
    pub allowed_origins: Vec<String>,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        sessions: SessionService,
        settings: SettingsRepository,
        gateway: GatewayOptions,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            sessions: Arc::new(sessions),
            settings: Arc::new(settings),
            gateway,
            ids,
            allowed_origins: Vec::new(),
        }
    }

    /// Set the allowed CORS origins.
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.allowed_origins = origins;
        self
    }

    /// The transcript source for history requests.
    pub fn history_location(&self) -> HistoryLocation {
        HistoryLocation {
            sessions_dir: self.gateway.sessions_dir.clone(),
            agent: self.gateway.agent.clone(),
        }
    }
}
