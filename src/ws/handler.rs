//! WebSocket upgrade handler for client connections.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::Response;
use log::{error, info};
use serde::Deserialize;

use crate::api::AppState;
use crate::gateway;

use super::bridge::RelayBridge;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    #[serde(rename = "agentId")]
    pub agent_id: Option<String>,
}

/// WebSocket upgrade handler.
///
/// GET /api/ws?agentId=...
pub async fn ws_handler(
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| handle_connection(socket, state, query.agent_id))
}

/// Pair the upgraded client socket with a fresh gateway connection and run
/// the bridge until either side goes away.
async fn handle_connection(mut client: WebSocket, state: AppState, agent_id: Option<String>) {
    // The gateway leg opens eagerly; there is no lazy connect and no retry.
    let gateway = match gateway::connect(&state.gateway.ws_url).await {
        Ok(gateway) => gateway,
        Err(err) => {
            error!("Gateway connection failed: {:#}", err);
            let _ = client.send(Message::Close(None)).await;
            return;
        }
    };

    info!(
        "Relay pair established (agent: {})",
        agent_id.as_deref().unwrap_or("-")
    );

    RelayBridge::new(
        client,
        gateway,
        state.sessions.clone(),
        state.history_location(),
        state.ids.clone(),
        agent_id,
    )
    .run()
    .await;
}
