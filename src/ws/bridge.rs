//! The relay bridge: one client socket paired with one gateway socket.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use log::{debug, info, warn};
use tokio_tungstenite::tungstenite::Message as GatewayMessage;

use crate::gateway::{ChatRequest, GatewayEvent, GatewaySocket};
use crate::history::{self, SessionMessage};
use crate::ids::IdGenerator;
use crate::session::SessionService;

use super::types::{ClientFrame, ServerFrame};

/// Where transcripts are reconstructed from.
#[derive(Debug, Clone)]
pub struct HistoryLocation {
    pub sessions_dir: PathBuf,
    pub agent: String,
}

/// A per-connection relay between one browser socket and one gateway
/// socket.
///
/// The bridge exclusively owns both handles for its lifetime: a close or
/// error on either leg tears down the pair through the single teardown
/// path at the end of [`RelayBridge::run`]. The bridge never reconnects or
/// replays; resumption is the client reconnecting and asking for history
/// with the same session key.
///
/// Correlation contract: at most one outstanding chat request per
/// connection. A second chat message sent before the first's done event
/// reassigns the correlation id, and late chunks of the first request will
/// carry the second's id. Clients are expected to wait for done.
pub struct RelayBridge {
    client: WebSocket,
    gateway: GatewaySocket,
    core: BridgeCore,
}

/// Connection-scoped state and the frame handlers that mutate it.
struct BridgeCore {
    sessions: Arc<SessionService>,
    history: HistoryLocation,
    ids: Arc<dyn IdGenerator>,
    /// Agent from the connection's query string, used when a chat frame
    /// does not name one itself.
    connection_agent: Option<String>,
    /// Correlation id stamped onto streamed response frames. Reassigned on
    /// every inbound chat message.
    current_message_id: String,
    /// Session key of the in-flight chat request; its session is marked
    /// activated when the done event arrives.
    pending_activation: Option<String>,
}

impl RelayBridge {
    pub fn new(
        client: WebSocket,
        gateway: GatewaySocket,
        sessions: Arc<SessionService>,
        history: HistoryLocation,
        ids: Arc<dyn IdGenerator>,
        connection_agent: Option<String>,
    ) -> Self {
        let current_message_id = ids.generate();
        Self {
            client,
            gateway,
            core: BridgeCore {
                sessions,
                history,
                ids,
                connection_agent,
                current_message_id,
                pending_activation: None,
            },
        }
    }

    /// Pump both legs until either side closes or errors, then tear the
    /// pair down together.
    pub async fn run(self) {
        let Self {
            mut client,
            mut gateway,
            mut core,
        } = self;

        loop {
            tokio::select! {
                inbound = client.recv() => match inbound {
                    Some(Ok(Message::Text(text))) => {
                        if core.on_client_text(&mut client, &mut gateway, &text).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("Client closed the relay connection");
                        break;
                    }
                    Some(Ok(_)) => {
                        // Binary frames carry no commands; ping/pong is
                        // handled by the transport.
                    }
                    Some(Err(err)) => {
                        warn!("Client socket error: {}", err);
                        break;
                    }
                },
                upstream = gateway.next() => match upstream {
                    Some(Ok(GatewayMessage::Text(text))) => {
                        if core.on_gateway_text(&mut client, &text).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(GatewayMessage::Close(_))) | None => {
                        debug!("Gateway closed the relay connection");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        warn!("Gateway socket error: {}", err);
                        break;
                    }
                },
            }
        }

        close_pair(&mut client, &mut gateway).await;
        info!("Relay pair torn down");
    }
}

impl BridgeCore {
    /// Handle one frame from the browser. `Err` means the client leg is
    /// gone and the pair must close; malformed frames are dropped silently.
    async fn on_client_text(
        &mut self,
        client: &mut WebSocket,
        gateway: &mut GatewaySocket,
        text: &str,
    ) -> Result<()> {
        let frame: ClientFrame = match serde_json::from_str(text) {
            Ok(frame) => frame,
            Err(err) => {
                debug!("Dropping unparseable client frame: {}", err);
                return Ok(());
            }
        };

        if frame.is_history() {
            return self.on_history(client, frame.session_key).await;
        }
        self.on_chat(client, gateway, frame).await
    }

    /// Forward a chat message upstream under a fresh correlation id.
    async fn on_chat(
        &mut self,
        client: &mut WebSocket,
        gateway: &mut GatewaySocket,
        frame: ClientFrame,
    ) -> Result<()> {
        let Some(content) = frame.content else {
            debug!("Dropping chat frame without content");
            return Ok(());
        };
        let Some(agent_id) = frame.agent_id.or_else(|| self.connection_agent.clone()) else {
            debug!("Dropping chat frame without an agent id");
            return Ok(());
        };

        // New user message, new response correlation id. Supersedes any id
        // tied to a prior in-flight request on this connection.
        self.current_message_id = self.ids.generate();
        self.pending_activation = frame.session_key.clone();

        let request = ChatRequest {
            content: content.flat_text(),
            agent_id,
            session_key: frame.session_key,
        };
        let payload = match serde_json::to_string(&request) {
            Ok(payload) => payload,
            Err(err) => {
                warn!("Failed to serialize chat request: {}", err);
                return Ok(());
            }
        };

        if let Err(err) = gateway.send(GatewayMessage::Text(payload.into())).await {
            warn!("Failed to forward chat to gateway: {}", err);
            self.pending_activation = None;
            let frame = ServerFrame::Error {
                message: err.to_string(),
                message_id: self.current_message_id.clone(),
            };
            return self.send(client, &frame).await;
        }

        Ok(())
    }

    /// Answer a history request locally; never forwarded upstream, never an
    /// error payload.
    async fn on_history(
        &mut self,
        client: &mut WebSocket,
        session_key: Option<String>,
    ) -> Result<()> {
        let messages = match session_key {
            Some(key) => self.load_history(key).await,
            None => Vec::new(),
        };
        self.send(client, &ServerFrame::History { messages }).await
    }

    async fn load_history(&self, session_key: String) -> Vec<SessionMessage> {
        // A session that has not completed a gateway exchange has no
        // upstream log yet.
        match self.sessions.find_by_key(&session_key).await {
            Ok(Some(session)) if !session.activated => return Vec::new(),
            Ok(_) => {}
            Err(err) => warn!("Session lookup failed for history request: {:#}", err),
        }

        let location = self.history.clone();
        tokio::task::spawn_blocking(move || {
            history::read_session_history(&location.sessions_dir, &location.agent, &session_key)
        })
        .await
        .unwrap_or_default()
    }

    /// Handle one payload from the gateway stream. Unparseable or
    /// unrecognized payloads are discarded; they never crash the pair or
    /// reach the client malformed.
    async fn on_gateway_text(&mut self, client: &mut WebSocket, text: &str) -> Result<()> {
        let event: GatewayEvent = match serde_json::from_str(text) {
            Ok(event) => event,
            Err(err) => {
                debug!("Dropping unparseable gateway payload: {}", err);
                return Ok(());
            }
        };

        match event {
            GatewayEvent::Text { text } => {
                let frame = ServerFrame::Chunk {
                    content: text.unwrap_or_default(),
                    message_id: self.current_message_id.clone(),
                };
                self.send(client, &frame).await
            }
            GatewayEvent::Done => {
                let frame = ServerFrame::Done {
                    message_id: self.current_message_id.clone(),
                };
                self.send(client, &frame).await?;

                // First completed exchange for this session key flips the
                // activation flag; history lookups are allowed from here on.
                if let Some(key) = self.pending_activation.take() {
                    if let Err(err) = self.sessions.activate_by_key(&key).await {
                        warn!("Failed to mark session activated: {:#}", err);
                    }
                }
                Ok(())
            }
            GatewayEvent::Other => Ok(()),
        }
    }

    async fn send(&self, client: &mut WebSocket, frame: &ServerFrame) -> Result<()> {
        let json = match serde_json::to_string(frame) {
            Ok(json) => json,
            Err(err) => {
                warn!("Failed to serialize server frame: {}", err);
                return Ok(());
            }
        };
        client
            .send(Message::Text(json.into()))
            .await
            .map_err(|err| anyhow::anyhow!("client send failed: {err}"))
    }
}

/// The single teardown point for a relay pair.
async fn close_pair(client: &mut WebSocket, gateway: &mut GatewaySocket) {
    let _ = client.send(Message::Close(None)).await;
    let _ = gateway.close(None).await;
}
