//! Outbound WebSocket connection to the gateway.

use anyhow::{Context, Result};
use log::debug;
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// The upstream half of a relay pair.
pub type GatewaySocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Open a connection to the gateway's chat endpoint.
pub async fn connect(ws_url: &str) -> Result<GatewaySocket> {
    debug!("Connecting to gateway at {}", ws_url);
    let (socket, _) = connect_async(ws_url)
        .await
        .with_context(|| format!("connecting to gateway at {ws_url}"))?;
    Ok(socket)
}
