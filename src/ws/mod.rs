//! Chat relay over WebSockets.
//!
//! Each browser connection gets its own [`RelayBridge`]: a pair of sockets
//! (client leg and gateway leg) owned exclusively by one bridge instance.
//! The bridge frame-translates between the two, answers history requests
//! locally, and tears the pair down together when either side closes or
//! errors. Bridges are fully independent; there is no cross-connection
//! state beyond the durable stores.

mod bridge;
mod handler;
mod types;

pub use bridge::{HistoryLocation, RelayBridge};
pub use handler::ws_handler;
pub use types::{ClientFrame, ContentPart, MessageContent, ServerFrame};
