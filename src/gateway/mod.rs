//! Agent gateway client.
//!
//! The gateway owns the actual language-model conversation and its durable
//! event log; this module covers the outbound WebSocket leg and the wire
//! shapes exchanged on it.

mod client;
mod types;

pub use client::{connect, GatewaySocket};
pub use types::{ChatRequest, GatewayEvent};
