//! HTTP API module.
//!
//! REST endpoints for session bootstrap and settings, plus the WebSocket
//! entry point into the relay.

mod error;
mod handlers;
mod routes;
mod state;

pub use error::{ApiError, ApiResult, ErrorResponse};
pub use routes::create_router;
pub use state::{AppState, GatewayOptions};
