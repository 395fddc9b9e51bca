//! Chat session continuity.
//!
//! Correlates one user with one agent through a durable session row whose
//! opaque key lets the gateway resume the same conversation across
//! reconnects.

mod models;
mod repository;
mod service;

pub use models::ChatSession;
pub use repository::ChatSessionRepository;
pub use service::SessionService;
