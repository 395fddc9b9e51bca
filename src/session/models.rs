//! Chat session data model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A durable record correlating one user with one agent.
///
/// At most one row per (user, agent) pair is treated as current; the
/// subsystem never closes or rotates a session, so in steady state the same
/// row is reused indefinitely once created.
///
/// The session key is an opaque random token presented by the browser over
/// the relay socket. It is distinct from the gateway's own internal session
/// identifier and is only ever serialized into responses addressed to the
/// owning user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    /// Unique row id.
    pub id: String,
    /// Opaque continuation token handed to the session owner.
    pub session_key: String,
    /// User who owns this session.
    pub user_id: String,
    /// Agent the session converses with.
    pub agent_id: String,
    /// Flipped once, after the first successful gateway exchange. Gates
    /// whether history lookups are attempted for this session.
    pub activated: bool,
    /// When the session was created (RFC 3339).
    pub created_at: String,
}
