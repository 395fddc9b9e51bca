//! Skiff backend library.
//!
//! Bridges browser chat clients to an agent gateway over WebSockets and
//! keeps per-(user, agent) conversation continuity in SQLite.

pub mod api;
pub mod auth;
pub mod db;
pub mod gateway;
pub mod history;
pub mod ids;
pub mod session;
pub mod settings;
pub mod ws;
