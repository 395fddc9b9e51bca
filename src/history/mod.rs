//! Transcript reconstruction from the gateway's session logs.
//!
//! The gateway appends every conversation event to a newline-delimited JSON
//! log named after its own internal session identifier. An index document
//! (`sessions.json`) maps `agent:<name>:<sessionKey>` composite keys to that
//! identifier. Reconstruction is read-only, recomputed per request, and
//! never surfaces an error: every failure mode degrades to an empty
//! transcript.

use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Session keys double as log file name components, so anything that is not
/// a plain UUID shape is rejected before the filesystem is touched.
static SESSION_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("session key regex")
});

/// The gateway injects a wall-clock stamp like "[Fri 2026-02-20 21:30 UTC] "
/// in front of user messages.
static LEADING_BRACKET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[[^\]]*\]\s*").expect("bracket prefix regex"));

/// Message role in a reconstructed transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One displayable transcript entry. Derived from the log on each request,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMessage {
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LogEntry {
    #[serde(rename = "type")]
    kind: Option<String>,
    timestamp: Option<String>,
    message: Option<LogMessage>,
}

#[derive(Debug, Deserialize)]
struct LogMessage {
    role: Option<String>,
    #[serde(default)]
    content: Vec<LogContentPart>,
}

#[derive(Debug, Deserialize)]
struct LogContentPart {
    #[serde(rename = "type", default)]
    kind: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IndexEntry {
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
}

/// Resolve the gateway's internal session identifier for a session key.
///
/// The JSONL log is named after the internal id, not the key the browser
/// holds. A missing or unparseable index, or a key with no entry, falls
/// back to the key itself.
fn resolve_log_id(sessions_dir: &Path, agent: &str, session_key: &str) -> String {
    let index_path = sessions_dir.join("sessions.json");
    let raw = match std::fs::read_to_string(&index_path) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::debug!("session index unreadable at {:?}: {}", index_path, err);
            return session_key.to_string();
        }
    };

    let index: HashMap<String, IndexEntry> = match serde_json::from_str(&raw) {
        Ok(index) => index,
        Err(err) => {
            tracing::debug!("session index unparseable at {:?}: {}", index_path, err);
            return session_key.to_string();
        }
    };

    index
        .get(&format!("agent:{agent}:{session_key}"))
        .and_then(|entry| entry.session_id.clone())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| session_key.to_string())
}

/// Rebuild the displayable transcript for a session key.
///
/// Returns the surviving `user`/`assistant` messages in original log order;
/// any failure yields an empty transcript instead of an error.
pub fn read_session_history(
    sessions_dir: &Path,
    agent: &str,
    session_key: &str,
) -> Vec<SessionMessage> {
    if !SESSION_KEY_RE.is_match(session_key) {
        return Vec::new();
    }

    let file_id = resolve_log_id(sessions_dir, agent, session_key);
    let log_path = sessions_dir.join(format!("{file_id}.jsonl"));

    let content = match std::fs::read_to_string(&log_path) {
        Ok(content) => content,
        Err(err) => {
            tracing::debug!("session log unreadable at {:?}: {}", log_path, err);
            return Vec::new();
        }
    };

    let mut messages = Vec::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let entry: LogEntry = match serde_json::from_str(line) {
            Ok(entry) => entry,
            Err(_) => continue,
        };

        if entry.kind.as_deref() != Some("message") {
            continue;
        }
        let Some(message) = entry.message else {
            continue;
        };

        let role = match message.role.as_deref() {
            Some("user") => Role::User,
            Some("assistant") => Role::Assistant,
            // Tool results, reasoning, and system entries stay out of the
            // transcript.
            _ => continue,
        };

        let text_parts: Vec<&str> = message
            .content
            .iter()
            .filter(|part| part.kind == "text")
            .filter_map(|part| part.text.as_deref())
            .filter(|text| !text.is_empty())
            .collect();

        let mut text = text_parts.join(" ");
        if text.is_empty() {
            continue;
        }

        // Strip the injected wall-clock stamp from user messages only;
        // brackets in assistant text are meaningful.
        if role == Role::User {
            text = LEADING_BRACKET_RE.replace(&text, "").into_owned();
        }

        messages.push(SessionMessage {
            role,
            content: text,
            timestamp: entry.timestamp,
        });
    }

    messages
}
