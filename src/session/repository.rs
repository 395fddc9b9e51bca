//! Chat session database repository.

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use super::models::ChatSession;

/// Repository for chat session persistence.
#[derive(Debug, Clone)]
pub struct ChatSessionRepository {
    pool: SqlitePool,
}

impl ChatSessionRepository {
    /// Create a new repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the most recently created session for a (user, agent) pair.
    pub async fn find_most_recent(
        &self,
        user_id: &str,
        agent_id: &str,
    ) -> Result<Option<ChatSession>> {
        let session = sqlx::query_as::<_, ChatSession>(
            r#"
            SELECT id, session_key, user_id, agent_id, activated, created_at
            FROM chat_sessions
            WHERE user_id = ? AND agent_id = ?
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(agent_id)
        .fetch_optional(&self.pool)
        .await
        .context("fetching chat session")?;

        Ok(session)
    }

    /// Look up a session by its opaque key.
    pub async fn find_by_key(&self, session_key: &str) -> Result<Option<ChatSession>> {
        let session = sqlx::query_as::<_, ChatSession>(
            r#"
            SELECT id, session_key, user_id, agent_id, activated, created_at
            FROM chat_sessions
            WHERE session_key = ?
            "#,
        )
        .bind(session_key)
        .fetch_optional(&self.pool)
        .await
        .context("fetching chat session by key")?;

        Ok(session)
    }

    /// Insert a new session. Returns false when another row for the same
    /// (user, agent) pair already exists; the unique index absorbs the
    /// concurrent-first-call race.
    pub async fn insert(&self, session: &ChatSession) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO chat_sessions (id, session_key, user_id, agent_id, activated, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT (user_id, agent_id) DO NOTHING
            "#,
        )
        .bind(&session.id)
        .bind(&session.session_key)
        .bind(&session.user_id)
        .bind(&session.agent_id)
        .bind(session.activated)
        .bind(&session.created_at)
        .execute(&self.pool)
        .await
        .context("creating chat session")?;

        Ok(result.rows_affected() > 0)
    }

    /// Flip the activation flag. One-way false -> true.
    pub async fn mark_activated(&self, id: &str) -> Result<()> {
        sqlx::query("UPDATE chat_sessions SET activated = 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("marking chat session activated")?;

        Ok(())
    }
}
