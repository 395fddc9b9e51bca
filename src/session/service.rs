//! Chat session continuity service.

use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;

use crate::ids::IdGenerator;

use super::models::ChatSession;
use super::repository::ChatSessionRepository;

/// Issues and reuses opaque session keys per (user, agent) pair.
#[derive(Clone)]
pub struct SessionService {
    repo: ChatSessionRepository,
    ids: Arc<dyn IdGenerator>,
}

impl SessionService {
    /// Create a new service.
    pub fn new(repo: ChatSessionRepository, ids: Arc<dyn IdGenerator>) -> Self {
        Self { repo, ids }
    }

    /// Get the most recent session for a (user, agent) pair, or create one.
    ///
    /// An existing row is returned unchanged. A fresh row starts with
    /// `activated = false` and a newly generated key. When a concurrent
    /// first-time call wins the insert, the row it created is returned
    /// instead of the one built here.
    pub async fn get_or_create(&self, user_id: &str, agent_id: &str) -> Result<ChatSession> {
        if let Some(existing) = self.repo.find_most_recent(user_id, agent_id).await? {
            return Ok(existing);
        }

        let session = ChatSession {
            id: self.ids.generate(),
            session_key: self.ids.generate(),
            user_id: user_id.to_string(),
            agent_id: agent_id.to_string(),
            activated: false,
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        if self.repo.insert(&session).await? {
            info!(
                "Created chat session {} for user {} agent {}",
                session.id, user_id, agent_id
            );
            return Ok(session);
        }

        // Lost the insert race; the winner's row is the current one.
        self.repo
            .find_most_recent(user_id, agent_id)
            .await?
            .context("chat session insert conflicted but no row found")
    }

    /// Look up a session by its opaque key.
    pub async fn find_by_key(&self, session_key: &str) -> Result<Option<ChatSession>> {
        self.repo.find_by_key(session_key).await
    }

    /// Mark the session owning this key as activated, after the first
    /// successful gateway exchange. No-op for unknown keys and for
    /// sessions already activated.
    pub async fn activate_by_key(&self, session_key: &str) -> Result<()> {
        if let Some(session) = self.repo.find_by_key(session_key).await? {
            if !session.activated {
                self.repo.mark_activated(&session.id).await?;
                info!("Chat session {} activated", session.id);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::ids::SequentialIds;

    async fn service() -> SessionService {
        let db = Database::in_memory().await.unwrap();
        let repo = ChatSessionRepository::new(db.pool().clone());
        SessionService::new(repo, Arc::new(SequentialIds::new()))
    }

    #[tokio::test]
    async fn creates_session_on_first_call() {
        let svc = service().await;

        let session = svc.get_or_create("u1", "a1").await.unwrap();

        assert_eq!(session.user_id, "u1");
        assert_eq!(session.agent_id, "a1");
        assert!(!session.activated);
        assert!(!session.session_key.is_empty());
    }

    #[tokio::test]
    async fn second_call_returns_first_row_without_insert() {
        let svc = service().await;

        let first = svc.get_or_create("u1", "a1").await.unwrap();
        let second = svc.get_or_create("u1", "a1").await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.session_key, second.session_key);
    }

    #[tokio::test]
    async fn distinct_pairs_get_distinct_keys() {
        let svc = service().await;

        let a = svc.get_or_create("u1", "a1").await.unwrap();
        let b = svc.get_or_create("u1", "a2").await.unwrap();
        let c = svc.get_or_create("u2", "a1").await.unwrap();

        assert_ne!(a.session_key, b.session_key);
        assert_ne!(a.session_key, c.session_key);
    }

    #[tokio::test]
    async fn activation_flips_once_and_sticks() {
        let svc = service().await;

        let session = svc.get_or_create("u1", "a1").await.unwrap();
        svc.activate_by_key(&session.session_key).await.unwrap();

        let reloaded = svc.get_or_create("u1", "a1").await.unwrap();
        assert!(reloaded.activated);

        // Repeat activation is a no-op, not an error.
        svc.activate_by_key(&session.session_key).await.unwrap();
        let again = svc.get_or_create("u1", "a1").await.unwrap();
        assert!(again.activated);
    }

    #[tokio::test]
    async fn activation_for_unknown_key_is_a_noop() {
        let svc = service().await;

        svc.activate_by_key("no-such-key").await.unwrap();
    }

    #[tokio::test]
    async fn find_by_key_round_trips() {
        let svc = service().await;

        let session = svc.get_or_create("u1", "a1").await.unwrap();
        let found = svc.find_by_key(&session.session_key).await.unwrap();

        assert_eq!(found.unwrap().id, session.id);
        assert!(svc.find_by_key("missing").await.unwrap().is_none());
    }
}
