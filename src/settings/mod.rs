//! Application settings store.
//!
//! A plain key/value table; values flagged `encrypted` are stored as the
//! ciphertext produced by the (out of scope) key-management layer.

use anyhow::{Context, Result};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

/// One settings row.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Setting {
    pub key: String,
    pub value: String,
    pub encrypted: bool,
}

/// Repository for application settings.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    /// Create a new repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a setting value, or None when the key is absent.
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let value: Option<(String,)> =
            sqlx::query_as("SELECT value FROM settings WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await
                .context("fetching setting")?;

        Ok(value.map(|(v,)| v))
    }

    /// Upsert a setting.
    pub async fn set(&self, key: &str, value: &str, encrypted: bool) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO settings (key, value, encrypted)
            VALUES (?, ?, ?)
            ON CONFLICT (key) DO UPDATE SET value = excluded.value, encrypted = excluded.encrypted
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(encrypted)
        .execute(&self.pool)
        .await
        .context("storing setting")?;

        Ok(())
    }

    /// List all settings.
    pub async fn all(&self) -> Result<Vec<Setting>> {
        let settings = sqlx::query_as::<_, Setting>(
            "SELECT key, value, encrypted FROM settings ORDER BY key",
        )
        .fetch_all(&self.pool)
        .await
        .context("listing settings")?;

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    async fn repo() -> SettingsRepository {
        let db = Database::in_memory().await.unwrap();
        SettingsRepository::new(db.pool().clone())
    }

    #[tokio::test]
    async fn get_missing_key_returns_none() {
        let repo = repo().await;
        assert_eq!(repo.get("default_provider").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let repo = repo().await;

        repo.set("default_provider", "anthropic", false).await.unwrap();
        assert_eq!(
            repo.get("default_provider").await.unwrap().as_deref(),
            Some("anthropic")
        );
    }

    #[tokio::test]
    async fn set_overwrites_existing_value() {
        let repo = repo().await;

        repo.set("greeting_pending", "true", false).await.unwrap();
        repo.set("greeting_pending", "false", false).await.unwrap();

        assert_eq!(
            repo.get("greeting_pending").await.unwrap().as_deref(),
            Some("false")
        );
        assert_eq!(repo.all().await.unwrap().len(), 1);
    }
}
