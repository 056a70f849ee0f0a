//! Configurable bot texts: per-key overrides for the built-in messages.
//!
//! A missing or blank override falls back to the caller's default; a lookup
//! failure must never break the conversation, so callers treat errors as
//! "no override".

use crate::error::StorageError;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct BotTextRepository {
    pool_manager: SqlitePoolManager,
}

impl BotTextRepository {
    pub async fn new(pool_manager: SqlitePoolManager) -> Result<Self, StorageError> {
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS bot_texts (
                key TEXT PRIMARY KEY,
                text TEXT NOT NULL
            )
            "#,
        )
        .execute(self.pool_manager.pool())
        .await?;
        Ok(())
    }

    /// Returns the override for `key`, if one is configured and non-blank.
    pub async fn find(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT text FROM bot_texts WHERE key = ?")
            .bind(key)
            .fetch_optional(self.pool_manager.pool())
            .await?;
        Ok(row.map(|(text,)| text).filter(|t| !t.trim().is_empty()))
    }

    pub async fn upsert(&self, key: &str, text: &str) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO bot_texts (key, text) VALUES (?, ?) ON CONFLICT(key) DO UPDATE SET text = excluded.text",
        )
        .bind(key)
        .bind(text)
        .execute(self.pool_manager.pool())
        .await?;
        Ok(())
    }
}
