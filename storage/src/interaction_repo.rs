//! Interaction log: one row per sent and per received message.
//!
//! Writes are best-effort from the caller's point of view; the messenger and
//! router log a failure and move on rather than blocking a reply on audit.

use crate::error::StorageError;
use crate::models::InteractionRecord;
use crate::sqlite_pool::SqlitePoolManager;
use tracing::debug;

#[derive(Clone)]
pub struct InteractionRepository {
    pool_manager: SqlitePoolManager,
}

impl InteractionRepository {
    pub async fn new(pool_manager: SqlitePoolManager) -> Result<Self, StorageError> {
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS interaction_logs (
                id TEXT PRIMARY KEY,
                chat_id TEXT NOT NULL,
                content TEXT NOT NULL,
                direction TEXT NOT NULL,
                session_id TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(self.pool_manager.pool())
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_interaction_logs_chat_id ON interaction_logs(chat_id);
            CREATE INDEX IF NOT EXISTS idx_interaction_logs_created_at ON interaction_logs(created_at);
            "#,
        )
        .execute(self.pool_manager.pool())
        .await?;

        Ok(())
    }

    pub async fn save(&self, record: &InteractionRecord) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO interaction_logs (id, chat_id, content, direction, session_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.chat_id)
        .bind(&record.content)
        .bind(&record.direction)
        .bind(&record.session_id)
        .bind(record.created_at)
        .execute(self.pool_manager.pool())
        .await?;

        debug!(chat_id = %record.chat_id, direction = %record.direction, "Saved interaction");
        Ok(())
    }

    pub async fn recent_for_chat(
        &self,
        chat_id: &str,
        limit: i64,
    ) -> Result<Vec<InteractionRecord>, StorageError> {
        let records = sqlx::query_as::<_, InteractionRecord>(
            "SELECT * FROM interaction_logs WHERE chat_id = ? ORDER BY created_at DESC LIMIT ?",
        )
        .bind(chat_id)
        .bind(limit)
        .fetch_all(self.pool_manager.pool())
        .await?;
        Ok(records)
    }
}
