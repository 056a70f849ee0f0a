//! Job search audit log: terms used, result count and a preview of the hits.

use crate::error::StorageError;
use crate::models::{JobSearchRecord, SearchPreviewEntry};
use crate::sqlite_pool::SqlitePoolManager;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

/// How many results are kept on the preview column.
const PREVIEW_LIMIT: usize = 5;

#[derive(Clone)]
pub struct SearchLogRepository {
    pool_manager: SqlitePoolManager,
}

impl SearchLogRepository {
    pub async fn new(pool_manager: SqlitePoolManager) -> Result<Self, StorageError> {
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS job_search_logs (
                id TEXT PRIMARY KEY,
                chat_id TEXT NOT NULL,
                search_term TEXT NOT NULL,
                results_count INTEGER NOT NULL DEFAULT 0,
                results_preview TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(self.pool_manager.pool())
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_job_search_logs_chat_id ON job_search_logs(chat_id)",
        )
        .execute(self.pool_manager.pool())
        .await?;

        Ok(())
    }

    /// Records one executed search. `terms` are joined with `", "`; only the
    /// first [`PREVIEW_LIMIT`] preview entries are kept.
    pub async fn record(
        &self,
        chat_id: &str,
        terms: &[String],
        results_count: i64,
        preview: &[SearchPreviewEntry],
    ) -> Result<(), StorageError> {
        let preview_json =
            serde_json::to_string(&preview[..preview.len().min(PREVIEW_LIMIT)])?;

        sqlx::query(
            r#"
            INSERT INTO job_search_logs (id, chat_id, search_term, results_count, results_preview, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(chat_id)
        .bind(terms.join(", "))
        .bind(results_count)
        .bind(preview_json)
        .bind(Utc::now())
        .execute(self.pool_manager.pool())
        .await?;

        debug!(chat_id = %chat_id, results_count, "Recorded job search");
        Ok(())
    }

    pub async fn recent_for_chat(
        &self,
        chat_id: &str,
        limit: i64,
    ) -> Result<Vec<JobSearchRecord>, StorageError> {
        let records = sqlx::query_as::<_, JobSearchRecord>(
            "SELECT * FROM job_search_logs WHERE chat_id = ? ORDER BY created_at DESC LIMIT ?",
        )
        .bind(chat_id)
        .bind(limit)
        .fetch_all(self.pool_manager.pool())
        .await?;
        Ok(records)
    }
}
