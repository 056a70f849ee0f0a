//! Session repository: one persisted `UserSession` per chat identifier.
//!
//! Every write touches only the columns the caller intends to change plus
//! `last_activity`; there is no whole-row save, so two handlers racing on
//! different fields cannot clobber each other. The router additionally holds a
//! per-chat lock, so for a single chat id reads always observe prior writes.

use capy_core::{FlowState, UserSession};
use chrono::{DateTime, Utc};
use sqlx::Row;
use tracing::{info, warn};

use crate::error::StorageError;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct SessionRepository {
    pool_manager: SqlitePoolManager,
}

impl SessionRepository {
    pub async fn new(pool_manager: SqlitePoolManager) -> Result<Self, StorageError> {
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                chat_id TEXT PRIMARY KEY,
                ra TEXT,
                portal_password TEXT,
                is_authenticated INTEGER NOT NULL DEFAULT 0,
                current_state TEXT,
                selected_course_id INTEGER,
                selected_term_id INTEGER,
                flow_scratch TEXT NOT NULL DEFAULT '{}',
                last_activity TEXT NOT NULL
            )
            "#,
        )
        .execute(self.pool_manager.pool())
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_sessions_last_activity ON sessions(last_activity)",
        )
        .execute(self.pool_manager.pool())
        .await?;

        Ok(())
    }

    /// Loads the session for `chat_id`, creating a fresh unauthenticated one
    /// on first contact. Returns `(session, created)`.
    pub async fn get_or_create(&self, chat_id: &str) -> Result<(UserSession, bool), StorageError> {
        if let Some(session) = self.find(chat_id).await? {
            return Ok((session, false));
        }

        let session = UserSession::new(chat_id);
        sqlx::query(
            r#"
            INSERT INTO sessions (chat_id, is_authenticated, flow_scratch, last_activity)
            VALUES (?, 0, '{}', ?)
            "#,
        )
        .bind(&session.chat_id)
        .bind(session.last_activity)
        .execute(self.pool_manager.pool())
        .await?;

        info!(chat_id = %chat_id, "Created session");
        Ok((session, true))
    }

    pub async fn find(&self, chat_id: &str) -> Result<Option<UserSession>, StorageError> {
        let row = sqlx::query("SELECT * FROM sessions WHERE chat_id = ?")
            .bind(chat_id)
            .fetch_optional(self.pool_manager.pool())
            .await?;

        Ok(row.map(|row| {
            let state: Option<String> = row.get("current_state");
            let scratch_json: String = row.get("flow_scratch");
            let flow_scratch = serde_json::from_str(&scratch_json).unwrap_or_else(|e| {
                warn!(chat_id = %chat_id, error = %e, "Unreadable flow_scratch, starting empty");
                Default::default()
            });
            let last_activity: DateTime<Utc> = row.get("last_activity");

            UserSession {
                chat_id: row.get("chat_id"),
                ra: row.get("ra"),
                is_authenticated: row.get("is_authenticated"),
                current_state: FlowState::from_column(state.as_deref()),
                selected_course_id: row.get("selected_course_id"),
                selected_term_id: row.get("selected_term_id"),
                flow_scratch,
                last_activity,
            }
        }))
    }

    /// Persists the session's `current_state` and `flow_scratch` only.
    pub async fn update_flow(&self, session: &UserSession) -> Result<(), StorageError> {
        let scratch = serde_json::to_string(&session.flow_scratch)?;
        sqlx::query(
            r#"
            UPDATE sessions
            SET current_state = ?, flow_scratch = ?, last_activity = ?
            WHERE chat_id = ?
            "#,
        )
        .bind(session.current_state.as_column())
        .bind(scratch)
        .bind(Utc::now())
        .bind(&session.chat_id)
        .execute(self.pool_manager.pool())
        .await?;
        Ok(())
    }

    pub async fn set_selected_course(
        &self,
        chat_id: &str,
        course_id: i64,
    ) -> Result<(), StorageError> {
        sqlx::query("UPDATE sessions SET selected_course_id = ?, last_activity = ? WHERE chat_id = ?")
            .bind(course_id)
            .bind(Utc::now())
            .bind(chat_id)
            .execute(self.pool_manager.pool())
            .await?;
        Ok(())
    }

    pub async fn set_selected_term(&self, chat_id: &str, term_id: i64) -> Result<(), StorageError> {
        sqlx::query("UPDATE sessions SET selected_term_id = ?, last_activity = ? WHERE chat_id = ?")
            .bind(term_id)
            .bind(Utc::now())
            .bind(chat_id)
            .execute(self.pool_manager.pool())
            .await?;
        Ok(())
    }

    /// Binds the academic id and encrypted portal password after a successful
    /// authentication. Creates the row if the chat was never seen (the provider
    /// may be called out of band).
    pub async fn mark_authenticated(
        &self,
        chat_id: &str,
        ra: &str,
        encrypted_password: &str,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (chat_id, ra, portal_password, is_authenticated, flow_scratch, last_activity)
            VALUES (?, ?, ?, 1, '{}', ?)
            ON CONFLICT(chat_id) DO UPDATE SET
                ra = excluded.ra,
                portal_password = excluded.portal_password,
                is_authenticated = 1,
                last_activity = excluded.last_activity
            "#,
        )
        .bind(chat_id)
        .bind(ra)
        .bind(encrypted_password)
        .bind(Utc::now())
        .execute(self.pool_manager.pool())
        .await?;

        info!(chat_id = %chat_id, ra = %ra, "Session authenticated");
        Ok(())
    }

    /// Clears authentication, stored credentials, course/term selection and any
    /// in-flight flow. The RA itself is retained. Returns whether a session
    /// row existed; logging out an unknown chat is not an error.
    pub async fn apply_logout(&self, chat_id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query(
            r#"
            UPDATE sessions
            SET is_authenticated = 0,
                portal_password = NULL,
                selected_course_id = NULL,
                selected_term_id = NULL,
                current_state = NULL,
                flow_scratch = '{}',
                last_activity = ?
            WHERE chat_id = ?
            "#,
        )
        .bind(Utc::now())
        .bind(chat_id)
        .execute(self.pool_manager.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Bumps `last_activity` for every processed message.
    pub async fn touch(&self, chat_id: &str) -> Result<(), StorageError> {
        sqlx::query("UPDATE sessions SET last_activity = ? WHERE chat_id = ?")
            .bind(Utc::now())
            .bind(chat_id)
            .execute(self.pool_manager.pool())
            .await?;
        Ok(())
    }
}
