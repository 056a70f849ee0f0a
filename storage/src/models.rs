//! Row models for the storage repositories.
//!
//! All structs map 1:1 to a table and derive `sqlx::FromRow`; constructors fill
//! generated ids and timestamps the way repositories expect them.

use capy_core::MessageDirection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A course offered in the selection menu. Only `is_active` courses are shown,
/// ordered by `(display_order, name)`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
    pub display_order: i64,
    pub created_at: DateTime<Utc>,
}

/// A search term attached to a course. Default terms feed both the selection
/// menu and the "search all" aggregate, ordered by `(priority DESC, term)`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SearchTerm {
    pub id: i64,
    pub course_id: i64,
    pub term: String,
    pub is_default: bool,
    pub priority: i64,
    pub created_at: DateTime<Utc>,
}

/// One sent or received message, kept for audit.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct InteractionRecord {
    pub id: String,
    pub chat_id: String,
    pub content: String,
    pub direction: String,
    pub session_id: String,
    pub created_at: DateTime<Utc>,
}

impl InteractionRecord {
    /// Creates a record with a generated UUID and current timestamp.
    pub fn new(
        chat_id: impl Into<String>,
        content: impl Into<String>,
        direction: MessageDirection,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            chat_id: chat_id.into(),
            content: content.into(),
            direction: direction.as_str().to_string(),
            session_id: session_id.into(),
            created_at: Utc::now(),
        }
    }
}

/// Preview of a single job result stored on a search log row (first 5 only).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchPreviewEntry {
    pub title: String,
    pub company: String,
    pub url: String,
}

/// One executed job search: joined terms, result count and a JSON preview.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct JobSearchRecord {
    pub id: String,
    pub chat_id: String,
    pub search_term: String,
    pub results_count: i64,
    pub results_preview: String,
    pub created_at: DateTime<Utc>,
}

impl JobSearchRecord {
    /// Decodes the preview column; corrupt rows read as an empty preview.
    pub fn preview(&self) -> Vec<SearchPreviewEntry> {
        serde_json::from_str(&self.results_preview).unwrap_or_default()
    }
}
