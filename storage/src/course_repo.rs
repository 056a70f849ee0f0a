//! Course repository: the two reference-data query shapes the flows depend on.
//!
//! Reference data is read-mostly; CRUD beyond the insert helpers lives in an
//! external admin surface, not here.

use crate::error::StorageError;
use crate::models::{Course, SearchTerm};
use crate::sqlite_pool::SqlitePoolManager;
use chrono::Utc;

#[derive(Clone)]
pub struct CourseRepository {
    pool_manager: SqlitePoolManager,
}

impl CourseRepository {
    pub async fn new(pool_manager: SqlitePoolManager) -> Result<Self, StorageError> {
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS courses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1,
                display_order INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(self.pool_manager.pool())
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS search_terms (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                course_id INTEGER NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
                term TEXT NOT NULL,
                is_default INTEGER NOT NULL DEFAULT 1,
                priority INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                UNIQUE(course_id, term)
            )
            "#,
        )
        .execute(self.pool_manager.pool())
        .await?;

        Ok(())
    }

    /// Active courses in menu order: `(display_order, name)`.
    pub async fn active_courses(&self) -> Result<Vec<Course>, StorageError> {
        let courses = sqlx::query_as::<_, Course>(
            "SELECT * FROM courses WHERE is_active = 1 ORDER BY display_order, name",
        )
        .fetch_all(self.pool_manager.pool())
        .await?;
        Ok(courses)
    }

    /// Default search terms of a course in menu order: `(priority DESC, term)`.
    pub async fn default_terms(&self, course_id: i64) -> Result<Vec<SearchTerm>, StorageError> {
        let terms = sqlx::query_as::<_, SearchTerm>(
            "SELECT * FROM search_terms WHERE course_id = ? AND is_default = 1 ORDER BY priority DESC, term",
        )
        .bind(course_id)
        .fetch_all(self.pool_manager.pool())
        .await?;
        Ok(terms)
    }

    pub async fn find_course(&self, id: i64) -> Result<Option<Course>, StorageError> {
        let course = sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool_manager.pool())
            .await?;
        Ok(course)
    }

    pub async fn find_term(&self, id: i64) -> Result<Option<SearchTerm>, StorageError> {
        let term = sqlx::query_as::<_, SearchTerm>("SELECT * FROM search_terms WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool_manager.pool())
            .await?;
        Ok(term)
    }

    pub async fn insert_course(
        &self,
        name: &str,
        display_order: i64,
        is_active: bool,
    ) -> Result<i64, StorageError> {
        let result = sqlx::query(
            "INSERT INTO courses (name, is_active, display_order, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(name)
        .bind(is_active)
        .bind(display_order)
        .bind(Utc::now())
        .execute(self.pool_manager.pool())
        .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn insert_term(
        &self,
        course_id: i64,
        term: &str,
        priority: i64,
        is_default: bool,
    ) -> Result<i64, StorageError> {
        let result = sqlx::query(
            "INSERT INTO search_terms (course_id, term, is_default, priority, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(course_id)
        .bind(term)
        .bind(is_default)
        .bind(priority)
        .bind(Utc::now())
        .execute(self.pool_manager.pool())
        .await?;
        Ok(result.last_insert_rowid())
    }
}
