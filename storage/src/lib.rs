//! Storage crate: SQLite persistence for sessions, reference data and audit logs.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – Course, SearchTerm, InteractionRecord, JobSearchRecord, SearchPreviewEntry
//! - [`session_repo`] – SessionRepository (per-chat UserSession, field-scoped updates)
//! - [`course_repo`] – CourseRepository (active courses / default search terms)
//! - [`interaction_repo`] – InteractionRepository (sent/received message log)
//! - [`search_log_repo`] – SearchLogRepository (job search audit)
//! - [`bot_text_repo`] – BotTextRepository (configurable message overrides)
//! - [`sqlite_pool`] – SqlitePoolManager

mod bot_text_repo;
mod course_repo;
mod error;
mod interaction_repo;
mod models;
mod search_log_repo;
mod session_repo;
mod sqlite_pool;

#[cfg(test)]
mod course_repo_test;

pub use bot_text_repo::BotTextRepository;
pub use course_repo::CourseRepository;
pub use error::StorageError;
pub use interaction_repo::InteractionRepository;
pub use models::{Course, InteractionRecord, JobSearchRecord, SearchPreviewEntry, SearchTerm};
pub use search_log_repo::SearchLogRepository;
pub use session_repo::SessionRepository;
pub use sqlite_pool::SqlitePoolManager;
