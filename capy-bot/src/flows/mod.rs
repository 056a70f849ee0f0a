//! Conversation flows: authentication, job search, menu.
//!
//! Each flow implements [`capy_core::FlowHandler`] for the states it owns; the
//! router resolves the owning flow from the session state and never offers a
//! message to more than one flow.

mod authentication;
mod job_search;
mod menu;

pub use authentication::AuthenticationFlow;
pub use job_search::JobSearchFlow;
pub use menu::MenuFlow;

use capy_core::CapyError;

pub(crate) fn db_err(e: storage::StorageError) -> CapyError {
    CapyError::Database(e.to_string())
}

/// Parses a 1-based menu choice. `None` for anything non-numeric.
pub(crate) fn parse_choice(text: &str) -> Option<usize> {
    text.trim().parse::<usize>().ok()
}
