//! Flow handler capability: one owning handler per conversation state.

use crate::error::Result;
use crate::types::{FlowOutcome, UserSession};
use async_trait::async_trait;

/// A bounded multi-step conversation (login, course/term selection).
///
/// The router resolves the owning handler from `current_state` and offers the
/// message via `try_handle`. A handler returns `NotApplicable` instead of
/// guessing when the session state is not one it owns.
#[async_trait]
pub trait FlowHandler: Send + Sync {
    /// Attempts to consume `text` for the session's current state.
    ///
    /// `text` is trimmed but keeps its original case; handlers that match
    /// tokens (RA, menu indexes) normalize locally, password input is used
    /// as typed.
    async fn try_handle(&self, session: &mut UserSession, text: &str) -> Result<FlowOutcome>;
}
