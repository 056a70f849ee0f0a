//! Gateway abstraction for the outbound messaging transport.

use crate::error::Result;
use async_trait::async_trait;

/// Abstraction over the messaging gateway (WAHA in production, mocks in tests).
///
/// Send failures are surfaced as errors so callers can log them; the core never
/// retries a failed send and never rolls back session state because of one.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Sends a text message to the given chat.
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<()>;

    /// Gateway session name, recorded on interaction log entries.
    fn session_name(&self) -> &str;

    /// Raw session status as reported by the gateway (e.g. `WORKING`).
    async fn session_status(&self) -> Result<String>;
}
