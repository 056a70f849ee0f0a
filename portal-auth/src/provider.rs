//! Authentication provider contract.

use async_trait::async_trait;
use capy_core::Result;

/// Validates portal credentials and binds them to a chat identity.
///
/// `link` assumes a prior successful `authenticate` for the same pair; calling
/// it without one is the caller's mistake. `logout` is idempotent.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Checks a credential pair against the portal. `Ok(false)` is a rejection;
    /// `Err` is a provider failure the caller downgrades to a rejection.
    async fn authenticate(&self, ra: &str, password: &str) -> Result<bool>;

    /// Stores the academic id and (encrypted) password for the chat.
    async fn link(&self, chat_id: &str, ra: &str, password: &str) -> Result<()>;

    /// Unbinds the chat. Returns whether a linked session existed.
    async fn logout(&self, chat_id: &str) -> Result<bool>;
}
