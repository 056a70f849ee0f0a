//! Per-chat serialization.
//!
//! Inbound messages for a single chat id must never interleave: two racing
//! deliveries could both read `awaiting_password` and consume the same scratch
//! RA. The router acquires the chat's lock for the whole handling sequence;
//! different chats proceed in parallel.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Default)]
pub struct ChatLocks {
    inner: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ChatLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for `chat_id`, creating it on first contact.
    /// The guard must be held until the message is fully processed.
    pub async fn acquire(&self, chat_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut registry = self.inner.lock().await;
            registry
                .entry(chat_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_chat_is_serialized() {
        let locks = Arc::new(ChatLocks::new());
        let in_flight = Arc::new(AtomicUsize::new(0));
        let mut tasks = Vec::new();

        for _ in 0..8 {
            let locks = locks.clone();
            let in_flight = in_flight.clone();
            tasks.push(tokio::spawn(async move {
                let _guard = locks.acquire("555@c.us").await;
                assert_eq!(in_flight.fetch_add(1, Ordering::SeqCst), 0);
                tokio::time::sleep(Duration::from_millis(5)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }));
        }

        for task in tasks {
            task.await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_different_chats_do_not_block_each_other() {
        let locks = ChatLocks::new();
        let _a = locks.acquire("a@c.us").await;
        // Must not deadlock waiting on chat a's guard.
        let _b = locks.acquire("b@c.us").await;
    }
}
