//! Per-client session state
//!
//! Each browser holds one opaque token and the server keeps a single slot
//! per token: the last successfully resolved city name. The chat gateway
//! reads it; the weather endpoint overwrites it on every successful lookup.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

/// Storage seam for the last-city slot.
///
/// The handlers only need get/set, so any external store (signed cookie,
/// server-side cache) can back this without touching the core logic.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, token: &str) -> Option<String>;
    async fn set(&self, token: &str, city: &str);
}

/// In-memory store. State does not survive a restart.
#[derive(Default)]
pub struct MemorySessionStore {
    slots: RwLock<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, token: &str) -> Option<String> {
        self.slots.read().await.get(token).cloned()
    }

    async fn set(&self, token: &str, city: &str) {
        self.slots
            .write()
            .await
            .insert(token.to_string(), city.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() {
        tokio_test::block_on(async {
            let store = MemorySessionStore::new();
            assert_eq!(store.get("tok-1").await, None);

            store.set("tok-1", "Paris").await;
            assert_eq!(store.get("tok-1").await, Some("Paris".to_string()));

            // Last write wins
            store.set("tok-1", "London").await;
            assert_eq!(store.get("tok-1").await, Some("London".to_string()));
        });
    }

    #[test]
    fn test_tokens_are_isolated() {
        tokio_test::block_on(async {
            let store = MemorySessionStore::new();
            store.set("a", "Tokyo").await;
            assert_eq!(store.get("b").await, None);
        });
    }
}
