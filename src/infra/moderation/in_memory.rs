// In-memory implementation of ViolationStore.
//
// Violation counters are process-lifetime only: a restart forgets every
// warning. DashMap's entry API holds the shard lock for the whole
// read-modify-write, so two messages for the same key can never both see the
// same pre-increment count.

use crate::core::moderation::{ModerationError, ViolationKey, ViolationStore};
use async_trait::async_trait;
use dashmap::DashMap;

/// Maps (chat_id, user_id) -> warn_count. No entry means zero.
pub struct InMemoryViolationStore {
    counts: DashMap<ViolationKey, u32>,
}

impl InMemoryViolationStore {
    pub fn new() -> Self {
        Self {
            counts: DashMap::new(),
        }
    }
}

#[async_trait]
impl ViolationStore for InMemoryViolationStore {
    async fn increment(&self, key: ViolationKey) -> Result<u32, ModerationError> {
        let mut entry = self.counts.entry(key).or_insert(0);
        *entry = entry.saturating_add(1);
        Ok(*entry)
    }

    async fn get(&self, key: ViolationKey) -> Result<Option<u32>, ModerationError> {
        Ok(self.counts.get(&key).map(|entry| *entry))
    }

    async fn remove(&self, key: ViolationKey) -> Result<Option<u32>, ModerationError> {
        Ok(self.counts.remove(&key).map(|(_, count)| count))
    }
}

impl Default for InMemoryViolationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_absent_is_zero_state() {
        let store = InMemoryViolationStore::new();
        let key = ViolationKey::new(1, 2);

        assert_eq!(store.get(key).await.unwrap(), None);
        assert_eq!(store.increment(key).await.unwrap(), 1);
        assert_eq!(store.increment(key).await.unwrap(), 2);
        assert_eq!(store.remove(key).await.unwrap(), Some(2));
        assert_eq!(store.get(key).await.unwrap(), None);
        assert!(store.counts.is_empty());
    }

    #[tokio::test]
    async fn test_keys_are_per_chat() {
        let store = InMemoryViolationStore::new();

        store.increment(ViolationKey::new(1, 9)).await.unwrap();
        store.increment(ViolationKey::new(2, 9)).await.unwrap();

        assert_eq!(store.get(ViolationKey::new(1, 9)).await.unwrap(), Some(1));
        assert_eq!(store.get(ViolationKey::new(2, 9)).await.unwrap(), Some(1));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_increments_are_not_lost() {
        let store = Arc::new(InMemoryViolationStore::new());
        let key = ViolationKey::new(1, 2);

        let mut handles = Vec::new();
        for _ in 0..50 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move { store.increment(key).await.unwrap() }));
        }

        let mut seen = Vec::new();
        for handle in handles {
            seen.push(handle.await.unwrap());
        }
        seen.sort();

        assert_eq!(seen, (1..=50).collect::<Vec<u32>>());
    }
}
