use std::sync::Arc;

use dashmap::DashMap;

/// A concurrent string-to-string map shared by every session.
///
/// Each call is atomic with respect to other calls on the same key, and a
/// completed `set` is visible to every later `get` from any thread.
/// Implementations must never block on I/O.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Inserts or overwrites unconditionally.
    fn set(&self, key: String, value: String);

    /// Removing an absent key is a no-op.
    fn delete(&self, key: &str);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub type SharedStore = Arc<dyn KeyValueStore>;

/// In-memory store backed by a sharded map, so traffic on different keys
/// mostly lands on different locks.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn shared(self) -> SharedStore {
        Arc::new(self)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        // Clone out so the shard guard is dropped before returning.
        self.entries.get(key).map(|value| value.value().clone())
    }

    fn set(&self, key: String, value: String) {
        self.entries.insert(key, value);
    }

    fn delete(&self, key: &str) {
        self.entries.remove(key);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
