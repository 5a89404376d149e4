//! Time-expiring key-value store interface and in-process implementation.
//!
//! The send guard and the settings cache both sit on this interface. A
//! deployment typically backs it with Redis; [`MemoryCache`] covers single
//! process setups and tests.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use thiserror::Error;

/// Cache access errors.
#[derive(Error, Debug, Clone)]
pub enum CacheError {
    /// The backing store could not be reached.
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
    /// The backing store failed the operation.
    #[error("cache operation failed: {0}")]
    Operation(String),
}

/// Narrow contract for a time-expiring key-value store.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Whether the backing store is currently reachable.
    async fn is_available(&self) -> bool;

    /// Get a value; `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Set a value with a time-to-live.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;
}

/// Entry in the in-process cache.
#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// In-process TTL cache.
///
/// Entries expire lazily on read and are swept on write. Suitable for a
/// single-process deployment and for tests; a multi-process deployment
/// needs a shared backend behind [`CacheStore`].
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the key only if it is absent or expired.
    ///
    /// Returns `true` if the value was stored. This is the atomic
    /// primitive a stricter send guard can build on.
    pub fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> bool {
        let mut entries = self.entries.write().unwrap();
        let now = Instant::now();
        match entries.get(key) {
            Some(entry) if entry.expires_at > now => false,
            _ => {
                entries.insert(
                    key.to_string(),
                    Entry {
                        value: value.to_string(),
                        expires_at: now + ttl,
                    },
                );
                true
            }
        }
    }

    /// Drop expired entries.
    fn sweep(entries: &mut HashMap<String, Entry>) {
        let now = Instant::now();
        entries.retain(|_, entry| entry.expires_at > now);
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn is_available(&self) -> bool {
        true
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let entries = self.entries.read().unwrap();
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value.clone())),
            _ => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut entries = self.entries.write().unwrap();
        Self::sweep(&mut entries);
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }
}
