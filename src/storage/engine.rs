//! Thread-Safe Storage Engine with Expiry Support
//!
//! This module implements the core storage engine for udpkv: a map from key
//! to string value where each entry may carry an expiry deadline.
//!
//! ## Design Decisions
//!
//! 1. **One Lock**: The whole map sits behind a single `Mutex`. Every `get` and
//!    `set` holds it for its complete read-check-write sequence, so operations
//!    never interleave and no caller sees a half-written entry.
//! 2. **Lazy Expiry**: Expired entries are discovered and removed by the access
//!    that touches them. The optional sweeper (see [`super::expiry`]) takes the
//!    same lock, so it can never race that check.
//! 3. **No I/O under the lock**: the guard is dropped before the caller sees
//!    the result.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Represents a stored value with optional expiry time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// The actual value stored
    pub value: String,
    /// When this entry expires (None = never expires)
    pub expires_at: Option<Instant>,
}

impl Entry {
    /// Creates a new entry. A missing or zero TTL means the entry never expires.
    pub fn new(value: String, ttl: Option<Duration>) -> Self {
        let expires_at = ttl
            .filter(|ttl| !ttl.is_zero())
            .and_then(|ttl| Instant::now().checked_add(ttl));
        Self { value, expires_at }
    }

    /// Checks whether this entry is expired at `now`.
    #[inline]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|exp| now >= exp)
    }

    /// Checks if this entry has expired.
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }
}

/// Snapshot of the engine's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorageStats {
    pub keys: u64,
    pub get_ops: u64,
    pub set_ops: u64,
    pub expired: u64,
}

/// The storage engine for udpkv.
///
/// Owned by whoever constructs it (normally the server, through an `Arc`
/// handed to each [`CommandHandler`](crate::commands::CommandHandler)).
/// There is no global instance.
///
/// # Example
///
/// ```
/// use udpkv::storage::StorageEngine;
/// use std::time::Duration;
///
/// let engine = StorageEngine::new();
///
/// engine.set("name", "Ariz", None);
/// assert_eq!(engine.get("name"), Some("Ariz".to_string()));
///
/// engine.set("session", "abc123", Some(Duration::from_secs(60)));
/// assert!(engine.get("session").is_some());
/// ```
#[derive(Debug, Default)]
pub struct StorageEngine {
    /// All entries, guarded by one exclusive lock
    data: Mutex<HashMap<String, Entry>>,

    /// Statistics: total GET operations
    get_count: AtomicU64,

    /// Statistics: total SET operations
    set_count: AtomicU64,

    /// Statistics: number of expired keys removed
    expired_count: AtomicU64,
}

impl StorageEngine {
    /// Creates a new, empty storage engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the store lock.
    ///
    /// A panic while holding the guard cannot leave the map half-updated
    /// (every mutation is a single `insert`/`remove`), so a poisoned lock is
    /// simply taken over.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sets a key-value pair, overwriting any existing entry.
    ///
    /// A `ttl` of `None` or zero stores the value without expiry and clears
    /// any expiry the key had before.
    ///
    /// # Returns
    ///
    /// Returns `true` if a new key was created, `false` if a live key was replaced.
    pub fn set(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
        ttl: Option<Duration>,
    ) -> bool {
        self.set_count.fetch_add(1, Ordering::Relaxed);

        let entry = Entry::new(value.into(), ttl);
        let mut data = self.lock();

        match data.insert(key.into(), entry) {
            Some(previous) if previous.is_expired() => {
                self.expired_count.fetch_add(1, Ordering::Relaxed);
                true
            }
            Some(_) => false,
            None => true,
        }
    }

    /// Gets the value for a key.
    ///
    /// Returns `None` if the key doesn't exist or has expired. An expired
    /// entry is removed as part of the same locked operation.
    pub fn get(&self, key: &str) -> Option<String> {
        self.get_count.fetch_add(1, Ordering::Relaxed);

        let mut data = self.lock();
        let entry = data.get(key)?;

        if entry.is_expired() {
            data.remove(key);
            self.expired_count.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        Some(entry.value.clone())
    }

    /// Removes every expired entry.
    ///
    /// This is called by the background expiry sweeper.
    ///
    /// # Returns
    ///
    /// Returns the number of keys that were cleaned up.
    pub fn cleanup_expired(&self) -> u64 {
        let now = Instant::now();
        let mut data = self.lock();
        let before = data.len();

        data.retain(|_, entry| !entry.is_expired_at(now));

        let cleaned = (before - data.len()) as u64;
        if cleaned > 0 {
            self.expired_count.fetch_add(cleaned, Ordering::Relaxed);
        }
        cleaned
    }

    /// Returns the number of stored entries, including expired ones not yet removed.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns engine statistics.
    pub fn stats(&self) -> StorageStats {
        StorageStats {
            keys: self.len() as u64,
            get_ops: self.get_count.load(Ordering::Relaxed),
            set_ops: self.set_count.load(Ordering::Relaxed),
            expired: self.expired_count.load(Ordering::Relaxed),
        }
    }
}
