//! Storage Engine Module
//!
//! This module provides the core storage functionality for udpkv:
//! a lock-guarded key-value map with per-key TTL, plus an optional
//! background sweeper for keys that expire and are never read again.
//!
//! ## Features
//!
//! - **Single Lock**: Every operation is atomic with respect to every other
//! - **TTL Support**: Keys can have a millisecond time-to-live
//! - **Lazy Expiry**: Expired keys are removed by the access that finds them
//! - **Active Expiry**: Optional sweeper reclaims untouched expired keys
//!
//! ## Example
//!
//! ```
//! use udpkv::storage::StorageEngine;
//! use std::time::Duration;
//!
//! let engine = StorageEngine::new();
//!
//! engine.set("name", "Ariz", None);
//! assert_eq!(engine.get("name"), Some("Ariz".to_string()));
//!
//! engine.set("session", "token123", Some(Duration::from_secs(3600)));
//! ```

pub mod engine;
pub mod expiry;

pub use engine::{Entry, StorageEngine, StorageStats};
pub use expiry::{ExpiryConfig, ExpirySweeper};
