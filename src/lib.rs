//! # udpkv - A Minimal In-Memory Key-Value Store over UDP
//!
//! udpkv stores string values under string keys, optionally with a
//! millisecond time-to-live, and serves them through a line-oriented text
//! protocol where every request and every reply is exactly one datagram.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                               udpkv                                     │
//! │                                                                         │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐                  │
//! │  │ UDP Socket  │───>│  Datagram   │───>│  Command    │                  │
//! │  │             │    │  Server     │    │  Handler    │                  │
//! │  └─────────────┘    └─────────────┘    └──────┬──────┘                  │
//! │                                               │                         │
//! │                                               ▼                         │
//! │  ┌─────────────┐             ┌──────────────────────────────┐           │
//! │  │   Line      │             │        StorageEngine         │           │
//! │  │   Parser    │             │   Mutex<HashMap<key, Entry>> │           │
//! │  └─────────────┘             └──────────────────────────────┘           │
//! │                                               ▲                         │
//! │                                               │ (optional)              │
//! │                              ┌────────────────┴────────────┐            │
//! │                              │        ExpirySweeper        │            │
//! │                              └─────────────────────────────┘            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use udpkv::commands::CommandHandler;
//! use udpkv::protocol::Response;
//! use udpkv::storage::StorageEngine;
//! use std::sync::Arc;
//!
//! let handler = CommandHandler::new(Arc::new(StorageEngine::new()));
//!
//! assert_eq!(handler.execute("SET name Ariz"), Some(Response::ok()));
//! assert_eq!(handler.execute("GET name"), Some(Response::value("Ariz")));
//! assert_eq!(handler.execute("PING"), Some(Response::pong()));
//! ```
//!
//! ## Wire Format
//!
//! - `PING` → `PONG`
//! - `SET <key> <value...> [PX <milliseconds>]` → `OK` | error
//! - `GET <key>` → `<value>` | `(nil)` | error
//! - anything else → `(error) ERR unknown command`
//!
//! ## Module Overview
//!
//! - [`storage`]: Lock-guarded storage engine with lazy TTL expiry
//! - [`protocol`]: Request line parser and reply encoding
//! - [`commands`]: Maps parsed requests onto the storage engine
//! - [`server`]: The UDP request loop
//! - [`config`]: Command-line configuration

pub mod commands;
pub mod config;
pub mod protocol;
pub mod server;
pub mod storage;

// Re-export commonly used types for convenience
pub use commands::CommandHandler;
pub use config::{CliAction, Config, ConfigError};
pub use protocol::{parse_command, Command, ParseError, Response};
pub use server::{DatagramServer, ServerError, ServerStats};
pub use storage::{ExpiryConfig, ExpirySweeper, StorageEngine};

/// The default port udpkv listens on
pub const DEFAULT_PORT: u16 = 8080;

/// The default host udpkv binds to
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Receive buffer size; longer datagrams are truncated to this many bytes
pub const MAX_DATAGRAM_SIZE: usize = 1024;

/// Version of udpkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
