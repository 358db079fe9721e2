//! Command Handler Module
//!
//! This module implements the command processing layer for udpkv.
//! It receives request lines, executes them against the storage engine,
//! and returns the reply to send back.
//!
//! ## Architecture
//!
//! ```text
//! Request line
//!       │
//!       ▼
//! ┌─────────────────┐
//! │  Line Parser    │  (protocol module)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ CommandHandler  │  (this module)
//! │                 │
//! │  - Dispatch     │
//! │  - Execute      │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ StorageEngine   │  (storage module)
//! └─────────────────┘
//! ```
//!
//! ## Supported Commands
//!
//! - `PING`
//! - `GET key`
//! - `SET key value [PX milliseconds]`

pub mod handler;

pub use handler::CommandHandler;
