//! Server Module
//!
//! Transport for udpkv: a single UDP socket served by one request loop.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     UDP Socket                              │
//! └──────────────────────┬──────────────────────────────────────┘
//!                        │ one datagram = one request
//!                        ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 DatagramServer                              │
//! │                                                             │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐      │
//! │  │ recv_from   │───>│ Execute cmd │───>│ send_to     │      │
//! │  └─────────────┘    └─────────────┘    └─────────────┘      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use udpkv::commands::CommandHandler;
//! use udpkv::server::{DatagramServer, ServerStats};
//! use udpkv::storage::StorageEngine;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), udpkv::server::ServerError> {
//! let storage = Arc::new(StorageEngine::new());
//! let handler = CommandHandler::new(storage);
//! let stats = Arc::new(ServerStats::new());
//!
//! let server = DatagramServer::bind("127.0.0.1:8080", handler, stats).await?;
//! server.run().await;
//! # Ok(())
//! # }
//! ```

pub mod datagram;

pub use datagram::{serve, DatagramServer, ServerError, ServerStats};
