//! Command Handler
//!
//! Takes a request line, parses it, runs it against the storage engine and
//! returns the reply.
//!
//! ## Supported Commands
//!
//! - `PING` - Liveness check, replies `PONG`
//! - `GET key` - Replies with the value, or `(nil)`
//! - `SET key value [value ...] [PX milliseconds]` - Replies `OK`
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     CommandHandler                          │
//! │                                                             │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐      │
//! │  │   parse()   │───>│  dispatch() │───>│  cmd_*()    │      │
//! │  └─────────────┘    └─────────────┘    └─────────────┘      │
//! │                                               │             │
//! │                                               ▼             │
//! │                                      StorageEngine          │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use crate::protocol::{parse_command, Command, ParseError, Response};
use crate::storage::StorageEngine;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Executes request lines against a storage engine.
///
/// Cheap to clone; every clone shares the same engine.
#[derive(Debug, Clone)]
pub struct CommandHandler {
    /// The storage engine
    storage: Arc<StorageEngine>,
}

impl CommandHandler {
    /// Creates a new command handler with the given storage engine.
    pub fn new(storage: Arc<StorageEngine>) -> Self {
        Self { storage }
    }

    /// Returns the storage engine this handler runs against.
    pub fn storage(&self) -> &Arc<StorageEngine> {
        &self.storage
    }

    /// Executes one request line and returns the reply.
    ///
    /// Returns `None` for an empty (or whitespace-only) line: such requests
    /// are dropped without a reply. Malformed requests never fail the
    /// caller; they come back as [`Response::Error`].
    pub fn execute(&self, line: &str) -> Option<Response> {
        match parse_command(line) {
            Ok(Some(command)) => Some(self.dispatch(command)),
            Ok(None) => None,
            Err(e) => {
                if let ParseError::UnknownCommand(name) = &e {
                    debug!(command = %name, "Unknown command");
                } else {
                    debug!(error = %e, "Rejected request");
                }
                Some(Response::error(e.to_string()))
            }
        }
    }

    /// Dispatches a parsed command to its handler.
    pub fn dispatch(&self, command: Command) -> Response {
        match command {
            Command::Ping => self.cmd_ping(),
            Command::Get { key } => self.cmd_get(&key),
            Command::Set { key, value, ttl } => self.cmd_set(key, value, ttl),
        }
    }

    /// PING
    fn cmd_ping(&self) -> Response {
        Response::pong()
    }

    /// GET key
    fn cmd_get(&self, key: &str) -> Response {
        match self.storage.get(key) {
            Some(value) => Response::value(value),
            None => Response::nil(),
        }
    }

    /// SET key value [PX milliseconds]
    fn cmd_set(&self, key: String, value: String, ttl: Option<Duration>) -> Response {
        self.storage.set(key, value, ttl);
        Response::ok()
    }
}
