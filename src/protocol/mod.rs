//! Line Protocol Implementation
//!
//! Requests and replies are single lines of plain text, one per datagram.
//!
//! ## Modules
//!
//! - `parser`: Splits a request line into a [`Command`]
//! - `types`: Defines the [`Response`] enum and its wire encoding
//!
//! ## Example
//!
//! ```
//! use udpkv::protocol::{parse_command, Command, Response};
//!
//! let command = parse_command("GET name").unwrap();
//! assert_eq!(command, Some(Command::Get { key: "name".to_string() }));
//!
//! let reply = Response::value("Ariz");
//! assert_eq!(&reply.serialize()[..], b"Ariz");
//! ```

pub mod parser;
pub mod types;

pub use parser::{parse_command, Command, ParseError, ParseResult};
pub use types::Response;
