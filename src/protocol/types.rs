//! Response Types
//!
//! Every reply is a single line of text carried as one datagram payload.
//! Success replies carry only their payload; errors start with a fixed
//! marker so a client can tell them apart by looking at the first bytes.
//!
//! ## Examples
//!
//! ```text
//! OK
//! PONG
//! hello world
//! (nil)
//! (error) ERR unknown command
//! ```

use bytes::Bytes;
use std::fmt;

/// Prefix written in front of every error message.
pub const ERROR_PREFIX: &str = "(error) ERR ";

/// Literal sent when a key has no live value.
pub const NIL: &str = "(nil)";

/// A reply to one request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// `OK`, the reply to a successful SET
    Ok,

    /// `PONG`, the reply to PING
    Pong,

    /// A stored value, sent verbatim
    Value(String),

    /// `(nil)`, the reply to a GET on an absent or expired key
    Nil,

    /// An error message, sent as `(error) ERR <message>`
    Error(String),
}

impl Response {
    /// Common response for successful operations
    pub fn ok() -> Self {
        Response::Ok
    }

    /// Common response for PONG
    pub fn pong() -> Self {
        Response::Pong
    }

    /// Creates a value response.
    pub fn value(s: impl Into<String>) -> Self {
        Response::Value(s.into())
    }

    /// Creates a nil response.
    pub fn nil() -> Self {
        Response::Nil
    }

    /// Creates a new error response. The `ERR` marker is added on the wire.
    ///
    /// # Example
    /// ```
    /// use udpkv::protocol::Response;
    /// let err = Response::error("unknown command");
    /// assert_eq!(err.to_string(), "(error) ERR unknown command");
    /// ```
    pub fn error(s: impl Into<String>) -> Self {
        Response::Error(s.into())
    }

    /// Returns true if this value is an error.
    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error(_))
    }

    /// Returns true if this is the nil reply.
    pub fn is_nil(&self) -> bool {
        matches!(self, Response::Nil)
    }

    /// Serializes the response into the datagram payload.
    pub fn serialize(&self) -> Bytes {
        match self {
            Response::Ok => Bytes::from_static(b"OK"),
            Response::Pong => Bytes::from_static(b"PONG"),
            Response::Nil => Bytes::from_static(NIL.as_bytes()),
            Response::Value(s) => Bytes::copy_from_slice(s.as_bytes()),
            Response::Error(_) => Bytes::from(self.to_string()),
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Ok => f.write_str("OK"),
            Response::Pong => f.write_str("PONG"),
            Response::Value(s) => f.write_str(s),
            Response::Nil => f.write_str(NIL),
            Response::Error(msg) => write!(f, "{}{}", ERROR_PREFIX, msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_response() {
        assert_eq!(Response::ok().serialize(), Bytes::from("OK"));
    }

    #[test]
    fn test_pong_response() {
        assert_eq!(Response::pong().serialize(), Bytes::from("PONG"));
    }

    #[test]
    fn test_value_serialize() {
        let value = Response::value("hello big world");
        assert_eq!(value.serialize(), Bytes::from("hello big world"));
    }

    #[test]
    fn test_nil_serialize() {
        assert_eq!(Response::nil().serialize(), Bytes::from("(nil)"));
        assert!(Response::nil().is_nil());
    }

    #[test]
    fn test_error_serialize() {
        let value = Response::error("wrong number of arguments for 'GET' command");
        assert_eq!(
            value.serialize(),
            Bytes::from("(error) ERR wrong number of arguments for 'GET' command")
        );
        assert!(value.is_error());
    }

    #[test]
    fn test_value_looking_like_error_is_not_error() {
        // The marker is only produced for Error; stored text passes through untouched
        let value = Response::value("(nil)");
        assert!(!value.is_error());
        assert!(!value.is_nil());
    }
}
