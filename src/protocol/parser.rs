//! Request Line Parser
//!
//! Turns one request line into a [`Command`]. The line is split on
//! whitespace; the first token names the command (case-insensitive) and the
//! rest are its arguments.
//!
//! ## Grammar
//!
//! ```text
//! PING [ignored...]
//! GET <key>
//! SET <key> <value...> [PX <milliseconds>]
//! ```
//!
//! ## PX handling
//!
//! For SET, only the last two tokens are ever read as a TTL modifier:
//!
//! - `... PX <ms>`: `<ms>` must be a positive integer, otherwise the request
//!   fails with `invalid expire time in 'SET' command`. At least one value
//!   token must come before `PX`.
//! - `... PX` as the final token: `syntax error`.
//! - `PX` anywhere else is an ordinary value token.

use std::time::Duration;
use thiserror::Error;

/// Errors reported back to the requester.
///
/// The `Display` text is the message that follows `ERR ` on the wire.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The first token is not a known command (the name is kept for logging)
    #[error("unknown command")]
    UnknownCommand(String),

    /// Wrong number of arguments for the named command
    #[error("wrong number of arguments for '{0}' command")]
    WrongArity(&'static str),

    /// The token after `PX` is not a positive integer
    #[error("invalid expire time in '{0}' command")]
    InvalidExpireTime(&'static str),

    /// A `PX` modifier with nothing after it
    #[error("syntax error")]
    SyntaxError,
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// A fully parsed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ping,
    Get {
        key: String,
    },
    Set {
        key: String,
        value: String,
        ttl: Option<Duration>,
    },
}

impl Command {
    /// The canonical upper-case command name.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Ping => "PING",
            Command::Get { .. } => "GET",
            Command::Set { .. } => "SET",
        }
    }
}

/// Parses one request line.
///
/// # Returns
///
/// - `Ok(Some(command))` - Successfully parsed a command
/// - `Ok(None)` - The line is empty or whitespace only; no reply is due
/// - `Err(e)` - The request is malformed
pub fn parse_command(line: &str) -> ParseResult<Option<Command>> {
    let mut tokens = line.split_whitespace();

    let Some(name) = tokens.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = tokens.collect();

    let command = if name.eq_ignore_ascii_case("PING") {
        Command::Ping
    } else if name.eq_ignore_ascii_case("GET") {
        parse_get(&args)?
    } else if name.eq_ignore_ascii_case("SET") {
        parse_set(&args)?
    } else {
        return Err(ParseError::UnknownCommand(name.to_string()));
    };

    Ok(Some(command))
}

/// GET key
fn parse_get(args: &[&str]) -> ParseResult<Command> {
    match args {
        [key] => Ok(Command::Get {
            key: (*key).to_string(),
        }),
        _ => Err(ParseError::WrongArity("GET")),
    }
}

/// SET key value [value ...] [PX milliseconds]
fn parse_set(args: &[&str]) -> ParseResult<Command> {
    let [key, rest @ ..] = args else {
        return Err(ParseError::WrongArity("SET"));
    };
    if rest.is_empty() {
        return Err(ParseError::WrongArity("SET"));
    }

    let (value, ttl) = match rest {
        [.., last] if is_px(last) => return Err(ParseError::SyntaxError),
        [value @ .., px, ms] if is_px(px) => {
            if value.is_empty() {
                return Err(ParseError::WrongArity("SET"));
            }
            (value, Some(parse_millis(ms)?))
        }
        _ => (rest, None),
    };

    Ok(Command::Set {
        key: (*key).to_string(),
        value: value.join(" "),
        ttl,
    })
}

#[inline]
fn is_px(token: &str) -> bool {
    token.eq_ignore_ascii_case("PX")
}

/// Parses a strictly positive millisecond count.
fn parse_millis(token: &str) -> ParseResult<Duration> {
    match token.parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(ParseError::InvalidExpireTime("SET")),
    }
}
