//! Command-line configuration.

use crate::{DEFAULT_HOST, DEFAULT_PORT};
use std::time::Duration;
use thiserror::Error;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// How often the background sweeper runs (None = lazy expiry only)
    pub sweep_interval: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            sweep_interval: None,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    Run(Config),
    Help,
    Version,
}

/// Errors from command-line parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} requires a value")]
    MissingValue(String),

    #[error("invalid port number: {0}")]
    InvalidPort(String),

    #[error("invalid sweep interval: {0}")]
    InvalidInterval(String),

    #[error("unknown argument: {0}")]
    UnknownArgument(String),
}

impl Config {
    /// Parses command-line arguments (without the program name).
    ///
    /// `--help` and `--version` win as soon as they are seen.
    pub fn parse<I, S>(args: I) -> Result<CliAction, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut config = Config::default();
        let mut args = args.into_iter().map(Into::into);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--host" | "-h" => {
                    config.host = args.next().ok_or(ConfigError::MissingValue(arg))?;
                }
                "--port" | "-p" => {
                    let value = args.next().ok_or(ConfigError::MissingValue(arg))?;
                    config.port = value
                        .parse()
                        .map_err(|_| ConfigError::InvalidPort(value))?;
                }
                "--sweep-interval" => {
                    let value = args.next().ok_or(ConfigError::MissingValue(arg))?;
                    let ms: u64 = value
                        .parse()
                        .map_err(|_| ConfigError::InvalidInterval(value))?;
                    config.sweep_interval = (ms > 0).then_some(Duration::from_millis(ms));
                }
                "--help" => return Ok(CliAction::Help),
                "--version" | "-v" => return Ok(CliAction::Version),
                _ => return Err(ConfigError::UnknownArgument(arg)),
            }
        }

        Ok(CliAction::Run(config))
    }

    /// Returns the bind address as a string
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
