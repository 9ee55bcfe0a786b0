use std::path::PathBuf;
use thiserror::Error;

/// Core error type for slipway operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Invalid port {port}: must be in 1..=65535")]
    InvalidPort { port: u32 },

    #[error("Invalid watch exclusion pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Port {port} is already in use on {host} (strict port, not retrying)")]
    PortUnavailable { port: u16, host: String },

    #[error("No free port found in {start}..={end} on {host}")]
    PortScanExhausted { start: u16, end: u16, host: String },

    #[error("Cannot bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Other(String),
}

impl Error {
    #[must_use]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
