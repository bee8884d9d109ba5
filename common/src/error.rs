use std::io;
use std::net::SocketAddr;
use std::num::ParseIntError;

use thiserror::Error;

/// Everything that can end a protocol session early.
///
/// Read timeouts are not part of this type: they drive the retry loop and are
/// reported through the session's own read outcome.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("endpoint {0} is not an IPv4 address")]
    InvalidEndpoint(SocketAddr),

    #[error("connection refused")]
    Refused,

    #[error("connect timed out")]
    ConnectTimeout,

    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("segment {segment} has no field {index}")]
    MissingField { segment: &'static str, index: usize },

    #[error("invalid message control id '{value}': {source}")]
    BadSequenceId {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("probe task failed: {0}")]
    Task(String),
}

impl ProbeError {
    /// Maps a failed connect onto the taxonomy the report understands.
    pub fn from_connect(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::ConnectionRefused => ProbeError::Refused,
            io::ErrorKind::TimedOut => ProbeError::ConnectTimeout,
            _ => ProbeError::Io(err),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetParseError {
    #[error("line {0} is not good enough")]
    TooFewFields(String),

    #[error("invalid port '{port}' in line {line}")]
    InvalidPort { port: String, line: String },
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
