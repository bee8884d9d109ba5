//! # Probe Target Model
//!
//! A [`Target`] is one endpoint to run the handshake against, together with
//! the sending-application name the handshake claims and a free-text note.
//!
//! Target list files carry one target per line:
//!
//! ```text
//! # source   host            port  description
//! LAB_ADT    10.1.2.3        6661  lab feed
//! PHARMACY   rx.example.org  7001
//! exit
//! ```
//!
//! Lines are turned into [`ListLine`]s here; resolving the host part into
//! addresses happens in the loader of the core crate.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::str::FromStr;

use crate::error::{ProbeError, TargetParseError};

const COMMENT_PREFIX: &str = "#";
const EXIT_KEYWORD: &str = "exit";
const MAX_FIELDS: usize = 4;

/// One endpoint to probe. Built once by the loader and never mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    /// Sending-application identity put into the handshake message.
    pub source: String,
    pub endpoint: SocketAddr,
    pub description: String,
}

impl Target {
    pub fn new(
        source: impl Into<String>,
        endpoint: SocketAddr,
        description: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            endpoint,
            description: description.into(),
        }
    }

    /// Only IPv4 endpoints are probed; anything else is refused up front.
    pub fn ipv4_endpoint(&self) -> Result<SocketAddrV4, ProbeError> {
        match self.endpoint {
            SocketAddr::V4(v4) => Ok(v4),
            SocketAddr::V6(_) => Err(ProbeError::InvalidEndpoint(self.endpoint)),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.source, self.endpoint)?;
        if !self.description.is_empty() {
            write!(f, " {}", self.description)?;
        }
        Ok(())
    }
}

/// A parsed, not yet resolved, target line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetLine {
    pub source: String,
    /// Hostname or literal address.
    pub host: String,
    pub port: u16,
    pub description: String,
}

impl TargetLine {
    pub fn to_target(&self, addr: Ipv4Addr) -> Target {
        Target::new(
            self.source.clone(),
            SocketAddr::V4(SocketAddrV4::new(addr, self.port)),
            self.description.clone(),
        )
    }
}

/// What a single line of a target list means.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListLine {
    /// Blank line or comment.
    Skip,
    /// Stop reading the current file.
    Exit,
    Entry(TargetLine),
}

impl FromStr for ListLine {
    type Err = TargetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
            return Ok(ListLine::Skip);
        }
        if line.to_lowercase().starts_with(EXIT_KEYWORD) {
            return Ok(ListLine::Exit);
        }

        let fields = split_fields(line, MAX_FIELDS);
        let [source, host, port, rest @ ..] = fields.as_slice() else {
            return Err(TargetParseError::TooFewFields(line.to_string()));
        };

        let port = port
            .parse::<u16>()
            .map_err(|_| TargetParseError::InvalidPort {
                port: port.to_string(),
                line: line.to_string(),
            })?;

        Ok(ListLine::Entry(TargetLine {
            source: source.to_string(),
            host: host.to_string(),
            port,
            description: rest.first().map(|d| d.to_string()).unwrap_or_default(),
        }))
    }
}

/// Splits on whitespace into at most `max` fields; the last one keeps the
/// remainder of the line, inner whitespace included.
fn split_fields(line: &str, max: usize) -> Vec<&str> {
    let mut fields = Vec::with_capacity(max);
    let mut rest = line.trim();

    while !rest.is_empty() {
        if fields.len() + 1 == max {
            fields.push(rest);
            break;
        }
        match rest.split_once(char::is_whitespace) {
            Some((head, tail)) => {
                fields.push(head);
                rest = tail.trim_start();
            }
            None => {
                fields.push(rest);
                break;
            }
        }
    }
    fields
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
