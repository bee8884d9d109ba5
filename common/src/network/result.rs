use std::fmt;
use std::sync::Arc;

use crate::error::ProbeError;
use crate::network::target::Target;

/// Terminal state of one probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// The peer rejected the malformed test message the way it should ("ok").
    ConnectedAcknowledged,
    /// The peer answered, but not with the expected rejection ("not-ok").
    ConnectedRejected,
    /// Connected, but fewer than two reply segments came back.
    ConnectedMalformed,
    ClosedOrRefused,
    TimedOut,
    Error,
}

impl Classification {
    pub fn is_ok(&self) -> bool {
        matches!(self, Classification::ConnectedAcknowledged)
    }
}

/// Non-fatal findings attached to an otherwise classified reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    /// The echoed sending application differs from the one that was sent.
    ApplicationMismatch { sent: String, received: String },
    /// The peer acknowledged a message id other than the only one sent.
    SequenceMismatch { id: i32 },
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Annotation::ApplicationMismatch { sent, received } => {
                write!(f, "mismatch sent: {sent}, received: {received}")
            }
            Annotation::SequenceMismatch { .. } => write!(f, "jumped a message"),
        }
    }
}

/// Outcome of one probe, created once when its session ends.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    pub target: Arc<Target>,
    pub classification: Classification,
    /// Whether the TCP connection was established before the session ended.
    pub connected: bool,
    pub annotations: Vec<Annotation>,
    /// Raw reply fragment, error text or diagnostic segments.
    pub detail: String,
}

impl ProbeResult {
    pub fn new(
        target: Arc<Target>,
        classification: Classification,
        connected: bool,
        annotations: Vec<Annotation>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            target,
            classification,
            connected,
            annotations,
            detail: detail.into(),
        }
    }

    /// Result for a session that failed with `err`.
    pub fn from_error(target: Arc<Target>, connected: bool, err: &ProbeError) -> Self {
        let (classification, detail) = match err {
            ProbeError::Refused => (Classification::ClosedOrRefused, err.to_string()),
            ProbeError::ConnectTimeout => (Classification::TimedOut, String::new()),
            _ => (Classification::Error, err.to_string()),
        };
        Self::new(target, classification, connected, Vec::new(), detail)
    }

    /// One-line status text, e.g. `connected ok` or `closed`.
    pub fn status(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if self.connected {
            parts.push("connected".to_string());
        }
        parts.extend(self.annotations.iter().map(ToString::to_string));

        match self.classification {
            Classification::ConnectedAcknowledged => parts.push("ok".to_string()),
            Classification::ConnectedRejected => parts.push(format!("not-ok: {}", self.detail)),
            Classification::ConnectedMalformed => push_nonempty(&mut parts, &self.detail),
            Classification::ClosedOrRefused => parts.push("closed".to_string()),
            Classification::TimedOut => {
                push_nonempty(&mut parts, &self.detail);
                parts.push("timed out".to_string());
            }
            Classification::Error => push_nonempty(&mut parts, &self.detail),
        }
        parts.join(" ")
    }
}

fn push_nonempty(parts: &mut Vec<String>, text: &str) {
    if !text.is_empty() {
        parts.push(text.to_string());
    }
}

impl fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.target, self.status())
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
