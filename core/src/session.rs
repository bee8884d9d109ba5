//! One handshake against one target.
//!
//! A session sends the framed test message, then reads until the reply frame
//! is complete, the peer closes, or the read timeout fires. A timed out read
//! is not an error: the session nudges the peer with a filler of terminators
//! and reads again, for at most [`ProbeSettings::max_timeout_rounds`] rounds
//! and never longer than the read budget of those rounds together.

use std::sync::Arc;

use portcheck_common::config::ProbeSettings;
use portcheck_common::error::ProbeError;
use portcheck_common::info;
use portcheck_common::network::result::ProbeResult;
use portcheck_common::network::target::Target;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::{Instant, timeout};
use tracing::{debug, trace};

use crate::message::{self, Verdict};
use crate::mllp;
use crate::network::tcp::Connector;

const READ_CHUNK: usize = 1024;

/// What a single read with deadline produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    Data(usize),
    /// The peer closed its side.
    Closed,
    TimedOut,
}

/// Everything read before the loop stopped, decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    /// Whether the last round ended on a timeout.
    pub timed_out: bool,
    /// Number of filler nudges sent to the peer.
    pub fillers_sent: u32,
}

pub struct ProtocolSession<S> {
    stream: S,
    target: Arc<Target>,
    settings: ProbeSettings,
    buffer: Vec<u8>,
}

impl<S> ProtocolSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, target: Arc<Target>, settings: ProbeSettings) -> Self {
        Self {
            stream,
            target,
            settings,
            buffer: Vec::new(),
        }
    }

    /// Sends the test message and judges whatever comes back.
    pub async fn handshake(&mut self) -> Result<Verdict, ProbeError> {
        let request = mllp::frame(&message::test_message(&self.target.source));
        self.send(&request).await?;

        let reply = self.read_reply().await?;
        debug!(
            "received {} from {}",
            mllp::render_visible(&reply.text),
            self.target.endpoint
        );
        message::classify_reply(&reply.text, &self.target.source, reply.timed_out)
    }

    /// Runs the read loop until a full frame, a close, or the last timed out round.
    ///
    /// The whole loop is bounded by [`ProbeSettings::read_budget`] and the
    /// buffered reply by [`ProbeSettings::max_reply_bytes`]. A peer that keeps
    /// trickling bytes past the budget sees its remaining rounds time out.
    pub async fn read_reply(&mut self) -> Result<Reply, ProbeError> {
        let mut chunk = [0u8; READ_CHUNK];
        let mut timed_out = true;
        let mut fillers_sent = 0;
        let deadline = Instant::now() + self.settings.read_budget();
        let rounds = self.settings.rounds();

        let mut round = 0;
        'rounds: while timed_out && round < rounds {
            round += 1;
            timed_out = false;

            loop {
                match self.read_with_deadline(&mut chunk, deadline).await? {
                    ReadOutcome::Data(n) => {
                        let scan_from = self.buffer.len();
                        self.buffer.extend_from_slice(&chunk[..n]);
                        if let Some(end) = mllp::find_terminator_from(&self.buffer, scan_from) {
                            self.buffer.truncate(end);
                            break;
                        }
                        if self.buffer.len() >= self.settings.max_reply_bytes {
                            debug!(
                                "{} ({}) sent {} bytes without a terminator",
                                self.target.endpoint,
                                self.target.source,
                                self.buffer.len()
                            );
                            self.buffer.truncate(self.settings.max_reply_bytes);
                            break 'rounds;
                        }
                    }
                    ReadOutcome::Closed => {
                        debug!("zero bytes from {} ({})", self.target.endpoint, self.target.source);
                        break;
                    }
                    ReadOutcome::TimedOut => {
                        trace!("{} ({}) timed out in round {round}", self.target.endpoint, self.target.source);
                        timed_out = true;
                        self.send(&mllp::filler()).await?;
                        fillers_sent += 1;
                        break;
                    }
                }
            }
        }

        Ok(Reply {
            text: mllp::decode_latin1(&self.buffer),
            timed_out,
            fillers_sent,
        })
    }

    /// A read bounded by the read timeout and by `deadline`, whichever comes
    /// first. Timing out is an outcome, not an error; once `deadline` has
    /// passed the stream is not polled at all.
    pub async fn read_with_deadline(
        &mut self,
        chunk: &mut [u8],
        deadline: Instant,
    ) -> Result<ReadOutcome, ProbeError> {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Ok(ReadOutcome::TimedOut);
        }
        let wait = remaining.min(self.settings.read_timeout);
        match timeout(wait, self.stream.read(chunk)).await {
            Err(_elapsed) => Ok(ReadOutcome::TimedOut),
            Ok(Ok(0)) => Ok(ReadOutcome::Closed),
            Ok(Ok(n)) => Ok(ReadOutcome::Data(n)),
            Ok(Err(e)) => Err(e.into()),
        }
    }

    async fn send(&mut self, bytes: &[u8]) -> Result<(), ProbeError> {
        self.stream.write_all(bytes).await?;
        self.stream.flush().await?;
        Ok(())
    }
}

/// Probes `target` from connect to verdict. Never fails: every error ends up
/// in the returned result. The connection is dropped on every path.
pub async fn probe<C>(connector: &C, target: Arc<Target>, settings: &ProbeSettings) -> ProbeResult
where
    C: Connector + ?Sized,
{
    let addr = match target.ipv4_endpoint() {
        Ok(addr) => addr,
        Err(e) => return ProbeResult::from_error(target, false, &e),
    };

    info!("testing {} ({})", target.endpoint, target.source);

    let stream = match connector.connect(addr).await {
        Ok(stream) => stream,
        Err(e) => return ProbeResult::from_error(target, false, &e),
    };

    let mut session = ProtocolSession::new(stream, Arc::clone(&target), *settings);
    match session.handshake().await {
        Ok(verdict) => ProbeResult::new(
            target,
            verdict.classification,
            true,
            verdict.annotations,
            verdict.detail,
        ),
        Err(e) => ProbeResult::from_error(target, true, &e),
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
