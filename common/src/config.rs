use std::time::Duration;

pub const DEFAULT_READ_TIMEOUT_MS: u64 = 1000;
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(DEFAULT_READ_TIMEOUT_MS);
pub const DEFAULT_TIMEOUT_ROUNDS: u32 = 10;
/// Far above any acknowledgment a receiver sends back.
pub const DEFAULT_MAX_REPLY_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Dumps every received reply with its control characters made visible.
    pub verbose: bool,
    /// Never waits for the user: no page prompts and no final prompt.
    pub no_pause: bool,
    pub probe: ProbeSettings,
}

/// Knobs of a single protocol session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSettings {
    /// How long one read waits before the round counts as timed out.
    pub read_timeout: Duration,
    /// Number of read rounds that may time out before the session gives up.
    /// Zero is read as one: a session always reads at least once.
    pub max_timeout_rounds: u32,
    /// `None` leaves the connect timeout to the operating system.
    pub connect_timeout: Option<Duration>,
    /// Reply bytes buffered before reading stops without a terminator.
    pub max_reply_bytes: usize,
}

impl ProbeSettings {
    pub fn rounds(&self) -> u32 {
        self.max_timeout_rounds.max(1)
    }

    /// Upper bound on the time a session spends reading its reply.
    pub fn read_budget(&self) -> Duration {
        self.read_timeout.saturating_mul(self.rounds())
    }
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            read_timeout: DEFAULT_READ_TIMEOUT,
            max_timeout_rounds: DEFAULT_TIMEOUT_ROUNDS,
            connect_timeout: None,
            max_reply_bytes: DEFAULT_MAX_REPLY_BYTES,
        }
    }
}
