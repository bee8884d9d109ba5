pub mod check;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use portcheck_common::config::{Config, DEFAULT_READ_TIMEOUT_MS, DEFAULT_TIMEOUT_ROUNDS, ProbeSettings};

#[derive(Parser)]
#[command(name = "portcheck")]
#[command(about = "Checks that HL7 receivers behind MLLP endpoints answer a test message.")]
pub struct CommandLine {
    /// Target lists, one `source host port [description]` per line
    pub files: Vec<PathBuf>,

    /// Show every raw reply and session detail
    #[arg(short, long)]
    pub verbose: bool,

    /// Milliseconds a read waits before the peer gets nudged
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_READ_TIMEOUT_MS)]
    pub read_timeout: u64,

    /// Read rounds, each ending in a timeout and a nudge, before a probe gives up
    #[arg(
        long,
        value_name = "N",
        default_value_t = DEFAULT_TIMEOUT_ROUNDS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub rounds: u32,

    /// Give up connecting after this many milliseconds (system default if unset)
    #[arg(long, value_name = "MS")]
    pub connect_timeout: Option<u64>,

    /// Never wait for Enter
    #[arg(long)]
    pub no_pause: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn to_config(&self) -> Config {
        Config {
            verbose: self.verbose,
            no_pause: self.no_pause,
            probe: ProbeSettings {
                read_timeout: Duration::from_millis(self.read_timeout),
                max_timeout_rounds: self.rounds,
                connect_timeout: self.connect_timeout.map(Duration::from_millis),
                ..ProbeSettings::default()
            },
        }
    }
}
