mod commands;
mod terminal;

use commands::{CommandLine, check};
use portcheck_common::config::Config;
use terminal::{print, spinner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();
    let cfg: Config = commands.to_config();

    spinner::init_logging(cfg.verbose);
    print::header("loading targets");

    check::check(&commands.files, &cfg).await
}
