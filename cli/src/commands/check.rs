use std::path::PathBuf;
use std::time::{Duration, Instant};

use colored::*;
use portcheck_common::config::Config;
use portcheck_common::network::result::ProbeResult;
use portcheck_core::coordinator::ProbeCoordinator;
use portcheck_core::loader::{self, DnsResolver};
use portcheck_core::network::tcp::TcpConnector;

use crate::terminal::{colors, format, print, spinner};

pub async fn check(files: &[PathBuf], cfg: &Config) -> anyhow::Result<()> {
    let targets = loader::load_targets(files, &DnsResolver).await;
    if targets.is_empty() {
        print::header("no targets");
        print::no_results();
        return print::end_of_program(cfg.no_pause);
    }

    print::header(&format!("probing {} targets", targets.len()));

    let total = targets.len();
    spinner::report_probe_progress(0, total);

    let coordinator = ProbeCoordinator::new(TcpConnector::new(cfg.probe.connect_timeout), cfg.probe)
        .with_progress(spinner::report_probe_progress);

    let start_time = Instant::now();
    let results: Vec<ProbeResult> = coordinator.run(targets).await;
    spinner::finish();

    let lines: Vec<String> = results.iter().map(format::result_line).collect();
    print::paged(&lines, cfg.no_pause)?;
    print_summary(&results, start_time.elapsed());

    print::end_of_program(cfg.no_pause)
}

fn print_summary(results: &[ProbeResult], total_time: Duration) {
    let ok = results.iter().filter(|r| r.classification.is_ok()).count();
    let ok_count: ColoredString = format!("{ok}/{}", results.len()).bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output = format!("{ok_count} peers answered as expected in {total_time}")
        .color(colors::TEXT_DEFAULT)
        .to_string();

    print::print("");
    print::centerln(&output);
}
