//! Reads target list files and resolves their hosts into IPv4 targets.

use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use portcheck_common::network::target::{ListLine, Target, TargetLine};
use portcheck_common::{success, warn};
use tracing::{debug, error};

mod resolver;

pub use resolver::{DnsResolver, Resolver};

/// Loads every file in order. Missing or unreadable files are reported and
/// skipped; the targets of the other files are still returned.
pub async fn load_targets<R>(paths: &[PathBuf], resolver: &R) -> Vec<Target>
where
    R: Resolver + ?Sized,
{
    let mut targets = Vec::new();
    for path in paths {
        if !path.exists() {
            warn!("file {} does not exist", path.display());
            continue;
        }
        match load_file(path, resolver).await {
            Ok(found) => targets.extend(found),
            Err(e) => error!("{e:#}"),
        }
    }

    let len = targets.len();
    let unit = if len == 1 { "target has" } else { "targets have" };
    success!("{len} {unit} been loaded");
    targets
}

pub async fn load_file<R>(path: &Path, resolver: &R) -> anyhow::Result<Vec<Target>>
where
    R: Resolver + ?Sized,
{
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading target list {}", path.display()))?;
    Ok(parse_list(&text, resolver).await)
}

/// Turns the lines of one list into targets, stopping at an `exit` line.
pub async fn parse_list<R>(text: &str, resolver: &R) -> Vec<Target>
where
    R: Resolver + ?Sized,
{
    let mut targets = Vec::new();
    for raw in text.lines() {
        match ListLine::from_str(raw) {
            Ok(ListLine::Skip) => {}
            Ok(ListLine::Exit) => break,
            Ok(ListLine::Entry(line)) => match resolve_line(&line, resolver).await {
                Ok(resolved) => targets.extend(resolved),
                Err(e) => error!("{e:#}"),
            },
            Err(e) => warn!("{e}"),
        }
    }
    targets
}

/// One target per IPv4 address of the line's host.
///
/// When the resolver does not know the host, the host is taken as a literal
/// IPv4 address instead.
async fn resolve_line<R>(line: &TargetLine, resolver: &R) -> anyhow::Result<Vec<Target>>
where
    R: Resolver + ?Sized,
{
    let addrs = match resolver.resolve(&line.host, line.port).await {
        Ok(addrs) => addrs,
        Err(e) => {
            warn!("host {} is not known to DNS!", line.host);
            debug!("resolving {}: {e}", line.host);
            let literal = Ipv4Addr::from_str(&line.host).with_context(|| {
                format!("second field must contain hostname or ip-address: {}", line.host)
            })?;
            return Ok(vec![line.to_target(literal)]);
        }
    };

    let targets: Vec<Target> = addrs
        .iter()
        .filter_map(|addr| match addr {
            IpAddr::V4(v4) => Some(line.to_target(*v4)),
            IpAddr::V6(_) => None,
        })
        .collect();

    anyhow::ensure!(!targets.is_empty(), "{} has no IPv4 address list", line.host);
    Ok(targets)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
