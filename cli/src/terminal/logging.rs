//! Event formatter for the status stream.
//!
//! Every line opens with a bracketed marker. Debug and trace lines also name
//! the module they came from, so `-v` output can be followed back to the
//! session, loader or coordinator.

use colored::*;
use portcheck_common::SUCCESS_TARGET;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::fmt::{FmtContext, FormatEvent};
use tracing_subscriber::registry::LookupSpan;

type Paint = fn(ColoredString) -> ColoredString;

pub struct PortcheckFormatter;

/// Marker and colour for an event of `level` emitted under `target`.
fn marker(level: Level, target: &str) -> (&'static str, Paint) {
    match level {
        Level::INFO if target == SUCCESS_TARGET => ("[✓]", |s| s.bright_green().bold()),
        Level::INFO => ("[+]", |s| s.green().bold()),
        Level::WARN => ("[*]", |s| s.yellow().bold()),
        Level::ERROR => ("[-]", |s| s.red().bold()),
        Level::DEBUG => ("[?]", |s| s.blue()),
        Level::TRACE => ("[ ]", |s| s.dimmed()),
    }
}

/// Last path segment of a module target, `None` for non-verbose levels.
fn origin(level: Level, target: &str) -> Option<&str> {
    match level {
        Level::DEBUG | Level::TRACE => target.rsplit("::").next().filter(|m| !m.is_empty()),
        _ => None,
    }
}

impl<S, N> FormatEvent<S, N> for PortcheckFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> std::fmt::Result {
        let meta = event.metadata();
        let (symbol, paint) = marker(*meta.level(), meta.target());

        write!(writer, "{} ", paint(symbol.into()))?;
        if let Some(module) = origin(*meta.level(), meta.target()) {
            write!(writer, "{} ", format!("{module}:").as_str().dimmed())?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
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
