use colored::*;
use portcheck_common::network::result::{Classification, ProbeResult};

use crate::terminal::colors;

pub fn classification_color(classification: Classification) -> Color {
    match classification {
        Classification::ConnectedAcknowledged => colors::STATUS_OK,
        Classification::ConnectedRejected | Classification::ConnectedMalformed => colors::STATUS_NOT_OK,
        Classification::ClosedOrRefused | Classification::TimedOut => colors::STATUS_DOWN,
        Classification::Error => colors::STATUS_ERROR,
    }
}

/// `<source> <endpoint> <description> -> <status>`, status coloured by outcome.
pub fn result_line(result: &ProbeResult) -> String {
    let target = &result.target;
    let status: ColoredString = result
        .status()
        .color(classification_color(result.classification));
    format!(
        "{} {} {} {} {}",
        target.source.color(colors::PRIMARY),
        target.endpoint.to_string().color(colors::ACCENT),
        target.description.color(colors::TEXT_DEFAULT),
        "->".color(colors::SEPARATOR),
        status
    )
}
