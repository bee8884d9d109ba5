//! The handshake test message and the reading of the peer's acknowledgment.
//!
//! The test message is a three segment MDM^T11 notification. Its last segment
//! is deliberately invalid, so a peer that validates its input answers with an
//! application reject (`MSA|AR`) naming the processing id. Getting exactly that
//! rejection back is what counts as a healthy peer.

use portcheck_common::error::ProbeError;
use portcheck_common::network::result::{Annotation, Classification};

use crate::mllp;

pub const SEGMENT_SEPARATOR: char = '\r';
pub const FIELD_SEPARATOR: char = '|';

const REJECT_CODE: &str = "AR";
const REJECT_TEXT: &str = "Incorrect Processing ID";

/// Index of the sending application in the header segment.
const SENDING_APPLICATION: usize = 2;
const ACK_CODE: usize = 1;
const ACK_CONTROL_ID: usize = 2;
const ACK_TEXT: usize = 3;

/// The only message id a probe ever sends.
const EXPECTED_CONTROL_ID: i32 = 0;

/// Payload of the test message, unframed.
pub fn test_message(source: &str) -> String {
    [
        format!("MSH|^~\\&|{source}|Test|Epic|Testing|20230101000000||MDM^T11|0|F|2.5||||||8859/1|"),
        "NTE|1||Test message|".to_string(),
        "G|Garbage, should get rejected|".to_string(),
    ]
    .iter()
    .fold(String::new(), |mut msg, segment| {
        msg.push_str(segment);
        msg.push(SEGMENT_SEPARATOR);
        msg
    })
}

/// How a reply was judged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub classification: Classification,
    pub annotations: Vec<Annotation>,
    pub detail: String,
}

/// Judges the decoded `reply` to a test message sent as `sent_source`.
///
/// `timed_out` tells whether the last read round ended without data; it only
/// matters when the reply is too short to parse.
pub fn classify_reply(reply: &str, sent_source: &str, timed_out: bool) -> Result<Verdict, ProbeError> {
    let segments: Vec<&str> = reply.split(SEGMENT_SEPARATOR).collect();

    let [header, ack, ..] = segments.as_slice() else {
        let classification = if timed_out {
            Classification::TimedOut
        } else {
            Classification::ConnectedMalformed
        };
        return Ok(Verdict {
            classification,
            annotations: Vec::new(),
            detail: mllp::render_visible(reply),
        });
    };

    let mut annotations = Vec::new();

    let header_fields: Vec<&str> = header.split(FIELD_SEPARATOR).collect();
    let echoed = header_fields
        .get(SENDING_APPLICATION)
        .ok_or(ProbeError::MissingField {
            segment: "MSH",
            index: SENDING_APPLICATION,
        })?;
    if *echoed != sent_source {
        annotations.push(Annotation::ApplicationMismatch {
            sent: sent_source.to_string(),
            received: echoed.to_string(),
        });
    }

    let ack_fields: Vec<&str> = ack.split(FIELD_SEPARATOR).collect();
    if let Some(raw_id) = ack_fields.get(ACK_CONTROL_ID) {
        let id = raw_id
            .trim()
            .parse::<i32>()
            .map_err(|source| ProbeError::BadSequenceId {
                value: raw_id.to_string(),
                source,
            })?;
        if id != EXPECTED_CONTROL_ID {
            annotations.push(Annotation::SequenceMismatch { id });
        }
    }

    let rejected_as_expected = ack_fields.len() > ACK_TEXT
        && ack_fields[ACK_CODE] == REJECT_CODE
        && ack_fields[ACK_TEXT] == REJECT_TEXT;

    let verdict = if rejected_as_expected {
        Verdict {
            classification: Classification::ConnectedAcknowledged,
            annotations,
            detail: String::new(),
        }
    } else {
        Verdict {
            classification: Classification::ConnectedRejected,
            annotations,
            detail: format!("{}<CR>{}", header.trim(), ack.trim()),
        }
    };
    Ok(verdict)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;

    const ACK_HEADER: &str = "\u{b}MSH|^~\\&|Test|Epic|LAB|Testing|20230101000001||ACK^T11|1|P|2.5";

    #[test]
    fn test_message_is_bit_exact() {
        let framed = mllp::frame(&test_message("LAB_ADT"));
        let expected: &[u8] = b"\x0bMSH|^~\\&|LAB_ADT|Test|Epic|Testing|20230101000000||MDM^T11|0|F|2.5||||||8859/1|\r\
NTE|1||Test message|\r\
G|Garbage, should get rejected|\r\
\x1c\r";
        assert_eq!(framed, expected);
    }

    #[test]
    fn expected_reject_is_acknowledged() {
        let reply = "\u{b}MSH|^~\\&|LAB|Epic\rMSA|AR|0|Incorrect Processing ID\r\u{1c}\r";
        let verdict = classify_reply(reply, "LAB", false).unwrap();
        assert_eq!(verdict.classification, Classification::ConnectedAcknowledged);
        assert!(verdict.annotations.is_empty());
    }

    #[test]
    fn other_ack_is_rejected_and_notes_mismatch() {
        let reply = format!("{ACK_HEADER}\rMSA|AA|0|\r\u{1c}\r");
        let verdict = classify_reply(&reply, "LAB", false).unwrap();
        assert_eq!(verdict.classification, Classification::ConnectedRejected);
        assert_eq!(
            verdict.annotations,
            vec![Annotation::ApplicationMismatch {
                sent: "LAB".to_string(),
                received: "Test".to_string(),
            }]
        );
        assert_eq!(
            verdict.detail,
            "MSH|^~\\&|Test|Epic|LAB|Testing|20230101000001||ACK^T11|1|P|2.5<CR>MSA|AA|0|"
        );
    }

    #[test]
    fn annotations_do_not_change_the_outcome() {
        let reply = "\u{b}MSH|^~\\&|OTHER\rMSA|AR|7|Incorrect Processing ID\r";
        let verdict = classify_reply(reply, "LAB", false).unwrap();
        assert_eq!(verdict.classification, Classification::ConnectedAcknowledged);
        assert_eq!(verdict.annotations.len(), 2);
        assert_eq!(verdict.annotations[1], Annotation::SequenceMismatch { id: 7 });
    }

    #[test]
    fn single_segment_depends_on_timeout_flag() {
        let reply = "\u{b}MSA|AR|0";
        let timed_out = classify_reply(reply, "LAB", true).unwrap();
        assert_eq!(timed_out.classification, Classification::TimedOut);
        assert_eq!(timed_out.detail, "<VT>MSA|AR|0");

        let malformed = classify_reply(reply, "LAB", false).unwrap();
        assert_eq!(malformed.classification, Classification::ConnectedMalformed);

        let empty = classify_reply("", "LAB", true).unwrap();
        assert_eq!(empty.classification, Classification::TimedOut);
        assert_eq!(empty.detail, "");
    }

    #[test]
    fn unparsable_fields_are_errors() {
        let bad_id = classify_reply("MSH|^~\\&|LAB\rMSA|AR|x|Incorrect Processing ID", "LAB", false);
        assert!(matches!(bad_id, Err(ProbeError::BadSequenceId { .. })));

        let short_header = classify_reply("MSH\rMSA|AR|0|Incorrect Processing ID", "LAB", false);
        assert!(matches!(
            short_header,
            Err(ProbeError::MissingField { segment: "MSH", index: 2 })
        ));
    }
}
