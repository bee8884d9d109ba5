//! Minimal lower layer protocol framing.
//!
//! A frame is `<VT> payload <FS><CR>`. All protocol text travels as
//! ISO-8859-1, one byte per character.

pub const START_BLOCK: u8 = 0x0B;
pub const END_BLOCK: u8 = 0x1C;
pub const CARRIAGE_RETURN: u8 = 0x0D;
pub const TERMINATOR: [u8; 2] = [END_BLOCK, CARRIAGE_RETURN];

/// How many terminators make up the nudge sent after a silent read.
pub const FILLER_REPEAT: usize = 10;

/// Bytes sent to a peer that went quiet, to make it flush a pending reply.
pub fn filler() -> Vec<u8> {
    TERMINATOR.repeat(FILLER_REPEAT)
}

/// Wraps `payload` into a complete frame.
pub fn frame(payload: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(payload.len() + 3);
    bytes.push(START_BLOCK);
    bytes.extend(encode_latin1(payload));
    bytes.extend_from_slice(&TERMINATOR);
    bytes
}

/// Offset just past the first terminator in `buf`, if there is one.
pub fn find_terminator(buf: &[u8]) -> Option<usize> {
    buf.windows(TERMINATOR.len())
        .position(|window| window == TERMINATOR)
        .map(|start| start + TERMINATOR.len())
}

/// Like [`find_terminator`], for a buffer whose first `from` bytes were
/// already searched. Only the new bytes, plus one byte of overlap for a
/// terminator split across reads, are scanned.
pub fn find_terminator_from(buf: &[u8], from: usize) -> Option<usize> {
    let start = from.min(buf.len()).saturating_sub(TERMINATOR.len() - 1);
    find_terminator(&buf[start..]).map(|end| start + end)
}

/// Characters outside Latin-1 become `?`.
pub fn encode_latin1(text: &str) -> Vec<u8> {
    text.chars().map(|c| u8::try_from(c).unwrap_or(b'?')).collect()
}

pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Makes the framing characters readable for reports and logs.
pub fn render_visible(text: &str) -> String {
    text.replace('\r', "<CR>")
        .replace(char::from(START_BLOCK), "<VT>")
        .replace(char::from(END_BLOCK), "<FS>")
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
