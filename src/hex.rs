//! Whitespace separated hex payloads, as typed into the write prompt and as
//! shown in the value labels.

use crate::{Error, Result};

/// Parses `"00 23 0A"` into `[0x00, 0x23, 0x0A]`.
///
/// Runs of whitespace are treated as one separator. Every token must be
/// exactly two hex digits.
pub fn parse_hex_bytes(text: &str) -> Result<Vec<u8>> {
    text.split_whitespace().map(parse_token).collect()
}

fn parse_token(token: &str) -> Result<u8> {
    if token.len() != 2 || !token.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::InvalidHexToken(token.to_string()));
    }
    u8::from_str_radix(token, 16).map_err(|_| Error::InvalidHexToken(token.to_string()))
}

/// Renders bytes as uppercase pairs separated by single spaces.
pub fn to_hex_string(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
