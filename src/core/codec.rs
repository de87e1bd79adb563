//! Text-safe encoding of binary payloads.
//!
//! Standard base64 with padding. Encoded output never contains line breaks;
//! decoding ignores ASCII whitespace so wrapped or CRLF-terminated input from
//! files and terminals is accepted.

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::error::DecodeError;

/// Encode bytes as a single line of base64.
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode base64 text back into bytes.
///
/// # Errors
///
/// Returns `DecodeError::Base64` on characters outside the alphabet or
/// incorrect padding.
pub fn decode(text: &str) -> Result<Vec<u8>, DecodeError> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    Ok(STANDARD.decode(compact)?)
}
