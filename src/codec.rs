//! URL-safe, unpadded base64 for token segments.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

use crate::error::SessionError;

/// Encode raw bytes as one token segment.
pub fn encode_segment(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode one token segment back into bytes.
///
/// Padding characters and non-canonical trailing bits are rejected.
pub fn decode_segment(segment: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_NO_PAD.decode(segment)
}

/// Encode UTF-8 text with the segment alphabet.
pub fn base64_url_encode(text: &str) -> String {
    encode_segment(text.as_bytes())
}

/// Inverse of [`base64_url_encode`].
///
/// Fails with [`SessionError::Decode`] on malformed input or when the
/// decoded bytes are not UTF-8.
pub fn base64_url_decode(text: &str) -> Result<String, SessionError> {
    let bytes = decode_segment(text).map_err(|e| SessionError::Decode(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| SessionError::Decode(e.to_string()))
}
