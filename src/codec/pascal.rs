//! Length-prefixed ("Pascal") strings: `[len: u8][payload; len]`.
//!
//! The text encoding is always passed in explicitly. Encoding never emits
//! more than `capacity` payload bytes; truncation happens on a character
//! boundary so a multi-byte sequence is never split.

use encoding_rs::{EncoderResult, Encoding};

/// Result of [`encode`]. `bytes` includes the length prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedString {
    pub bytes:     Vec<u8>,
    /// The text that was actually encoded (a prefix of the input).
    pub stored:    String,
    pub truncated: bool,
}

impl EncodedString {
    pub fn payload_len(&self) -> usize {
        self.bytes.len() - 1
    }
}

/// Decode a Pascal string. Never fails: an oversized length byte is clamped
/// to the bytes available and malformed sequences become U+FFFD.
pub fn decode(data: &[u8], encoding: &'static Encoding) -> String {
    let Some((&len, rest)) = data.split_first() else {
        return String::new();
    };
    let len = (len as usize).min(rest.len());
    if len == 0 {
        return String::new();
    }
    let (text, had_errors) = encoding.decode_without_bom_handling(&rest[..len]);
    if had_errors {
        log::warn!("string payload is not valid {}; undecodable bytes replaced", encoding.name());
    }
    text.into_owned()
}

/// Encode `text` with at most `capacity` payload bytes.
///
/// Output is sized to the content, not padded to capacity. Returns `None`
/// when `encoding` cannot be written (UTF-16, replacement) or when a
/// character has no representation in it.
pub fn encode(text: &str, capacity: u8, encoding: &'static Encoding) -> Option<EncodedString> {
    if encoding.output_encoding() != encoding {
        return None;
    }
    let capacity = capacity as usize;
    let mut payload = Vec::with_capacity(capacity);
    let mut kept = 0;
    let mut scratch = [0u8; 4];
    let mut out = [0u8; 16];

    for (idx, ch) in text.char_indices() {
        let (result, _, written) = encoding
            .new_encoder()
            .encode_from_utf8_without_replacement(ch.encode_utf8(&mut scratch), &mut out, true);
        if result != EncoderResult::InputEmpty {
            log::debug!("{ch:?} is not representable in {}", encoding.name());
            return None;
        }
        if payload.len() + written > capacity {
            break;
        }
        payload.extend_from_slice(&out[..written]);
        kept = idx + ch.len_utf8();
    }

    let mut bytes = Vec::with_capacity(payload.len() + 1);
    bytes.push(payload.len() as u8);
    bytes.extend_from_slice(&payload);

    Some(EncodedString {
        bytes,
        stored:    text[..kept].to_owned(),
        truncated: kept < text.len(),
    })
}
