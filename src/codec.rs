use std::borrow::Cow;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// Lossy, invalid sequences become U+FFFD the way a browser text decoder does.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

pub fn decode_be16(bytes: &[u8]) -> Result<u16, CodecError> {
    match bytes {
        [hi, lo, ..] => Ok(u16::from_be_bytes([*hi, *lo])),
        _ => Err(CodecError::InvalidLength {
            expected: 2,
            actual: bytes.len(),
        }),
    }
}

pub fn to_hex(value: u64, pad: usize) -> String {
    format!("{value:0pad$x}")
}

pub fn to_printable_ascii(byte: u8) -> char {
    if (0x20..=0x7e).contains(&byte) {
        byte as char
    } else {
        '.'
    }
}
