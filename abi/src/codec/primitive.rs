//! Variable-length integers, length-prefixed strings and byte blobs, and
//! hex conversion.
//!
//! These are the raw wire helpers every other codec builds on. They take
//! and return native Rust values; JSON coercion lives one layer up.

use crate::buffer::SerialBuffer;
use crate::config::MAX_VARUINT32_BYTES;
use crate::error::{SerializeError, SerializeResult};

// ---------------------------------------------------------------------------
// LEB128
// ---------------------------------------------------------------------------

/// Appends `value` as unsigned LEB128: seven bits per byte, low group
/// first, high bit set on every byte except the last.
pub fn push_varuint32(buf: &mut SerialBuffer, mut value: u32) {
    loop {
        if value >> 7 == 0 {
            buf.push(value as u8);
            return;
        }
        buf.push(0x80 | (value & 0x7f) as u8);
        value >>= 7;
    }
}

/// Reads an unsigned LEB128 value. Encodings longer than five bytes, or a
/// fifth byte carrying bits above 2^32, are rejected.
pub fn get_varuint32(buf: &mut SerialBuffer) -> SerializeResult<u32> {
    let mut value: u32 = 0;
    for group in 0..MAX_VARUINT32_BYTES {
        let byte = buf.get()?;
        let bits = u32::from(byte & 0x7f);
        if group == MAX_VARUINT32_BYTES - 1 && bits > 0x0f {
            return Err(SerializeError::OutOfRange {
                ty: "varuint32",
                value: "encoding exceeds 32 bits".into(),
            });
        }
        value |= bits << (7 * group);
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(SerializeError::OutOfRange {
        ty: "varuint32",
        value: "encoding longer than 5 bytes".into(),
    })
}

/// Appends `value` zigzag-mapped onto the unsigned LEB128 encoding, so small
/// magnitudes of either sign stay short.
pub fn push_varint32(buf: &mut SerialBuffer, value: i32) {
    push_varuint32(buf, ((value << 1) ^ (value >> 31)) as u32);
}

pub fn get_varint32(buf: &mut SerialBuffer) -> SerializeResult<i32> {
    let raw = get_varuint32(buf)?;
    Ok((raw >> 1) as i32 ^ -((raw & 1) as i32))
}

// ---------------------------------------------------------------------------
// Length-prefixed payloads
// ---------------------------------------------------------------------------

/// Appends a varuint32 length followed by the raw bytes.
pub fn push_bytes(buf: &mut SerialBuffer, bytes: &[u8]) -> SerializeResult<()> {
    let len = u32::try_from(bytes.len()).map_err(|_| SerializeError::OutOfRange {
        ty: "bytes",
        value: format!("length {}", bytes.len()),
    })?;
    push_varuint32(buf, len);
    buf.push_array(bytes);
    Ok(())
}

pub fn get_bytes(buf: &mut SerialBuffer) -> SerializeResult<Vec<u8>> {
    let len = get_varuint32(buf)? as usize;
    Ok(buf.get_bytes(len)?.to_vec())
}

/// Appends a UTF-8 string with a varuint32 byte-length prefix.
pub fn push_string(buf: &mut SerialBuffer, value: &str) -> SerializeResult<()> {
    push_bytes(buf, value.as_bytes())
}

pub fn get_string(buf: &mut SerialBuffer) -> SerializeResult<String> {
    String::from_utf8(get_bytes(buf)?).map_err(|_| SerializeError::InvalidUtf8)
}

// ---------------------------------------------------------------------------
// Hex
// ---------------------------------------------------------------------------

/// Decodes a hex string of either case.
pub fn hex_to_bytes(value: &str) -> SerializeResult<Vec<u8>> {
    hex::decode(value).map_err(|e| match e {
        hex::FromHexError::OddLength => SerializeError::InvalidHex("odd number of hex digits".into()),
        other => SerializeError::InvalidHex(other.to_string()),
    })
}

/// Encodes bytes as uppercase hex, the canonical external form.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

/// Decodes hex that must describe exactly `size` bytes.
pub fn hex_to_fixed(value: &str, size: usize) -> SerializeResult<Vec<u8>> {
    let bytes = hex_to_bytes(value)?;
    if bytes.len() != size {
        return Err(SerializeError::WrongSize {
            expected: size,
            actual: bytes.len(),
        });
    }
    Ok(bytes)
}
