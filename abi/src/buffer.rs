//! # Serial Buffer
//!
//! A growable byte sequence with an independent read cursor. Writers append
//! at the end; readers consume from `read_pos` forward. The cursor never
//! moves past the written region, so every read either succeeds completely
//! or fails with [`SerializeError::ReadPastEnd`] and leaves the cursor
//! where it was.

use crate::error::{SerializeError, SerializeResult};

/// Append-only byte buffer with a read cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerialBuffer {
    data: Vec<u8>,
    read_pos: usize,
}

impl SerialBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps existing bytes for reading, cursor at zero.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            data: bytes.into(),
            read_pos: 0,
        }
    }

    /// Appends a single byte.
    pub fn push(&mut self, byte: u8) {
        self.data.push(byte);
    }

    /// Appends raw bytes with no length prefix.
    pub fn push_array(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Consumes one byte.
    pub fn get(&mut self) -> SerializeResult<u8> {
        let [byte] = self.get_array::<1>()?;
        Ok(byte)
    }

    /// Consumes exactly `len` bytes.
    pub fn get_bytes(&mut self, len: usize) -> SerializeResult<&[u8]> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(SerializeError::ReadPastEnd {
                wanted: len,
                remaining,
            });
        }
        let start = self.read_pos;
        self.read_pos += len;
        Ok(&self.data[start..self.read_pos])
    }

    /// Consumes exactly `N` bytes into a fixed array.
    pub fn get_array<const N: usize>(&mut self) -> SerializeResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.get_bytes(N)?);
        Ok(out)
    }

    /// Rewinds the cursor to the first byte.
    pub fn restart_read(&mut self) {
        self.read_pos = 0;
    }

    /// `true` while unread bytes remain.
    pub fn have_read_data(&self) -> bool {
        self.read_pos < self.data.len()
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.read_pos
    }

    /// Current cursor position.
    pub fn read_position(&self) -> usize {
        self.read_pos
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The full written region, independent of the cursor.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}
