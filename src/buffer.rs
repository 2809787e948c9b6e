//! Growable byte buffer the assembler emits machine code into.

use byteorder::{ByteOrder, LittleEndian};

const INITIAL_CAPACITY: usize = 16;

/// An append-only byte buffer.
///
/// Each op owns one of these; an empty buffer is the sentinel for a
/// branch op whose encoding has not been selected yet. Immediates wider
/// than a byte are written explicitly little-endian, independent of the
/// host byte order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeBuf {
    bytes: Vec<u8>,
}

impl CodeBuf {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self {
            bytes: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    /// Append a single byte.
    pub fn push(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    /// Append a slice of bytes.
    pub fn extend(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Append a 32-bit immediate in little-endian order.
    pub fn write_i32_le(&mut self, value: i32) {
        let mut raw = [0u8; 4];
        LittleEndian::write_i32(&mut raw, value);
        self.bytes.extend_from_slice(&raw);
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The written bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the buffer, yielding its bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }
}
