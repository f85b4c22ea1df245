//! Binary writer for building byte buffers.
//!
//! [`BinaryWriter`] is the output counterpart of
//! [`BinaryReader`](crate::BinaryReader): an append-only buffer with
//! explicit little- and big-endian integer writes and zero-fill alignment.

/// A growable binary output buffer.
#[derive(Debug, Clone, Default)]
pub struct BinaryWriter {
    buffer: Vec<u8>,
}

impl BinaryWriter {
    /// Create a new empty writer.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with a pre-allocated capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Get the current write position (the number of bytes written).
    #[inline]
    pub fn position(&self) -> usize {
        self.buffer.len()
    }

    /// Append raw bytes.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Append a single byte.
    #[inline]
    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    /// Append a little-endian u16.
    #[inline]
    pub fn write_u16(&mut self, value: u16) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Append a little-endian i16.
    #[inline]
    pub fn write_i16(&mut self, value: i16) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Append a little-endian u32.
    #[inline]
    pub fn write_u32(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Append a little-endian i32.
    #[inline]
    pub fn write_i32(&mut self, value: i32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Append a big-endian u16.
    #[inline]
    pub fn write_u16_be(&mut self, value: u16) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    /// Append a big-endian u32.
    #[inline]
    pub fn write_u32_be(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    /// Append a big-endian i32.
    #[inline]
    pub fn write_i32_be(&mut self, value: i32) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    /// Append a little-endian f32.
    #[inline]
    pub fn write_f32(&mut self, value: f32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Append string bytes followed by a null terminator.
    pub fn write_cstring(&mut self, value: &str) {
        self.buffer.extend_from_slice(value.as_bytes());
        self.buffer.push(0);
    }

    /// Zero-fill up to the next multiple of `alignment`.
    pub fn align_to(&mut self, alignment: usize) {
        debug_assert!(alignment.is_power_of_two());
        let rem = self.buffer.len() % alignment;
        if rem != 0 {
            self.buffer.resize(self.buffer.len() + alignment - rem, 0);
        }
    }

    /// Consume the writer and return the written bytes.
    #[inline]
    pub fn into_vec(self) -> Vec<u8> {
        self.buffer
    }

    /// Borrow the written bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BinaryReader;

    #[test]
    fn test_write_primitives() {
        let mut writer = BinaryWriter::new();
        writer.write_u32(0x04030201);
        writer.write_u32_be(0x01020304);

        assert_eq!(
            writer.as_slice(),
            &[0x01, 0x02, 0x03, 0x04, 0x01, 0x02, 0x03, 0x04]
        );
    }

    #[test]
    fn test_align_to_zero_fills() {
        let mut writer = BinaryWriter::new();
        writer.write_u8(0xFF);
        writer.align_to(16);

        assert_eq!(writer.position(), 16);
        assert_eq!(&writer.as_slice()[1..], &[0u8; 15]);
    }

    #[test]
    fn test_reader_writer_round_trip() {
        let mut writer = BinaryWriter::new();
        writer.write_u16(0xBEEF);
        writer.write_i32(-7);
        writer.write_f32(2.25);
        writer.write_cstring("mesh");

        let bytes = writer.into_vec();
        let mut reader = BinaryReader::new(&bytes);
        assert_eq!(reader.read_u16().unwrap(), 0xBEEF);
        assert_eq!(reader.read_i32().unwrap(), -7);
        assert_eq!(reader.read_f32().unwrap(), 2.25);
        assert_eq!(reader.read_cstring().unwrap(), "mesh");
    }
}
