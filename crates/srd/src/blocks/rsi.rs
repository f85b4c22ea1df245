//! `$RSI` resource index block.
//!
//! Pairs resource name strings with a resource-data blob. For geometry the
//! blob's first 8 bytes are (vertex data offset, vertex data length) into
//! the bulk-data segment, followed after 16-byte alignment by the face
//! table's (offset, length); the mesh pipeline interprets those, this
//! decoder only carves the blob out of the payload.

use srd_common::BinaryReader;

use super::BlockPayload;
use crate::block::BlockTag;
use crate::Warning;

/// Decoded `$RSI` payload.
///
/// Local layout: a 16-byte header (`unknown00: u16`, `string_count: u16`,
/// `data_offset: u32`, `data_len: u32`, `unknown0c: u32`, little-endian),
/// then the null-terminated name strings, then the resource-data blob at
/// `data_offset`.
#[derive(Debug, Clone, Default)]
pub struct RsiPayload {
    pub unknown00: u16,
    /// Number of resource name strings.
    pub string_count: u16,
    /// Payload-relative offset of the resource-data blob.
    pub data_offset: u32,
    /// Length of the resource-data blob.
    pub data_len: u32,
    pub unknown0c: u32,
    /// Resource name strings; the first names the mesh object.
    pub strings: Vec<String>,
    /// The resource-data blob, clamped to the payload.
    pub resource_data: Vec<u8>,
    /// Original payload bytes, re-emitted on encode.
    pub raw: Vec<u8>,
}

impl RsiPayload {
    pub(crate) fn decode(payload: &[u8], warnings: &mut Vec<Warning>) -> BlockPayload {
        let mut p = Self {
            raw: payload.to_vec(),
            ..Self::default()
        };
        if let Err(e) = p.read_from(payload, warnings) {
            warnings.push(Warning::TruncatedPayload {
                tag: BlockTag::RSI,
                detail: e.to_string(),
            });
        }
        BlockPayload::Rsi(p)
    }

    fn read_from(&mut self, data: &[u8], warnings: &mut Vec<Warning>) -> srd_common::Result<()> {
        let mut reader = BinaryReader::new(data);

        self.unknown00 = reader.read_u16()?;
        self.string_count = reader.read_u16()?;
        self.data_offset = reader.read_u32()?;
        self.data_len = reader.read_u32()?;
        self.unknown0c = reader.read_u32()?;

        for _ in 0..self.string_count {
            self.strings.push(reader.read_cstring()?.to_string());
        }
        if reader.position() > self.data_offset as usize {
            warnings.push(Warning::StringOverrun {
                tag: BlockTag::RSI,
                offset: reader.position(),
            });
        }

        let start = (self.data_offset as usize).min(data.len());
        let end = (self.data_offset as usize)
            .saturating_add(self.data_len as usize)
            .min(data.len());
        if end - start < self.data_len as usize {
            warnings.push(Warning::TruncatedPayload {
                tag: BlockTag::RSI,
                detail: format!(
                    "resource data clamped to {} of {} bytes",
                    end - start,
                    self.data_len
                ),
            });
        }
        self.resource_data = data[start..end].to_vec();

        Ok(())
    }

    /// Name of the resource, taken from the first string.
    pub fn resource_name(&self) -> Option<&str> {
        self.strings.first().map(String::as_str)
    }

    pub(crate) fn info(&self) -> String {
        format!(
            "Strings: {}\nResource Data: {} bytes",
            self.strings.join(", "),
            self.resource_data.len()
        )
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use srd_common::BinaryWriter;

    /// Payload with one name string and the given resource-data blob.
    pub(crate) fn sample_payload(name: &str, blob: &[u8]) -> Vec<u8> {
        let mut w = BinaryWriter::new();
        let strings_end = 16 + name.len() + 1;
        let data_offset = strings_end.next_multiple_of(16) as u32;

        w.write_u16(0); // unknown00
        w.write_u16(1); // string_count
        w.write_u32(data_offset);
        w.write_u32(blob.len() as u32);
        w.write_u32(0); // unknown0c
        w.write_cstring(name);
        w.align_to(16);
        w.write_bytes(blob);
        w.into_vec()
    }

    #[test]
    fn test_decode() {
        let blob = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let payload = sample_payload("env_table", &blob);

        let mut warnings = Vec::new();
        let BlockPayload::Rsi(p) = RsiPayload::decode(&payload, &mut warnings) else {
            panic!("wrong variant");
        };

        assert_eq!(p.strings, vec!["env_table".to_string()]);
        assert_eq!(p.resource_name(), Some("env_table"));
        assert_eq!(p.resource_data, blob);
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    }

    #[test]
    fn test_blob_clamped_with_warning() {
        let mut payload = sample_payload("short", &[0xAA; 8]);
        payload.truncate(payload.len() - 4);

        let mut warnings = Vec::new();
        let BlockPayload::Rsi(p) = RsiPayload::decode(&payload, &mut warnings) else {
            panic!("wrong variant");
        };

        assert_eq!(p.resource_data, vec![0xAA; 4]);
        assert!(warnings
            .iter()
            .any(|w| matches!(w, Warning::TruncatedPayload { .. })));
    }

    #[test]
    fn test_string_overrun_warning() {
        let mut payload = sample_payload("name", &[0u8; 4]);
        // Pull the blob offset back into the string table
        payload[4..8].copy_from_slice(&8u32.to_le_bytes());

        let mut warnings = Vec::new();
        RsiPayload::decode(&payload, &mut warnings);

        assert!(warnings
            .iter()
            .any(|w| matches!(w, Warning::StringOverrun { .. })));
    }
}
