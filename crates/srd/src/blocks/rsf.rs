//! `$RSF` resource folder block.

use srd_common::{BinaryReader, BinaryWriter};

use super::BlockPayload;
use crate::block::BlockTag;
use crate::Warning;

/// Expected `$RSF` magic, stored big-endian in the payload.
pub const RSF_MAGIC: u32 = 0x2452_5346;

/// Payload naming the folder the container's resources belong to.
#[derive(Debug, Clone, Default)]
pub struct RsfPayload {
    /// Embedded magic, expected to equal [`RSF_MAGIC`].
    pub magic: u32,
    pub unknown04: i32,
    pub unknown08: i32,
    pub unknown0c: i32,
    /// Null-terminated folder name.
    pub folder_name: String,
}

impl RsfPayload {
    pub(crate) fn decode(payload: &[u8], warnings: &mut Vec<Warning>) -> BlockPayload {
        let mut p = Self::default();
        if let Err(e) = p.read_from(&mut BinaryReader::new(payload)) {
            warnings.push(Warning::TruncatedPayload {
                tag: BlockTag::RSF,
                detail: e.to_string(),
            });
        }
        if payload.len() >= 4 && p.magic != RSF_MAGIC {
            warnings.push(Warning::MagicMismatch {
                tag: BlockTag::RSF,
                expected: RSF_MAGIC,
                actual: p.magic,
            });
        }
        BlockPayload::Rsf(p)
    }

    fn read_from(&mut self, reader: &mut BinaryReader<'_>) -> srd_common::Result<()> {
        self.magic = reader.read_u32_be()?;
        self.unknown04 = reader.read_i32()?;
        self.unknown08 = reader.read_i32()?;
        self.unknown0c = reader.read_i32()?;
        self.folder_name = reader.read_cstring()?.to_string();
        Ok(())
    }

    pub(crate) fn encode(payload: &BlockPayload) -> Option<Vec<u8>> {
        let BlockPayload::Rsf(p) = payload else {
            return None;
        };

        let mut writer = BinaryWriter::with_capacity(16 + p.folder_name.len() + 1);
        writer.write_u32_be(p.magic);
        writer.write_i32(p.unknown04);
        writer.write_i32(p.unknown08);
        writer.write_i32(p.unknown0c);
        writer.write_cstring(&p.folder_name);
        Some(writer.into_vec())
    }

    pub(crate) fn info(&self) -> String {
        format!(
            "Magic: {:#010x}\nUnknown04: {}\nUnknown08: {}\nUnknown0C: {}\nFolder Name: {}",
            self.magic, self.unknown04, self.unknown08, self.unknown0c, self.folder_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload_bytes() -> Vec<u8> {
        let mut bytes = RSF_MAGIC.to_be_bytes().to_vec();
        bytes.extend_from_slice(&10i32.to_le_bytes());
        bytes.extend_from_slice(&20i32.to_le_bytes());
        bytes.extend_from_slice(&30i32.to_le_bytes());
        bytes.extend_from_slice(b"model_data\0");
        bytes
    }

    #[test]
    fn test_decode() {
        let mut warnings = Vec::new();
        let decoded = RsfPayload::decode(&payload_bytes(), &mut warnings);

        let BlockPayload::Rsf(p) = decoded else {
            panic!("wrong variant");
        };
        assert_eq!(p.magic, RSF_MAGIC);
        assert_eq!(p.folder_name, "model_data");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_encode_round_trip() {
        let bytes = payload_bytes();
        let mut warnings = Vec::new();
        let decoded = RsfPayload::decode(&bytes, &mut warnings);
        assert_eq!(RsfPayload::encode(&decoded).unwrap(), bytes);
    }

    #[test]
    fn test_missing_terminator_is_warning() {
        let mut bytes = payload_bytes();
        bytes.pop(); // drop the NUL

        let mut warnings = Vec::new();
        let decoded = RsfPayload::decode(&bytes, &mut warnings);

        let BlockPayload::Rsf(p) = decoded else {
            panic!("wrong variant");
        };
        assert_eq!(p.magic, RSF_MAGIC);
        assert!(p.folder_name.is_empty());
        assert!(matches!(warnings[0], Warning::TruncatedPayload { .. }));
    }
}
