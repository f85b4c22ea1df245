//! `$CFH` container header marker block.

use srd_common::{BinaryReader, BinaryWriter};

use super::BlockPayload;
use crate::block::BlockTag;
use crate::Warning;

/// Expected `$CFH` magic, stored big-endian in the payload.
pub const CFH_MAGIC: u32 = 0x2443_4648;

/// Payload of the container header marker.
#[derive(Debug, Clone, Default)]
pub struct CfhPayload {
    /// Embedded magic, expected to equal [`CFH_MAGIC`].
    pub magic: u32,
    pub unknown04: i32,
    pub unknown08: i32,
    pub unknown0c: i32,
}

impl CfhPayload {
    pub(crate) fn decode(payload: &[u8], warnings: &mut Vec<Warning>) -> BlockPayload {
        let mut p = Self::default();
        if let Err(e) = p.read_from(&mut BinaryReader::new(payload)) {
            warnings.push(Warning::TruncatedPayload {
                tag: BlockTag::CFH,
                detail: e.to_string(),
            });
        }
        if payload.len() >= 4 && p.magic != CFH_MAGIC {
            warnings.push(Warning::MagicMismatch {
                tag: BlockTag::CFH,
                expected: CFH_MAGIC,
                actual: p.magic,
            });
        }
        BlockPayload::Cfh(p)
    }

    fn read_from(&mut self, reader: &mut BinaryReader<'_>) -> srd_common::Result<()> {
        self.magic = reader.read_u32_be()?;
        self.unknown04 = reader.read_i32()?;
        self.unknown08 = reader.read_i32()?;
        self.unknown0c = reader.read_i32()?;
        Ok(())
    }

    pub(crate) fn encode(payload: &BlockPayload) -> Option<Vec<u8>> {
        let BlockPayload::Cfh(p) = payload else {
            return None;
        };

        let mut writer = BinaryWriter::with_capacity(16);
        writer.write_u32_be(p.magic);
        writer.write_i32(p.unknown04);
        writer.write_i32(p.unknown08);
        writer.write_i32(p.unknown0c);
        Some(writer.into_vec())
    }

    pub(crate) fn info(&self) -> String {
        format!(
            "Magic: {:#010x}\nUnknown04: {}\nUnknown08: {}\nUnknown0C: {}",
            self.magic, self.unknown04, self.unknown08, self.unknown0c
        )
    }
}
