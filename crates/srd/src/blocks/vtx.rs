//! `$VTX` vertex/geometry block.
//!
//! The payload is a 26-byte fixed header (padded to 16-byte alignment)
//! followed by several variable-length tables, each located by a declared
//! payload-relative offset and ending at the next declared offset. Offsets
//! must be non-decreasing in the order consumed; a backwards seek is
//! recorded as a warning and honored anyway.

use srd_common::BinaryReader;

use super::BlockPayload;
use crate::block::BlockTag;
use crate::Warning;

/// One per-vertex attribute stream: its byte offset inside the vertex data
/// window and its per-vertex stride.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexSubBlock {
    pub offset: u32,
    pub size: u32,
}

/// Decoded `$VTX` payload.
///
/// Geometry itself lives in the bulk-data segment; this block only carries
/// counts, the sub-block descriptor list, and skinning-related tables.
#[derive(Debug, Clone, Default)]
pub struct VtxPayload {
    /// Counts half the entries of the float-triplet list (quirk kept from
    /// the format: `n / 2` triplets are stored).
    pub float_triplet_count: u32,
    pub unknown14: i16,
    pub unknown16: i16,
    /// Number of vertices in every attribute stream.
    pub vertex_count: u32,
    pub unknown1c: i16,
    pub unknown1e: u8,
    /// Number of per-vertex attribute streams.
    pub sub_block_count: u8,
    pub bind_bone_root_offset: u16,
    pub sub_block_list_offset: u16,
    pub float_list_offset: u16,
    pub bind_bone_list_offset: u16,
    pub unknown28: i16,
    /// Leading u16 run between the header and the sub-block list.
    pub unknown_shorts: Vec<i16>,
    /// One (offset, size) pair per attribute stream, in stream order.
    pub sub_blocks: Vec<VertexSubBlock>,
    pub bind_bone_root: i16,
    pub bind_bones: Vec<i16>,
    pub float_triplets: Vec<[f32; 3]>,
    /// Trailing null-terminated string list.
    pub strings: Vec<String>,
    /// Original payload bytes, re-emitted on encode.
    pub raw: Vec<u8>,
}

impl VtxPayload {
    pub(crate) fn decode(payload: &[u8], warnings: &mut Vec<Warning>) -> BlockPayload {
        let mut p = Self {
            raw: payload.to_vec(),
            ..Self::default()
        };
        if let Err(e) = p.read_from(payload, warnings) {
            warnings.push(Warning::TruncatedPayload {
                tag: BlockTag::VTX,
                detail: e.to_string(),
            });
        }
        BlockPayload::Vtx(p)
    }

    fn read_from(&mut self, data: &[u8], warnings: &mut Vec<Warning>) -> srd_common::Result<()> {
        let mut reader = BinaryReader::new(data);

        self.float_triplet_count = reader.read_u32()?;
        self.unknown14 = reader.read_i16()?;
        self.unknown16 = reader.read_i16()?;
        self.vertex_count = reader.read_u32()?;
        self.unknown1c = reader.read_i16()?;
        self.unknown1e = reader.read_u8()?;
        self.sub_block_count = reader.read_u8()?;
        self.bind_bone_root_offset = reader.read_u16()?;
        self.sub_block_list_offset = reader.read_u16()?;
        self.float_list_offset = reader.read_u16()?;
        self.bind_bone_list_offset = reader.read_u16()?;
        self.unknown28 = reader.read_i16()?;
        reader.align_to(16);

        // Leading u16 run up to the sub-block descriptor list
        let stop = self.sub_block_list_offset as usize;
        check_offset("sub-block list", stop, reader.position(), warnings);
        while reader.position() + 2 <= stop.min(data.len()) {
            self.unknown_shorts.push(reader.read_i16()?);
        }

        reader.seek(stop);
        for _ in 0..self.sub_block_count {
            self.sub_blocks.push(VertexSubBlock {
                offset: reader.read_u32()?,
                size: reader.read_u32()?,
            });
        }

        let root = self.bind_bone_root_offset as usize;
        check_offset("bind-bone root", root, reader.position(), warnings);
        reader.seek(root);
        self.bind_bone_root = reader.read_i16()?;

        if self.bind_bone_list_offset != 0 {
            let list = self.bind_bone_list_offset as usize;
            check_offset("bind-bone list", list, reader.position(), warnings);
            reader.seek(list);
        }
        let stop = self.float_list_offset as usize;
        while reader.position() + 2 <= stop.min(data.len()) {
            self.bind_bones.push(reader.read_i16()?);
        }

        check_offset("float list", stop, reader.position(), warnings);
        reader.seek(stop);
        for _ in 0..self.float_triplet_count / 2 {
            self.float_triplets.push([
                reader.read_f32()?,
                reader.read_f32()?,
                reader.read_f32()?,
            ]);
        }

        // Trailing string list runs to the end of the payload
        while !reader.is_empty() {
            self.strings.push(reader.read_cstring()?.to_string());
        }

        Ok(())
    }

    pub(crate) fn info(&self) -> String {
        let sub_blocks = self
            .sub_blocks
            .iter()
            .map(|s| format!("({}, {})", s.offset, s.size))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "FloatTripletCount: {}\nVertexCount: {}\nSubBlockCount: {}\n\
             SubBlockList: {}\nBindBoneRoot: {}\nBindBoneList: {:?}\n\
             FloatTriplets: {}\nStrings: {}",
            self.float_triplet_count,
            self.vertex_count,
            self.sub_block_count,
            sub_blocks,
            self.bind_bone_root,
            self.bind_bones,
            self.float_triplets.len(),
            self.strings.join(", "),
        )
    }
}

fn check_offset(field: &'static str, offset: usize, position: usize, warnings: &mut Vec<Warning>) {
    if offset < position {
        warnings.push(Warning::NonMonotonicOffset {
            tag: BlockTag::VTX,
            field,
            offset,
            position,
        });
    }
}
