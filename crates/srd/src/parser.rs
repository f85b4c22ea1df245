//! Recursive block tree parsing and encoding.
//!
//! Only a header length that would read past the enclosing region aborts
//! parsing; every other anomaly becomes a warning and decoding continues.

use srd_common::{BinaryReader, BinaryWriter};

use crate::block::{Block, BlockTag, BLOCK_ALIGNMENT, BLOCK_HEADER_SIZE};
use crate::registry::BlockRegistry;
use crate::resource::{BufferSelector, ResourceDescriptor};
use crate::{Error, Result, Warning};

/// Parse a region of bytes into an ordered block forest.
///
/// Sibling order is input file order. Child regions recurse with
/// region-relative alignment.
pub fn parse_blocks(
    data: &[u8],
    registry: &BlockRegistry,
    warnings: &mut Vec<Warning>,
) -> Result<Vec<Block>> {
    let mut blocks = Vec::new();
    let mut reader = BinaryReader::new(data);

    while reader.remaining() >= BLOCK_HEADER_SIZE {
        blocks.push(parse_block(&mut reader, registry, warnings)?);
        reader.align_to(BLOCK_ALIGNMENT);
    }

    Ok(blocks)
}

fn parse_block(
    reader: &mut BinaryReader<'_>,
    registry: &BlockRegistry,
    warnings: &mut Vec<Warning>,
) -> Result<Block> {
    let tag_bytes = reader.read_bytes(4)?;
    let tag = BlockTag([tag_bytes[0], tag_bytes[1], tag_bytes[2], tag_bytes[3]]);

    let payload_len = reader.read_u32_be()? as usize;
    let child_len = reader.read_u32_be()? as usize;
    let selector_raw = reader.read_u32_be()?;
    let res_offset = reader.read_u32_be()?;
    let res_length = reader.read_u32_be()?;

    if payload_len > reader.remaining() {
        return Err(Error::BlockOverrun {
            tag,
            declared: payload_len,
            available: reader.remaining(),
        });
    }
    let payload_bytes = reader.read_bytes(payload_len)?;
    reader.align_to(BLOCK_ALIGNMENT);

    if child_len > reader.remaining() {
        return Err(Error::BlockOverrun {
            tag,
            declared: child_len,
            available: reader.remaining(),
        });
    }
    let child_bytes = reader.read_bytes(child_len)?;

    let resource = match selector_raw {
        0 => None,
        raw => match BufferSelector::from_raw(raw) {
            Some(selector) => Some(ResourceDescriptor {
                selector,
                offset: res_offset,
                length: res_length,
            }),
            None => {
                warnings.push(Warning::UnknownSelector { tag, raw });
                None
            }
        },
    };

    let payload = registry.decode(tag, payload_bytes, warnings);
    let children = if child_len > 0 {
        parse_blocks(child_bytes, registry, warnings)?
    } else {
        Vec::new()
    };

    Ok(Block {
        tag,
        payload_len: payload_len as u32,
        payload,
        resource,
        children,
    })
}

/// Encode a block forest back to container bytes.
///
/// Typed encoders take precedence; tags decoded without one re-emit their
/// retained raw payload, so unknown blocks round-trip byte-exact.
pub fn encode_blocks(blocks: &[Block], registry: &BlockRegistry) -> Vec<u8> {
    let mut writer = BinaryWriter::new();
    for block in blocks {
        encode_block(block, registry, &mut writer);
        writer.align_to(BLOCK_ALIGNMENT);
    }
    writer.into_vec()
}

fn encode_block(block: &Block, registry: &BlockRegistry, writer: &mut BinaryWriter) {
    let payload = registry
        .encode(block.tag, &block.payload)
        .or_else(|| block.payload.raw_bytes().map(<[u8]>::to_vec))
        .unwrap_or_default();
    let children = encode_blocks(&block.children, registry);

    writer.write_bytes(block.tag.as_bytes());
    writer.write_u32_be(payload.len() as u32);
    writer.write_u32_be(children.len() as u32);
    match &block.resource {
        Some(desc) => {
            writer.write_u32_be(desc.selector.to_raw());
            writer.write_u32_be(desc.offset);
            writer.write_u32_be(desc.length);
        }
        None => {
            writer.write_u32_be(0);
            writer.write_u32_be(0);
            writer.write_u32_be(0);
        }
    }

    writer.write_bytes(&payload);
    writer.align_to(BLOCK_ALIGNMENT);
    writer.write_bytes(&children);
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::blocks::BlockPayload;

    /// Append one raw block to `w`: header, payload, padding, child region.
    pub(crate) fn write_block(
        w: &mut BinaryWriter,
        tag: &[u8; 4],
        payload: &[u8],
        resource: Option<(u32, u32, u32)>,
        children: &[u8],
    ) {
        w.write_bytes(tag);
        w.write_u32_be(payload.len() as u32);
        w.write_u32_be(children.len() as u32);
        let (sel, off, len) = resource.unwrap_or((0, 0, 0));
        w.write_u32_be(sel);
        w.write_u32_be(off);
        w.write_u32_be(len);
        w.write_bytes(payload);
        w.align_to(BLOCK_ALIGNMENT);
        w.write_bytes(children);
        w.align_to(BLOCK_ALIGNMENT);
    }

    #[test]
    fn test_sibling_and_child_order_is_file_order() {
        let mut inner = BinaryWriter::new();
        write_block(&mut inner, b"$AAA", &[1], None, &[]);
        write_block(&mut inner, b"$BBB", &[2], None, &[]);
        let inner = inner.into_vec();

        let mut outer = BinaryWriter::new();
        write_block(&mut outer, b"$TOP", &[], None, &inner);
        write_block(&mut outer, b"$CT0", &[], None, &[]);
        let data = outer.into_vec();

        let registry = BlockRegistry::with_builtin_tags();
        let mut warnings = Vec::new();
        let blocks = parse_blocks(&data, &registry, &mut warnings).unwrap();

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].tag, BlockTag(*b"$TOP"));
        assert_eq!(blocks[1].tag, BlockTag::CT0);
        assert_eq!(blocks[0].child_count(), 2);
        assert_eq!(blocks[0].children[0].tag, BlockTag(*b"$AAA"));
        assert_eq!(blocks[0].children[1].tag, BlockTag(*b"$BBB"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_header_descriptor_parsed() {
        let mut w = BinaryWriter::new();
        write_block(&mut w, b"$ZZZ", &[0xAB], Some((2, 0xE000_0010, 64)), &[]);
        let data = w.into_vec();

        let registry = BlockRegistry::with_builtin_tags();
        let mut warnings = Vec::new();
        let blocks = parse_blocks(&data, &registry, &mut warnings).unwrap();

        let desc = blocks[0].resource.unwrap();
        assert_eq!(desc.selector, BufferSelector::Secondary);
        assert_eq!(desc.offset, 0xE000_0010);
        assert_eq!(desc.masked_offset(), 0x10);
        assert_eq!(desc.length, 64);
    }

    #[test]
    fn test_unknown_selector_is_warning() {
        let mut w = BinaryWriter::new();
        write_block(&mut w, b"$ZZZ", &[], Some((9, 0, 0)), &[]);

        let registry = BlockRegistry::with_builtin_tags();
        let mut warnings = Vec::new();
        let blocks = parse_blocks(&w.into_vec(), &registry, &mut warnings).unwrap();

        assert!(blocks[0].resource.is_none());
        assert!(matches!(warnings[0], Warning::UnknownSelector { raw: 9, .. }));
    }

    #[test]
    fn test_overrun_is_fatal() {
        let mut w = BinaryWriter::new();
        w.write_bytes(b"$BAD");
        w.write_u32_be(1000); // payload length past the buffer end
        w.write_u32_be(0);
        w.write_u32_be(0);
        w.write_u32_be(0);
        w.write_u32_be(0);

        let registry = BlockRegistry::with_builtin_tags();
        let mut warnings = Vec::new();
        let err = parse_blocks(&w.into_vec(), &registry, &mut warnings).unwrap_err();
        assert!(matches!(err, Error::BlockOverrun { declared: 1000, .. }));
    }

    #[test]
    fn test_unknown_block_round_trips_byte_exact() {
        let mut w = BinaryWriter::new();
        write_block(&mut w, b"$ZZZ", &[9, 8, 7, 6, 5], Some((1, 0x40, 16)), &[]);
        let data = w.into_vec();

        let registry = BlockRegistry::with_builtin_tags();
        let mut warnings = Vec::new();
        let blocks = parse_blocks(&data, &registry, &mut warnings).unwrap();

        assert!(blocks[0].is_unknown());
        assert!(matches!(
            blocks[0].payload,
            BlockPayload::Unknown(ref raw) if raw == &[9, 8, 7, 6, 5]
        ));
        assert_eq!(encode_blocks(&blocks, &registry), data);
    }

    #[test]
    fn test_known_blocks_round_trip_byte_exact() {
        let cfh = {
            let mut p = crate::blocks::CFH_MAGIC.to_be_bytes().to_vec();
            p.extend_from_slice(&1i32.to_le_bytes());
            p.extend_from_slice(&2i32.to_le_bytes());
            p.extend_from_slice(&3i32.to_le_bytes());
            p
        };
        let rsf = {
            let mut p = crate::blocks::RSF_MAGIC.to_be_bytes().to_vec();
            p.extend_from_slice(&[0u8; 12]);
            p.extend_from_slice(b"folder\0");
            p
        };

        let mut w = BinaryWriter::new();
        write_block(&mut w, b"$CFH", &cfh, None, &[]);
        write_block(&mut w, b"$RSF", &rsf, None, &[]);
        write_block(&mut w, b"$CT0", &[], None, &[]);
        let data = w.into_vec();

        let registry = BlockRegistry::with_builtin_tags();
        let mut warnings = Vec::new();
        let blocks = parse_blocks(&data, &registry, &mut warnings).unwrap();

        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        assert_eq!(encode_blocks(&blocks, &registry), data);
    }
}
