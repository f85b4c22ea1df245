//! Block tree node types.
//!
//! An SRD file is a forest of tagged blocks. Each block starts with a
//! 24-byte big-endian header:
//!
//! | offset | size | field                                         |
//! |--------|------|-----------------------------------------------|
//! | 0x00   | 4    | tag (4 ASCII characters, e.g. `$CFH`)          |
//! | 0x04   | 4    | payload length                                |
//! | 0x08   | 4    | child region length                           |
//! | 0x0C   | 4    | resource selector (0 none, 1 index, 2 bulk)   |
//! | 0x10   | 4    | resource offset (low 29 bits significant)     |
//! | 0x14   | 4    | resource length                               |
//!
//! The payload follows the header, zero-padded to a 16-byte boundary, then
//! the child region (itself a block sequence), padded the same way. The
//! descriptor fields are present in every header whether or not the payload
//! type uses them.

use std::fmt;

use crate::blocks::BlockPayload;
use crate::resource::ResourceDescriptor;

/// Size of the fixed block header in bytes.
pub const BLOCK_HEADER_SIZE: usize = 24;

/// Payload and child regions are padded to this boundary.
pub const BLOCK_ALIGNMENT: usize = 16;

/// A 4-character block tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockTag(pub [u8; 4]);

impl BlockTag {
    /// Container format header marker.
    pub const CFH: Self = Self(*b"$CFH");
    /// Resource folder block.
    pub const RSF: Self = Self(*b"$RSF");
    /// Resource index block.
    pub const RSI: Self = Self(*b"$RSI");
    /// Vertex/geometry block.
    pub const VTX: Self = Self(*b"$VTX");
    /// Header-only terminator block.
    pub const CT0: Self = Self(*b"$CT0");

    /// The raw tag bytes.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        Ok(())
    }
}

/// One tagged node of the container tree.
///
/// Blocks are immutable after decode and owned by their parent (or the
/// top-level forest). Child order is file order and is significant.
#[derive(Debug, Clone)]
pub struct Block {
    /// The 4-character tag.
    pub tag: BlockTag,
    /// Raw payload length as declared in the header.
    pub payload_len: u32,
    /// Decoded payload, variant by tag.
    pub payload: BlockPayload,
    /// Header-resident resource descriptor, if the selector field named a buffer.
    pub resource: Option<ResourceDescriptor>,
    /// Child blocks in file order.
    pub children: Vec<Block>,
}

impl Block {
    /// Number of direct children.
    #[inline]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Whether the payload fell back to the opaque passthrough.
    #[inline]
    pub fn is_unknown(&self) -> bool {
        matches!(self.payload, BlockPayload::Unknown(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_display() {
        assert_eq!(BlockTag::CFH.to_string(), "$CFH");
        assert_eq!(BlockTag([0x24, 0x00, 0x41, 0x42]).to_string(), "$\\x00AB");
    }
}
