//! Error and warning types for SRD parsing.
//!
//! Only a declared length that would desynchronize the cursor aborts a file;
//! everything else is a [`Warning`] and decoding proceeds with best-effort
//! values. Warnings are collected, never printed by the library.

use thiserror::Error;

use crate::block::BlockTag;
use crate::resource::BufferSelector;

/// Errors that can occur when working with SRD files.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] srd_common::Error),

    /// Invalid file extension.
    #[error("invalid file extension: expected {expected}, got {actual}")]
    InvalidExtension { expected: String, actual: String },

    /// A block header declared more bytes than the enclosing region holds.
    #[error("block {tag} declares {declared} bytes but only {available} remain")]
    BlockOverrun {
        tag: BlockTag,
        declared: usize,
        available: usize,
    },

    /// A resource descriptor points past the end of its auxiliary buffer.
    #[error(
        "resource out of range: {selector} buffer is {buffer_len} bytes, \
         descriptor wants {length} bytes at masked offset {offset:#x}"
    )]
    ResourceOutOfRange {
        selector: BufferSelector,
        /// Masked offset actually used for indexing.
        offset: u32,
        length: u32,
        buffer_len: usize,
    },
}

/// Result type for SRD operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Non-fatal anomalies recorded while decoding.
#[derive(Debug, Error)]
pub enum Warning {
    /// A known-tag block's embedded magic constant did not match.
    #[error("{tag}: magic mismatch: expected {expected:#010x}, got {actual:#010x}")]
    MagicMismatch {
        tag: BlockTag,
        expected: u32,
        actual: u32,
    },

    /// A payload ended before all nominal fields could be read.
    #[error("{tag}: payload truncated: {detail}")]
    TruncatedPayload { tag: BlockTag, detail: String },

    /// A declared table offset points behind data already consumed.
    #[error("{tag}: {field} offset {offset:#x} is behind the cursor at {position:#x}")]
    NonMonotonicOffset {
        tag: BlockTag,
        field: &'static str,
        offset: usize,
        position: usize,
    },

    /// A header resource selector outside the known range.
    #[error("{tag}: unknown resource selector {raw}, descriptor ignored")]
    UnknownSelector { tag: BlockTag, raw: u32 },

    /// The resource name strings run into the resource data blob.
    #[error("{tag}: string table overruns resource data at offset {offset:#x}")]
    StringOverrun { tag: BlockTag, offset: usize },

    /// Vertex block length, combined stride, and vertex count disagree.
    #[error(
        "vertex block length {vertex_len} and combined stride {stride} \
         are misaligned with vertex count {vertex_count}"
    )]
    StrideMismatch {
        vertex_len: u32,
        stride: u32,
        vertex_count: u32,
    },

    /// The face table length is not a whole number of triangles.
    #[error("face table length {length} is not a multiple of 6; {trailing} trailing bytes ignored")]
    TrailingFaceBytes { length: u32, trailing: usize },

    /// A mesh could not be extracted; the rest of the run continues.
    #[error("skipping mesh {name:?}: {reason}")]
    MeshSkipped { name: String, reason: String },
}
