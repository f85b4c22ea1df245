//! SRD resource container parser and mesh extractor.
//!
//! SRD files are tree-shaped containers of 4-character-tagged blocks, with
//! bulk binary data (vertex buffers, face tables) stored out-of-line in two
//! sibling files: the index segment (`.srdi`) and the bulk-data segment
//! (`.srdv`). Blocks reference that data through (selector, offset, length)
//! descriptors whose offsets carry 3 reserved high bits.
//!
//! # Structure
//!
//! Each block is a 24-byte big-endian header (tag, payload length, child
//! region length, resource descriptor) followed by its payload and a nested
//! child region, both padded to 16 bytes. Known tags decode into typed
//! payloads; unknown tags are preserved losslessly as opaque bytes.
//!
//! # Example
//!
//! ```no_run
//! use srd::{AuxBuffers, SrdFile};
//!
//! let file = SrdFile::load("model.srd")?;
//! println!("{}", file.dump());
//!
//! let aux = AuxBuffers::load_beside("model.srd")?;
//! let (obj, warnings) = file.extract_models(&aux);
//! for warning in &warnings {
//!     eprintln!("WARNING: {warning}");
//! }
//! std::fs::write("model.srd.obj", obj)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod block;
mod dump;
mod error;
mod file;
mod obj;
mod parser;
mod registry;
mod resource;

pub mod blocks;
pub mod mesh;

pub use block::{Block, BlockTag, BLOCK_ALIGNMENT, BLOCK_HEADER_SIZE};
pub use dump::dump_blocks;
pub use error::{Error, Result, Warning};
pub use file::SrdFile;
pub use obj::ObjWriter;
pub use parser::{encode_blocks, parse_blocks};
pub use registry::{BlockRegistry, DecodeFn, EncodeFn};
pub use resource::{
    AuxBuffers, BufferSelector, ResourceDescriptor, RESOURCE_OFFSET_MASK,
};

// Re-export commonly used payload types at crate root
pub use blocks::{BlockPayload, RsiPayload, VtxPayload};
pub use mesh::{extract_mesh, extract_models, MeshGeometry};
