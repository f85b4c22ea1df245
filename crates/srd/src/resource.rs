//! Resource descriptors and auxiliary buffer resolution.
//!
//! Blocks address bulk binary data in two sibling files: the index segment
//! (`.srdi`, selector "primary") and the bulk-data segment (`.srdv`,
//! selector "secondary"). A descriptor is resolved to a bounds-checked
//! slice; the high 3 bits of the stored offset are reserved and are masked
//! off before any indexing, never interpreted.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Only the low 29 bits of a resource offset are address bits.
pub const RESOURCE_OFFSET_MASK: u32 = 0x1FFF_FFFF;

/// Which auxiliary buffer a descriptor addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferSelector {
    /// The index segment (`.srdi` sibling file).
    Primary,
    /// The bulk-data segment (`.srdv` sibling file).
    Secondary,
}

impl BufferSelector {
    /// Map the raw header field to a selector. Zero means "no descriptor"
    /// and other values are unknown; both yield `None`.
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            1 => Some(Self::Primary),
            2 => Some(Self::Secondary),
            _ => None,
        }
    }

    /// The raw header field value for this selector.
    pub fn to_raw(self) -> u32 {
        match self {
            Self::Primary => 1,
            Self::Secondary => 2,
        }
    }
}

impl fmt::Display for BufferSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => f.write_str("primary"),
            Self::Secondary => f.write_str("secondary"),
        }
    }
}

/// An (offset, length, selector) triple addressing auxiliary data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// Which auxiliary buffer to index.
    pub selector: BufferSelector,
    /// Raw offset as stored; high 3 bits are reserved.
    pub offset: u32,
    /// Byte length of the addressed range.
    pub length: u32,
}

impl ResourceDescriptor {
    /// The offset with the reserved high bits cleared.
    #[inline]
    pub fn masked_offset(&self) -> u32 {
        self.offset & RESOURCE_OFFSET_MASK
    }

    /// Resolve to a bounds-checked slice of the selected buffer.
    ///
    /// Fails with [`Error::ResourceOutOfRange`] when the masked offset plus
    /// length exceeds the buffer; the failure is fatal only to this
    /// resource, not to the overall run.
    pub fn resolve<'a>(&self, primary: &'a [u8], secondary: &'a [u8]) -> Result<&'a [u8]> {
        let buffer = match self.selector {
            BufferSelector::Primary => primary,
            BufferSelector::Secondary => secondary,
        };

        let start = self.masked_offset() as usize;
        let end = start + self.length as usize;
        if end > buffer.len() {
            return Err(Error::ResourceOutOfRange {
                selector: self.selector,
                offset: self.masked_offset(),
                length: self.length,
                buffer_len: buffer.len(),
            });
        }

        Ok(&buffer[start..end])
    }

    /// Resolve against an [`AuxBuffers`] pair.
    pub fn resolve_in<'a>(&self, aux: &'a AuxBuffers) -> Result<&'a [u8]> {
        self.resolve(&aux.index, &aux.bulk)
    }
}

/// The two externally supplied auxiliary buffers.
///
/// Either may be absent, in which case it is a zero-length buffer and any
/// descriptor into it resolves to [`Error::ResourceOutOfRange`] (unless it
/// is itself zero-length). The library never mutates these.
#[derive(Debug, Clone, Default)]
pub struct AuxBuffers {
    /// Index segment bytes (`.srdi`).
    pub index: Vec<u8>,
    /// Bulk-data segment bytes (`.srdv`).
    pub bulk: Vec<u8>,
}

impl AuxBuffers {
    /// Create from in-memory buffers.
    pub fn new(index: Vec<u8>, bulk: Vec<u8>) -> Self {
        Self { index, bulk }
    }

    /// Two empty buffers.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the sibling files of an SRD container.
    ///
    /// `foo.srd` is accompanied by `foo.srdi` and `foo.srdv`; a missing
    /// sibling yields an empty buffer.
    pub fn load_beside<P: AsRef<Path>>(srd_path: P) -> io::Result<Self> {
        Ok(Self {
            index: read_sibling(srd_path.as_ref(), "i")?,
            bulk: read_sibling(srd_path.as_ref(), "v")?,
        })
    }
}

fn read_sibling(path: &Path, suffix: &str) -> io::Result<Vec<u8>> {
    let mut os = path.as_os_str().to_os_string();
    os.push(suffix);
    let sibling = PathBuf::from(os);

    if sibling.exists() {
        fs::read(&sibling)
    } else {
        Ok(Vec::new())
    }
}
