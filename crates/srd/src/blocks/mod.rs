//! Per-tag block payload types.
//!
//! Each statically known tag decodes into its own payload struct; anything
//! else falls back to [`BlockPayload::Unknown`], which stores the raw bytes
//! verbatim so the block re-emits unchanged. Decoders never hard-fail on
//! short payloads: they record a truncation warning and keep whatever
//! fields were readable.

mod cfh;
pub(crate) mod ct0;
mod rsf;
mod rsi;
mod vtx;

pub use cfh::{CfhPayload, CFH_MAGIC};
pub use rsf::{RsfPayload, RSF_MAGIC};
pub use rsi::RsiPayload;
pub use vtx::{VertexSubBlock, VtxPayload};

/// Decoded block payload, variant by tag.
#[derive(Debug, Clone)]
pub enum BlockPayload {
    /// `$CFH` - magic-validated container header marker.
    Cfh(CfhPayload),
    /// `$RSF` - resource folder name block.
    Rsf(RsfPayload),
    /// `$CT0` - header-only terminator, no payload.
    Ct0,
    /// `$VTX` - vertex/geometry block.
    Vtx(VtxPayload),
    /// `$RSI` - resource index block.
    Rsi(RsiPayload),
    /// Any tag without a registered decoder; raw bytes preserved.
    Unknown(Vec<u8>),
}

impl BlockPayload {
    /// Human-readable field lines for the tree dump. One field per line,
    /// empty for payloads with nothing to show.
    pub fn info(&self) -> String {
        match self {
            Self::Cfh(p) => p.info(),
            Self::Rsf(p) => p.info(),
            Self::Ct0 => String::new(),
            Self::Vtx(p) => p.info(),
            Self::Rsi(p) => p.info(),
            Self::Unknown(raw) => format!("Raw payload: {} bytes", raw.len()),
        }
    }

    /// The retained raw payload bytes, for tags decoded without a
    /// matching encoder.
    pub fn raw_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Vtx(p) => Some(&p.raw),
            Self::Rsi(p) => Some(&p.raw),
            Self::Unknown(raw) => Some(raw),
            _ => None,
        }
    }
}
