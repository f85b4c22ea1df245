//! Block tag registry and dispatch.
//!
//! Maps a 4-character tag to its decode and (optional) encode functions.
//! Tags without a registered codec fall back to the opaque passthrough, so
//! new tags are additive and never reject a file.

use std::collections::HashMap;

use crate::block::BlockTag;
use crate::blocks::{ct0, BlockPayload, CfhPayload, RsfPayload, RsiPayload, VtxPayload};
use crate::Warning;

/// Decode a raw payload into a typed variant. Must not hard-fail: anomalies
/// go into the warning sink and the readable fields are kept.
pub type DecodeFn = fn(&[u8], &mut Vec<Warning>) -> BlockPayload;

/// Re-encode a typed payload to bytes. Returns `None` when handed a
/// variant the codec does not own.
pub type EncodeFn = fn(&BlockPayload) -> Option<Vec<u8>>;

struct BlockCodec {
    decode: DecodeFn,
    encode: Option<EncodeFn>,
}

/// Registry of per-tag payload codecs.
pub struct BlockRegistry {
    codecs: HashMap<BlockTag, BlockCodec>,
}

impl BlockRegistry {
    /// An empty registry; every tag decodes to the opaque passthrough.
    pub fn new() -> Self {
        Self {
            codecs: HashMap::new(),
        }
    }

    /// A registry with all statically known tags registered.
    pub fn with_builtin_tags() -> Self {
        let mut registry = Self::new();
        registry.register(BlockTag::CFH, CfhPayload::decode, Some(CfhPayload::encode));
        registry.register(BlockTag::RSF, RsfPayload::decode, Some(RsfPayload::encode));
        registry.register(BlockTag::CT0, ct0::decode, Some(ct0::encode));
        registry.register(BlockTag::VTX, VtxPayload::decode, None);
        registry.register(BlockTag::RSI, RsiPayload::decode, None);
        registry
    }

    /// Register (or replace) the codec for a tag.
    pub fn register(&mut self, tag: BlockTag, decode: DecodeFn, encode: Option<EncodeFn>) {
        self.codecs.insert(tag, BlockCodec { decode, encode });
    }

    /// Decode a payload, falling back to the opaque passthrough on a miss.
    pub fn decode(&self, tag: BlockTag, payload: &[u8], warnings: &mut Vec<Warning>) -> BlockPayload {
        match self.codecs.get(&tag) {
            Some(codec) => (codec.decode)(payload, warnings),
            None => BlockPayload::Unknown(payload.to_vec()),
        }
    }

    /// Encode a payload through its tag's encoder, if one is registered.
    ///
    /// Tags decoded without an encoder re-emit their retained raw bytes
    /// (see [`BlockPayload::raw_bytes`]); the block encoder handles that
    /// fallback.
    pub fn encode(&self, tag: BlockTag, payload: &BlockPayload) -> Option<Vec<u8>> {
        self.codecs
            .get(&tag)
            .and_then(|codec| codec.encode)
            .and_then(|encode| encode(payload))
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::with_builtin_tags()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tag_falls_back_to_opaque() {
        let registry = BlockRegistry::with_builtin_tags();
        let mut warnings = Vec::new();

        let payload = registry.decode(BlockTag(*b"$ZZZ"), &[1, 2, 3], &mut warnings);
        assert!(matches!(payload, BlockPayload::Unknown(ref raw) if raw == &[1, 2, 3]));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_registered_tag_dispatches() {
        let registry = BlockRegistry::with_builtin_tags();
        let mut warnings = Vec::new();

        let payload = registry.decode(BlockTag::CT0, &[], &mut warnings);
        assert!(matches!(payload, BlockPayload::Ct0));
        assert_eq!(registry.encode(BlockTag::CT0, &payload), Some(Vec::new()));
    }

    #[test]
    fn test_custom_registration_overrides() {
        fn decode_stub(_payload: &[u8], _warnings: &mut Vec<Warning>) -> BlockPayload {
            BlockPayload::Ct0
        }

        let mut registry = BlockRegistry::with_builtin_tags();
        registry.register(BlockTag::CFH, decode_stub, None);

        let mut warnings = Vec::new();
        let payload = registry.decode(BlockTag::CFH, &[0; 16], &mut warnings);
        assert!(matches!(payload, BlockPayload::Ct0));
    }
}
