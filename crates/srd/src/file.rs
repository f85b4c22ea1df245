//! SRD file handling.

use std::fs;
use std::path::Path;

use crate::dump::dump_blocks;
use crate::mesh::extract_models;
use crate::parser::{encode_blocks, parse_blocks};
use crate::registry::BlockRegistry;
use crate::resource::AuxBuffers;
use crate::block::Block;
use crate::{Error, Result, Warning};

/// A parsed SRD resource container.
///
/// Holds the block forest in file order together with every warning
/// recorded while decoding. Warnings are collected, never dropped; how to
/// present them is the caller's choice.
#[derive(Debug)]
pub struct SrdFile {
    blocks: Vec<Block>,
    warnings: Vec<Warning>,
}

impl SrdFile {
    /// Parse container bytes with the builtin tag registry.
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::parse_with(data, &BlockRegistry::with_builtin_tags())
    }

    /// Parse container bytes with a caller-provided registry.
    pub fn parse_with(data: &[u8], registry: &BlockRegistry) -> Result<Self> {
        let mut warnings = Vec::new();
        let blocks = parse_blocks(data, registry, &mut warnings)?;
        Ok(Self { blocks, warnings })
    }

    /// Read an SRD file from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Validate extension
        if path.extension().and_then(|e| e.to_str()) != Some("srd") {
            return Err(Error::InvalidExtension {
                expected: "srd".to_string(),
                actual: path
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("")
                    .to_string(),
            });
        }

        let bytes = fs::read(path)?;
        Self::parse(&bytes)
    }

    /// The top-level blocks in file order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Warnings recorded while parsing.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Re-encode the forest to container bytes.
    pub fn to_bytes(&self, registry: &BlockRegistry) -> Vec<u8> {
        encode_blocks(&self.blocks, registry)
    }

    /// Render the read-only tree dump.
    pub fn dump(&self) -> String {
        dump_blocks(&self.blocks)
    }

    /// Extract every mesh into OBJ text, appending extraction warnings to
    /// the returned list.
    pub fn extract_models(&self, aux: &AuxBuffers) -> (String, Vec<Warning>) {
        let mut warnings = Vec::new();
        let obj = extract_models(&self.blocks, aux, &mut warnings);
        (obj, warnings)
    }
}
