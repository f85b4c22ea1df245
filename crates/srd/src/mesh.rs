//! Mesh geometry reconstruction from vertex/resource-index block pairs.
//!
//! A `$VTX` block whose first child is a `$RSI` block describes one mesh
//! object. The RSI resource-data blob holds (offset, length) pairs into the
//! bulk-data segment: the vertex data window first, then, after 16-byte
//! alignment, the face table. Geometry is rebuilt per call and discarded
//! after serialization.

use srd_common::BinaryReader;

use crate::block::Block;
use crate::blocks::{BlockPayload, RsiPayload, VtxPayload};
use crate::obj::ObjWriter;
use crate::resource::{AuxBuffers, BufferSelector, ResourceDescriptor};
use crate::{Result, Warning};

/// Geometry of one mesh object. Streams are index-aligned: face indices
/// address position, normal, and UV at the same local index.
#[derive(Debug, Clone, Default)]
pub struct MeshGeometry {
    /// Object name, from the RSI's first resource string.
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    /// Triangles as 0-based local vertex indices.
    pub triangles: Vec<[u16; 3]>,
}

impl MeshGeometry {
    fn new(name: String) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    /// Number of vertices in the position stream.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

/// Reconstruct one mesh from a vertex block, its resource index, and the
/// auxiliary buffers.
///
/// The X axis of positions and normals is negated exactly once (fixed
/// coordinate-system conversion), as is V of every UV pair. Bone-weight
/// sub-blocks are skipped, never interpreted. Failure (typically
/// [`crate::Error::ResourceOutOfRange`] from an absent bulk buffer) is
/// fatal only to this mesh.
pub fn extract_mesh(
    vtx: &VtxPayload,
    rsi: &RsiPayload,
    aux: &AuxBuffers,
    warnings: &mut Vec<Warning>,
) -> Result<MeshGeometry> {
    let name = rsi.resource_name().unwrap_or("unnamed").to_string();
    let mut blob = BinaryReader::new(&rsi.resource_data);

    // Vertex data window
    let vertex_desc = ResourceDescriptor {
        selector: BufferSelector::Secondary,
        offset: blob.read_u32()?,
        length: blob.read_u32()?,
    };
    let vertex_window = vertex_desc.resolve_in(aux)?;

    let stride: u32 = vtx.sub_blocks.iter().map(|s| s.size).sum();
    if stride == 0 || vertex_desc.length / stride != vtx.vertex_count {
        warnings.push(Warning::StrideMismatch {
            vertex_len: vertex_desc.length,
            stride,
            vertex_count: vtx.vertex_count,
        });
    }

    let mut mesh = MeshGeometry::new(name);
    let mut reader = BinaryReader::new(vertex_window);
    for (index, sub_block) in vtx.sub_blocks.iter().enumerate() {
        reader.seek(sub_block.offset as usize);
        for _ in 0..vtx.vertex_count {
            let record_start = reader.position();
            match index {
                // Position + normal (and UV for single-stream models)
                0 => {
                    mesh.positions.push([
                        -reader.read_f32()?,
                        reader.read_f32()?,
                        reader.read_f32()?,
                    ]);
                    mesh.normals.push([
                        -reader.read_f32()?,
                        reader.read_f32()?,
                        reader.read_f32()?,
                    ]);
                    if vtx.sub_blocks.len() == 1 {
                        mesh.uvs.push([reader.read_f32()?, -reader.read_f32()?]);
                    }
                }
                // Bone weights: layout not established, stride skip below
                // consumes the bytes
                1 => {}
                // UVs, present only alongside a bone sub-block
                2 => {
                    mesh.uvs.push([reader.read_f32()?, -reader.read_f32()?]);
                }
                _ => {}
            }
            // The stride may exceed the interpreted bytes
            reader.seek(record_start + sub_block.size as usize);
        }
    }

    // Face table window, after the blob's next 16-byte boundary
    blob.align_to(16);
    let face_desc = ResourceDescriptor {
        selector: BufferSelector::Secondary,
        offset: blob.read_u32()?,
        length: blob.read_u32()?,
    };
    let face_window = face_desc.resolve_in(aux)?;

    let mut reader = BinaryReader::new(face_window);
    while reader.remaining() >= 6 {
        mesh.triangles
            .push([reader.read_u16()?, reader.read_u16()?, reader.read_u16()?]);
    }
    if !reader.is_empty() {
        warnings.push(Warning::TrailingFaceBytes {
            length: face_desc.length,
            trailing: reader.remaining(),
        });
    }

    Ok(mesh)
}

/// Iterate the vertex/resource-index pairs of a block forest in file order.
pub fn mesh_pairs(blocks: &[Block]) -> impl Iterator<Item = (&VtxPayload, &RsiPayload)> {
    blocks.iter().filter_map(|block| {
        let BlockPayload::Vtx(vtx) = &block.payload else {
            return None;
        };
        match block.children.first().map(|child| &child.payload) {
            Some(BlockPayload::Rsi(rsi)) => Some((vtx, rsi)),
            _ => None,
        }
    })
}

/// Extract every mesh in the forest into one OBJ text.
///
/// This is a sequential fold in file order: the OBJ writer threads the
/// cumulative vertex count that renumbers face indices across meshes, so
/// the order is significant and extraction is never parallelized. A mesh
/// that fails to resolve is recorded as [`Warning::MeshSkipped`] and the
/// rest of the run continues.
pub fn extract_models(blocks: &[Block], aux: &AuxBuffers, warnings: &mut Vec<Warning>) -> String {
    let mut obj = ObjWriter::new();

    for (vtx, rsi) in mesh_pairs(blocks) {
        match extract_mesh(vtx, rsi, aux, warnings) {
            Ok(mesh) => obj.append_mesh(&mesh),
            Err(e) => warnings.push(Warning::MeshSkipped {
                name: rsi.resource_name().unwrap_or("unnamed").to_string(),
                reason: e.to_string(),
            }),
        }
    }

    obj.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::VertexSubBlock;
    use crate::Error;
    use srd_common::BinaryWriter;

    fn vtx_payload(vertex_count: u32, sub_blocks: Vec<VertexSubBlock>) -> VtxPayload {
        VtxPayload {
            vertex_count,
            sub_block_count: sub_blocks.len() as u8,
            sub_blocks,
            ..VtxPayload::default()
        }
    }

    fn rsi_payload(name: &str, blob: Vec<u8>) -> RsiPayload {
        RsiPayload {
            strings: vec![name.to_string()],
            resource_data: blob,
            ..RsiPayload::default()
        }
    }

    /// Blob addressing a vertex window and a face window in the bulk buffer.
    fn resource_blob(vertex: (u32, u32), face: (u32, u32)) -> Vec<u8> {
        let mut w = BinaryWriter::new();
        w.write_u32(vertex.0);
        w.write_u32(vertex.1);
        w.align_to(16);
        w.write_u32(face.0);
        w.write_u32(face.1);
        w.into_vec()
    }

    /// Bulk buffer with two 32-byte vertex records (pos+normal+uv) followed
    /// by one triangle.
    fn bulk_two_vertices() -> Vec<u8> {
        let mut w = BinaryWriter::new();
        for i in 0..2u32 {
            let base = i as f32;
            w.write_f32(1.0 + base); // pos x
            w.write_f32(2.0 + base);
            w.write_f32(3.0 + base);
            w.write_f32(0.0); // normal
            w.write_f32(1.0);
            w.write_f32(0.0);
            w.write_f32(0.25); // u
            w.write_f32(0.75); // v
        }
        w.write_u16(0); // one triangle
        w.write_u16(1);
        w.write_u16(0);
        w.into_vec()
    }

    #[test]
    fn test_extract_single_stream_mesh() {
        let vtx = vtx_payload(2, vec![VertexSubBlock { offset: 0, size: 32 }]);
        let rsi = rsi_payload("chair", resource_blob((0, 64), (64, 6)));
        let aux = AuxBuffers::new(Vec::new(), bulk_two_vertices());

        let mut warnings = Vec::new();
        let mesh = extract_mesh(&vtx, &rsi, &aux, &mut warnings).unwrap();

        assert_eq!(mesh.name, "chair");
        assert_eq!(mesh.positions, vec![[-1.0, 2.0, 3.0], [-2.0, 3.0, 4.0]]);
        assert_eq!(mesh.normals, vec![[-0.0, 1.0, 0.0], [-0.0, 1.0, 0.0]]);
        assert_eq!(mesh.uvs, vec![[0.25, -0.75], [0.25, -0.75]]);
        assert_eq!(mesh.triangles, vec![[0, 1, 0]]);
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    }

    #[test]
    fn test_stride_mismatch_is_warning_only() {
        let vtx = vtx_payload(3, vec![VertexSubBlock { offset: 0, size: 32 }]);
        let rsi = rsi_payload("chair", resource_blob((0, 64), (64, 6)));
        let aux = AuxBuffers::new(Vec::new(), bulk_two_vertices());

        let mut warnings = Vec::new();
        // vertex_count=3 disagrees with 64/32=2; extraction still runs and
        // fails only once the third record reads past the window
        let result = extract_mesh(&vtx, &rsi, &aux, &mut warnings);
        assert!(warnings
            .iter()
            .any(|w| matches!(w, Warning::StrideMismatch { vertex_len: 64, stride: 32, vertex_count: 3 })));
        assert!(result.is_err());
    }

    #[test]
    fn test_bone_and_uv_sub_blocks() {
        // Stream 0: pos+normal, 24-byte records; stream 1: bones, 8 bytes
        // skipped; stream 2: UVs, 8 bytes
        let mut w = BinaryWriter::new();
        w.write_f32(1.0); // vertex 0 pos
        w.write_f32(2.0);
        w.write_f32(3.0);
        w.write_f32(0.0); // vertex 0 normal
        w.write_f32(0.0);
        w.write_f32(1.0);
        w.write_bytes(&[0xEE; 8]); // bone weights, opaque
        w.write_f32(0.5); // uv
        w.write_f32(0.5);
        let bulk = w.into_vec();

        let vtx = vtx_payload(
            1,
            vec![
                VertexSubBlock { offset: 0, size: 24 },
                VertexSubBlock { offset: 24, size: 8 },
                VertexSubBlock { offset: 32, size: 8 },
            ],
        );
        let rsi = rsi_payload("armature", resource_blob((0, 40), (0, 0)));
        let aux = AuxBuffers::new(Vec::new(), bulk);

        let mut warnings = Vec::new();
        let mesh = extract_mesh(&vtx, &rsi, &aux, &mut warnings).unwrap();

        assert_eq!(mesh.positions, vec![[-1.0, 2.0, 3.0]]);
        assert_eq!(mesh.normals, vec![[-0.0, 0.0, 1.0]]);
        assert_eq!(mesh.uvs, vec![[0.5, -0.5]]);
        assert!(mesh.triangles.is_empty());
    }

    #[test]
    fn test_missing_bulk_buffer_fails_mesh_only() {
        let vtx = vtx_payload(2, vec![VertexSubBlock { offset: 0, size: 32 }]);
        let rsi = rsi_payload("ghost", resource_blob((0, 64), (64, 6)));
        let aux = AuxBuffers::empty();

        let mut warnings = Vec::new();
        let err = extract_mesh(&vtx, &rsi, &aux, &mut warnings).unwrap_err();
        assert!(matches!(err, Error::ResourceOutOfRange { .. }));
    }

    #[test]
    fn test_trailing_face_bytes_warning() {
        let vtx = vtx_payload(2, vec![VertexSubBlock { offset: 0, size: 32 }]);
        // Face window of 8 bytes: one triangle plus 2 trailing bytes
        let rsi = rsi_payload("chair", resource_blob((0, 64), (64, 8)));
        let mut bulk = bulk_two_vertices();
        bulk.extend_from_slice(&[0, 0]);
        let aux = AuxBuffers::new(Vec::new(), bulk);

        let mut warnings = Vec::new();
        let mesh = extract_mesh(&vtx, &rsi, &aux, &mut warnings).unwrap();

        assert_eq!(mesh.triangles.len(), 1);
        assert!(warnings
            .iter()
            .any(|w| matches!(w, Warning::TrailingFaceBytes { trailing: 2, .. })));
    }

    #[test]
    fn test_face_offset_is_masked() {
        let vtx = vtx_payload(2, vec![VertexSubBlock { offset: 0, size: 32 }]);
        // High reserved bits set on both offsets
        let rsi = rsi_payload(
            "chair",
            resource_blob((0xE000_0000, 64), (0x4000_0040, 6)),
        );
        let aux = AuxBuffers::new(Vec::new(), bulk_two_vertices());

        let mut warnings = Vec::new();
        let mesh = extract_mesh(&vtx, &rsi, &aux, &mut warnings).unwrap();
        assert_eq!(mesh.triangles, vec![[0, 1, 0]]);
    }
}
