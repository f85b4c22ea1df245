//! OBJ text serialization.
//!
//! Meshes from one file share a single output; OBJ face indices are global
//! and 1-based, so the writer carries the cumulative vertex count of the
//! meshes already appended and renumbers each face index by it.

use std::fmt::Write;

use crate::mesh::MeshGeometry;

/// Accumulating OBJ text writer.
#[derive(Debug, Default)]
pub struct ObjWriter {
    out: String,
    vertex_base: usize,
}

impl ObjWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cumulative vertex count of the meshes appended so far.
    pub fn vertex_base(&self) -> usize {
        self.vertex_base
    }

    /// Append one mesh: object header, position/normal/UV streams, then one
    /// face line per triangle. Each face index is reused across the
    /// position/UV/normal channels and shifted by `1 + vertex_base`.
    pub fn append_mesh(&mut self, mesh: &MeshGeometry) {
        let out = &mut self.out;

        let _ = writeln!(out, "o {}", mesh.name);
        for p in &mesh.positions {
            let _ = writeln!(out, "v {} {} {}", p[0], p[1], p[2]);
        }
        out.push('\n');

        for n in &mesh.normals {
            let _ = writeln!(out, "vn {} {} {}", n[0], n[1], n[2]);
        }
        out.push('\n');

        for uv in &mesh.uvs {
            let _ = writeln!(out, "vt {} {}", uv[0], uv[1]);
        }
        out.push('\n');

        for t in &mesh.triangles {
            let a = t[0] as usize + self.vertex_base + 1;
            let b = t[1] as usize + self.vertex_base + 1;
            let c = t[2] as usize + self.vertex_base + 1;
            let _ = writeln!(out, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}");
        }
        out.push('\n');

        self.vertex_base += mesh.positions.len();
    }

    /// Finish and return the OBJ text.
    pub fn finish(self) -> String {
        self.out
    }
}
