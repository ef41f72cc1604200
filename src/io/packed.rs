//! Packed in-memory vertex/face layout.
//!
//! The layout exchanged with file codecs, all little-endian:
//!
//! | field | type |
//! |---|---|
//! | vertex count | `u32` |
//! | face count | `u32` |
//! | coordinates | `f64 × 3` per vertex |
//! | face corners | `u32 × 3` per face |
//!
//! Face tags and normals are not part of the layout.

use bytemuck::{Pod, Zeroable};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::mem::size_of;

use crate::mesh_error::SurfMeshError;
use crate::topology::entity::{MeshToken, VertexId};
use crate::topology::mesh::MeshTopology;

/// Leading counts of a packed buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct PackedHeader {
    pub n_vertices_le: u32,
    pub n_faces_le: u32,
}

impl PackedHeader {
    pub fn new(n_vertices: u32, n_faces: u32) -> Self {
        Self {
            n_vertices_le: n_vertices.to_le(),
            n_faces_le: n_faces.to_le(),
        }
    }

    pub fn n_vertices(&self) -> u32 {
        u32::from_le(self.n_vertices_le)
    }

    pub fn n_faces(&self) -> u32 {
        u32::from_le(self.n_faces_le)
    }

    /// Total buffer length this header announces, if it fits in `usize`.
    pub fn packed_len(&self) -> Option<usize> {
        let verts = (self.n_vertices() as usize).checked_mul(3 * size_of::<f64>())?;
        let faces = (self.n_faces() as usize).checked_mul(3 * size_of::<u32>())?;
        size_of::<PackedHeader>().checked_add(verts)?.checked_add(faces)
    }
}

fn invalid_layout(message: impl Into<String>) -> SurfMeshError {
    SurfMeshError::InvalidLayout(message.into())
}

fn packed_count(n: usize, what: &str) -> Result<u32, SurfMeshError> {
    u32::try_from(n).map_err(|_| invalid_layout(format!("{n} {what} exceed the u32 count")))
}

/// Pack the vertices and faces of `mesh`.
pub fn encode(mesh: &MeshTopology) -> Result<Bytes, SurfMeshError> {
    let header = PackedHeader::new(
        packed_count(mesh.n_vertices(), "vertices")?,
        packed_count(mesh.n_faces(), "faces")?,
    );
    let len = header
        .packed_len()
        .ok_or_else(|| invalid_layout("mesh too large to pack"))?;

    let mut buf = BytesMut::with_capacity(len);
    buf.put_slice(bytemuck::bytes_of(&header));
    for &x in mesh.vertices_flat() {
        buf.put_f64_le(x);
    }
    for f in mesh.faces() {
        for v in f.vertices() {
            buf.put_u32_le(v);
        }
    }
    debug_assert_eq!(buf.len(), len);
    Ok(buf.freeze())
}

/// Unpack a buffer produced by [`encode`] (or any codec following the layout).
///
/// Faces are loaded as they are and adjacency is rebuilt; the vertex array is
/// not compacted. Call [`MeshTopology::fixate`] to canonicalize further.
pub fn decode(data: &[u8]) -> Result<MeshTopology, SurfMeshError> {
    decode_with_token(data, MeshToken::default())
}

/// [`decode`] into a mesh identified by `token`.
pub fn decode_with_token(data: &[u8], token: MeshToken) -> Result<MeshTopology, SurfMeshError> {
    let header_len = size_of::<PackedHeader>();
    if data.len() < header_len {
        return Err(invalid_layout(format!(
            "expected at least {header_len} bytes, got {}",
            data.len()
        )));
    }
    let header: PackedHeader = bytemuck::pod_read_unaligned(&data[..header_len]);
    let expected = header
        .packed_len()
        .ok_or_else(|| invalid_layout("announced counts overflow"))?;
    if data.len() != expected {
        return Err(invalid_layout(format!(
            "expected {expected} bytes for {} vertices and {} faces, got {}",
            header.n_vertices(),
            header.n_faces(),
            data.len()
        )));
    }

    let mut body = &data[header_len..];
    let n_vertices = header.n_vertices();
    let mut mesh = MeshTopology::with_token(token);
    for _ in 0..n_vertices {
        let p = [body.get_f64_le(), body.get_f64_le(), body.get_f64_le()];
        if p.iter().any(|x| !x.is_finite()) {
            return Err(invalid_layout(format!(
                "vertex {} has non-finite coordinates",
                mesh.n_vertices()
            )));
        }
        mesh.push_vertex(p);
    }
    for i in 0..header.n_faces() {
        let v: [VertexId; 3] = [body.get_u32_le(), body.get_u32_le(), body.get_u32_le()];
        if let Some(&bad) = v.iter().find(|&&x| x >= n_vertices) {
            return Err(invalid_layout(format!(
                "face {i} references vertex {bad} of {n_vertices}"
            )));
        }
        mesh.push_face_raw(v, 0);
    }
    mesh.rebuild_adjacency();
    log::debug!(
        "decoded {} vertices and {} faces",
        mesh.n_vertices(),
        mesh.n_faces()
    );
    Ok(mesh)
}


#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> MeshTopology {
        MeshTopology::from_parts(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.5]],
            [[2, 0, 1]],
        )
    }

    #[test]
    fn byte_layout_is_little_endian() {
        let bytes = encode(&triangle()).unwrap();
        assert_eq!(bytes.len(), 8 + 3 * 24 + 12);
        assert_eq!(&bytes[..8], &[3, 0, 0, 0, 1, 0, 0, 0]);
        assert_eq!(&bytes[8 + 24..8 + 32], &1.0f64.to_le_bytes());
        assert_eq!(&bytes[8 + 72..], &[0, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0]);
    }

    #[test]
    fn decode_restores_mesh() {
        let mesh = triangle();
        let back = decode_with_token(&encode(&mesh).unwrap(), MeshToken::new(2)).unwrap();
        assert_eq!(back.vertices(), mesh.vertices());
        assert_eq!(back.n_faces(), 1);
        assert_eq!(back.faces()[0].vertices(), [0, 1, 2]);
        assert_eq!(back.token(), MeshToken::new(2));
        assert!(back.is_current());
    }

    #[test]
    fn malformed_buffers_are_rejected() {
        assert!(matches!(decode(&[1, 0]), Err(SurfMeshError::InvalidLayout(_))));

        let mut bytes = encode(&triangle()).unwrap().to_vec();
        bytes.pop();
        assert!(decode(&bytes).is_err());

        let mut bytes = encode(&triangle()).unwrap().to_vec();
        let last = bytes.len() - 4;
        bytes[last..].copy_from_slice(&7u32.to_le_bytes());
        let err = decode(&bytes).unwrap_err();
        assert_eq!(
            err,
            SurfMeshError::InvalidLayout("face 0 references vertex 7 of 3".into())
        );
    }

    #[test]
    fn counts_must_fit_the_header() {
        assert_eq!(packed_count(7, "vertices"), Ok(7));
        assert_eq!(packed_count(u32::MAX as usize, "faces"), Ok(u32::MAX));
        #[cfg(target_pointer_width = "64")]
        assert_eq!(
            packed_count(u32::MAX as usize + 1, "vertices"),
            Err(SurfMeshError::InvalidLayout(
                "4294967296 vertices exceed the u32 count".into()
            ))
        );
    }

    #[test]
    fn empty_mesh_packs_to_header() {
        let bytes = encode(&MeshTopology::new()).unwrap();
        assert_eq!(bytes.len(), 8);
        let mesh = decode(&bytes).unwrap();
        assert_eq!(mesh.n_vertices(), 0);
        assert_eq!(mesh.n_faces(), 0);
    }
}
