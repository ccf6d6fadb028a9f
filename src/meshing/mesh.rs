//! Mesh buffer types produced by the chunk mesher.

use crate::meshing::vertex::MeshVertex;
use crate::voxels::chunk::ChunkCoord;

/// A vertex/index buffer pair for one render batch.
#[derive(Debug, Default)]
pub struct MeshBuffers {
    /// Vertex data, four vertices per quad.
    pub vertices: Vec<MeshVertex>,
    /// Triangle indices into `vertices`, six per quad.
    pub indices: Vec<u32>,
}

impl MeshBuffers {
    /// An empty buffer pair.
    pub fn new() -> Self {
        MeshBuffers::default()
    }

    /// Number of quads in the buffers.
    pub fn quad_count(&self) -> usize {
        self.indices.len() / 6
    }

    /// Appends one quad.
    ///
    /// `flip` picks the other diagonal for the two triangles; the mesher
    /// uses it to keep ambient occlusion interpolating across the darker
    /// diagonal. Winding stays counter-clockwise seen from outside either
    /// way.
    pub fn push_quad(&mut self, corners: [MeshVertex; 4], flip: bool) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&corners);
        if flip {
            self.indices
                .extend_from_slice(&[base + 1, base + 2, base + 3, base + 1, base + 3, base]);
        } else {
            self.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
    }
}

/// The meshed form of one chunk: an opaque batch and a transparent batch.
///
/// The external renderer uploads both and is responsible for sorting the
/// transparent batch back to front; the core only guarantees the split and
/// that identical inputs produce bit-identical buffers.
#[derive(Debug)]
pub struct ChunkMesh {
    /// Which chunk this mesh belongs to.
    pub coord: ChunkCoord,
    /// Solid geometry, front-to-back order irrelevant.
    pub opaque: MeshBuffers,
    /// Water and other see-through geometry.
    pub transparent: MeshBuffers,
}

impl ChunkMesh {
    /// An empty mesh for a chunk.
    pub fn new(coord: ChunkCoord) -> Self {
        ChunkMesh {
            coord,
            opaque: MeshBuffers::new(),
            transparent: MeshBuffers::new(),
        }
    }

    /// Total vertex count across both batches.
    pub fn vertex_count(&self) -> usize {
        self.opaque.vertices.len() + self.transparent.vertices.len()
    }

    /// Whether neither batch holds any geometry.
    pub fn is_empty(&self) -> bool {
        self.opaque.vertices.is_empty() && self.transparent.vertices.is_empty()
    }
}
