//! Vertex format for chunk meshes.
//!
//! The layout is what the external renderer uploads verbatim: positions are
//! chunk-local (the renderer offsets whole chunks), UVs tile across merged
//! quads, and the atlas tile index selects the texture. Everything is plain
//! `Pod` data so a buffer is one `bytemuck` cast away.

use bytemuck::{Pod, Zeroable};

/// One vertex of a chunk mesh.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes)
/// - Texture coordinates: 2x f32 (8 bytes)
/// - Atlas tile index: u32 (4 bytes)
/// - Ambient occlusion factor: f32 (4 bytes)
/// - Light factor: f32 (4 bytes)
///
/// Total size: 32 bytes, no padding.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    /// Chunk-local position.
    pub position: [f32; 3],
    /// Texture coordinates in tile units; merged quads tile past 1.0.
    pub uv: [f32; 2],
    /// Index of the texture tile in the shared atlas.
    pub tile: u32,
    /// Ambient occlusion factor in [0, 1]; 1 is fully open.
    pub ao: f32,
    /// Combined light factor in [0, 1] sampled from the face's outward cell.
    pub light: f32,
}

impl MeshVertex {
    /// Creates a vertex.
    pub fn new(position: [f32; 3], uv: [f32; 2], tile: u32, ao: f32, light: f32) -> Self {
        MeshVertex {
            position,
            uv,
            tile,
            ao,
            light,
        }
    }
}
