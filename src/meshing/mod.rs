//! # Meshing Module
//!
//! Converts a lit chunk plus read-only neighbor snapshots into the vertex
//! and index buffers the external renderer consumes. The heavy lifting is
//! the greedy mesher in [`greedy`]; this module is the public entry point
//! and the output buffer types.

use log::debug;
use web_time::Instant;

use crate::voxels::chunk::{ChunkSnapshot, Neighborhood};

pub mod greedy;
pub mod mesh;
pub mod vertex;

pub use mesh::{ChunkMesh, MeshBuffers};
pub use vertex::MeshVertex;

/// Builds the mesh for one chunk from its snapshot and neighborhood.
///
/// Pure with respect to its inputs: identical block and light grids always
/// produce bit-identical buffers.
pub fn build_chunk_mesh(center: &ChunkSnapshot, hood: &Neighborhood) -> ChunkMesh {
    let started = Instant::now();
    let mesh = greedy::build_chunk_mesh(center, hood);
    debug!(
        "meshed chunk ({}, {}): {} opaque / {} transparent quads in {:?}",
        center.coord.x,
        center.coord.z,
        mesh.opaque.quad_count(),
        mesh.transparent.quad_count(),
        started.elapsed()
    );
    mesh
}
