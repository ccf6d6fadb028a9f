//! Greedy meshing for chunk geometry.
//!
//! For each of the six face orientations the mesher sweeps 2D slices
//! perpendicular to the face axis, builds a mask of visible faces, and merges
//! runs of identical faces into maximal rectangles (widest run first, then
//! extended row by row). Two faces merge only when block type, atlas tile,
//! light, and all four ambient-occlusion corners agree, so merging never
//! changes how a pixel shades. Cross-shaped blocks and water skip the
//! mask entirely and emit fixed per-cell geometry.
//!
//! The output is deterministic: identical block and light grids produce
//! bit-identical buffers, which regression tests rely on and which keeps
//! remeshing from causing visual popping.

use bitvec::prelude::*;

use crate::meshing::mesh::{ChunkMesh, MeshBuffers};
use crate::meshing::vertex::MeshVertex;
use crate::voxels::block::{self, BlockId, BlockSide, MeshShape};
use crate::voxels::chunk::{ChunkSnapshot, Neighborhood, CHUNK_SIZE, WORLD_HEIGHT};

const SIZE: i32 = CHUNK_SIZE as i32;
const HEIGHT: i32 = WORLD_HEIGHT as i32;

/// Everything that must match for two faces to merge into one quad.
#[derive(Copy, Clone, PartialEq)]
struct FaceKey {
    block: BlockId,
    tile: u8,
    light: u8,
    ao: [u8; 4],
}

/// Reads a block from the center chunk or, past its edge, the neighborhood.
#[inline]
fn block_at(center: &ChunkSnapshot, hood: &Neighborhood, x: i32, y: i32, z: i32) -> BlockId {
    if x >= 0 && x < SIZE && z >= 0 && z < SIZE {
        center.block(x, y, z)
    } else {
        hood.block(x, y, z)
    }
}

/// Combined light level (max of sunlight and block light) of a cell.
#[inline]
fn light_at(center: &ChunkSnapshot, hood: &Neighborhood, x: i32, y: i32, z: i32) -> u8 {
    if x >= 0 && x < SIZE && z >= 0 && z < SIZE {
        center.sunlight(x, y, z).max(center.block_light(x, y, z))
    } else {
        hood.sunlight(x, y, z).max(hood.block_light(x, y, z))
    }
}

/// In-slice (u, v) extents per side. The u/v axes are chosen so that
/// u cross v equals the outward normal; quads wind counter-clockwise seen
/// from outside.
fn dims(side: BlockSide) -> (usize, usize) {
    match side {
        BlockSide::East => (WORLD_HEIGHT, CHUNK_SIZE),
        BlockSide::West => (CHUNK_SIZE, WORLD_HEIGHT),
        BlockSide::Up => (CHUNK_SIZE, CHUNK_SIZE),
        BlockSide::Down => (CHUNK_SIZE, CHUNK_SIZE),
        BlockSide::South => (CHUNK_SIZE, WORLD_HEIGHT),
        BlockSide::North => (WORLD_HEIGHT, CHUNK_SIZE),
    }
}

/// Number of slices along a side's axis.
fn slice_count(side: BlockSide) -> i32 {
    if side.axis() == 1 {
        HEIGHT
    } else {
        SIZE
    }
}

/// Maps slice-plane coordinates to the cell they belong to.
#[inline]
fn cell(side: BlockSide, slice: i32, u: i32, v: i32) -> (i32, i32, i32) {
    match side {
        BlockSide::East => (slice, u, v),
        BlockSide::West => (slice, v, u),
        BlockSide::Up => (v, slice, u),
        BlockSide::Down => (u, slice, v),
        BlockSide::South => (u, v, slice),
        BlockSide::North => (v, u, slice),
    }
}

/// Maps slice-plane coordinates to a vertex position on the face plane.
#[inline]
fn corner(side: BlockSide, slice: i32, u: f32, v: f32) -> [f32; 3] {
    let plane = (slice + if side.is_positive() { 1 } else { 0 }) as f32;
    match side {
        BlockSide::East => [plane, u, v],
        BlockSide::West => [plane, v, u],
        BlockSide::Up => [v, plane, u],
        BlockSide::Down => [u, plane, v],
        BlockSide::South => [u, v, plane],
        BlockSide::North => [v, u, plane],
    }
}

#[inline]
fn corner_ao(side1: bool, side2: bool, diagonal: bool) -> u8 {
    if side1 && side2 {
        0
    } else {
        3 - (side1 as u8 + side2 as u8 + diagonal as u8)
    }
}

/// Whether a cell is *known* to occlude. Cells in missing or diagonal
/// neighbors return false: a vertex is only darkened by data that is
/// actually loaded, so seams do not grow phantom shadows from the sentinel.
#[inline]
fn occludes(center: &ChunkSnapshot, hood: &Neighborhood, x: i32, y: i32, z: i32) -> bool {
    if y < 0 || y >= HEIGHT {
        return false;
    }
    if x >= 0 && x < SIZE && z >= 0 && z < SIZE {
        return block::is_opaque(center.block(x, y, z));
    }
    match hood.known_block(x, y, z) {
        Some(id) => block::is_opaque(id),
        None => false,
    }
}

/// The four corner AO values for a face, sampled from the outward layer.
fn face_ao(
    center: &ChunkSnapshot,
    hood: &Neighborhood,
    side: BlockSide,
    slice: i32,
    u: i32,
    v: i32,
) -> [u8; 4] {
    let n = side.normal();
    let occupied = |du: i32, dv: i32| {
        let (cx, cy, cz) = cell(side, slice, u + du, v + dv);
        occludes(center, hood, cx + n.x, cy + n.y, cz + n.z)
    };
    [
        corner_ao(occupied(-1, 0), occupied(0, -1), occupied(-1, -1)),
        corner_ao(occupied(1, 0), occupied(0, -1), occupied(1, -1)),
        corner_ao(occupied(1, 0), occupied(0, 1), occupied(1, 1)),
        corner_ao(occupied(-1, 0), occupied(0, 1), occupied(-1, 1)),
    ]
}

/// Builds the full mesh for one chunk.
pub fn build_chunk_mesh(center: &ChunkSnapshot, hood: &Neighborhood) -> ChunkMesh {
    let mut mesh = ChunkMesh::new(center.coord);
    for side in BlockSide::all() {
        mesh_side(center, hood, side, &mut mesh.opaque);
    }
    mesh_special(center, hood, &mut mesh);
    mesh
}

/// Greedy-meshes every slice of one face orientation into `out`.
fn mesh_side(center: &ChunkSnapshot, hood: &Neighborhood, side: BlockSide, out: &mut MeshBuffers) {
    let (u_ext, v_ext) = dims(side);
    let n = side.normal();

    let mut mask: Vec<Option<FaceKey>> = vec![None; u_ext * v_ext];
    for slice in 0..slice_count(side) {
        mask.fill(None);

        for v in 0..v_ext {
            for u in 0..u_ext {
                let (x, y, z) = cell(side, slice, u as i32, v as i32);
                let id = center.block(x, y, z);
                if block::info(id).shape != MeshShape::Cube {
                    continue;
                }
                let neighbor = block_at(center, hood, x + n.x, y + n.y, z + n.z);
                if block::is_opaque(neighbor) {
                    continue;
                }
                mask[v * u_ext + u] = Some(FaceKey {
                    block: id,
                    tile: block::info(id).textures[side as usize],
                    light: light_at(center, hood, x + n.x, y + n.y, z + n.z),
                    ao: face_ao(center, hood, side, slice, u as i32, v as i32),
                });
            }
        }

        extract_rectangles(&mask, u_ext, v_ext, side, slice, out);
    }
}

/// Pulls maximal rectangles out of one slice's face mask.
fn extract_rectangles(
    mask: &[Option<FaceKey>],
    u_ext: usize,
    v_ext: usize,
    side: BlockSide,
    slice: i32,
    out: &mut MeshBuffers,
) {
    let mut visited = bitvec![0; u_ext * v_ext];

    for v0 in 0..v_ext {
        for u0 in 0..u_ext {
            let start = v0 * u_ext + u0;
            if visited[start] {
                continue;
            }
            let key = match mask[start] {
                Some(k) => k,
                None => continue,
            };

            // Widen along u first, then grow whole rows along v.
            let mut w = 1;
            while u0 + w < u_ext && !visited[start + w] && mask[start + w] == Some(key) {
                w += 1;
            }
            let mut h = 1;
            'grow: while v0 + h < v_ext {
                for du in 0..w {
                    let i = (v0 + h) * u_ext + u0 + du;
                    if visited[i] || mask[i] != Some(key) {
                        break 'grow;
                    }
                }
                h += 1;
            }

            for dv in 0..h {
                for du in 0..w {
                    visited.set((v0 + dv) * u_ext + u0 + du, true);
                }
            }

            emit_quad(side, slice, u0, v0, w, h, &key, out);
        }
    }
}

fn emit_quad(
    side: BlockSide,
    slice: i32,
    u0: usize,
    v0: usize,
    w: usize,
    h: usize,
    key: &FaceKey,
    out: &mut MeshBuffers,
) {
    let (u0, v0, w, h) = (u0 as f32, v0 as f32, w as f32, h as f32);
    let light = key.light as f32 / 15.0;
    let tile = key.tile as u32;
    let at = |u: f32, v: f32, uv: [f32; 2], ao: u8| {
        MeshVertex::new(corner(side, slice, u, v), uv, tile, ao as f32 / 3.0, light)
    };
    let corners = [
        at(u0, v0, [0.0, 0.0], key.ao[0]),
        at(u0 + w, v0, [w, 0.0], key.ao[1]),
        at(u0 + w, v0 + h, [w, h], key.ao[2]),
        at(u0, v0 + h, [0.0, h], key.ao[3]),
    ];
    // Run the triangle diagonal through the darker corner pair so occlusion
    // interpolates smoothly.
    let flip = key.ao[0] + key.ao[2] < key.ao[1] + key.ao[3];
    out.push_quad(corners, flip);
}

/// Water surface sits this far up its cell when open to the air.
const WATER_SURFACE: f32 = 0.875;

/// Emits the fixed geometry for cross-shaped blocks and water cells.
fn mesh_special(center: &ChunkSnapshot, hood: &Neighborhood, mesh: &mut ChunkMesh) {
    let water = crate::voxels::block::BlockKind::Water as BlockId;

    for y in 0..HEIGHT {
        for z in 0..SIZE {
            for x in 0..SIZE {
                let id = center.block(x, y, z);
                match block::info(id).shape {
                    MeshShape::Cross => {
                        emit_cross(center, x, y, z, id, &mut mesh.opaque);
                    }
                    MeshShape::Liquid => {
                        emit_water(center, hood, x, y, z, water, &mut mesh.transparent);
                    }
                    _ => {}
                }
            }
        }
    }
}

/// Two crossed quads spanning the cell diagonals.
fn emit_cross(center: &ChunkSnapshot, x: i32, y: i32, z: i32, id: BlockId, out: &mut MeshBuffers) {
    let light = center.sunlight(x, y, z).max(center.block_light(x, y, z)) as f32 / 15.0;
    let tile = block::info(id).textures[0] as u32;
    let (fx, fy, fz) = (x as f32, y as f32, z as f32);

    let quad = |a: [f32; 3], b: [f32; 3], c: [f32; 3], d: [f32; 3]| {
        [
            MeshVertex::new(a, [0.0, 0.0], tile, 1.0, light),
            MeshVertex::new(b, [1.0, 0.0], tile, 1.0, light),
            MeshVertex::new(c, [1.0, 1.0], tile, 1.0, light),
            MeshVertex::new(d, [0.0, 1.0], tile, 1.0, light),
        ]
    };
    out.push_quad(
        quad(
            [fx, fy, fz],
            [fx + 1.0, fy, fz + 1.0],
            [fx + 1.0, fy + 1.0, fz + 1.0],
            [fx, fy + 1.0, fz],
        ),
        false,
    );
    out.push_quad(
        quad(
            [fx + 1.0, fy, fz],
            [fx, fy, fz + 1.0],
            [fx, fy + 1.0, fz + 1.0],
            [fx + 1.0, fy + 1.0, fz],
        ),
        false,
    );
}

/// Per-cell water faces: no merging, a lowered top surface against air, and
/// no faces between adjoining water cells.
fn emit_water(
    center: &ChunkSnapshot,
    hood: &Neighborhood,
    x: i32,
    y: i32,
    z: i32,
    water: BlockId,
    out: &mut MeshBuffers,
) {
    let above = block_at(center, hood, x, y + 1, z);
    let top = if above == water {
        1.0
    } else {
        WATER_SURFACE
    };
    let (fx, fy, fz) = (x as f32, y as f32, z as f32);
    let tile = block::info(water).textures[0] as u32;

    let mut face = |nx: i32, ny: i32, nz: i32, corners: [[f32; 3]; 4]| {
        let neighbor = block_at(center, hood, x + nx, y + ny, z + nz);
        if neighbor == water || block::is_opaque(neighbor) {
            return;
        }
        let light = light_at(center, hood, x + nx, y + ny, z + nz) as f32 / 15.0;
        let uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let verts = [
            MeshVertex::new(corners[0], uvs[0], tile, 1.0, light),
            MeshVertex::new(corners[1], uvs[1], tile, 1.0, light),
            MeshVertex::new(corners[2], uvs[2], tile, 1.0, light),
            MeshVertex::new(corners[3], uvs[3], tile, 1.0, light),
        ];
        out.push_quad(verts, false);
    };

    // Top (+Y), winding counter-clockwise from above.
    face(
        0,
        1,
        0,
        [
            [fx, fy + top, fz],
            [fx, fy + top, fz + 1.0],
            [fx + 1.0, fy + top, fz + 1.0],
            [fx + 1.0, fy + top, fz],
        ],
    );
    // Bottom (-Y).
    face(
        0,
        -1,
        0,
        [
            [fx, fy, fz],
            [fx + 1.0, fy, fz],
            [fx + 1.0, fy, fz + 1.0],
            [fx, fy, fz + 1.0],
        ],
    );
    // East (+X).
    face(
        1,
        0,
        0,
        [
            [fx + 1.0, fy, fz],
            [fx + 1.0, fy + top, fz],
            [fx + 1.0, fy + top, fz + 1.0],
            [fx + 1.0, fy, fz + 1.0],
        ],
    );
    // West (-X).
    face(
        -1,
        0,
        0,
        [
            [fx, fy, fz + 1.0],
            [fx, fy + top, fz + 1.0],
            [fx, fy + top, fz],
            [fx, fy, fz],
        ],
    );
    // South (+Z).
    face(
        0,
        0,
        1,
        [
            [fx + 1.0, fy, fz + 1.0],
            [fx + 1.0, fy + top, fz + 1.0],
            [fx, fy + top, fz + 1.0],
            [fx, fy, fz + 1.0],
        ],
    );
    // North (-Z).
    face(
        0,
        0,
        -1,
        [
            [fx, fy, fz],
            [fx, fy + top, fz],
            [fx + 1.0, fy + top, fz],
            [fx + 1.0, fy, fz],
        ],
    );
}
