//! # Chunk Module
//!
//! This module provides the `Chunk` struct: one vertical column of the voxel
//! world, `CHUNK_SIZE` blocks square and `WORLD_HEIGHT` blocks tall. A chunk
//! owns two parallel dense grids:
//!
//! - `blocks`: one [`BlockId`] tag per cell
//! - `light`: one packed byte per cell, sunlight in the low nibble and
//!   block light in the high nibble
//!
//! ## Storage Strategy
//!
//! Both grids are flat vectors in x-fastest, then z, then y order, so a full
//! horizontal plane is contiguous and the sunlight column scan and greedy
//! mesher walk memory linearly. Cells are addressed with local coordinates;
//! out-of-bounds reads return an opaque sentinel and out-of-bounds writes are
//! silently dropped, which lets generation passes spill tree canopies and
//! structures over the chunk edge without bounds branching at every call
//! site.
//!
//! Chunks never reference their neighbors. Cross-chunk reads during lighting
//! and meshing go through [`ChunkSnapshot`] copies captured by the chunk
//! manager, keeping chunk lifetimes fully independent.

use crate::voxels::block::{BlockId, BlockKind};

/// Horizontal extent of a chunk in blocks.
pub const CHUNK_SIZE: usize = 16;
/// Vertical extent of the world in blocks.
pub const WORLD_HEIGHT: usize = 128;
/// Number of cells in one horizontal plane of a chunk.
pub const CHUNK_PLANE: usize = CHUNK_SIZE * CHUNK_SIZE;
/// Total number of cells in a chunk.
pub const CHUNK_VOLUME: usize = CHUNK_PLANE * WORLD_HEIGHT;
/// Water fills generated terrain up to and including this height.
pub const SEA_LEVEL: i32 = 52;

/// The tag returned for reads outside a chunk or outside the world's vertical
/// extent. Bedrock is opaque and solid, so lighting and meshing treat the
/// void beyond loaded data as a wall rather than as open sky.
pub const SENTINEL_BLOCK: BlockId = BlockKind::Bedrock as BlockId;

/// Identifies a chunk column by its integer chunk coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// Chunk X coordinate (world X divided by `CHUNK_SIZE`, floored).
    pub x: i32,
    /// Chunk Z coordinate.
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a chunk coordinate.
    pub fn new(x: i32, z: i32) -> Self {
        ChunkCoord { x, z }
    }

    /// The chunk containing the given world-space block column.
    pub fn containing(world_x: i32, world_z: i32) -> Self {
        ChunkCoord {
            x: world_x.div_euclid(CHUNK_SIZE as i32),
            z: world_z.div_euclid(CHUNK_SIZE as i32),
        }
    }

    /// World-space coordinates of this chunk's (0, 0) column.
    pub fn origin(self) -> (i32, i32) {
        (self.x * CHUNK_SIZE as i32, self.z * CHUNK_SIZE as i32)
    }

    /// Returns the coordinate offset by whole chunks.
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        ChunkCoord {
            x: self.x + dx,
            z: self.z + dz,
        }
    }

    /// Chebyshev distance to another chunk, the metric used for load radii.
    pub fn chebyshev(self, other: ChunkCoord) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }
}

#[inline]
fn cell_index(x: usize, y: usize, z: usize) -> usize {
    (y * CHUNK_SIZE + z) * CHUNK_SIZE + x
}

#[inline]
fn in_bounds(x: i32, y: i32, z: i32) -> bool {
    x >= 0
        && (x as usize) < CHUNK_SIZE
        && y >= 0
        && (y as usize) < WORLD_HEIGHT
        && z >= 0
        && (z as usize) < CHUNK_SIZE
}

/// One vertical column of the voxel world.
pub struct Chunk {
    /// This chunk's position in chunk coordinates.
    pub coord: ChunkCoord,
    blocks: Vec<BlockId>,
    light: Vec<u8>,
}

impl Chunk {
    /// Creates an empty (all air, unlit) chunk at the given coordinate.
    pub fn new(coord: ChunkCoord) -> Self {
        Chunk {
            coord,
            blocks: vec![BlockKind::Air as BlockId; CHUNK_VOLUME],
            light: vec![0; CHUNK_VOLUME],
        }
    }

    /// Reads the block at local coordinates, returning [`SENTINEL_BLOCK`] for
    /// any cell outside the chunk.
    #[inline]
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockId {
        if in_bounds(x, y, z) {
            self.blocks[cell_index(x as usize, y as usize, z as usize)]
        } else {
            SENTINEL_BLOCK
        }
    }

    /// Writes the block at local coordinates. Out-of-bounds writes are
    /// silently dropped so generation passes can spill over the chunk edge.
    #[inline]
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, id: BlockId) {
        if in_bounds(x, y, z) {
            self.blocks[cell_index(x as usize, y as usize, z as usize)] = id;
        }
    }

    /// Sunlight level at local coordinates, 0 outside the chunk.
    #[inline]
    pub fn sunlight(&self, x: i32, y: i32, z: i32) -> u8 {
        if in_bounds(x, y, z) {
            self.light[cell_index(x as usize, y as usize, z as usize)] & 0x0F
        } else {
            0
        }
    }

    /// Block-light level at local coordinates, 0 outside the chunk.
    #[inline]
    pub fn block_light(&self, x: i32, y: i32, z: i32) -> u8 {
        if in_bounds(x, y, z) {
            self.light[cell_index(x as usize, y as usize, z as usize)] >> 4
        } else {
            0
        }
    }

    /// Sets the sunlight level at local coordinates, clamped to 0..=15.
    /// Out-of-bounds writes are dropped.
    #[inline]
    pub fn set_sunlight(&mut self, x: i32, y: i32, z: i32, level: u8) {
        if in_bounds(x, y, z) {
            let idx = cell_index(x as usize, y as usize, z as usize);
            self.light[idx] = (self.light[idx] & 0xF0) | level.min(15);
        }
    }

    /// Sets the block-light level at local coordinates, clamped to 0..=15.
    /// Out-of-bounds writes are dropped.
    #[inline]
    pub fn set_block_light(&mut self, x: i32, y: i32, z: i32, level: u8) {
        if in_bounds(x, y, z) {
            let idx = cell_index(x as usize, y as usize, z as usize);
            self.light[idx] = (self.light[idx] & 0x0F) | (level.min(15) << 4);
        }
    }

    /// The raw block grid, for the pure lighting and meshing functions.
    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }

    /// The raw packed light grid.
    pub fn light(&self) -> &[u8] {
        &self.light
    }

    /// Replaces the whole light grid with a freshly computed one.
    pub fn replace_light(&mut self, light: Vec<u8>) {
        debug_assert_eq!(light.len(), CHUNK_VOLUME);
        self.light = light;
    }

    /// Copies this chunk's grids into an immutable [`ChunkSnapshot`] for
    /// cross-thread reads during lighting and meshing.
    pub fn snapshot(&self) -> ChunkSnapshot {
        ChunkSnapshot {
            coord: self.coord,
            blocks: self.blocks.clone(),
            light: self.light.clone(),
        }
    }

    /// Serializes the block grid for the persistence collaborator. Light is
    /// derived state and is never exported.
    pub fn export_blocks(&self) -> Vec<u8> {
        self.blocks.clone()
    }

    /// Restores a block grid previously produced by [`Chunk::export_blocks`].
    ///
    /// Returns `false` (leaving the chunk untouched) if the payload has the
    /// wrong length or contains an unregistered tag; restored chunks always
    /// need a fresh lighting pass, so the light grid is cleared on success.
    pub fn import_blocks(&mut self, data: &[u8]) -> bool {
        if data.len() != CHUNK_VOLUME {
            return false;
        }
        if data
            .iter()
            .any(|&tag| <BlockKind as num::FromPrimitive>::from_u8(tag).is_none())
        {
            return false;
        }
        self.blocks.clear();
        self.blocks.extend_from_slice(data);
        self.light.fill(0);
        true
    }

    /// The Y of the highest non-air cell in the given column, or -1 for an
    /// empty column. Out-of-bounds columns report -1.
    pub fn surface_height(&self, x: i32, z: i32) -> i32 {
        for y in (0..WORLD_HEIGHT as i32).rev() {
            if self.get_block(x, y, z) != BlockKind::Air as BlockId {
                return y;
            }
        }
        -1
    }
}

/// An immutable copy of one chunk's grids.
///
/// Snapshots are what workers read when they need neighbor data: a worker
/// never holds a lock on a chunk it does not own while computing, it works
/// against snapshots captured up front.
#[derive(Clone)]
pub struct ChunkSnapshot {
    /// The coordinate the snapshot was taken from.
    pub coord: ChunkCoord,
    blocks: Vec<BlockId>,
    light: Vec<u8>,
}

impl ChunkSnapshot {
    /// Reads a block, with the same sentinel policy as [`Chunk::get_block`].
    #[inline]
    pub fn block(&self, x: i32, y: i32, z: i32) -> BlockId {
        if in_bounds(x, y, z) {
            self.blocks[cell_index(x as usize, y as usize, z as usize)]
        } else {
            SENTINEL_BLOCK
        }
    }

    /// Sunlight level, 0 outside the snapshot.
    #[inline]
    pub fn sunlight(&self, x: i32, y: i32, z: i32) -> u8 {
        if in_bounds(x, y, z) {
            self.light[cell_index(x as usize, y as usize, z as usize)] & 0x0F
        } else {
            0
        }
    }

    /// Block-light level, 0 outside the snapshot.
    #[inline]
    pub fn block_light(&self, x: i32, y: i32, z: i32) -> u8 {
        if in_bounds(x, y, z) {
            self.light[cell_index(x as usize, y as usize, z as usize)] >> 4
        } else {
            0
        }
    }

    /// The raw block grid.
    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }

    /// The raw packed light grid.
    pub fn light(&self) -> &[u8] {
        &self.light
    }
}

/// Read-only views of the four horizontal neighbors of a chunk.
///
/// Lighting and meshing consult this for cells just past the chunk edge.
/// Missing neighbors (not yet generated, or past the load radius) read as the
/// opaque sentinel, the same policy as any other out-of-bounds access.
/// Diagonal neighbors are not captured; corner reads fall back to the
/// sentinel.
#[derive(Clone, Default)]
pub struct Neighborhood {
    /// Neighbor at +X, if captured.
    pub east: Option<ChunkSnapshot>,
    /// Neighbor at -X, if captured.
    pub west: Option<ChunkSnapshot>,
    /// Neighbor at +Z, if captured.
    pub south: Option<ChunkSnapshot>,
    /// Neighbor at -Z, if captured.
    pub north: Option<ChunkSnapshot>,
}

impl Neighborhood {
    /// A neighborhood with no neighbors; every outside read hits the sentinel.
    pub fn empty() -> Self {
        Neighborhood::default()
    }

    /// Maps extended local coordinates (one chunk beyond the center in x/z)
    /// to the owning snapshot and that snapshot's local coordinates.
    fn resolve(&self, x: i32, z: i32) -> Option<(&ChunkSnapshot, i32, i32)> {
        let size = CHUNK_SIZE as i32;
        let horizontal = |v: i32| v >= 0 && v < size;
        if x < 0 && horizontal(z) {
            self.west.as_ref().map(|s| (s, x + size, z))
        } else if x >= size && horizontal(z) {
            self.east.as_ref().map(|s| (s, x - size, z))
        } else if z < 0 && horizontal(x) {
            self.north.as_ref().map(|s| (s, x, z + size))
        } else if z >= size && horizontal(x) {
            self.south.as_ref().map(|s| (s, x, z - size))
        } else {
            None
        }
    }

    /// Block read for a cell outside the center chunk.
    #[inline]
    pub fn block(&self, x: i32, y: i32, z: i32) -> BlockId {
        match self.resolve(x, z) {
            Some((snap, lx, lz)) => snap.block(lx, y, lz),
            None => SENTINEL_BLOCK,
        }
    }

    /// Block read that distinguishes "not captured" from real data: `None`
    /// when the cell falls in a missing or diagonal neighbor. Ambient
    /// occlusion uses this so only cells actually known to be opaque darken
    /// a vertex; everything else keeps the sentinel policy.
    #[inline]
    pub fn known_block(&self, x: i32, y: i32, z: i32) -> Option<BlockId> {
        self.resolve(x, z).map(|(snap, lx, lz)| snap.block(lx, y, lz))
    }

    /// Sunlight read for a cell outside the center chunk.
    #[inline]
    pub fn sunlight(&self, x: i32, y: i32, z: i32) -> u8 {
        match self.resolve(x, z) {
            Some((snap, lx, lz)) => snap.sunlight(lx, y, lz),
            None => 0,
        }
    }

    /// Block-light read for a cell outside the center chunk.
    #[inline]
    pub fn block_light(&self, x: i32, y: i32, z: i32) -> u8 {
        match self.resolve(x, z) {
            Some((snap, lx, lz)) => snap.block_light(lx, y, lz),
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_floor_toward_negative_infinity() {
        assert_eq!(ChunkCoord::containing(0, 0), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::containing(15, 15), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::containing(16, 0), ChunkCoord::new(1, 0));
        assert_eq!(ChunkCoord::containing(-1, -16), ChunkCoord::new(-1, -1));
        assert_eq!(ChunkCoord::new(-1, -1).origin(), (-16, -16));
    }

    #[test]
    fn out_of_bounds_reads_hit_the_sentinel() {
        let chunk = Chunk::new(ChunkCoord::new(0, 0));
        assert_eq!(chunk.get_block(-1, 0, 0), SENTINEL_BLOCK);
        assert_eq!(chunk.get_block(0, WORLD_HEIGHT as i32, 0), SENTINEL_BLOCK);
        assert_eq!(chunk.get_block(0, -1, 0), SENTINEL_BLOCK);
        assert_eq!(chunk.sunlight(0, -1, 0), 0);
    }

    #[test]
    fn out_of_bounds_writes_are_dropped() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        chunk.set_block(-1, 5, 5, BlockKind::Stone.id());
        chunk.set_block(5, WORLD_HEIGHT as i32, 5, BlockKind::Stone.id());
        assert!(chunk.blocks().iter().all(|&b| b == BlockKind::Air.id()));
    }

    #[test]
    fn light_nibbles_are_independent_and_clamped() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        chunk.set_sunlight(3, 40, 3, 13);
        chunk.set_block_light(3, 40, 3, 7);
        assert_eq!(chunk.sunlight(3, 40, 3), 13);
        assert_eq!(chunk.block_light(3, 40, 3), 7);
        chunk.set_sunlight(3, 40, 3, 99);
        assert_eq!(chunk.sunlight(3, 40, 3), 15);
        assert_eq!(chunk.block_light(3, 40, 3), 7);
    }

    #[test]
    fn export_import_round_trips_blocks_and_clears_light() {
        let mut chunk = Chunk::new(ChunkCoord::new(2, -3));
        chunk.set_block(1, 10, 1, BlockKind::Stone.id());
        chunk.set_block(4, 11, 9, BlockKind::DiamondOre.id());
        chunk.set_sunlight(1, 10, 1, 9);
        let data = chunk.export_blocks();

        let mut restored = Chunk::new(ChunkCoord::new(2, -3));
        assert!(restored.import_blocks(&data));
        assert_eq!(restored.blocks(), chunk.blocks());
        assert_eq!(restored.sunlight(1, 10, 1), 0);
    }

    #[test]
    fn import_rejects_bad_payloads() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        assert!(!chunk.import_blocks(&[0u8; 3]));
        let mut bad = vec![0u8; CHUNK_VOLUME];
        bad[17] = 0xFF;
        assert!(!chunk.import_blocks(&bad));
    }

    #[test]
    fn neighborhood_resolves_each_side() {
        let mut east = Chunk::new(ChunkCoord::new(1, 0));
        east.set_block(0, 20, 5, BlockKind::Stone.id());
        let mut north = Chunk::new(ChunkCoord::new(0, -1));
        north.set_block(5, 20, CHUNK_SIZE as i32 - 1, BlockKind::Sand.id());

        let hood = Neighborhood {
            east: Some(east.snapshot()),
            west: None,
            south: None,
            north: Some(north.snapshot()),
        };
        assert_eq!(hood.block(CHUNK_SIZE as i32, 20, 5), BlockKind::Stone.id());
        assert_eq!(hood.block(5, 20, -1), BlockKind::Sand.id());
        // Missing neighbor and diagonal corner both read as sentinel.
        assert_eq!(hood.block(-1, 20, 5), SENTINEL_BLOCK);
        assert_eq!(hood.block(-1, 20, -1), SENTINEL_BLOCK);
    }
}
