//! # World Module
//!
//! This module provides the `World` struct which manages the set of loaded
//! chunks. It is the coordinate-keyed lookup through which every cross-chunk
//! relationship flows: neighbor reads during lighting and meshing are
//! resolved here on demand, never through references held by chunks
//! themselves, so a chunk's lifetime stays independent of its neighbors'.
//!
//! ## Concurrency
//!
//! Chunks are stored behind [`MtResource`] so worker threads can read them
//! while the chunk manager retains ownership of the map itself. Only the
//! chunk manager inserts or removes entries; workers receive cloned handles
//! and snapshots.

use std::collections::HashMap;

use crate::core::MtResource;
use crate::voxels::block::BlockId;
use crate::voxels::chunk::{Chunk, ChunkCoord, ChunkSnapshot, Neighborhood, SENTINEL_BLOCK};

/// The set of loaded chunks, keyed by chunk coordinate.
pub struct World {
    chunks: HashMap<ChunkCoord, MtResource<Chunk>>,
}

impl World {
    /// Creates a world with no chunks loaded.
    pub fn new() -> Self {
        World {
            chunks: HashMap::new(),
        }
    }

    /// Number of loaded chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether no chunks are loaded.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Whether a chunk is loaded at the given coordinate.
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Inserts a chunk, replacing any previous chunk at the same coordinate.
    pub fn insert(&mut self, chunk: Chunk) {
        self.chunks.insert(chunk.coord, MtResource::new(chunk));
    }

    /// Removes and returns the chunk at a coordinate, if loaded. The caller
    /// (the chunk manager) hands the block grid to persistence before
    /// dropping it.
    pub fn remove(&mut self, coord: ChunkCoord) -> Option<MtResource<Chunk>> {
        self.chunks.remove(&coord)
    }

    /// A shared handle to the chunk at a coordinate, if loaded.
    pub fn chunk_at(&self, coord: ChunkCoord) -> Option<MtResource<Chunk>> {
        self.chunks.get(&coord).cloned()
    }

    /// All loaded chunk coordinates.
    pub fn loaded_coords(&self) -> Vec<ChunkCoord> {
        self.chunks.keys().copied().collect()
    }

    /// Reads the block at world coordinates.
    ///
    /// Returns the opaque sentinel when the owning chunk is not loaded, so
    /// the physics collaborator sees unloaded space as a wall rather than a
    /// fall-through void.
    pub fn get_block(&self, wx: i32, wy: i32, wz: i32) -> BlockId {
        let coord = ChunkCoord::containing(wx, wz);
        match self.chunks.get(&coord) {
            Some(chunk) => {
                let (ox, oz) = coord.origin();
                chunk.get().get_block(wx - ox, wy, wz - oz)
            }
            None => SENTINEL_BLOCK,
        }
    }

    /// Writes the block at world coordinates and returns the owning chunk's
    /// coordinate, or `None` if that chunk is not loaded (the write is
    /// dropped). Re-lighting and re-meshing are the chunk manager's job; this
    /// only mutates the grid.
    pub fn set_block(&self, wx: i32, wy: i32, wz: i32, id: BlockId) -> Option<ChunkCoord> {
        let coord = ChunkCoord::containing(wx, wz);
        let chunk = self.chunks.get(&coord)?;
        let (ox, oz) = coord.origin();
        chunk.get_mut().set_block(wx - ox, wy, wz - oz, id);
        Some(coord)
    }

    /// Captures a snapshot of the chunk at a coordinate, if loaded.
    pub fn snapshot(&self, coord: ChunkCoord) -> Option<ChunkSnapshot> {
        self.chunks.get(&coord).map(|c| c.get().snapshot())
    }

    /// Captures snapshots of the four horizontal neighbors of a coordinate.
    ///
    /// Each neighbor is locked briefly and independently; the caller never
    /// holds more than one chunk lock at a time through this path.
    pub fn neighborhood(&self, coord: ChunkCoord) -> Neighborhood {
        Neighborhood {
            east: self.snapshot(coord.offset(1, 0)),
            west: self.snapshot(coord.offset(-1, 0)),
            south: self.snapshot(coord.offset(0, 1)),
            north: self.snapshot(coord.offset(0, -1)),
        }
    }

    /// Whether the chunk and all four horizontal neighbors are loaded, the
    /// precondition for meshing a coordinate.
    pub fn has_full_neighborhood(&self, coord: ChunkCoord) -> bool {
        self.contains(coord)
            && self.contains(coord.offset(1, 0))
            && self.contains(coord.offset(-1, 0))
            && self.contains(coord.offset(0, 1))
            && self.contains(coord.offset(0, -1))
    }
}

impl Default for World {
    fn default() -> Self {
        World::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::block::BlockKind;
    use crate::voxels::chunk::CHUNK_SIZE;

    #[test]
    fn world_reads_resolve_across_chunks() {
        let mut world = World::new();
        let mut a = Chunk::new(ChunkCoord::new(0, 0));
        a.set_block(3, 50, 3, BlockKind::Stone.id());
        world.insert(a);
        let mut b = Chunk::new(ChunkCoord::new(-1, 0));
        b.set_block(CHUNK_SIZE as i32 - 1, 50, 0, BlockKind::Sand.id());
        world.insert(b);

        assert_eq!(world.get_block(3, 50, 3), BlockKind::Stone.id());
        assert_eq!(world.get_block(-1, 50, 0), BlockKind::Sand.id());
        assert_eq!(world.get_block(200, 50, 200), SENTINEL_BLOCK);
    }

    #[test]
    fn set_block_reports_the_owning_chunk() {
        let mut world = World::new();
        world.insert(Chunk::new(ChunkCoord::new(-1, -1)));
        let owner = world.set_block(-5, 30, -5, BlockKind::Glowstone.id());
        assert_eq!(owner, Some(ChunkCoord::new(-1, -1)));
        assert_eq!(world.get_block(-5, 30, -5), BlockKind::Glowstone.id());
        assert_eq!(world.set_block(100, 30, 100, BlockKind::Stone.id()), None);
    }

    #[test]
    fn neighborhood_capture_skips_missing_chunks() {
        let mut world = World::new();
        world.insert(Chunk::new(ChunkCoord::new(0, 0)));
        world.insert(Chunk::new(ChunkCoord::new(1, 0)));
        let hood = world.neighborhood(ChunkCoord::new(0, 0));
        assert!(hood.east.is_some());
        assert!(hood.west.is_none());
        assert!(!world.has_full_neighborhood(ChunkCoord::new(0, 0)));
    }
}
