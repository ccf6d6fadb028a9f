//! # Chunk Manager Module
//!
//! Orchestrates the chunk lifecycle around a moving focal point: request,
//! generate, light, mesh, and finally evict. All structural changes to the
//! set of loaded chunks happen here, on the caller's thread, while the
//! CPU-heavy work runs on the worker pool; workers hand back outcomes that
//! this module applies or discards.
//!
//! ## Scheduling Rules
//!
//! - At most one job per chunk coordinate is in flight; the per-coordinate
//!   phase state machine (generating, generated, meshing, ready) enforces it
//! - A chunk is meshed only after it and all four horizontal neighbors are
//!   generated and lit
//! - Block edits bump the chunk's revision; an in-flight mesh with a stale
//!   revision is discarded on arrival and the chunk re-meshed
//! - Jobs whose chunk left the load radius are not interrupted; their
//!   results are simply dropped when they arrive
//! - A failed job is logged and its coordinate forgotten, so the chunk is
//!   retried next time it is visible
//!
//! Evicted chunks hand their block grid to the [`ChunkStore`] before being
//! dropped; a stored grid short-circuits regeneration on the next visit.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

use log::{debug, error, warn};
use lru::LruCache;

use crate::config::WorldConfig;
use crate::core::MtResource;
use crate::lighting;
use crate::meshing::ChunkMesh;
use crate::task_management::WorkerPool;
use crate::voxels::block::BlockId;
use crate::voxels::chunk::{Chunk, ChunkCoord, Neighborhood};
use crate::voxels::world::World;
use crate::worldgen::Generator;

pub mod tasks;

use tasks::{GenerateTask, MeshTask, TaskOutcome};

/// Where evicted chunk grids go, and where requested ones may come from.
///
/// This is the persistence collaborator's seam: the core hands over flat tag
/// arrays and re-imports them verbatim; light and meshes are always
/// recomputed, never stored.
pub trait ChunkStore: Send {
    /// Takes ownership of an evicted chunk's block grid.
    fn store(&mut self, coord: ChunkCoord, blocks: Vec<u8>);
    /// Returns the stored grid for a coordinate, if any.
    fn load(&mut self, coord: ChunkCoord) -> Option<Vec<u8>>;
}

/// A store that keeps nothing; every chunk is regenerated from seed.
pub struct NullStore;

impl ChunkStore for NullStore {
    fn store(&mut self, _coord: ChunkCoord, _blocks: Vec<u8>) {}
    fn load(&mut self, _coord: ChunkCoord) -> Option<Vec<u8>> {
        None
    }
}

/// An in-memory store, useful for tests and the demo driver.
#[derive(Default)]
pub struct MemoryStore {
    chunks: HashMap<ChunkCoord, Vec<u8>>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Number of stored chunk grids.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether nothing has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

impl ChunkStore for MemoryStore {
    fn store(&mut self, coord: ChunkCoord, blocks: Vec<u8>) {
        self.chunks.insert(coord, blocks);
    }
    fn load(&mut self, coord: ChunkCoord) -> Option<Vec<u8>> {
        self.chunks.get(&coord).cloned()
    }
}

/// Lifecycle phase of a tracked chunk coordinate.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ChunkPhase {
    /// Generation job in flight.
    Generating,
    /// Block data present and self-lit; waiting on neighbors to mesh.
    Generated,
    /// Lighting/meshing job in flight.
    Meshing,
    /// Mesh delivered and current.
    Ready,
}

struct ChunkEntry {
    phase: ChunkPhase,
    revision: u64,
    dirty: bool,
}

/// Drives chunk loading, generation, lighting, meshing, and eviction.
pub struct ChunkManager {
    config: WorldConfig,
    world: MtResource<World>,
    generator: Arc<Generator>,
    pool: WorkerPool<TaskOutcome>,
    states: HashMap<ChunkCoord, ChunkEntry>,
    meshes: HashMap<ChunkCoord, ChunkMesh>,
    recently_used: LruCache<ChunkCoord, ()>,
    store: Box<dyn ChunkStore>,
    focus: ChunkCoord,
}

impl ChunkManager {
    /// Creates a manager with no persistence (chunks regenerate from seed).
    pub fn new(config: WorldConfig) -> Self {
        ChunkManager::with_store(config, Box::new(NullStore))
    }

    /// Creates a manager that hands evicted chunks to the given store.
    pub fn with_store(config: WorldConfig, store: Box<dyn ChunkStore>) -> Self {
        let cap = NonZeroUsize::new(config.max_loaded_chunks.max(1))
            .unwrap_or(NonZeroUsize::MIN);
        ChunkManager {
            world: MtResource::new(World::new()),
            generator: Arc::new(Generator::new(config.seed)),
            pool: WorkerPool::new(config.worker_count.max(1)),
            states: HashMap::new(),
            meshes: HashMap::new(),
            recently_used: LruCache::new(cap),
            store,
            focus: ChunkCoord::new(0, 0),
            config,
        }
    }

    /// One orchestration tick around a world-space focal point: request new
    /// chunks, pump the pool, apply finished work, schedule meshes, evict.
    pub fn update(&mut self, focus_wx: i32, focus_wz: i32) {
        self.focus = ChunkCoord::containing(focus_wx, focus_wz);

        self.request_missing_chunks();
        self.pool.process_queued_tasks();
        for outcome in self.pool.drain_completed() {
            self.apply_outcome(outcome);
        }
        self.schedule_meshes();
        self.evict_distant_chunks();
        self.enforce_chunk_cap();
    }

    /// Whether a chunk is inside the visible radius (meshed and reported).
    fn in_radius(&self, coord: ChunkCoord) -> bool {
        coord.chebyshev(self.focus) <= self.config.load_radius
    }

    /// Whether a chunk is inside the generation radius. Block data is kept
    /// one ring wider than the visible radius so every visible chunk has the
    /// four generated neighbors its lighting and meshing need.
    fn in_request_radius(&self, coord: ChunkCoord) -> bool {
        coord.chebyshev(self.focus) <= self.config.load_radius + 1
    }

    /// Chunk coordinates within a radius of the focus, nearest first (ties
    /// broken by coordinate so scheduling order is deterministic).
    fn coords_within(&self, r: i32) -> Vec<ChunkCoord> {
        let mut wanted = Vec::with_capacity(((2 * r + 1) * (2 * r + 1)) as usize);
        for dz in -r..=r {
            for dx in -r..=r {
                wanted.push(self.focus.offset(dx, dz));
            }
        }
        wanted.sort_by_key(|c| (c.chebyshev(self.focus), c.x, c.z));
        wanted
    }

    fn request_missing_chunks(&mut self) {
        for coord in self.coords_within(self.config.load_radius + 1) {
            if self.states.contains_key(&coord) {
                continue;
            }

            // A chunk can outlive its state entry after a failed mesh job;
            // the block data is still good, so just track it again.
            if self.world.get().contains(coord) {
                self.track_loaded(coord);
                continue;
            }

            if let Some(data) = self.store.load(coord) {
                let mut chunk = Chunk::new(coord);
                if chunk.import_blocks(&data) {
                    lighting::light_chunk(&mut chunk, &Neighborhood::empty());
                    self.world.get_mut().insert(chunk);
                    self.track_loaded(coord);
                    debug!("restored chunk ({}, {}) from store", coord.x, coord.z);
                    continue;
                }
                warn!(
                    "stored chunk ({}, {}) is corrupt; regenerating",
                    coord.x, coord.z
                );
            }

            self.states.insert(
                coord,
                ChunkEntry {
                    phase: ChunkPhase::Generating,
                    revision: 0,
                    dirty: false,
                },
            );
            self.pool
                .publish_task(Box::new(GenerateTask::new(self.generator.clone(), coord)));
        }
    }

    fn track_loaded(&mut self, coord: ChunkCoord) {
        self.states.insert(
            coord,
            ChunkEntry {
                phase: ChunkPhase::Generated,
                revision: 0,
                dirty: false,
            },
        );
        self.recently_used.put(coord, ());
    }

    fn apply_outcome(&mut self, outcome: TaskOutcome) {
        match outcome {
            TaskOutcome::Generated { chunk } => {
                let coord = chunk.coord;
                if !self.in_request_radius(coord) {
                    // The focus moved on while the job ran; drop the result.
                    debug!("discarding out-of-radius chunk ({}, {})", coord.x, coord.z);
                    self.states.remove(&coord);
                    return;
                }
                self.world.get_mut().insert(chunk);
                if let Some(entry) = self.states.get_mut(&coord) {
                    entry.phase = ChunkPhase::Generated;
                }
                self.recently_used.put(coord, ());
            }
            TaskOutcome::Meshed {
                coord,
                revision,
                mesh,
            } => {
                if let Some(entry) = self.states.get_mut(&coord) {
                    if entry.revision != revision {
                        // Superseded by an edit mid-flight; mesh again.
                        entry.phase = ChunkPhase::Generated;
                    } else {
                        entry.phase = ChunkPhase::Ready;
                        self.meshes.insert(coord, *mesh);
                        self.recently_used.put(coord, ());
                    }
                }
            }
            TaskOutcome::Failed { coord, phase } => {
                error!(
                    "chunk ({}, {}) {:?} job failed; retrying on next visibility",
                    coord.x, coord.z, phase
                );
                self.states.remove(&coord);
            }
        }
    }

    fn schedule_meshes(&mut self) {
        let mut candidates: Vec<ChunkCoord> = self
            .states
            .iter()
            .filter(|(_, entry)| {
                entry.phase == ChunkPhase::Generated
                    || (entry.phase == ChunkPhase::Ready && entry.dirty)
            })
            .map(|(coord, _)| *coord)
            .collect();
        candidates.sort_by_key(|c| (c.chebyshev(self.focus), c.x, c.z));

        for coord in candidates {
            if !self.in_radius(coord) || !self.world.get().has_full_neighborhood(coord) {
                continue;
            }
            if let Some(entry) = self.states.get_mut(&coord) {
                let revision = entry.revision;
                entry.phase = ChunkPhase::Meshing;
                entry.dirty = false;
                self.pool
                    .publish_task(Box::new(MeshTask::new(self.world.clone(), coord, revision)));
            }
        }
    }

    fn evict_distant_chunks(&mut self) {
        let distant: Vec<ChunkCoord> = self
            .states
            .keys()
            .filter(|c| !self.in_request_radius(**c))
            .copied()
            .collect();
        for coord in distant {
            self.evict(coord);
        }
    }

    /// Bounds resident chunks with the least-recently-used cache; anything
    /// popped that is still inside the radius goes back and stops the sweep,
    /// since every older entry has already been used even less recently.
    fn enforce_chunk_cap(&mut self) {
        while self.world.get().len() > self.config.max_loaded_chunks {
            match self.recently_used.pop_lru() {
                Some((coord, ())) => {
                    if self.in_request_radius(coord) {
                        self.recently_used.put(coord, ());
                        break;
                    }
                    self.evict(coord);
                }
                None => break,
            }
        }
    }

    /// Removes a chunk, handing its block grid to the store first. In-flight
    /// jobs for the coordinate are left to finish; their results are
    /// discarded on arrival.
    fn evict(&mut self, coord: ChunkCoord) {
        self.states.remove(&coord);
        self.meshes.remove(&coord);
        self.recently_used.pop(&coord);
        if let Some(handle) = self.world.get_mut().remove(coord) {
            let blocks = handle.get().export_blocks();
            self.store.store(coord, blocks);
            debug!("evicted chunk ({}, {})", coord.x, coord.z);
        }
    }

    /// The sole gameplay mutation entry point: writes a block, relights the
    /// owning chunk and its horizontal neighbors, and queues them for
    /// remeshing. Returns `false` if the owning chunk is not loaded.
    pub fn set_block(&mut self, wx: i32, wy: i32, wz: i32, id: BlockId) -> bool {
        let owner = match self.world.get().set_block(wx, wy, wz, id) {
            Some(owner) => owner,
            None => return false,
        };

        // Relight the owner first so neighbors fold its fresh light in;
        // propagation crosses at most this one boundary per edit.
        let affected = [
            owner,
            owner.offset(1, 0),
            owner.offset(-1, 0),
            owner.offset(0, 1),
            owner.offset(0, -1),
        ];
        for coord in affected {
            {
                let world = self.world.get();
                if !world.contains(coord) {
                    continue;
                }
                lighting::relight_chunk(&world, coord);
            }
            if let Some(entry) = self.states.get_mut(&coord) {
                entry.revision += 1;
                entry.dirty = true;
            }
        }
        true
    }

    /// Reads a block at world coordinates (sentinel outside loaded chunks).
    pub fn get_block(&self, wx: i32, wy: i32, wz: i32) -> BlockId {
        self.world.get().get_block(wx, wy, wz)
    }

    /// The latest mesh for a chunk, if one has been delivered.
    pub fn mesh(&self, coord: ChunkCoord) -> Option<&ChunkMesh> {
        self.meshes.get(&coord)
    }

    /// A shared handle to the world, for collaborators that only read.
    pub fn world(&self) -> MtResource<World> {
        self.world.clone()
    }

    /// Number of chunks whose current mesh has been delivered.
    pub fn ready_chunk_count(&self) -> usize {
        self.states
            .values()
            .filter(|e| e.phase == ChunkPhase::Ready && !e.dirty)
            .count()
    }

    /// Number of chunks currently resident.
    pub fn loaded_chunk_count(&self) -> usize {
        self.world.get().len()
    }

    /// Jobs on workers or queued.
    pub fn pending_jobs(&self) -> usize {
        self.pool.pending_tasks()
    }

    /// Whether every chunk in the visible radius has a current mesh.
    pub fn all_visible_ready(&self) -> bool {
        self.coords_within(self.config.load_radius)
            .iter()
            .all(|coord| {
                self.states
                    .get(coord)
                    .map(|e| e.phase == ChunkPhase::Ready && !e.dirty)
                    .unwrap_or(false)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::block::BlockKind;
    use std::time::Duration;

    fn small_config() -> WorldConfig {
        WorldConfig {
            seed: 42,
            load_radius: 1,
            max_loaded_chunks: 64,
            worker_count: 2,
        }
    }

    fn settle(manager: &mut ChunkManager, wx: i32, wz: i32) {
        for _ in 0..15_000 {
            manager.update(wx, wz);
            if manager.all_visible_ready() {
                return;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        panic!(
            "world never settled: {} ready, {} pending jobs",
            manager.ready_chunk_count(),
            manager.pending_jobs()
        );
    }

    #[test]
    fn radius_one_loads_and_meshes_nine_chunks() {
        let mut manager = ChunkManager::new(small_config());
        settle(&mut manager, 8, 8);
        // Nine visible chunks, each with its guard ring generated: 25 loaded.
        assert_eq!(manager.loaded_chunk_count(), 25);
        assert_eq!(manager.ready_chunk_count(), 9);
        let mesh = manager.mesh(ChunkCoord::new(0, 0)).expect("mesh missing");
        assert!(!mesh.is_empty());
    }

    #[test]
    fn edits_relight_and_queue_remesh() {
        let mut manager = ChunkManager::new(small_config());
        settle(&mut manager, 8, 8);

        // Drop a glowstone into the air above the terrain.
        let surface = {
            let world = manager.world();
            let guard = world.get();
            let handle = guard.chunk_at(ChunkCoord::new(0, 0)).unwrap();
            let h = handle.get().surface_height(8, 8);
            h
        };
        assert!(manager.set_block(8, surface + 2, 8, BlockKind::Glowstone.id()));
        assert_eq!(
            manager.get_block(8, surface + 2, 8),
            BlockKind::Glowstone.id()
        );

        // Light is already fresh (synchronous relight)...
        {
            let world = manager.world();
            let guard = world.get();
            let handle = guard.chunk_at(ChunkCoord::new(0, 0)).unwrap();
            assert_eq!(handle.get().block_light(8, surface + 3, 8), 14);
        }
        // ...and the dirty chunks mesh again.
        assert!(!manager.all_visible_ready());
        settle(&mut manager, 8, 8);
    }

    #[test]
    fn eviction_hands_blocks_to_the_store_and_restores_them() {
        let mut manager = ChunkManager::with_store(small_config(), Box::new(MemoryStore::new()));
        settle(&mut manager, 8, 8);

        // Scar the origin chunk so a restored copy is distinguishable from a
        // regenerated one.
        let h = {
            let world = manager.world();
            let guard = world.get();
            let handle = guard.chunk_at(ChunkCoord::new(0, 0)).unwrap();
            handle.get().surface_height(3, 3)
        };
        manager.set_block(3, h + 1, 3, BlockKind::Spawner.id());

        // Walk far away; the origin chunk must get evicted.
        settle(&mut manager, 8 + 16 * 8, 8);
        for _ in 0..50 {
            manager.update(8 + 16 * 8, 8);
        }
        assert!(manager.mesh(ChunkCoord::new(0, 0)).is_none());

        // Walk back; the edit survives because the store kept the grid.
        settle(&mut manager, 8, 8);
        assert_eq!(manager.get_block(3, h + 1, 3), BlockKind::Spawner.id());
    }

    #[test]
    fn failed_coordinates_are_retried_not_wedged() {
        // Simulate a mesh-job failure by applying the outcome directly.
        let mut manager = ChunkManager::new(small_config());
        settle(&mut manager, 8, 8);
        manager.apply_outcome(TaskOutcome::Failed {
            coord: ChunkCoord::new(0, 0),
            phase: tasks::TaskPhase::Mesh,
        });
        assert!(manager.states.get(&ChunkCoord::new(0, 0)).is_none());
        // The next updates re-track the still-loaded chunk and remesh it.
        settle(&mut manager, 8, 8);
        assert_eq!(manager.ready_chunk_count(), 9);
    }
}
