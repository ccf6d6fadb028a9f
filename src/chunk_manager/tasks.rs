//! # Chunk Manager Tasks
//!
//! The two worker-pool jobs the chunk manager dispatches: generating a chunk
//! and lighting-plus-meshing one. Each task owns cloned handles, does its
//! work against snapshots, and reports a [`TaskOutcome`] the manager applies
//! on its own thread, so structural changes to the chunk set stay serialized
//! in one place.

use std::sync::Arc;

use crate::core::MtResource;
use crate::lighting;
use crate::meshing::{self, ChunkMesh};
use crate::voxels::chunk::{Chunk, ChunkCoord, Neighborhood};
use crate::voxels::world::World;
use crate::task_management::PoolTask;
use crate::worldgen::Generator;

/// Which job a failed outcome came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TaskPhase {
    /// Terrain generation.
    Generate,
    /// Lighting and meshing.
    Mesh,
}

/// What a worker job produced.
pub enum TaskOutcome {
    /// A freshly generated, self-lit chunk ready to join the world.
    Generated {
        /// The finished chunk; the manager inserts it.
        chunk: Chunk,
    },
    /// A finished mesh (the chunk's light grid was refreshed in place).
    Meshed {
        /// Which chunk was meshed.
        coord: ChunkCoord,
        /// The revision the job was started against; stale revisions are
        /// discarded rather than applied.
        revision: u64,
        /// The mesh buffers for the renderer.
        mesh: Box<ChunkMesh>,
    },
    /// The job died or found its chunk gone; the manager logs and retries
    /// on next visibility.
    Failed {
        /// The coordinate the job was for.
        coord: ChunkCoord,
        /// Which phase failed.
        phase: TaskPhase,
    },
}

/// Generates one chunk's terrain and gives it a standalone lighting pass.
pub struct GenerateTask {
    generator: Arc<Generator>,
    coord: ChunkCoord,
}

impl GenerateTask {
    /// Creates a generation task for a coordinate.
    pub fn new(generator: Arc<Generator>, coord: ChunkCoord) -> Self {
        GenerateTask { generator, coord }
    }
}

impl PoolTask<TaskOutcome> for GenerateTask {
    fn run(self: Box<Self>) -> TaskOutcome {
        let mut chunk = self.generator.generate(self.coord);
        // Self-contained lighting: neighbors fold their light in later,
        // during the mesh pass, once they exist.
        lighting::light_chunk(&mut chunk, &Neighborhood::empty());
        TaskOutcome::Generated { chunk }
    }

    fn on_panic(&self) -> TaskOutcome {
        TaskOutcome::Failed {
            coord: self.coord,
            phase: TaskPhase::Generate,
        }
    }
}

/// Relights one chunk against its neighbors, then meshes it.
///
/// The task snapshots the chunk and its four horizontal neighbors one lock
/// at a time, computes light and geometry without holding any lock, and
/// only takes a short write lock to store the refreshed light grid. It never
/// mutates a neighbor.
pub struct MeshTask {
    world: MtResource<World>,
    coord: ChunkCoord,
    revision: u64,
}

impl MeshTask {
    /// Creates a mesh task for a coordinate at a revision.
    pub fn new(world: MtResource<World>, coord: ChunkCoord, revision: u64) -> Self {
        MeshTask {
            world,
            coord,
            revision,
        }
    }
}

impl PoolTask<TaskOutcome> for MeshTask {
    fn run(self: Box<Self>) -> TaskOutcome {
        let (handle, hood) = {
            let world = self.world.get();
            let handle = match world.chunk_at(self.coord) {
                Some(handle) => handle,
                // Evicted while the job was queued; report and move on.
                None => {
                    return TaskOutcome::Failed {
                        coord: self.coord,
                        phase: TaskPhase::Mesh,
                    }
                }
            };
            (handle, world.neighborhood(self.coord))
        };

        let blocks = handle.get().blocks().to_vec();
        let light = lighting::compute_light(&blocks, &hood);
        handle.get_mut().replace_light(light);

        let center = handle.get().snapshot();
        let mesh = meshing::build_chunk_mesh(&center, &hood);
        TaskOutcome::Meshed {
            coord: self.coord,
            revision: self.revision,
            mesh: Box::new(mesh),
        }
    }

    fn on_panic(&self) -> TaskOutcome {
        TaskOutcome::Failed {
            coord: self.coord,
            phase: TaskPhase::Mesh,
        }
    }
}
