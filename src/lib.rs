#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! A procedural voxel world core: deterministic seeded terrain generation,
//! per-block sunlight and point-light propagation, and greedy mesh
//! construction, orchestrated per chunk around a moving focal point.
//!
//! This crate is the computational core only. Rendering, physics, entity
//! simulation, UI, and persistence are external collaborators that exchange
//! data with it:
//!
//! * the renderer receives [`meshing::ChunkMesh`] buffer pairs per chunk
//! * physics reads blocks through [`chunk_manager::ChunkManager::get_block`]
//!   and the solidity registry in [`voxels::block`]
//! * persistence plugs in behind [`chunk_manager::ChunkStore`]
//! * gameplay edits enter solely through
//!   [`chunk_manager::ChunkManager::set_block`]
//!
//! ## Key Modules
//!
//! * `worldgen` - the seeded generation pipeline (noise, biomes, terrain
//!   passes, structures)
//! * `lighting` - flood-fill sunlight and block-light computation
//! * `meshing` - greedy meshing with per-vertex ambient occlusion
//! * `chunk_manager` - chunk lifecycle and the worker pool driving it
//!
//! ## Determinism
//!
//! For a fixed seed and chunk coordinate, generation always reproduces the
//! same block grid, and identical block and light grids always mesh to
//! bit-identical buffers. Everything random flows from per-chunk,
//! per-purpose hashed streams, so the passes cannot perturb one another.
//!
//! ## Usage
//!
//! ```no_run
//! use voxel_world::chunk_manager::ChunkManager;
//! use voxel_world::config::WorldConfig;
//!
//! let mut manager = ChunkManager::new(WorldConfig::default());
//! // Call once per frame with the player's world position.
//! manager.update(0, 0);
//! ```

pub mod chunk_manager;
pub mod config;
pub mod core;
pub mod lighting;
pub mod meshing;
pub mod task_management;
pub mod voxels;
pub mod worldgen;
