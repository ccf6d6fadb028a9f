//! # Voxel World Demo Driver
//!
//! A headless driver for the world core: loads a config, walks a focal
//! point east across the terrain, performs a couple of block edits, and
//! logs what the pipeline produced. Useful for profiling generation and
//! meshing without a renderer attached.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- [config.json]
//! ```

use std::thread;
use std::time::Duration;

use log::info;
use web_time::Instant;

use voxel_world::chunk_manager::{ChunkManager, MemoryStore};
use voxel_world::config::WorldConfig;
use voxel_world::voxels::block::{self, BLOCK_BY_NAME};
use voxel_world::voxels::chunk::ChunkCoord;

fn main() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => WorldConfig::load_or_default(&path),
        None => WorldConfig::default(),
    };
    info!("starting with {config:?}");

    let started = Instant::now();
    let mut manager = ChunkManager::with_store(config, Box::new(MemoryStore::new()));

    // Walk the focal point east one chunk at a time, letting the pipeline
    // settle at each step the way a player walking would.
    let mut focus_x = 8;
    for step in 0..6 {
        loop {
            manager.update(focus_x, 8);
            if manager.all_visible_ready() {
                break;
            }
            thread::sleep(Duration::from_millis(2));
        }
        info!(
            "step {step}: focus x={focus_x}, {} chunks loaded, {} ready",
            manager.loaded_chunk_count(),
            manager.ready_chunk_count()
        );
        focus_x += 16;
    }

    // A small edit session: place a light, break a block, and let the
    // affected chunks remesh.
    let surface = {
        let world = manager.world();
        let guard = world.get();
        let origin = ChunkCoord::containing(focus_x, 8);
        let handle = guard.chunk_at(origin).expect("focus chunk loaded");
        let (ox, oz) = origin.origin();
        let h = handle.get().surface_height(focus_x - ox, 8 - oz);
        h
    };
    let glowstone = *BLOCK_BY_NAME.get("glowstone").expect("registered block");
    let air = *BLOCK_BY_NAME.get("air").expect("registered block");
    manager.set_block(focus_x, surface + 1, 8, glowstone);
    manager.set_block(focus_x + 1, surface, 8, air);
    loop {
        manager.update(focus_x, 8);
        if manager.all_visible_ready() {
            break;
        }
        thread::sleep(Duration::from_millis(2));
    }
    info!(
        "edits applied: {} at y={} now lit {}",
        block::info(glowstone).name,
        surface + 1,
        {
            let world = manager.world();
            let guard = world.get();
            let origin = ChunkCoord::containing(focus_x, 8);
            let handle = guard.chunk_at(origin).expect("focus chunk loaded");
            let (ox, oz) = origin.origin();
            handle.get().block_light(focus_x - ox, surface + 2, 8 - oz)
        }
    );

    let mut total_vertices = 0usize;
    let mut total_quads = 0usize;
    for dz in -1..=1 {
        for dx in -1..=1 {
            let coord = ChunkCoord::containing(focus_x, 8).offset(dx, dz);
            if let Some(mesh) = manager.mesh(coord) {
                total_vertices += mesh.vertex_count();
                total_quads += mesh.opaque.quad_count() + mesh.transparent.quad_count();
            }
        }
    }
    info!(
        "center 3x3 meshes: {total_quads} quads, {total_vertices} vertices; done in {:?}",
        started.elapsed()
    );
}
