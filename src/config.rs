//! # Configuration Module
//!
//! World-creation parameters: the generation seed, the load radius, and the
//! worker pool size. These are fixed when a world is opened; chunk size and
//! world height are compile-time constants, not configuration.

use log::warn;
use serde::Deserialize;

/// Parameters fixed at world-creation time.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Generation seed; the whole terrain is a pure function of it.
    pub seed: u32,
    /// Chunks are kept loaded within this Chebyshev radius of the focus.
    pub load_radius: i32,
    /// Hard cap on resident chunks; the least recently used are evicted
    /// past it even inside the radius margin.
    pub max_loaded_chunks: usize,
    /// Worker threads for generation and meshing.
    pub worker_count: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            seed: 42,
            load_radius: 4,
            max_loaded_chunks: 512,
            worker_count: 4,
        }
    }
}

impl WorldConfig {
    /// Loads a config from a JSON file, falling back to defaults (with a
    /// logged warning) if the file is missing or malformed.
    pub fn load_or_default(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(config) => config,
                Err(err) => {
                    warn!("config {path} is malformed ({err}); using defaults");
                    WorldConfig::default()
                }
            },
            Err(err) => {
                warn!("config {path} unreadable ({err}); using defaults");
                WorldConfig::default()
            }
        }
    }
}
