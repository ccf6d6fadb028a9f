//! # Block Side Module
//!
//! This module defines the six faces of a voxel block and the coordinate
//! conventions the lighting and meshing code build on. Each side knows its
//! outward normal and which two axes span the face plane.

use cgmath::Vector3;

/// Represents the six faces of a voxel block.
///
/// The discriminant doubles as an index into per-face tables (texture indices
/// in the block registry, per-side buffers in the mesher), so the order here
/// must match those tables: `[East, West, Up, Down, South, North]`.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// Facing positive X.
    East = 0,
    /// Facing negative X.
    West = 1,
    /// Facing positive Y.
    Up = 2,
    /// Facing negative Y.
    Down = 3,
    /// Facing positive Z.
    South = 4,
    /// Facing negative Z.
    North = 5,
}

impl BlockSide {
    /// Returns all six sides in discriminant order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::East,
            BlockSide::West,
            BlockSide::Up,
            BlockSide::Down,
            BlockSide::South,
            BlockSide::North,
        ]
    }

    /// The outward unit normal of this face.
    pub fn normal(self) -> Vector3<i32> {
        match self {
            BlockSide::East => Vector3::new(1, 0, 0),
            BlockSide::West => Vector3::new(-1, 0, 0),
            BlockSide::Up => Vector3::new(0, 1, 0),
            BlockSide::Down => Vector3::new(0, -1, 0),
            BlockSide::South => Vector3::new(0, 0, 1),
            BlockSide::North => Vector3::new(0, 0, -1),
        }
    }

    /// The axis (0 = X, 1 = Y, 2 = Z) this face is perpendicular to.
    pub fn axis(self) -> usize {
        match self {
            BlockSide::East | BlockSide::West => 0,
            BlockSide::Up | BlockSide::Down => 1,
            BlockSide::South | BlockSide::North => 2,
        }
    }

    /// Whether this face points along the positive direction of its axis.
    pub fn is_positive(self) -> bool {
        matches!(self, BlockSide::East | BlockSide::Up | BlockSide::South)
    }
}
