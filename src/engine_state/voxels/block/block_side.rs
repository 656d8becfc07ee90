//! # Block Side Module
//!
//! This module defines the six faces of a voxel block and the camera-side test
//! used to decide which of them can possibly be seen.

use cgmath::{Point3, Vector3};

/// Offsets of the eight corners of a unit cube from its minimum corner.
///
/// Corners 0-3 form the bottom square (counter-clockwise seen from above),
/// corners 4-7 the top square directly above them.
pub const CUBE_CORNERS: [Vector3<i32>; 8] = [
    Vector3::new(0, 0, 0),
    Vector3::new(1, 0, 0),
    Vector3::new(1, 1, 0),
    Vector3::new(0, 1, 0),
    Vector3::new(0, 0, 1),
    Vector3::new(1, 0, 1),
    Vector3::new(1, 1, 1),
    Vector3::new(0, 1, 1),
];

/// Represents the six possible faces of a voxel block.
///
/// The world is z-up: `TOP`/`BOTTOM` face along z, `FRONT`/`BACK` along y and
/// `RIGHT`/`LEFT` along x.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The top face (facing positive Z)
    TOP = 0,

    /// The bottom face (facing negative Z)
    BOTTOM = 1,

    /// The front face (facing positive Y)
    FRONT = 2,

    /// The back face (facing negative Y)
    BACK = 3,

    /// The right face (facing positive X)
    RIGHT = 4,

    /// The left face (facing negative X)
    LEFT = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in a consistent order.
    ///
    /// The order is: [TOP, BOTTOM, FRONT, BACK, RIGHT, LEFT]
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::TOP,
            BlockSide::BOTTOM,
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::RIGHT,
            BlockSide::LEFT,
        ]
    }

    /// The outward unit normal of the face, which is also the offset of the
    /// neighbouring cell that can hide it.
    pub fn normal(&self) -> Vector3<i32> {
        match self {
            BlockSide::TOP => Vector3::new(0, 0, 1),
            BlockSide::BOTTOM => Vector3::new(0, 0, -1),
            BlockSide::FRONT => Vector3::new(0, 1, 0),
            BlockSide::BACK => Vector3::new(0, -1, 0),
            BlockSide::RIGHT => Vector3::new(1, 0, 0),
            BlockSide::LEFT => Vector3::new(-1, 0, 0),
        }
    }

    /// Indices into [`CUBE_CORNERS`] outlining the face.
    pub fn corner_indices(&self) -> [usize; 4] {
        match self {
            BlockSide::TOP => [4, 5, 6, 7],
            BlockSide::BOTTOM => [3, 2, 1, 0],
            BlockSide::FRONT => [3, 2, 6, 7],
            BlockSide::BACK => [1, 0, 4, 5],
            BlockSide::RIGHT => [1, 2, 6, 5],
            BlockSide::LEFT => [3, 0, 4, 7],
        }
    }

    /// Determines which faces of the block at `block` may face the camera.
    ///
    /// For each axis the camera coordinate is compared with the block's
    /// integer coordinate: strictly greater selects the positive face,
    /// strictly smaller the negative one, equal selects neither. At most one
    /// face per axis is returned, ordered z, y, x.
    ///
    /// # Arguments
    /// * `camera` - The eye position in world space
    /// * `block` - The minimum corner of the block
    pub fn get_visible_sides(camera: Point3<f32>, block: Point3<i32>) -> Vec<BlockSide> {
        let mut visible_sides = Vec::with_capacity(3);

        let axes = [
            (camera.z, block.z, BlockSide::TOP, BlockSide::BOTTOM),
            (camera.y, block.y, BlockSide::FRONT, BlockSide::BACK),
            (camera.x, block.x, BlockSide::RIGHT, BlockSide::LEFT),
        ];

        for (eye, coordinate, positive, negative) in axes {
            let coordinate = coordinate as f32;
            if eye > coordinate {
                visible_sides.push(positive);
            } else if eye < coordinate {
                visible_sides.push(negative);
            }
        }

        visible_sides
    }
}
