//! Axis-aligned bounding boxes and their overlap test against the block grid.

use cgmath::{Point3, Vector3};

use crate::engine_state::voxels::block_store::BlockStore;

/// Anything that can answer "does this cell stop a moving body?".
///
/// The collision test is written against this trait so it can run over the
/// live block store or a small hand-built fixture.
pub trait BlockContainer {
    /// Whether the cell at the given integer coordinate blocks movement.
    fn is_block_solid(&self, x: i32, y: i32, z: i32) -> bool;
}

impl BlockContainer for BlockStore {
    fn is_block_solid(&self, x: i32, y: i32, z: i32) -> bool {
        self.get(x, y, z)
            .is_some_and(|block| block.block_type.is_solid())
    }
}

/// An axis-aligned box in world space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb {
    /// Corner with the smallest coordinates
    pub min: Point3<f32>,
    /// Corner with the largest coordinates
    pub max: Point3<f32>,
}

impl Aabb {
    /// Creates a box from two corners. `min` must not exceed `max` on any axis.
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Self { min, max }
    }

    /// Returns the box moved by `offset`.
    pub fn translated(&self, offset: Vector3<f32>) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// The integer cells whose unit cube the box touches, as inclusive
    /// `(min, max)` corners.
    pub fn cell_range(&self) -> (Point3<i32>, Point3<i32>) {
        (
            Point3::new(
                self.min.x.floor() as i32,
                self.min.y.floor() as i32,
                self.min.z.floor() as i32,
            ),
            Point3::new(
                self.max.x.floor() as i32,
                self.max.y.floor() as i32,
                self.max.z.floor() as i32,
            ),
        )
    }
}

/// Whether any solid cell overlaps the box.
///
/// Cells are enumerated from `floor(min)` to `floor(max)` inclusive on every
/// axis, so a box whose face lies exactly on a cell boundary still touches
/// the cell beyond it.
pub fn collides<BC: BlockContainer>(world: &BC, aabb: &Aabb) -> bool {
    let (min, max) = aabb.cell_range();

    for x in min.x..=max.x {
        for y in min.y..=max.y {
            for z in min.z..=max.z {
                if world.is_block_solid(x, y, z) {
                    return true;
                }
            }
        }
    }
    false
}
