//! # Block Picking
//!
//! A fixed-step ray march from the eye along the look direction. The first
//! cell holding a pickable block (anything but air and water) is the hit, and
//! the last empty cell visited before it is where a placed block would go.

use cgmath::{Point3, Rad, Vector3};

use crate::engine_state::voxels::{block::Block, block_store::BlockStore};

/// Distance between consecutive samples along the ray.
pub const RAY_STEP: f32 = 0.05;

/// The block under the crosshair.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayResult {
    /// The first pickable block struck by the ray
    pub hit: Block,
    /// The empty cell visited just before `hit`; the placement target
    pub place: Point3<i32>,
    /// Distance from the origin to the last sample before the hit
    pub dist: f32,
}

/// Unit look vector for a yaw and pitch.
///
/// Zero yaw and pitch look along +y; positive yaw turns toward -x and
/// positive pitch looks down.
pub fn look_direction(yaw: Rad<f32>, pitch: Rad<f32>) -> Vector3<f32> {
    let (yaw_sin, yaw_cos) = yaw.0.sin_cos();
    let (pitch_sin, pitch_cos) = pitch.0.sin_cos();
    Vector3::new(-yaw_sin * pitch_cos, yaw_cos * pitch_cos, -pitch_sin)
}

/// Marches a ray through the store and reports the first pickable block.
///
/// Sample `k` lies at `origin + direction * (k * RAY_STEP)` for
/// `k = 1..=ceil(max_reach / RAY_STEP)`. The store is only consulted when a
/// sample enters a different cell than the previous one.
///
/// # Arguments
/// * `store` - The world to pick from
/// * `origin` - The eye position
/// * `yaw` - Horizontal look angle
/// * `pitch` - Vertical look angle
/// * `max_reach` - How far the ray travels
///
/// # Returns
/// The hit, or `None` when nothing pickable lies within reach.
pub fn cast(
    store: &BlockStore,
    origin: Point3<f32>,
    yaw: Rad<f32>,
    pitch: Rad<f32>,
    max_reach: f32,
) -> Option<RayResult> {
    let direction = look_direction(yaw, pitch);
    let steps = (max_reach / RAY_STEP).ceil() as u32;

    let mut previous = cell_of(origin);

    for i in 0..steps {
        let sample = origin + direction * ((i + 1) as f32 * RAY_STEP);
        let cell = cell_of(sample);
        if cell == previous {
            continue;
        }

        if let Some(block) = store.get_at(cell) {
            if block.block_type.is_pickable() {
                return Some(RayResult {
                    hit: block,
                    place: previous,
                    dist: i as f32 * RAY_STEP,
                });
            }
        }
        previous = cell;
    }

    None
}

/// The integer cell containing a point.
fn cell_of(point: Point3<f32>) -> Point3<i32> {
    Point3::new(
        point.x.floor() as i32,
        point.y.floor() as i32,
        point.z.floor() as i32,
    )
}
