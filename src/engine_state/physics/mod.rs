//! # Physics
//!
//! Everything that moves the player through the voxel grid or looks into it.
//!
//! * `collision` - axis-aligned boxes tested against solid cells
//! * `player` - the player's pose and the per-frame movement integrator
//! * `raycast` - the fixed-step ray march used to pick the targeted block
//!
//! Collision and picking deliberately disagree about cactus: a ray stops on
//! it, a body walks through it.

pub mod collision;
pub mod player;
pub mod raycast;
