//! # Player Physics
//!
//! The player is an upright box standing on its feet position. Every frame the
//! movement integrator
//!
//! 1. turns movement intent into horizontal velocity (or applies friction),
//! 2. moves along X, then along Y, cancelling the velocity on an axis whose
//!    move would end inside a solid cell,
//! 3. clamps the horizontal position to the world bounds,
//! 4. starts a jump if one was requested while standing on ground,
//! 5. applies gravity and resolves the vertical move, snapping to the nearest
//!    whole height when landing.
//!
//! Resolving the axes one after another lets the player slide along a wall:
//! a blocked X move does not stop the Y move. All speeds are tuned for a
//! reference frame and scaled by the real frame length.

use std::f32::consts::FRAC_PI_2;

use cgmath::{InnerSpace, Point3, Rad, Vector2, Vector3, Zero};

use crate::{config::PlayerConfig, engine_state::PlayerIntent};

use super::collision::{collides, Aabb, BlockContainer};

/// Gap between the top of the collision box and the top of the player.
pub const HEAD_CLEARANCE: f32 = 0.1;
/// Depth of the check below the feet used to detect standing on ground.
pub const GROUND_CHECK_DEPTH: f32 = 0.05;
/// Largest absolute pitch, just short of looking straight up or down.
pub const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.1;

/// Per-frame values the movement integrator needs besides the intent.
#[derive(Copy, Clone, Debug)]
pub struct StepContext {
    /// Real frame length divided by the reference frame length
    pub frame_scale: f32,
    /// Current hunger, used for the starvation slowdown
    pub hunger: f32,
    /// Largest absolute horizontal coordinate the player may reach
    pub horizontal_limit: f32,
}

/// Position, velocity and orientation of the player.
///
/// `yaw` turns about the vertical axis (zero looks along +y, positive turns
/// toward -x); positive `pitch` looks down.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    /// Feet position in world space
    pub position: Point3<f32>,
    /// Displacement per reference frame
    pub velocity: Vector3<f32>,
    /// Horizontal look angle
    pub yaw: Rad<f32>,
    /// Vertical look angle, kept within `±PITCH_LIMIT`
    pub pitch: Rad<f32>,
}

impl Player {
    /// Creates a player standing still at `position`, looking along +y.
    pub fn new(position: Point3<f32>) -> Self {
        Self {
            position,
            velocity: Vector3::zero(),
            yaw: Rad(0.0),
            pitch: Rad(0.0),
        }
    }

    /// Position of the eye, which is where the camera and the picking ray start.
    pub fn eye_position(&self, shape: &PlayerConfig) -> Point3<f32> {
        self.position + Vector3::unit_z() * shape.eye_height
    }

    /// The collision box of a player whose feet are at `feet`.
    pub fn bounding_box_at(feet: Point3<f32>, shape: &PlayerConfig) -> Aabb {
        Aabb::new(
            Point3::new(feet.x - shape.radius, feet.y - shape.radius, feet.z),
            Point3::new(
                feet.x + shape.radius,
                feet.y + shape.radius,
                feet.z + shape.height - HEAD_CLEARANCE,
            ),
        )
    }

    /// The player's current collision box.
    pub fn bounding_box(&self, shape: &PlayerConfig) -> Aabb {
        Self::bounding_box_at(self.position, shape)
    }

    /// Unit vector the player walks along when moving forward.
    pub fn forward_vector(&self) -> Vector2<f32> {
        let (sin, cos) = self.yaw.0.sin_cos();
        Vector2::new(-sin, cos)
    }

    /// Unit vector the player walks along when strafing right.
    pub fn right_vector(&self) -> Vector2<f32> {
        let (sin, cos) = self.yaw.0.sin_cos();
        Vector2::new(cos, sin)
    }

    /// Turns the view by a mouse delta.
    ///
    /// Moving right turns right and moving down looks down. Pitch is clamped
    /// to `±PITCH_LIMIT`.
    ///
    /// # Arguments
    /// * `delta` - Mouse movement in counts (x, y)
    /// * `sensitivity` - Radians per count
    pub fn apply_look(&mut self, delta: (f64, f64), sensitivity: f32) {
        let (dx, dy) = (delta.0 as f32, delta.1 as f32);
        self.yaw -= Rad(dx * sensitivity);
        self.pitch = Rad((self.pitch.0 + dy * sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT));
    }

    /// Runs the movement integrator for one frame.
    ///
    /// # Arguments
    /// * `world` - The cells to collide against
    /// * `intent` - Movement keys held this frame
    /// * `shape` - Player dimensions and movement tuning
    /// * `context` - Frame scale, hunger and world bounds
    pub fn step<BC: BlockContainer>(
        &mut self,
        world: &BC,
        intent: &PlayerIntent,
        shape: &PlayerConfig,
        context: &StepContext,
    ) {
        self.steer(intent, shape, context);
        self.resolve_horizontal(world, shape);
        self.clamp_horizontal(context.horizontal_limit);

        if intent.jump && self.velocity.z == 0.0 && self.is_on_ground(world, shape) {
            self.velocity.z = shape.jump_force;
        }
        self.velocity.z -= shape.gravity * context.frame_scale;
        self.resolve_vertical(world, shape);
    }

    /// Whether the box just below the feet overlaps a solid cell.
    pub fn is_on_ground<BC: BlockContainer>(&self, world: &BC, shape: &PlayerConfig) -> bool {
        let below = self.position - Vector3::unit_z() * GROUND_CHECK_DEPTH;
        collides(world, &Self::bounding_box_at(below, shape))
    }

    /// Sets the horizontal velocity from the held movement keys, or applies
    /// friction when none (or only opposing ones) are held.
    fn steer(&mut self, intent: &PlayerIntent, shape: &PlayerConfig, context: &StepContext) {
        let forward = axis(intent.forward, intent.backward);
        let strafe = axis(intent.right, intent.left);

        if forward == 0.0 && strafe == 0.0 {
            self.velocity.x *= shape.friction;
            self.velocity.y *= shape.friction;
            return;
        }

        let mut speed = shape.speed * context.frame_scale;
        if intent.sprint {
            speed *= shape.sprint_multiplier;
        }
        if context.hunger < shape.starving_hunger {
            speed *= shape.starving_multiplier;
        }

        let direction = (self.forward_vector() * forward + self.right_vector() * strafe).normalize();
        self.velocity.x = direction.x * speed;
        self.velocity.y = direction.y * speed;
    }

    /// Moves along X and then along Y, cancelling a blocked axis.
    pub fn resolve_horizontal<BC: BlockContainer>(&mut self, world: &BC, shape: &PlayerConfig) {
        let step_x = self.position + Vector3::unit_x() * self.velocity.x;
        if collides(world, &Self::bounding_box_at(step_x, shape)) {
            self.velocity.x = 0.0;
        }
        self.position.x += self.velocity.x;

        let step_y = self.position + Vector3::unit_y() * self.velocity.y;
        if collides(world, &Self::bounding_box_at(step_y, shape)) {
            self.velocity.y = 0.0;
        }
        self.position.y += self.velocity.y;
    }

    /// Keeps the player inside `±limit` on both horizontal axes.
    pub fn clamp_horizontal(&mut self, limit: f32) {
        self.position.x = self.position.x.clamp(-limit, limit);
        self.position.y = self.position.y.clamp(-limit, limit);
    }

    /// Applies the vertical velocity, landing or bumping the head on a solid cell.
    fn resolve_vertical<BC: BlockContainer>(&mut self, world: &BC, shape: &PlayerConfig) {
        let step_z = self.position + Vector3::unit_z() * self.velocity.z;
        if collides(world, &Self::bounding_box_at(step_z, shape)) {
            if self.velocity.z < 0.0 {
                self.position.z = self.position.z.round();
            }
            self.velocity.z = 0.0;
        }
        self.position.z += self.velocity.z;
    }
}

/// Collapses a pair of opposing keys into -1, 0 or 1.
fn axis(positive: bool, negative: bool) -> f32 {
    match (positive, negative) {
        (true, false) => 1.0,
        (false, true) => -1.0,
        _ => 0.0,
    }
}
