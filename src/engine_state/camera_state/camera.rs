//! # Camera Implementation
//!
//! The first-person camera: an eye position and a yaw/pitch orientation.
//!
//! The world is z-up. Zero yaw and pitch look along +y, positive yaw turns
//! toward -x and positive pitch looks down. The same convention drives the
//! picking ray, the projection and player movement, so what is drawn under
//! the screen centre is what the ray strikes.

use cgmath::{Point3, Rad, Vector3};

use crate::{
    config::PlayerConfig,
    engine_state::physics::{player::Player, raycast::look_direction},
};

/// A first-person camera in world space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    /// The eye position
    pub position: Point3<f32>,
    /// Horizontal rotation about the vertical axis
    pub yaw: Rad<f32>,
    /// Vertical rotation, positive looks down
    pub pitch: Rad<f32>,
}

impl Camera {
    /// Creates a new camera with the specified position and orientation.
    ///
    /// # Arguments
    /// * `position` - Eye position in world space. Can be any type that converts to `Point3<f32>`.
    /// * `yaw` - Horizontal rotation. Can be any type that converts to `Rad<f32>`.
    /// * `pitch` - Vertical rotation. Can be any type that converts to `Rad<f32>`.
    ///
    /// # Example
    /// ```rust
    /// use cgmath::{Deg, Point3};
    /// use voxel_frontier::engine_state::camera_state::camera::Camera;
    ///
    /// let camera = Camera::new(
    ///     Point3::new(0.0, 0.0, 1.6), // Eye height above the origin
    ///     Deg(0.0),                   // Looking along +y
    ///     Deg(0.0),                   // Level horizon
    /// );
    /// assert_eq!(camera.position.z, 1.6);
    /// ```
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
        }
    }

    /// The camera seen through the player's eyes.
    pub fn from_player(player: &Player, shape: &PlayerConfig) -> Self {
        Self::new(player.eye_position(shape), player.yaw, player.pitch)
    }

    /// Gets the camera's forward direction vector.
    ///
    /// # Returns
    /// A normalized 3D vector representing the camera's forward direction
    pub fn get_view_vec(&self) -> Vector3<f32> {
        look_direction(self.yaw, self.pitch)
    }
}

#[cfg(test)]
mod tests {
    use cgmath::InnerSpace;

    use super::*;

    #[test]
    fn camera_sits_at_eye_height() {
        let shape = PlayerConfig::default();
        let mut player = Player::new(Point3::new(1.0, 2.0, 8.0));
        player.yaw = Rad(0.5);
        let camera = Camera::from_player(&player, &shape);
        assert_eq!(camera.position, Point3::new(1.0, 2.0, 9.6));
        assert_eq!(camera.yaw, Rad(0.5));
    }

    #[test]
    fn view_vector_is_unit_length() {
        let camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Rad(2.0), Rad(-0.7));
        assert!((camera.get_view_vec().magnitude() - 1.0).abs() < 1e-6);
    }
}
