//! # Perspective Projection
//!
//! Maps world-space points to screen pixels for a given camera.
//!
//! A point is moved into camera space (translate by the eye, rotate by `-yaw`
//! about z, then by `-pitch` about the camera's right axis), which yields a
//! forward `depth` and an `up` component. Points at or behind the near plane
//! are reported as not visible. The rest go through a pinhole projection whose
//! focal length comes from the vertical field of view and the screen height.

use cgmath::{Point2, Point3, Rad};

use super::camera::Camera;

/// Points with a camera-space depth at or below this are not visible.
pub const NEAR_PLANE: f32 = 0.1;

/// A projected point in screen pixels (origin top-left, y down).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScreenPoint {
    /// Horizontal pixel coordinate
    pub x: f32,
    /// Vertical pixel coordinate
    pub y: f32,
    /// Pixels per world unit at the point's depth (`focal / depth`)
    pub scale: f32,
    /// Whether the point lies in front of the near plane
    pub visible: bool,
}

impl ScreenPoint {
    /// The result for a point behind the near plane.
    pub const HIDDEN: ScreenPoint = ScreenPoint {
        x: 0.0,
        y: 0.0,
        scale: 0.0,
        visible: false,
    };

    /// The pixel position as a point.
    pub fn position(&self) -> Point2<f32> {
        Point2::new(self.x, self.y)
    }
}

/// Viewport size and field of view.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Projection {
    width: f32,
    height: f32,
    fovy: Rad<f32>,
}

impl Projection {
    /// Creates a new projection with the given parameters.
    ///
    /// # Arguments
    /// * `width` - Viewport width in pixels
    /// * `height` - Viewport height in pixels
    /// * `fovy` - Vertical field of view (can be any type convertible to `Rad<f32>`)
    pub fn new<F: Into<Rad<f32>>>(width: f32, height: f32, fovy: F) -> Self {
        Self {
            width,
            height,
            fovy: fovy.into(),
        }
    }

    /// Updates the viewport size.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Viewport width in pixels.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Viewport height in pixels.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Distance of the image plane in pixels: `height / (2 * tan(fovy / 2))`.
    pub fn focal_length(&self) -> f32 {
        self.height / (2.0 * (self.fovy.0 / 2.0).tan())
    }

    /// Binds the projection to a camera pose.
    ///
    /// The returned projector caches the trigonometry of the pose so that
    /// projecting the thousands of cube corners in a frame stays cheap.
    pub fn view(&self, camera: &Camera) -> Projector {
        let (yaw_sin, yaw_cos) = camera.yaw.0.sin_cos();
        let (pitch_sin, pitch_cos) = camera.pitch.0.sin_cos();
        Projector {
            eye: camera.position,
            yaw_sin,
            yaw_cos,
            pitch_sin,
            pitch_cos,
            focal: self.focal_length(),
            half_width: self.width / 2.0,
            half_height: self.height / 2.0,
        }
    }
}

/// A projection bound to one camera pose.
#[derive(Copy, Clone, Debug)]
pub struct Projector {
    eye: Point3<f32>,
    yaw_sin: f32,
    yaw_cos: f32,
    pitch_sin: f32,
    pitch_cos: f32,
    focal: f32,
    half_width: f32,
    half_height: f32,
}

impl Projector {
    /// Moves a world-space point into camera space.
    pub fn to_view(&self, point: Point3<f32>) -> ViewPoint {
        let x = point.x - self.eye.x;
        let y = point.y - self.eye.y;
        let z = point.z - self.eye.z;

        let right = x * self.yaw_cos + y * self.yaw_sin;
        let ahead = -x * self.yaw_sin + y * self.yaw_cos;

        ViewPoint {
            right,
            up: ahead * self.pitch_sin + z * self.pitch_cos,
            depth: ahead * self.pitch_cos - z * self.pitch_sin,
        }
    }

    fn to_screen(&self, view: ViewPoint) -> ScreenPoint {
        let scale = self.focal / view.depth;
        ScreenPoint {
            x: view.right * scale + self.half_width,
            y: self.half_height - view.up * scale,
            scale,
            visible: true,
        }
    }

    /// Projects a world-space point to the screen.
    pub fn project(&self, point: Point3<f32>) -> ScreenPoint {
        let view = self.to_view(point);
        if view.depth <= NEAR_PLANE {
            return ScreenPoint::HIDDEN;
        }
        self.to_screen(view)
    }

    /// Projects a convex polygon, cutting away the part at or behind the
    /// near plane.
    ///
    /// # Arguments
    /// * `polygon` - World-space vertices in drawing order
    ///
    /// # Returns
    /// The screen outline of the remaining part, or an empty list when less
    /// than a triangle is left.
    pub fn project_clipped(&self, polygon: &[Point3<f32>]) -> Vec<Point2<f32>> {
        let view: Vec<ViewPoint> = polygon.iter().map(|&point| self.to_view(point)).collect();

        let mut kept = Vec::with_capacity(view.len() + 1);
        for (i, &current) in view.iter().enumerate() {
            let next = view[(i + 1) % view.len()];
            let current_in = current.depth > NEAR_PLANE;
            if current_in {
                kept.push(current);
            }
            if current_in != (next.depth > NEAR_PLANE) {
                let t = (NEAR_PLANE - current.depth) / (next.depth - current.depth);
                kept.push(current.lerp(next, t));
            }
        }

        if kept.len() < 3 {
            return Vec::new();
        }
        kept.into_iter().map(|point| self.to_screen(point).position()).collect()
    }
}

/// A point in camera space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewPoint {
    /// Offset to the right of the view axis
    pub right: f32,
    /// Offset above the view axis
    pub up: f32,
    /// Distance along the view axis
    pub depth: f32,
}

impl ViewPoint {
    fn lerp(self, other: ViewPoint, t: f32) -> ViewPoint {
        ViewPoint {
            right: self.right + (other.right - self.right) * t,
            up: self.up + (other.up - self.up) * t,
            depth: self.depth + (other.depth - self.depth) * t,
        }
    }
}

/// Projects one point without keeping a projector around.
pub fn project<F: Into<Rad<f32>>>(
    point: Point3<f32>,
    camera: &Camera,
    width: f32,
    height: f32,
    fovy: F,
) -> ScreenPoint {
    Projection::new(width, height, fovy).view(camera).project(point)
}

#[cfg(test)]
mod tests {
    use cgmath::Deg;

    use super::*;
    use crate::engine_state::physics::raycast::look_direction;

    const WIDTH: f32 = 800.0;
    const HEIGHT: f32 = 600.0;

    fn level_camera() -> Camera {
        Camera::new(Point3::new(0.0, 0.0, 0.0), Rad(0.0), Rad(0.0))
    }

    #[test]
    fn focal_length_from_fov() {
        let projection = Projection::new(WIDTH, HEIGHT, Deg(80.0));
        let expected = HEIGHT / (2.0 * 40.0f32.to_radians().tan());
        assert!((projection.focal_length() - expected).abs() < 1e-3);
    }

    #[test]
    fn point_ahead_lands_on_screen_centre() {
        let p = project(Point3::new(0.0, 5.0, 0.0), &level_camera(), WIDTH, HEIGHT, Deg(80.0));
        assert!(p.visible);
        assert!((p.x - WIDTH / 2.0).abs() < 1e-3);
        assert!((p.y - HEIGHT / 2.0).abs() < 1e-3);

        let focal = Projection::new(WIDTH, HEIGHT, Deg(80.0)).focal_length();
        assert!((p.scale - focal / 5.0).abs() < 1e-3);
    }

    #[test]
    fn near_plane_clips() {
        let camera = level_camera();
        let behind = project(Point3::new(0.0, -3.0, 0.0), &camera, WIDTH, HEIGHT, Deg(80.0));
        assert_eq!(behind, ScreenPoint::HIDDEN);

        let on_plane = project(Point3::new(0.0, NEAR_PLANE, 0.0), &camera, WIDTH, HEIGHT, Deg(80.0));
        assert!(!on_plane.visible);

        let just_past = project(Point3::new(0.0, 0.2, 0.0), &camera, WIDTH, HEIGHT, Deg(80.0));
        assert!(just_past.visible);
    }

    /// A unit square in the plane x = 1 spanning y from `near` to `far`.
    fn wall(near: f32, far: f32) -> [Point3<f32>; 4] {
        [
            Point3::new(1.0, near, -0.5),
            Point3::new(1.0, far, -0.5),
            Point3::new(1.0, far, 0.5),
            Point3::new(1.0, near, 0.5),
        ]
    }

    #[test]
    fn polygon_in_front_is_projected_unchanged() {
        let view = Projection::new(WIDTH, HEIGHT, Deg(80.0)).view(&level_camera());
        let quad = wall(2.0, 3.0);
        let expected: Vec<Point2<f32>> = quad.iter().map(|&p| view.project(p).position()).collect();
        assert_eq!(view.project_clipped(&quad), expected);
    }

    #[test]
    fn polygon_behind_vanishes() {
        let view = Projection::new(WIDTH, HEIGHT, Deg(80.0)).view(&level_camera());
        assert!(view.project_clipped(&wall(-3.0, -1.0)).is_empty());
        assert!(view.project_clipped(&[]).is_empty());
    }

    #[test]
    fn polygon_across_the_near_plane_is_cut_there() {
        let projection = Projection::new(WIDTH, HEIGHT, Deg(80.0));
        let view = projection.view(&level_camera());
        let outline = view.project_clipped(&wall(-1.0, 1.0));

        assert_eq!(outline.len(), 4);
        // The cut edge sits at depth NEAR_PLANE, one unit to the right.
        let cut_x = WIDTH / 2.0 + projection.focal_length() / NEAR_PLANE;
        let nearest = outline.iter().map(|p| p.x).fold(f32::MIN, f32::max);
        assert!((nearest - cut_x).abs() < 0.5, "{} vs {}", nearest, cut_x);
        // The far edge is untouched.
        let far = view.project(Point3::new(1.0, 1.0, 0.5)).position();
        assert!(outline.contains(&far));
    }

    #[test]
    fn right_is_right_and_up_is_up() {
        let view = Projection::new(WIDTH, HEIGHT, Deg(80.0)).view(&level_camera());
        let right = view.project(Point3::new(1.0, 5.0, 0.0));
        let above = view.project(Point3::new(0.0, 5.0, 1.0));
        assert!(right.x > WIDTH / 2.0);
        assert!(above.y < HEIGHT / 2.0);
    }

    #[test]
    fn look_direction_projects_to_centre_for_any_pose() {
        let projection = Projection::new(WIDTH, HEIGHT, Deg(80.0));
        for &(yaw, pitch) in &[(0.0, 0.0), (1.2, 0.3), (-2.5, -0.9), (3.0, 1.3)] {
            let camera = Camera::new(Point3::new(3.0, -2.0, 9.6), Rad(yaw), Rad(pitch));
            let target = camera.position + look_direction(camera.yaw, camera.pitch) * 4.0;
            let p = projection.view(&camera).project(target);
            assert!(p.visible);
            assert!((p.x - WIDTH / 2.0).abs() < 1e-2, "yaw {} pitch {}", yaw, pitch);
            assert!((p.y - HEIGHT / 2.0).abs() < 1e-2, "yaw {} pitch {}", yaw, pitch);
        }
    }

    #[test]
    fn resize_moves_the_centre() {
        let mut projection = Projection::new(WIDTH, HEIGHT, Deg(80.0));
        projection.resize(1000.0, 500.0);
        let p = projection.view(&level_camera()).project(Point3::new(0.0, 2.0, 0.0));
        assert!((p.x - 500.0).abs() < 1e-3);
        assert!((p.y - 250.0).abs() < 1e-3);
    }
}
