//! Rendering system for the voxel sandbox.
//!
//! Frames are produced in two halves that meet at the [`Canvas`] trait:
//!
//! * The scene side (`frame_renderer`, `sky`, `held_item`) decides *what* to
//!   draw and in which order: sky, sun and moon, every visible block face from
//!   farthest to nearest, the highlight wireframe, and the held item on top.
//! * The [`Canvas`] implementation decides *how* to put it on screen. The
//!   `painter` module tessellates the draw calls into one alpha-blended
//!   triangle list and submits it to the GPU in call order.
//!
//! There is no depth buffer. Correct overlap comes entirely from the order of
//! the draw calls, so a canvas must composite them strictly in the order they
//! are issued.

use cgmath::Point2;

pub mod color;
pub mod frame_renderer;
pub mod held_item;
pub mod painter;
pub mod sky;
pub mod vertex;

pub use color::Rgba;

/// A 2D drawing surface measured in pixels, origin top-left, y down.
///
/// Every call composites over what was drawn before it.
pub trait Canvas {
    /// Width and height of the drawable area in pixels.
    fn viewport(&self) -> (f32, f32);

    /// Fills the whole surface with one colour, discarding earlier draws.
    fn clear(&mut self, color: Rgba);

    /// Fills a convex polygon.
    fn fill_polygon(&mut self, points: &[Point2<f32>], color: Rgba);

    /// Draws a straight line of the given width.
    fn stroke_segment(&mut self, from: Point2<f32>, to: Point2<f32>, width: f32, color: Rgba);

    /// Fills a circle.
    fn fill_circle(&mut self, center: Point2<f32>, radius: f32, color: Rgba);

    /// Outlines a closed polygon.
    fn stroke_polygon(&mut self, points: &[Point2<f32>], width: f32, color: Rgba) {
        if points.len() < 2 {
            return;
        }
        for (i, &from) in points.iter().enumerate() {
            let to = points[(i + 1) % points.len()];
            self.stroke_segment(from, to, width, color);
        }
    }

    /// Fills an axis-aligned rectangle.
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba) {
        self.fill_polygon(
            &[
                Point2::new(x, y),
                Point2::new(x + width, y),
                Point2::new(x + width, y + height),
                Point2::new(x, y + height),
            ],
            color,
        );
    }
}

/// A canvas that records draw calls instead of drawing them.
///
/// Used by tests to check what a frame would put on screen and in which
/// order.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    /// Viewport width
    pub width: f32,
    /// Viewport height
    pub height: f32,
    /// Every call received, in order
    pub commands: Vec<DrawCommand>,
}

/// One recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// A [`Canvas::clear`] call
    Clear(Rgba),
    /// A [`Canvas::fill_polygon`] call
    Polygon(Vec<Point2<f32>>, Rgba),
    /// A [`Canvas::stroke_segment`] call
    Segment(Point2<f32>, Point2<f32>, f32, Rgba),
    /// A [`Canvas::fill_circle`] call
    Circle(Point2<f32>, f32, Rgba),
}

impl RecordingCanvas {
    /// Creates an empty recording canvas of the given size.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }
}

impl Canvas for RecordingCanvas {
    fn viewport(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_polygon(&mut self, points: &[Point2<f32>], color: Rgba) {
        self.commands.push(DrawCommand::Polygon(points.to_vec(), color));
    }

    fn stroke_segment(&mut self, from: Point2<f32>, to: Point2<f32>, width: f32, color: Rgba) {
        self.commands.push(DrawCommand::Segment(from, to, width, color));
    }

    fn fill_circle(&mut self, center: Point2<f32>, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::Circle(center, radius, color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stroke_polygon_closes_the_loop() {
        let mut canvas = RecordingCanvas::new(10.0, 10.0);
        let square = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        canvas.stroke_polygon(&square, 1.0, Rgba::BLACK);

        assert_eq!(canvas.commands.len(), 4);
        assert_eq!(
            canvas.commands[3],
            DrawCommand::Segment(square[3], square[0], 1.0, Rgba::BLACK)
        );
    }

    #[test]
    fn fill_rect_is_a_quad() {
        let mut canvas = RecordingCanvas::new(10.0, 10.0);
        canvas.fill_rect(1.0, 2.0, 3.0, 4.0, Rgba::WHITE);
        let DrawCommand::Polygon(points, _) = &canvas.commands[0] else {
            panic!("expected a polygon");
        };
        assert_eq!(points[2], Point2::new(4.0, 6.0));
    }
}
