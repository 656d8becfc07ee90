//! First-person view of the item in hand.
//!
//! Drawn last, in screen space, anchored near the bottom-right corner. The
//! anchor bobs up and down, quickly while walking and gently while standing.

use cgmath::{Basis2, Point2, Rad, Rotation, Rotation2, Vector2};

use super::{color::Rgba, Canvas};
use crate::engine_state::inventory::ItemKind;

const ARM_COLOR: Rgba = Rgba::from_hex(0xfca5a5);
const HANDLE_COLOR: Rgba = Rgba::from_hex(0x64748b);
const HEAD_COLOR: Rgba = Rgba::from_hex(0xcbd5e1);

/// Distance of the anchor from the right edge.
const ANCHOR_RIGHT: f32 = 220.0;
/// Distance of the anchor from the bottom edge.
const ANCHOR_BOTTOM: f32 = 200.0;

/// Offset and tilt of a tool relative to the anchor.
const TOOL_OFFSET: Vector2<f32> = Vector2::new(70.0, 30.0);
const TOOL_TILT: Rad<f32> = Rad(-0.2);

/// Segments used to flatten each curved edge of the pickaxe head.
const HEAD_SEGMENTS: usize = 8;

/// Vertical bob in pixels at `time_ms`.
pub fn bob_offset(time_ms: f64, moving: bool) -> f32 {
    if moving {
        ((time_ms / 150.0).sin() * 10.0) as f32
    } else {
        ((time_ms / 500.0).sin() * 2.0) as f32
    }
}

/// Draws the held item over the frame.
///
/// # Arguments
/// * `canvas` - Target of the draw calls
/// * `item` - What is in hand
/// * `time_ms` - Wall-clock time driving the bob
/// * `moving` - Whether the player is trying to walk
pub fn draw_held_item<C: Canvas>(canvas: &mut C, item: ItemKind, time_ms: f64, moving: bool) {
    let (width, height) = canvas.viewport();
    let anchor = Point2::new(width - ANCHOR_RIGHT, height - ANCHOR_BOTTOM + bob_offset(time_ms, moving));
    let at = |x: f32, y: f32| anchor + Vector2::new(x, y);

    match item {
        ItemKind::Block(block_type) => {
            let palette = block_type.palette();
            canvas.fill_rect(anchor.x, anchor.y + 40.0, 80.0, 80.0, palette.side);
            canvas.fill_polygon(
                &[at(0.0, 40.0), at(40.0, 0.0), at(120.0, 0.0), at(80.0, 40.0)],
                palette.top,
            );
        }
        ItemKind::Pickaxe => {
            draw_arm(canvas, anchor);
            let tool = ToolFrame::new(anchor);
            draw_handle(canvas, &tool);
            draw_pickaxe_head(canvas, &tool);
        }
        ItemKind::Axe => {
            draw_arm(canvas, anchor);
            let tool = ToolFrame::new(anchor);
            draw_handle(canvas, &tool);
            canvas.fill_polygon(
                &[
                    tool.point(15.0, -20.0),
                    tool.point(50.0, -35.0),
                    tool.point(50.0, 20.0),
                    tool.point(15.0, 5.0),
                ],
                HEAD_COLOR,
            );
        }
        ItemKind::Hand | ItemKind::Food => draw_arm(canvas, anchor),
    }
}

fn draw_arm<C: Canvas>(canvas: &mut C, anchor: Point2<f32>) {
    canvas.fill_rect(anchor.x + 40.0, anchor.y + 40.0, 60.0, 200.0, ARM_COLOR);
}

/// Local coordinates of a tool: shifted from the anchor and tilted.
struct ToolFrame {
    origin: Point2<f32>,
    rotation: Basis2<f32>,
}

impl ToolFrame {
    fn new(anchor: Point2<f32>) -> Self {
        Self {
            origin: anchor + TOOL_OFFSET,
            rotation: Rotation2::from_angle(TOOL_TILT),
        }
    }

    fn point(&self, x: f32, y: f32) -> Point2<f32> {
        self.origin + self.rotation.rotate_vector(Vector2::new(x, y))
    }
}

fn draw_handle<C: Canvas>(canvas: &mut C, tool: &ToolFrame) {
    canvas.fill_polygon(
        &[
            tool.point(0.0, -20.0),
            tool.point(15.0, -20.0),
            tool.point(15.0, 100.0),
            tool.point(0.0, 100.0),
        ],
        HANDLE_COLOR,
    );
}

/// The curved head, filled as a strip of quads between its two edges.
fn draw_pickaxe_head<C: Canvas>(canvas: &mut C, tool: &ToolFrame) {
    let upper = |t: f32| quadratic((-20.0, -20.0), (7.0, -40.0), (35.0, -20.0), t);
    let lower = |t: f32| quadratic((-20.0, -10.0), (7.0, -30.0), (35.0, -10.0), t);

    for i in 0..HEAD_SEGMENTS {
        let t0 = i as f32 / HEAD_SEGMENTS as f32;
        let t1 = (i + 1) as f32 / HEAD_SEGMENTS as f32;
        let corners = [upper(t0), upper(t1), lower(t1), lower(t0)].map(|(x, y)| tool.point(x, y));
        canvas.fill_polygon(&corners, HEAD_COLOR);
    }
}

/// A point on a quadratic Bezier curve.
fn quadratic(start: (f32, f32), control: (f32, f32), end: (f32, f32), t: f32) -> (f32, f32) {
    let u = 1.0 - t;
    (
        u * u * start.0 + 2.0 * u * t * control.0 + t * t * end.0,
        u * u * start.1 + 2.0 * u * t * control.1 + t * t * end.1,
    )
}
