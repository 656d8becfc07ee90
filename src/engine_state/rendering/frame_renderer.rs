//! # World Renderer
//!
//! Painter's-algorithm drawing of the blocks around the player.
//!
//! Every frame the cells in a cube around the player's feet are gathered,
//! sorted from farthest to nearest and drawn face by face onto a [`Canvas`].
//! Later draws cover earlier ones, so the nearest faces end up on top without
//! any depth test. Faces pressed against an opaque neighbour are skipped, and
//! blocks fade out over the outer part of the render radius.

use cgmath::{Point2, Point3};

use super::{color::Rgba, Canvas};
use crate::engine_state::{
    camera_state::{
        camera::Camera,
        projection::{Projection, Projector, ScreenPoint},
    },
    physics::raycast::RayResult,
    voxels::{
        block::{
            block_side::{BlockSide, CUBE_CORNERS},
            block_type::BlockType,
            Block,
        },
        block_store::BlockStore,
    },
};

/// Fraction of the render radius drawn at full opacity.
pub const FOG_START: f32 = 0.7;

/// Width of the dark outline around each face.
const OUTLINE_WIDTH: f32 = 1.0;
/// Outline alpha before fog is applied.
const OUTLINE_ALPHA: f32 = 0.1;
/// Width of the highlight wireframe.
const HIGHLIGHT_WIDTH: f32 = 2.0;
/// Alpha of the highlight wireframe.
const HIGHLIGHT_ALPHA: f32 = 0.9;

/// The twelve edges of a cube as pairs of [`CUBE_CORNERS`] indices.
const CUBE_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0),
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// A block selected for drawing this frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderCandidate {
    /// The block to draw
    pub block: Block,
    /// Squared distance from the player's cell
    pub distance_squared: i32,
}

/// Collects the blocks within `radius` of `center`, farthest first.
///
/// Cells are scanned over the cube `center ± radius` and kept when present
/// in the store with a squared distance strictly below `radius²`. The sort is
/// stable, so equally distant blocks keep their scan order.
///
/// # Arguments
/// * `store` - The world to draw from
/// * `center` - The player's cell (`floor` of the feet position)
/// * `radius` - The render distance in cells
///
/// # Returns
/// The candidates in drawing order.
pub fn gather_candidates(store: &BlockStore, center: Point3<i32>, radius: i32) -> Vec<RenderCandidate> {
    let limit = radius * radius;
    let mut candidates = Vec::new();

    for dx in -radius..=radius {
        for dy in -radius..=radius {
            for dz in -radius..=radius {
                let distance_squared = dx * dx + dy * dy + dz * dz;
                if distance_squared >= limit {
                    continue;
                }
                if let Some(block) = store.get(center.x + dx, center.y + dy, center.z + dz) {
                    candidates.push(RenderCandidate {
                        block,
                        distance_squared,
                    });
                }
            }
        }
    }

    candidates.sort_by(|a, b| b.distance_squared.cmp(&a.distance_squared));
    candidates
}

/// Opacity of a block at the given squared distance.
///
/// Fully opaque up to [`FOG_START`] of the radius, then falling linearly to
/// zero at the radius itself.
pub fn fog_opacity(distance_squared: i32, radius: i32) -> f32 {
    let distance = (distance_squared as f32).sqrt();
    let radius = radius as f32;
    let fog_start = FOG_START * radius;
    if distance <= fog_start {
        1.0
    } else {
        1.0 - (distance - fog_start) / ((1.0 - FOG_START) * radius)
    }
}

/// Whether the neighbour on `side` of `block` hides that face.
pub fn is_occluded(store: &BlockStore, block: &Block, side: BlockSide) -> bool {
    store
        .get_at(block.position + side.normal())
        .is_some_and(|neighbour| neighbour.block_type.occludes_neighbours())
}

/// The faces of `block` to draw when seen from `eye`.
///
/// At most one face per axis, minus those hidden by a neighbour. Water never
/// shows its underside.
pub fn visible_faces(store: &BlockStore, eye: Point3<f32>, block: &Block) -> Vec<BlockSide> {
    BlockSide::get_visible_sides(eye, block.position)
        .into_iter()
        .filter(|&side| !(block.block_type == BlockType::WATER && side == BlockSide::BOTTOM))
        .filter(|&side| !is_occluded(store, block, side))
        .collect()
}

/// World position of corner `index` of the cell at `position`.
fn corner_point(position: Point3<i32>, index: usize) -> Point3<f32> {
    let corner = position + CUBE_CORNERS[index];
    Point3::new(corner.x as f32, corner.y as f32, corner.z as f32)
}

/// Projects the eight corners of the cell at `position`.
fn project_corners(view: &Projector, position: Point3<i32>) -> [ScreenPoint; 8] {
    std::array::from_fn(|index| view.project(corner_point(position, index)))
}

fn face_color(block_type: BlockType, side: BlockSide) -> Rgba {
    let palette = block_type.palette();
    match side {
        BlockSide::TOP => palette.top,
        BlockSide::BOTTOM => palette.bottom,
        _ => palette.side,
    }
}

/// Draws the world around the player and the highlight wireframe.
///
/// # Arguments
/// * `canvas` - Target of the draw calls
/// * `store` - The world
/// * `feet` - The player's feet position; the render cube is centred on its cell
/// * `camera` - The eye the frame is seen from
/// * `projection` - Viewport and field of view
/// * `radius` - Render distance in cells
/// * `highlight` - The block under the crosshair, if any
pub fn draw_world<C: Canvas>(
    canvas: &mut C,
    store: &BlockStore,
    feet: Point3<f32>,
    camera: &Camera,
    projection: &Projection,
    radius: i32,
    highlight: Option<&RayResult>,
) {
    let center = Point3::new(feet.x.floor() as i32, feet.y.floor() as i32, feet.z.floor() as i32);
    let view = projection.view(camera);

    for candidate in gather_candidates(store, center, radius) {
        let opacity = fog_opacity(candidate.distance_squared, radius);
        if opacity <= 0.0 {
            continue;
        }
        draw_block(canvas, store, &view, camera.position, &candidate.block, opacity);
    }

    if let Some(result) = highlight {
        draw_highlight(canvas, &view, result.hit.position);
    }
}

fn draw_block<C: Canvas>(
    canvas: &mut C,
    store: &BlockStore,
    view: &Projector,
    eye: Point3<f32>,
    block: &Block,
    opacity: f32,
) {
    let corners = project_corners(view, block.position);
    if corners.iter().all(|corner| !corner.visible) {
        return;
    }

    let outline = Rgba::BLACK.with_alpha(OUTLINE_ALPHA * opacity);

    for side in visible_faces(store, eye, block) {
        let indices = side.corner_indices();
        let fill = face_color(block.block_type, side).fade(opacity);

        if indices.iter().all(|&i| corners[i].visible) {
            let points: [Point2<f32>; 4] = indices.map(|i| corners[i].position());
            draw_face(canvas, &points, fill, outline);
        } else {
            // Faces reaching behind the eye are cut at the near plane.
            let points = view.project_clipped(&indices.map(|i| corner_point(block.position, i)));
            if !points.is_empty() {
                draw_face(canvas, &points, fill, outline);
            }
        }
    }
}

fn draw_face<C: Canvas>(canvas: &mut C, points: &[Point2<f32>], fill: Rgba, outline: Rgba) {
    canvas.fill_polygon(points, fill);
    canvas.stroke_polygon(points, OUTLINE_WIDTH, outline);
}

fn draw_highlight<C: Canvas>(canvas: &mut C, view: &Projector, position: Point3<i32>) {
    let corners = project_corners(view, position);
    let color = Rgba::WHITE.with_alpha(HIGHLIGHT_ALPHA);

    for (from, to) in CUBE_EDGES {
        if corners[from].visible && corners[to].visible {
            canvas.stroke_segment(corners[from].position(), corners[to].position(), HIGHLIGHT_WIDTH, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{Deg, Rad};

    use super::*;
    use crate::engine_state::rendering::{DrawCommand, RecordingCanvas};

    const RADIUS: i32 = 14;

    fn block(x: i32, y: i32, z: i32, block_type: BlockType) -> Block {
        Block::new(Point3::new(x, y, z), block_type)
    }

    #[test]
    fn stone_neighbour_hides_the_face() {
        let mut store = BlockStore::new();
        store.set(0, 0, 0, BlockType::GRASS);
        store.set(0, 0, 1, BlockType::STONE);

        let grass = block(0, 0, 0, BlockType::GRASS);
        assert!(is_occluded(&store, &grass, BlockSide::TOP));
        let faces = visible_faces(&store, Point3::new(0.5, 0.5, 5.0), &grass);
        assert!(!faces.contains(&BlockSide::TOP));
    }

    #[test]
    fn leaves_neighbour_hides_nothing() {
        let mut store = BlockStore::new();
        store.set(0, 0, 0, BlockType::GRASS);
        store.set(0, 0, 1, BlockType::LEAVES);

        let grass = block(0, 0, 0, BlockType::GRASS);
        assert!(!is_occluded(&store, &grass, BlockSide::TOP));
        let faces = visible_faces(&store, Point3::new(0.5, 0.5, 5.0), &grass);
        assert!(faces.contains(&BlockSide::TOP));
    }

    #[test]
    fn water_never_shows_its_underside() {
        let store = BlockStore::new();
        let water = block(0, 0, 3, BlockType::WATER);
        let faces = visible_faces(&store, Point3::new(0.0, -2.0, 1.0), &water);
        assert_eq!(faces, vec![BlockSide::BACK]);
    }

    #[test]
    fn fog_curve() {
        assert_eq!(fog_opacity(0, RADIUS), 1.0);
        // 0.7 * 14 = 9.8, so 9 cells away is still clear.
        assert_eq!(fog_opacity(81, RADIUS), 1.0);
        // Linear from 9.8 down to 14: 12 cells away is 1 - 2.2 / 4.2.
        assert!((fog_opacity(144, RADIUS) - (1.0 - 2.2 / 4.2)).abs() < 1e-5);
        assert!((fog_opacity(121, RADIUS) - (1.0 - 1.2 / 4.2)).abs() < 1e-5);
        assert!(fog_opacity(RADIUS * RADIUS, RADIUS).abs() < 1e-5);
    }

    #[test]
    fn far_blocks_come_first() {
        let mut store = BlockStore::new();
        store.set(1, 0, 0, BlockType::STONE);
        store.set(5, 0, 0, BlockType::DIRT);
        store.set(3, 0, 0, BlockType::SAND);

        let order: Vec<i32> = gather_candidates(&store, Point3::new(0, 0, 0), RADIUS)
            .iter()
            .map(|c| c.block.position.x)
            .collect();
        assert_eq!(order, vec![5, 3, 1]);
    }

    #[test]
    fn blocks_at_the_radius_are_excluded() {
        let mut store = BlockStore::new();
        store.set(RADIUS, 0, 0, BlockType::STONE);
        store.set(RADIUS - 1, 0, 0, BlockType::STONE);
        store.set(40, 0, 0, BlockType::STONE);

        let candidates = gather_candidates(&store, Point3::new(0, 0, 0), RADIUS);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].block.position.x, RADIUS - 1);
    }

    #[test]
    fn draws_faces_then_highlight() {
        let mut store = BlockStore::new();
        store.set(0, 3, 0, BlockType::STONE);

        let camera = Camera::new(Point3::new(0.5, 0.0, 1.6), Rad(0.0), Rad(0.3));
        let projection = Projection::new(800.0, 600.0, Deg(80.0));
        let highlight = RayResult {
            hit: block(0, 3, 0, BlockType::STONE),
            place: Point3::new(0, 2, 0),
            dist: 2.5,
        };

        let mut canvas = RecordingCanvas::new(800.0, 600.0);
        draw_world(
            &mut canvas,
            &store,
            Point3::new(0.5, 0.0, 0.0),
            &camera,
            &projection,
            RADIUS,
            Some(&highlight),
        );

        // Top, back and right faces, each filled then outlined.
        let fills = canvas
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Polygon(..)))
            .count();
        assert_eq!(fills, 3);
        assert!(matches!(canvas.commands[0], DrawCommand::Polygon(_, color) if color == BlockType::STONE.palette().top));

        let wide: Vec<&DrawCommand> = canvas
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Segment(_, _, w, _) if *w == HIGHLIGHT_WIDTH))
            .collect();
        assert_eq!(wide.len(), 12);
        assert!(matches!(canvas.commands.last(), Some(DrawCommand::Segment(_, _, w, _)) if *w == HIGHLIGHT_WIDTH));
    }

    #[test]
    fn nothing_behind_the_camera_is_drawn() {
        let mut store = BlockStore::new();
        store.set(0, -4, 1, BlockType::STONE);

        let camera = Camera::new(Point3::new(0.5, 0.5, 1.6), Rad(0.0), Rad(0.0));
        let projection = Projection::new(800.0, 600.0, Deg(80.0));
        let mut canvas = RecordingCanvas::new(800.0, 600.0);
        draw_world(
            &mut canvas,
            &store,
            Point3::new(0.5, 0.5, 0.0),
            &camera,
            &projection,
            RADIUS,
            None,
        );
        assert!(canvas.commands.is_empty());
    }

    #[test]
    fn faces_reaching_behind_the_eye_are_cut_not_dropped() {
        // A block beside the camera, half in front of it and half behind.
        let mut store = BlockStore::new();
        store.set(1, -1, 0, BlockType::STONE);

        let camera = Camera::new(Point3::new(0.5, -0.5, 0.5), Rad(0.0), Rad(0.0));
        let projection = Projection::new(800.0, 600.0, Deg(80.0));
        let mut canvas = RecordingCanvas::new(800.0, 600.0);
        draw_world(
            &mut canvas,
            &store,
            Point3::new(0.5, -0.5, 0.0),
            &camera,
            &projection,
            RADIUS,
            None,
        );

        // Left and top faces straddle the near plane; the front face is fully ahead.
        let fills: Vec<usize> = canvas
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Polygon(points, _) => Some(points.len()),
                _ => None,
            })
            .collect();
        assert_eq!(fills, vec![4, 4, 4]);
    }
}
