//! # Game Session
//!
//! A [`Session`] owns everything one playthrough consists of: the block store,
//! the player, their stats and inventory, the clocks and the block currently
//! under the crosshair. Nothing lives in globals, so a session can be created,
//! driven and inspected on its own, which is how the tests use it.
//!
//! ## Frame order
//!
//! [`Session::advance`] runs one frame:
//!
//! 1. Fixed ticks owed by the clock (time of day, hunger, health)
//! 2. "New world", slot selection and mouse look
//! 3. Interaction with the block highlighted by the previous frame
//! 4. Player movement and collision
//! 5. Respawn when the player fell through the world or died
//! 6. A fresh raycast for the highlight
//!
//! Drawing is separate ([`Session::render`]) and never changes the session.

use cgmath::{Deg, Point3};
use log::{debug, info};
use web_time::Instant;

use crate::{
    config::GameConfig,
    engine_state::{
        camera_state::{camera::Camera, projection::Projection},
        clock::{next_time_of_day, GameClock, PlayerStats},
        inventory::{Inventory, ItemKind},
        physics::{
            player::{Player, StepContext},
            raycast::{self, RayResult},
        },
        rendering::{frame_renderer, held_item, sky, Canvas},
        voxels::{
            block::{block_type::BlockType, Block},
            block_store::BlockStore,
            generation,
        },
        PlayerIntent,
    },
};

/// Why a block could not be placed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlacementRejection {
    /// The target cell intersects the player
    OverlapsPlayer,
    /// The selected slot has nothing left
    EmptySlot,
}

/// What an interaction did to the world.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum InteractionOutcome {
    /// The highlighted block was removed
    Mined(Block),
    /// A block was added next to the highlighted one
    Placed(Block),
    /// A placement was refused; nothing changed
    Rejected(PlacementRejection),
    /// Nothing to act on, or the held item does nothing
    Ignored,
}

/// One playthrough: world, player and everything that changes while playing.
pub struct Session {
    config: GameConfig,
    store: BlockStore,
    player: Player,
    stats: PlayerStats,
    inventory: Inventory,
    clock: GameClock,
    time_of_day: u32,
    highlight: Option<RayResult>,
    walking: bool,
    rng: fastrand::Rng,
}

impl Session {
    /// Starts a session in a freshly generated world.
    ///
    /// Decorations are placed with a seeded generator when `world.seed` is
    /// configured, and a randomly seeded one otherwise.
    pub fn new(config: GameConfig) -> Self {
        let mut rng = match config.world.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        let store = generation::generate(&config.world, &mut rng);
        Self::assemble(config, store, rng)
    }

    /// Starts a session in an existing world.
    pub fn with_world(config: GameConfig, store: BlockStore) -> Self {
        let rng = match config.world.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Self::assemble(config, store, rng)
    }

    fn assemble(config: GameConfig, store: BlockStore, rng: fastrand::Rng) -> Self {
        Self {
            player: Player::new(Point3::from(config.world.spawn)),
            stats: PlayerStats::default(),
            inventory: Inventory::default(),
            clock: GameClock::new(&config.clock),
            time_of_day: config.clock.start_time,
            highlight: None,
            walking: false,
            rng,
            store,
            config,
        }
    }

    /// The configuration the session runs with.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The world.
    pub fn store(&self) -> &BlockStore {
        &self.store
    }

    /// The world, for direct edits.
    pub fn store_mut(&mut self) -> &mut BlockStore {
        &mut self.store
    }

    /// The player.
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// The player, for direct edits.
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Health, hunger, thirst and temperature.
    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    /// The player's stats, for direct edits.
    pub fn stats_mut(&mut self) -> &mut PlayerStats {
        &mut self.stats
    }

    /// The hotbar.
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// The hotbar, for direct edits.
    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    /// Current tick within the day.
    pub fn time_of_day(&self) -> u32 {
        self.time_of_day
    }

    /// The block under the crosshair as of the last raycast.
    pub fn highlight(&self) -> Option<&RayResult> {
        self.highlight.as_ref()
    }

    /// The camera looking through the player's eyes.
    pub fn camera(&self) -> Camera {
        Camera::from_player(&self.player, &self.config.player)
    }

    /// Regenerates the world and puts the player back at the respawn point
    /// with full stats at the start of the day.
    ///
    /// The inventory is kept.
    pub fn respawn(&mut self) {
        self.store = generation::generate(&self.config.world, &mut self.rng);
        self.player = Player::new(Point3::from(self.config.world.respawn));
        self.stats = PlayerStats::default();
        self.time_of_day = self.config.clock.start_time;
        self.highlight = None;
        self.clock.reset();
        info!("Respawned at {:?}", self.player.position);
    }

    /// Runs one frame of simulation.
    ///
    /// # Arguments
    /// * `elapsed_ms` - Wall time since the previous frame
    /// * `intent` - What the player asked for this frame
    ///
    /// # Returns
    /// The outcome of the interaction, when one was requested.
    pub fn advance(&mut self, elapsed_ms: f32, intent: &PlayerIntent) -> Option<InteractionOutcome> {
        let timing = self.clock.advance(elapsed_ms);
        for _ in 0..timing.ticks {
            self.time_of_day = next_time_of_day(self.time_of_day);
            self.stats.tick();
        }

        if intent.new_world {
            self.respawn();
        }
        if let Some(slot) = intent.select_slot {
            if self.inventory.select(slot) {
                debug!("Selected slot {} ({})", slot, self.inventory.selected().name);
            }
        }
        self.player.apply_look(intent.look_delta, self.config.player.look_sensitivity);

        let outcome = intent.interact.then(|| self.interact());

        let context = StepContext {
            frame_scale: timing.frame_ms / self.config.clock.reference_frame_ms,
            hunger: self.stats.hunger,
            horizontal_limit: self.config.world.horizontal_limit(),
        };
        self.player.step(&self.store, intent, &self.config.player, &context);
        self.walking = intent.is_moving();

        if self.player.position.z < self.config.world.kill_plane {
            info!("Fell out of the world");
            self.respawn();
        } else if self.stats.is_dead() {
            info!("Died");
            self.respawn();
        }

        self.refresh_highlight();
        outcome
    }

    /// Recomputes the block under the crosshair from the current pose.
    pub fn refresh_highlight(&mut self) {
        self.highlight = raycast::cast(
            &self.store,
            self.player.eye_position(&self.config.player),
            self.player.yaw,
            self.player.pitch,
            self.config.player.reach,
        );
    }

    /// Uses the selected item on the highlighted block.
    ///
    /// Tools and the bare hand remove the block. Block items fill the cell in
    /// front of it unless that cell intersects the player or the slot is
    /// empty. Food does nothing.
    pub fn interact(&mut self) -> InteractionOutcome {
        let Some(target) = self.highlight else {
            return InteractionOutcome::Ignored;
        };

        let kind = self.inventory.selected().kind;
        let outcome = match kind {
            kind if kind.mines() => match self.store.delete(
                target.hit.position.x,
                target.hit.position.y,
                target.hit.position.z,
            ) {
                Some(block) => InteractionOutcome::Mined(block),
                None => InteractionOutcome::Ignored,
            },
            ItemKind::Block(block_type) => self.place(target.place, block_type),
            _ => InteractionOutcome::Ignored,
        };

        match outcome {
            InteractionOutcome::Mined(block) | InteractionOutcome::Placed(block) => {
                debug!("{:?} at {:?}", outcome, block.position);
                self.highlight = None;
            }
            InteractionOutcome::Rejected(reason) => debug!("Placement rejected: {:?}", reason),
            InteractionOutcome::Ignored => {}
        }
        outcome
    }

    fn place(&mut self, cell: Point3<i32>, block_type: BlockType) -> InteractionOutcome {
        if self.inventory.selected().is_empty() {
            return InteractionOutcome::Rejected(PlacementRejection::EmptySlot);
        }
        if self.overlaps_player(cell) {
            return InteractionOutcome::Rejected(PlacementRejection::OverlapsPlayer);
        }

        self.store.set_at(cell, block_type);
        self.inventory.decrement_selected();
        InteractionOutcome::Placed(Block::new(cell, block_type))
    }

    /// Whether a block in `cell` would intersect the player.
    fn overlaps_player(&self, cell: Point3<i32>) -> bool {
        let shape = &self.config.player;
        let feet = self.player.position;
        let dx = (feet.x - (cell.x as f32 + 0.5)).abs();
        let dy = (feet.y - (cell.y as f32 + 0.5)).abs();
        let dz = cell.z as f32 - feet.z;
        dx < 0.5 + shape.radius && dy < 0.5 + shape.radius && dz >= -1.0 && dz < shape.height
    }

    /// Draws the frame: sky, world, highlight and held item, in that order.
    ///
    /// # Arguments
    /// * `canvas` - Target of the draw calls
    /// * `time_ms` - Wall-clock time driving the held item's bob
    pub fn render<C: Canvas>(&self, canvas: &mut C, time_ms: f64) {
        let started = Instant::now();
        let (width, height) = canvas.viewport();
        let projection = Projection::new(width, height, Deg(self.config.render.fov_degrees));

        sky::draw_sky(canvas, self.time_of_day);
        frame_renderer::draw_world(
            canvas,
            &self.store,
            self.player.position,
            &self.camera(),
            &projection,
            self.config.render.render_distance,
            self.highlight.as_ref(),
        );
        held_item::draw_held_item(canvas, self.inventory.selected().kind, time_ms, self.walking);

        log::trace!("Frame built in {:?}", started.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Rad;

    use super::*;
    use crate::engine_state::{
        inventory::SLOT_COUNT,
        physics::player::PITCH_LIMIT,
        rendering::{DrawCommand, RecordingCanvas},
    };

    const STONE_SLOT: usize = 3;
    const FOOD_SLOT: usize = 5;

    /// A 7x7 stone floor at z = 0 with the player standing on it.
    fn floor_session() -> Session {
        let mut store = BlockStore::new();
        for x in -3..=3 {
            for y in -3..=3 {
                store.set(x, y, 0, BlockType::STONE);
            }
        }
        let mut session = Session::with_world(GameConfig::default(), store);
        session.player_mut().position = Point3::new(0.5, 0.5, 1.0);
        session
    }

    fn look_down(session: &mut Session) {
        session.player_mut().pitch = Rad(PITCH_LIMIT);
        session.refresh_highlight();
    }

    /// Puts a wall block at eye level two cells ahead and looks at it.
    fn look_at_wall(session: &mut Session) {
        session.store_mut().set(0, 3, 2, BlockType::DIRT);
        session.player_mut().pitch = Rad(0.0);
        session.refresh_highlight();
    }

    #[test]
    fn fresh_session_state() {
        let config = GameConfig {
            world: crate::config::WorldConfig {
                seed: Some(11),
                ..Default::default()
            },
            ..Default::default()
        };
        let session = Session::new(config);
        assert!(!session.store().is_empty());
        assert_eq!(session.player().position, Point3::new(0.0, 0.0, 12.0));
        assert_eq!(session.time_of_day(), 800);
        assert_eq!(session.stats(), &PlayerStats::default());
        assert!(session.highlight().is_none());
    }

    #[test]
    fn hand_mines_the_highlighted_block() {
        let mut session = floor_session();
        look_down(&mut session);
        let highlight = *session.highlight().unwrap();
        assert_eq!(highlight.hit.position, Point3::new(0, 0, 0));
        assert_eq!(highlight.place, Point3::new(0, 0, 1));

        let outcome = session.interact();
        assert_eq!(outcome, InteractionOutcome::Mined(Block::new(Point3::new(0, 0, 0), BlockType::STONE)));
        assert!(!session.store().contains(0, 0, 0));
        assert!(session.highlight().is_none());
        assert_eq!(session.interact(), InteractionOutcome::Ignored);
    }

    #[test]
    fn placement_inside_the_player_is_rejected() {
        let mut session = floor_session();
        session.inventory_mut().select(STONE_SLOT);
        look_down(&mut session);

        let before = session.store().len();
        let outcome = session.interact();
        assert_eq!(outcome, InteractionOutcome::Rejected(PlacementRejection::OverlapsPlayer));
        assert_eq!(session.store().len(), before);
        assert_eq!(session.inventory().selected().count, 64);
    }

    #[test]
    fn placement_fills_the_cell_and_uses_an_item() {
        let mut session = floor_session();
        session.inventory_mut().select(STONE_SLOT);
        look_at_wall(&mut session);
        assert_eq!(session.highlight().unwrap().place, Point3::new(0, 2, 2));

        let outcome = session.interact();
        assert_eq!(outcome, InteractionOutcome::Placed(Block::new(Point3::new(0, 2, 2), BlockType::STONE)));
        assert_eq!(session.store().get(0, 2, 2).unwrap().block_type, BlockType::STONE);
        assert_eq!(session.inventory().selected().count, 63);
    }

    #[test]
    fn placement_box_edges() {
        // Radius and height picked so every edge lands on an exact float.
        let mut config = GameConfig::default();
        config.player.radius = 0.25;
        config.player.height = 2.0;

        // (case, feet, cell, placed)
        let cases = [
            ("cell under the feet", Point3::new(0.5, 0.5, 2.0), Point3::new(0, 0, 1), false),
            ("cell at head height", Point3::new(0.5, 0.5, 1.0), Point3::new(0, 0, 3), true),
            ("cell at the head", Point3::new(0.5, 0.5, 1.0), Point3::new(0, 0, 2), false),
            ("touching on x", Point3::new(0.75, 0.5, 1.0), Point3::new(1, 0, 1), true),
            ("just inside on x", Point3::new(0.76, 0.5, 1.0), Point3::new(1, 0, 1), false),
            ("touching on y", Point3::new(0.5, 0.25, 1.0), Point3::new(0, -1, 1), true),
            ("level on y, clear on x", Point3::new(0.5, 0.5, 1.0), Point3::new(2, 0, 1), true),
        ];

        for (case, feet, cell, placed) in cases {
            let mut session = Session::with_world(config.clone(), BlockStore::new());
            session.store_mut().set(0, 0, 0, BlockType::STONE);
            session.player_mut().position = feet;
            session.inventory_mut().select(STONE_SLOT);
            session.highlight = Some(RayResult {
                hit: Block::new(Point3::new(0, 0, 0), BlockType::STONE),
                place: cell,
                dist: 1.0,
            });

            let blocks_before = session.store().len();
            let outcome = session.interact();

            if placed {
                assert_eq!(outcome, InteractionOutcome::Placed(Block::new(cell, BlockType::STONE)), "{case}");
                assert_eq!(session.store().len(), blocks_before + 1, "{case}");
                assert_eq!(session.inventory().selected().count, 63, "{case}");
            } else {
                assert_eq!(
                    outcome,
                    InteractionOutcome::Rejected(PlacementRejection::OverlapsPlayer),
                    "{case}"
                );
                assert_eq!(session.store().len(), blocks_before, "{case}");
                assert!(!session.store().contains(cell.x, cell.y, cell.z), "{case}");
                assert_eq!(session.inventory().selected().count, 64, "{case}");
            }
        }
    }

    #[test]
    fn last_item_empties_the_slot() {
        let mut session = floor_session();
        session.inventory_mut().select(STONE_SLOT);
        while session.inventory().selected().count > 1 {
            session.inventory_mut().decrement_selected();
        }

        look_at_wall(&mut session);
        assert!(matches!(session.interact(), InteractionOutcome::Placed(_)));
        assert_eq!(session.inventory().selected().count, 0);

        session.store_mut().delete(0, 2, 2);
        session.refresh_highlight();
        assert_eq!(
            session.interact(),
            InteractionOutcome::Rejected(PlacementRejection::EmptySlot)
        );
        assert!(!session.store().contains(0, 2, 2));
    }

    #[test]
    fn food_does_nothing() {
        let mut session = floor_session();
        session.inventory_mut().select(FOOD_SLOT);
        look_down(&mut session);
        let before = session.store().len();
        assert_eq!(session.interact(), InteractionOutcome::Ignored);
        assert_eq!(session.store().len(), before);
    }

    #[test]
    fn nothing_highlighted_is_ignored() {
        let mut session = Session::with_world(GameConfig::default(), BlockStore::new());
        session.refresh_highlight();
        assert_eq!(session.interact(), InteractionOutcome::Ignored);
    }

    #[test]
    fn frames_pay_out_ticks() {
        let mut session = floor_session();
        let intent = PlayerIntent::default();
        session.advance(60.0, &intent);
        assert_eq!(session.time_of_day(), 801);
        assert!(session.stats().hunger < 100.0);
    }

    #[test]
    fn standing_player_stays_put() {
        let mut session = floor_session();
        for _ in 0..30 {
            session.advance(16.66, &PlayerIntent::default());
        }
        assert_eq!(session.player().position, Point3::new(0.5, 0.5, 1.0));
    }

    #[test]
    fn falling_below_the_kill_plane_respawns() {
        let config = GameConfig {
            world: crate::config::WorldConfig {
                visible_half_width: 4,
                seed: Some(5),
                ..Default::default()
            },
            ..Default::default()
        };
        let mut session = Session::with_world(config, BlockStore::new());
        session.player_mut().position = Point3::new(0.0, 0.0, -4.99);
        session.time_of_day = 1500;
        session.stats_mut().hunger = 3.0;

        session.advance(16.66, &PlayerIntent::default());

        assert_eq!(session.player().position, Point3::new(0.0, 0.0, 15.0));
        assert_eq!(session.time_of_day(), 800);
        assert_eq!(session.stats().hunger, 100.0);
        assert!(!session.store().is_empty());
    }

    #[test]
    fn death_respawns() {
        let mut session = floor_session();
        session.stats_mut().health = 0.0;
        session.advance(1.0, &PlayerIntent::default());
        assert_eq!(session.stats().health, 100.0);
    }

    #[test]
    fn intent_selects_slots_and_turns() {
        let mut session = floor_session();
        let intent = PlayerIntent {
            select_slot: Some(2),
            look_delta: (100.0, 0.0),
            ..PlayerIntent::default()
        };
        session.advance(16.0, &intent);
        assert_eq!(session.inventory().selected_index(), 2);
        assert!(session.player().yaw.0 < 0.0);

        let out_of_range = PlayerIntent {
            select_slot: Some(SLOT_COUNT),
            ..PlayerIntent::default()
        };
        session.advance(16.0, &out_of_range);
        assert_eq!(session.inventory().selected_index(), 2);
    }

    #[test]
    fn interact_intent_reports_the_outcome() {
        let mut session = floor_session();
        look_down(&mut session);
        let intent = PlayerIntent {
            interact: true,
            ..PlayerIntent::default()
        };
        let outcome = session.advance(16.0, &intent);
        assert!(matches!(outcome, Some(InteractionOutcome::Mined(_))));
        assert_eq!(session.advance(16.0, &PlayerIntent::default()), None);
    }

    #[test]
    fn render_draws_sky_first_and_item_last() {
        let mut session = floor_session();
        look_down(&mut session);
        let mut canvas = RecordingCanvas::new(800.0, 600.0);
        session.render(&mut canvas, 0.0);

        assert!(matches!(canvas.commands.first(), Some(DrawCommand::Clear(_))));
        // The bare hand is the last thing drawn.
        assert!(matches!(
            canvas.commands.last(),
            Some(DrawCommand::Polygon(_, c)) if *c == crate::engine_state::rendering::Rgba::from_hex(0xfca5a5)
        ));
        let highlight_edges = canvas
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Segment(_, _, w, _) if *w == 2.0))
            .count();
        assert!(highlight_edges > 0);
    }
}
