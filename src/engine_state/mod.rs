//! # Engine State Module
//!
//! The core of the sandbox and its connection to the GPU.
//!
//! ## Key Components
//!
//! * `EngineState` - Couples a game session to the frame painter and the input
//! * `session` - The world, player, stats, inventory and clocks of one playthrough
//! * `voxels` - Block types, the sparse block store and terrain generation
//! * `physics` - Collision, player movement and block picking
//! * `camera_state` - The first-person camera and its perspective projection
//! * `rendering` - The painter's-algorithm renderer and its `wgpu` back end
//! * `clock` - Frame clamp, fixed ticks and stat decay
//! * `inventory` - The hotbar and item kinds
//!
//! ## Architecture
//!
//! Everything below `EngineState` is plain data and functions: no window, no
//! GPU. The session is driven by a [`PlayerIntent`] per frame and draws
//! through the `Canvas` trait, which `EngineState` backs with a `PaintList`
//! handed to the `FramePainter`.

use web_time::{Duration, Instant};
use wgpu::{Device, Queue, Surface, SurfaceConfiguration};
use winit::{event::MouseButton, keyboard::KeyCode};

use crate::{application_state::input_state::ProcessedInputState, config::GameConfig};
use rendering::painter::{FramePainter, PaintList};
use session::Session;

pub mod camera_state;
pub mod clock;
pub mod inventory;
pub mod physics;
pub mod rendering;
pub mod session;
pub mod voxels;

/// Keys selecting hotbar slots, in slot order.
const SLOT_KEYS: [KeyCode; 6] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
];

/// What the player asks for during one frame.
///
/// Movement fields reflect keys held down; `interact`, `select_slot` and
/// `new_world` fire once per press.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerIntent {
    /// Walk forward
    pub forward: bool,
    /// Walk backward
    pub backward: bool,
    /// Strafe left
    pub left: bool,
    /// Strafe right
    pub right: bool,
    /// Move faster
    pub sprint: bool,
    /// Jump when standing on ground
    pub jump: bool,
    /// Mouse movement in counts since the previous frame
    pub look_delta: (f64, f64),
    /// Use the selected item on the highlighted block
    pub interact: bool,
    /// Put a hotbar slot in hand
    pub select_slot: Option<usize>,
    /// Throw the world away and start over
    pub new_world: bool,
}

impl PlayerIntent {
    /// Whether any movement key is held.
    pub fn is_moving(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    /// Translates one frame of device input.
    ///
    /// W/S/A/D walk, Left Shift sprints, Space jumps, the mouse looks around,
    /// a left click interacts, 1-6 select a slot and N starts a new world.
    pub fn from_input(input: &ProcessedInputState) -> Self {
        Self {
            forward: input.get_key_state(KeyCode::KeyW).is_active(),
            backward: input.get_key_state(KeyCode::KeyS).is_active(),
            left: input.get_key_state(KeyCode::KeyA).is_active(),
            right: input.get_key_state(KeyCode::KeyD).is_active(),
            sprint: input.get_key_state(KeyCode::ShiftLeft).is_active(),
            jump: input.get_key_state(KeyCode::Space).is_active(),
            look_delta: input.get_mouse_delta().unwrap_or((0.0, 0.0)),
            interact: input.get_mouse_button_state(MouseButton::Left).is_just_pressed(),
            select_slot: SLOT_KEYS
                .iter()
                .position(|&key| input.get_key_state(key).is_just_pressed()),
            new_world: input.get_key_state(KeyCode::KeyN).is_just_pressed(),
        }
    }
}

/// The running game: a session, the painter that shows it and the input
/// that drives it.
pub struct EngineState {
    /// The playthrough being shown
    pub session: Session,
    /// Draws frames to the window surface
    painter: FramePainter,
    /// Reused frame buffer of draw calls
    paint_list: PaintList,
    /// Input gathered since the last update
    player_intent: PlayerIntent,
    /// When the engine started; drives the held item's bob
    started: Instant,
}

impl EngineState {
    /// Creates a new engine state with a freshly generated world.
    ///
    /// # Arguments
    ///
    /// * `surface` - The rendering surface, already configured
    /// * `surface_config` - Configuration for the rendering surface
    /// * `device` - The GPU device
    /// * `queue` - The GPU command queue
    /// * `config` - Game configuration
    pub fn new(
        surface: Surface<'static>,
        surface_config: SurfaceConfiguration,
        device: Device,
        queue: Queue,
        config: GameConfig,
    ) -> Self {
        let painter = FramePainter::new(surface, surface_config, device, queue);
        let paint_list = painter.begin_frame();

        Self {
            session: Session::new(config),
            painter,
            paint_list,
            player_intent: PlayerIntent::default(),
            started: Instant::now(),
        }
    }

    /// Resizes the rendering surface when the window size changes
    ///
    /// # Arguments
    ///
    /// * `size` - The new physical size of the window
    pub fn resize_surface(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        self.painter.resize(size.width, size.height);
    }

    /// Runs one frame of simulation with the input gathered so far.
    ///
    /// # Arguments
    ///
    /// * `elapsed` - Wall time since the previous update
    pub fn update(&mut self, elapsed: Duration) {
        let intent = std::mem::take(&mut self.player_intent);
        self.session.advance(elapsed.as_secs_f32() * 1000.0, &intent);
    }

    /// Draws the current state of the session and presents it.
    pub fn render(&mut self) {
        let (width, height) = self.painter.size();
        self.paint_list.reset(width as f32, height as f32);

        let time_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        self.session.render(&mut self.paint_list, time_ms);
        self.painter.render(&self.paint_list);
    }

    /// Sets the input commands for the next update.
    ///
    /// # Arguments
    /// * `input` - The processed input state to translate
    pub fn set_input_commands(&mut self, input: ProcessedInputState) {
        self.player_intent = PlayerIntent::from_input(&input);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::application_state::input_state::RawInputState;

    fn input(keys: &[(KeyCode, RawInputState)], left: RawInputState, delta: Option<(f64, f64)>) -> ProcessedInputState {
        ProcessedInputState {
            keyboard_states: keys.iter().copied().collect::<HashMap<_, _>>(),
            mouse_button_states: HashMap::from([(MouseButton::Left, left)]),
            mouse_delta: delta,
        }
    }

    #[test]
    fn held_keys_move() {
        let intent = PlayerIntent::from_input(&input(
            &[
                (KeyCode::KeyW, RawInputState::Held),
                (KeyCode::KeyD, RawInputState::Pressed),
                (KeyCode::ShiftLeft, RawInputState::Held),
                (KeyCode::KeyS, RawInputState::Released),
            ],
            RawInputState::NotPressed,
            None,
        ));
        assert!(intent.forward && intent.right && intent.sprint);
        assert!(!intent.backward && !intent.left && !intent.jump);
        assert!(intent.is_moving());
        assert_eq!(intent.look_delta, (0.0, 0.0));
    }

    #[test]
    fn one_shot_actions_fire_on_press_only() {
        let pressed = PlayerIntent::from_input(&input(
            &[(KeyCode::Digit3, RawInputState::Pressed), (KeyCode::KeyN, RawInputState::Pressed)],
            RawInputState::Pressed,
            Some((4.0, -2.0)),
        ));
        assert_eq!(pressed.select_slot, Some(2));
        assert!(pressed.new_world);
        assert!(pressed.interact);
        assert_eq!(pressed.look_delta, (4.0, -2.0));

        let held = PlayerIntent::from_input(&input(
            &[(KeyCode::Digit3, RawInputState::Held), (KeyCode::KeyN, RawInputState::Held)],
            RawInputState::Held,
            None,
        ));
        assert_eq!(held.select_slot, None);
        assert!(!held.new_world);
        assert!(!held.interact);
        assert!(!held.is_moving());
    }
}
