//! # Input State
//!
//! Per-frame snapshots of the keyboard and mouse.
//!
//! Movement reads whether a key is down at all, while one-shot actions (a
//! click to mine or place, a digit to pick a slot, N for a new world) must
//! fire on the frame the key goes down and never again while it is held.
//! [`RawInputState`] carries that distinction.

use std::collections::HashMap;
use winit::{event::MouseButton, keyboard::KeyCode};

/// Where a key or button is in its press cycle during one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RawInputState {
    /// Up this frame and the previous one; also what untracked inputs report
    #[default]
    NotPressed,
    /// Went down this frame
    Pressed,
    /// Down this frame and the previous one
    Held,
    /// Came up this frame
    Released,
}

impl RawInputState {
    /// Down this frame, whether new or held. Used for walking and jumping.
    pub fn is_active(&self) -> bool {
        matches!(self, RawInputState::Pressed | RawInputState::Held)
    }

    /// Went down this frame. Used for actions that fire once per press.
    pub fn is_just_pressed(&self) -> bool {
        matches!(self, RawInputState::Pressed)
    }

    /// Came up this frame.
    pub fn is_just_released(&self) -> bool {
        matches!(self, RawInputState::Released)
    }

    /// Classifies a key from whether it was down last frame and is down now.
    pub fn from_raw_states(previous: bool, current: bool) -> Self {
        match (previous, current) {
            (false, true) => RawInputState::Pressed,
            (true, true) => RawInputState::Held,
            (true, false) => RawInputState::Released,
            (false, false) => RawInputState::NotPressed,
        }
    }
}

/// Everything the game reads from the input devices for one frame.
///
/// Built by the input manager once per frame and turned into a
/// `PlayerIntent` by the engine.
#[derive(Debug, Default)]
pub struct ProcessedInputState {
    /// Press cycle of each game key
    pub keyboard_states: HashMap<KeyCode, RawInputState>,

    /// Press cycle of each tracked mouse button
    pub mouse_button_states: HashMap<MouseButton, RawInputState>,

    /// Raw mouse counts moved since the previous frame, if any
    pub mouse_delta: Option<(f64, f64)>,
}

impl ProcessedInputState {
    /// Press cycle of `key`; keys the game does not track read as up.
    pub fn get_key_state(&self, key: KeyCode) -> RawInputState {
        self.keyboard_states.get(&key).copied().unwrap_or_default()
    }

    /// Press cycle of `button`; untracked buttons read as up.
    pub fn get_mouse_button_state(&self, button: MouseButton) -> RawInputState {
        self.mouse_button_states.get(&button).copied().unwrap_or_default()
    }

    /// Mouse movement for looking around.
    pub fn get_mouse_delta(&self) -> Option<(f64, f64)> {
        self.mouse_delta
    }
}

/// Raw mouse state between two snapshots.
#[derive(Debug, Default)]
pub struct MouseInput {
    /// Whether each tracked button was down at the last snapshot
    pub mouse_button_inputs_old: HashMap<MouseButton, bool>,
    /// Whether each tracked button is down now
    pub mouse_button_inputs_new: HashMap<MouseButton, bool>,

    /// Motion summed over every event since the last snapshot
    pub mouse_delta: Option<(f64, f64)>,
}
