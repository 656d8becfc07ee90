//! # Application State Management
//!
//! This module handles the application's state management, including:
//! - Window and graphics initialization
//! - Input handling and cursor capture
//! - Application lifecycle events

pub mod graphics_resources_builder;
pub mod input_manager;
pub mod input_state;

use std::sync::Arc;

use graphics_resources_builder::{GraphicsBuilder, GraphicsResult, MaybeGraphics};
use input_manager::InputManager;
use log::{error, info, warn};

use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoopProxy},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowId},
};

use crate::{config::GameConfig, engine_state::EngineState};

/// The main application state container that manages the application's lifecycle.
///
/// This struct holds the current state of the application, including graphics resources,
/// input handling, and window management. It implements `ApplicationHandler` to handle
/// window and device events.
pub struct ApplicationState {
    /// The current graphics state, which may be uninitialized, initializing, or ready
    pub graphics: MaybeGraphics,

    /// The initialized application state, if the application has started
    pub state: Option<InitializedApplicationState>,

    /// Settings the game session is started with
    pub config: GameConfig,
}

/// Represents the fully initialized and running state of the application.
pub struct InitializedApplicationState {
    /// The game session and the painter showing it
    pub engine_state: EngineState,

    /// Handle to the application window
    pub window: Arc<Window>,

    /// Manages input state and event processing
    pub input_manager: InputManager,

    /// Whether mouse look currently owns the cursor
    pub cursor: CursorCapture,

    /// Timestamp of the last frame for delta time calculations
    pub last_wait_time: web_time::Instant,
}

impl ApplicationState {
    /// Creates the application in its uninitialized state.
    ///
    /// # Arguments
    /// * `event_loop_proxy` - Receives the graphics once they are built
    /// * `config` - Settings for the game session
    pub fn new(event_loop_proxy: EventLoopProxy<GraphicsResult>, config: GameConfig) -> Self {
        Self {
            graphics: MaybeGraphics::Builder(GraphicsBuilder::new(event_loop_proxy)),
            state: None,
            config,
        }
    }

    /// Moves the ready graphics resources into a running engine.
    fn initialize_application_state(&mut self) {
        let MaybeGraphics::Graphics(gfx) =
            std::mem::replace(&mut self.graphics, MaybeGraphics::Moved)
        else {
            return;
        };

        let engine_state = EngineState::new(
            gfx.surface,
            gfx.surface_config,
            gfx.device,
            gfx.queue,
            self.config.clone(),
        );
        let mut cursor = CursorCapture::default();
        cursor.capture();
        capture_cursor(&gfx.window);
        info!("Session started");

        self.state = Some(InitializedApplicationState {
            engine_state,
            window: gfx.window,
            input_manager: InputManager::new(),
            cursor,
            last_wait_time: web_time::Instant::now(),
        });
    }
}

/// Tracks whether the cursor is held for mouse look.
///
/// After focus is lost the cursor is free, and the next click only takes it
/// back; it must not also mine or place.
#[derive(Debug, Default)]
pub struct CursorCapture {
    captured: bool,
}

impl CursorCapture {
    /// Takes the cursor.
    ///
    /// # Returns
    /// `true` when the cursor was free before this call.
    pub fn capture(&mut self) -> bool {
        !std::mem::replace(&mut self.captured, true)
    }

    /// Lets the cursor go.
    pub fn release(&mut self) {
        self.captured = false;
    }

    /// Whether the cursor is held.
    pub fn is_captured(&self) -> bool {
        self.captured
    }
}

/// Locks the cursor to the window and hides it for mouse look.
fn capture_cursor(window: &Window) {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Locked)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
    if let Err(err) = grabbed {
        warn!("Could not grab the cursor: {err}");
    }
    window.set_cursor_visible(false);
}

/// Gives the cursor back to the desktop.
fn release_cursor(window: &Window) {
    if let Err(err) = window.set_cursor_grab(CursorGrabMode::None) {
        warn!("Could not release the cursor: {err}");
    }
    window.set_cursor_visible(true);
}

/// Whether the event asks to quit: closing the window or pressing Escape.
fn is_exit_request(event: &WindowEvent) -> bool {
    matches!(
        event,
        WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event: KeyEvent {
                    state: ElementState::Pressed,
                    physical_key: PhysicalKey::Code(KeyCode::Escape),
                    ..
                },
                ..
            }
    )
}

impl ApplicationHandler<GraphicsResult> for ApplicationState {
    /// Handles window-related events such as resize, focus changes, and input events.
    ///
    /// # Arguments
    /// * `event_loop` - Reference to the active event loop
    /// * `_window_id` - ID of the window that generated the event
    /// * `event` - The window event to process
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if is_exit_request(&event) {
            event_loop.exit();
            return;
        }

        let Some(state) = &mut self.state else {
            return;
        };

        let is_press = matches!(
            event,
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                ..
            }
        );
        if is_press && state.cursor.capture() {
            capture_cursor(&state.window);
            return;
        }
        state.input_manager.intake_input(&event);

        match event {
            WindowEvent::Resized(size) => {
                state.engine_state.resize_surface(size);
            }
            WindowEvent::Focused(false) => {
                release_cursor(&state.window);
                state.cursor.release();
                state.input_manager.release_all();
            }
            WindowEvent::RedrawRequested => {
                state.engine_state.render();
            }
            _ => (),
        }
    }

    /// Handles raw mouse motion for looking around.
    ///
    /// # Arguments
    /// * `_event_loop` - Reference to the active event loop
    /// * `_device_id` - ID of the device that generated the event
    /// * `event` - The device event to process
    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let Some(state) = &mut self.state {
            if let DeviceEvent::MouseMotion { delta } = event {
                // A free cursor is moving over the desktop, not turning the view.
                if state.cursor.is_captured() {
                    state.input_manager.intake_mouse_motion(delta);
                }
            }
        }
    }

    /// Starts building the graphics the first time the application resumes.
    ///
    /// # Arguments
    /// * `event_loop` - Reference to the active event loop
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let MaybeGraphics::Builder(builder) = &mut self.graphics {
            builder.build_and_send(event_loop);
        }
    }

    /// Receives the outcome of graphics initialization.
    ///
    /// On failure the error is logged and the application exits.
    ///
    /// # Arguments
    /// * `event_loop` - Reference to the active event loop
    /// * `graphics` - The initialized graphics resources or the failure
    fn user_event(&mut self, event_loop: &ActiveEventLoop, graphics: GraphicsResult) {
        match graphics {
            Ok(graphics) => {
                self.graphics = MaybeGraphics::Graphics(graphics);
                self.initialize_application_state();
            }
            Err(err) => {
                error!("Graphics initialization failed: {err}");
                event_loop.exit();
            }
        }
    }

    /// Runs one frame of simulation and schedules a redraw.
    ///
    /// # Arguments
    /// * `_event_loop` - Reference to the active event loop
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &mut self.state {
            let now = web_time::Instant::now();
            let wait_dt = now - state.last_wait_time;
            state.last_wait_time = now;

            let processed_input = state.input_manager.get_and_reset_processed_input();
            state.engine_state.set_input_commands(processed_input);
            state.engine_state.update(wait_dt);

            state.window.request_redraw();
        }
    }
}
