#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Frontier
//!
//! A first-person voxel sandbox built with Rust and WGPU.
//!
//! The player walks over procedurally generated terrain, mines blocks into an
//! implicit inventory, places blocks from the hotbar and watches the sun and
//! moon cross the sky while hunger slowly wears them down.
//!
//! ## Key Modules
//!
//! * `application_state` - Manages the application lifecycle, window and input devices
//! * `config` - The JSON game configuration and its defaults
//! * `engine_state` - The game session, physics, voxel world and renderer
//!
//! ## Architecture
//!
//! The simulation lives in [`engine_state::session::Session`] and has no
//! dependency on a window or GPU. It draws through the
//! [`engine_state::rendering::Canvas`] trait using the painter's algorithm:
//! blocks are sorted far to near and their visible faces filled as polygons.
//! On screen a `PaintList` tessellates those calls into one triangle list
//! that the `FramePainter` submits to `wgpu` each frame.
//!
//! ## Usage
//!
//! ```no_run
//! fn main() {
//!     voxel_frontier::run();
//! }
//! ```
//!
//! Driving a session without a window:
//!
//! ```
//! use voxel_frontier::config::GameConfig;
//! use voxel_frontier::engine_state::{rendering::RecordingCanvas, session::Session, PlayerIntent};
//!
//! let mut config = GameConfig::default();
//! config.world.seed = Some(7);
//! let mut session = Session::new(config);
//! session.advance(16.66, &PlayerIntent::default());
//!
//! let mut canvas = RecordingCanvas::new(800.0, 600.0);
//! session.render(&mut canvas, 0.0);
//! assert!(!canvas.commands.is_empty());
//! ```

use application_state::ApplicationState;
use config::GameConfig;
use log::{error, info, warn};
use winit::event_loop::EventLoop;

pub mod application_state;
pub mod config;
pub mod engine_state;

/// Starts the game: sets up logging, loads the configuration and runs the
/// event loop until the window closes.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = GameConfig::load().unwrap_or_else(|err| {
        warn!("Falling back to the default configuration: {err}");
        GameConfig::default()
    });

    let event_loop = match EventLoop::with_user_event().build() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            error!("Could not create the event loop: {err}");
            return;
        }
    };

    let mut state = ApplicationState::new(event_loop.create_proxy(), config);

    if let Err(err) = event_loop.run_app(&mut state) {
        error!("Event loop stopped with an error: {err}");
    }
}
