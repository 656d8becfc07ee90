//! # Game Configuration
//!
//! Tunable constants for world generation, player physics, rendering and the
//! game clock. Every section falls back to its defaults field by field, so a
//! configuration file only needs to mention what it changes:
//!
//! ```json
//! { "render": { "render_distance": 10 }, "world": { "seed": 42 } }
//! ```
//!
//! The file is read once at startup from the path in the
//! `VOXEL_FRONTIER_CONFIG` environment variable, or from `config.json` in the
//! working directory when that file exists.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "VOXEL_FRONTIER_CONFIG";
/// Configuration file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Errors produced while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid JSON for a [`GameConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value parsed but is outside its usable range.
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// How the terrain height map is shaped.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum TerrainShape {
    /// Two overlapping sine/cosine swells. Fully deterministic.
    Waves,
    /// Rolling hills from seeded Perlin noise.
    Perlin {
        /// Seed handed to the noise generator
        seed: u32,
    },
}

impl Default for TerrainShape {
    fn default() -> Self {
        TerrainShape::Waves
    }
}

/// World generation and world bounds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Half-width of the region the player can see and walk in.
    pub visible_half_width: i32,
    /// Extra columns generated beyond the visible region so the render edge has no gaps.
    pub generation_margin: i32,
    /// Distance the player may stray past the visible half-width before being clamped.
    pub bounds_margin: f32,
    /// Seed for tree and cactus placement. `None` gives a different world every time.
    pub seed: Option<u64>,
    /// Height map shape.
    pub terrain: TerrainShape,
    /// Feet position of a fresh session.
    pub spawn: [f32; 3],
    /// Feet position after a respawn or a new world.
    pub respawn: [f32; 3],
    /// Falling below this height regenerates the world.
    pub kill_plane: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            visible_half_width: 32,
            generation_margin: 5,
            bounds_margin: 4.0,
            seed: None,
            terrain: TerrainShape::Waves,
            spawn: [0.0, 0.0, 12.0],
            respawn: [0.0, 0.0, 15.0],
            kill_plane: -5.0,
        }
    }
}

impl WorldConfig {
    /// Half-width of the generated square.
    pub fn generation_half_width(&self) -> i32 {
        self.visible_half_width + self.generation_margin
    }

    /// Largest absolute horizontal coordinate the player may reach.
    pub fn horizontal_limit(&self) -> f32 {
        self.visible_half_width as f32 + self.bounds_margin
    }
}

/// Player shape and movement tuning.
///
/// Speeds and accelerations are per reference frame (see
/// [`ClockConfig::reference_frame_ms`]) and are scaled by the real frame time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Half the width of the player's square footprint.
    pub radius: f32,
    /// Height of the player's bounding volume.
    pub height: f32,
    /// Height of the eye above the feet.
    pub eye_height: f32,
    /// Walking speed.
    pub speed: f32,
    /// Speed multiplier while sprinting.
    pub sprint_multiplier: f32,
    /// Speed multiplier while starving.
    pub starving_multiplier: f32,
    /// Hunger below which the player counts as starving.
    pub starving_hunger: f32,
    /// Share of horizontal velocity kept per frame without movement input.
    pub friction: f32,
    /// Downward acceleration.
    pub gravity: f32,
    /// Upward velocity of a jump.
    pub jump_force: f32,
    /// Radians of rotation per mouse count.
    pub look_sensitivity: f32,
    /// Maximum distance at which blocks can be mined or placed.
    pub reach: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            radius: 0.3,
            height: 1.8,
            eye_height: 1.6,
            speed: 0.11,
            sprint_multiplier: 1.5,
            starving_multiplier: 0.5,
            starving_hunger: 10.0,
            friction: 0.8,
            gravity: 0.014,
            jump_force: 0.26,
            look_sensitivity: 0.0025,
            reach: 5.0,
        }
    }
}

/// Renderer tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Radius, in blocks, of the sphere of blocks drawn around the player.
    pub render_distance: i32,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            render_distance: 14,
            fov_degrees: 80.0,
        }
    }
}

/// Frame and tick clock tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Length of one fixed game tick.
    pub tick_interval_ms: f32,
    /// Frame deltas are clamped to this before use.
    pub max_frame_ms: f32,
    /// Upper bound on ticks fired in one frame.
    pub max_ticks_per_frame: u32,
    /// Frame length the physics constants were tuned for.
    pub reference_frame_ms: f32,
    /// Time of day at session start and after respawn.
    pub start_time: u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 50.0,
            max_frame_ms: 100.0,
            max_ticks_per_frame: 4,
            reference_frame_ms: 16.66,
            start_time: 800,
        }
    }
}

/// The complete game configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// World generation and bounds
    pub world: WorldConfig,
    /// Player shape and movement
    pub player: PlayerConfig,
    /// Renderer settings
    pub render: RenderConfig,
    /// Clock settings
    pub clock: ClockConfig,
}

impl GameConfig {
    /// Loads the configuration the application should run with.
    ///
    /// An explicit path in [`CONFIG_PATH_ENV`] must exist. Without it,
    /// [`DEFAULT_CONFIG_FILE`] is used when present and the defaults otherwise.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Self::from_path(path);
        }

        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            Self::from_path(default_path)
        } else {
            log::info!("No {} found, using default configuration", DEFAULT_CONFIG_FILE);
            Ok(Self::default())
        }
    }

    /// Reads and validates a configuration file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&contents)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parses and validates a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every value is within its usable range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn ensure(condition: bool, message: &str) -> Result<(), ConfigError> {
            if condition {
                Ok(())
            } else {
                Err(ConfigError::Invalid(message.to_string()))
            }
        }

        ensure(self.world.visible_half_width >= 1, "world.visible_half_width must be at least 1")?;
        ensure(self.world.generation_margin >= 0, "world.generation_margin must not be negative")?;
        ensure(self.world.bounds_margin >= 0.0, "world.bounds_margin must not be negative")?;
        ensure(self.player.radius > 0.0 && self.player.radius < 0.5, "player.radius must be in (0, 0.5)")?;
        ensure(self.player.height > 0.1, "player.height must be greater than 0.1")?;
        ensure(
            self.player.eye_height > 0.0 && self.player.eye_height <= self.player.height,
            "player.eye_height must be in (0, player.height]",
        )?;
        ensure(self.player.reach > 0.0, "player.reach must be positive")?;
        ensure(self.render.render_distance >= 1, "render.render_distance must be at least 1")?;
        ensure(
            self.render.fov_degrees > 0.0 && self.render.fov_degrees < 180.0,
            "render.fov_degrees must be in (0, 180)",
        )?;
        ensure(self.clock.tick_interval_ms > 0.0, "clock.tick_interval_ms must be positive")?;
        ensure(self.clock.max_frame_ms > 0.0, "clock.max_frame_ms must be positive")?;
        ensure(self.clock.max_ticks_per_frame >= 1, "clock.max_ticks_per_frame must be at least 1")?;
        ensure(self.clock.reference_frame_ms > 0.0, "clock.reference_frame_ms must be positive")?;
        ensure(self.clock.start_time < 2400, "clock.start_time must be below 2400")?;
        Ok(())
    }
}
