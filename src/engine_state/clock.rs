//! # Game Clock
//!
//! Two clocks drive the simulation. Movement runs once per rendered frame,
//! scaled by the frame's length. Everything slower (time of day, hunger and
//! health) advances in fixed ticks paid out of an accumulator, with a cap on
//! how many ticks one frame may fire so a long stall cannot snowball.

use crate::{config::ClockConfig, engine_state::rendering::sky::DAY_LENGTH};

/// Timing decisions for one frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameTiming {
    /// The frame length after clamping, in milliseconds
    pub frame_ms: f32,
    /// Fixed ticks to run this frame
    pub ticks: u32,
}

/// Frame-delta clamp plus fixed-tick accumulator.
#[derive(Clone, Debug)]
pub struct GameClock {
    accumulator_ms: f32,
    tick_interval_ms: f32,
    max_frame_ms: f32,
    max_ticks_per_frame: u32,
}

impl GameClock {
    /// Creates a clock with an empty accumulator.
    pub fn new(config: &ClockConfig) -> Self {
        Self {
            accumulator_ms: 0.0,
            tick_interval_ms: config.tick_interval_ms,
            max_frame_ms: config.max_frame_ms,
            max_ticks_per_frame: config.max_ticks_per_frame,
        }
    }

    /// Accounts for `elapsed_ms` of wall time.
    ///
    /// The elapsed time is clamped to the maximum frame length before it is
    /// added to the accumulator. Ticks fire while the accumulator exceeds one
    /// interval, up to the per-frame cap. When the cap is reached the
    /// remaining backlog is dropped, leaving at most one interval behind.
    ///
    /// # Returns
    /// The clamped frame length and the number of ticks to run.
    pub fn advance(&mut self, elapsed_ms: f32) -> FrameTiming {
        let frame_ms = elapsed_ms.clamp(0.0, self.max_frame_ms);
        self.accumulator_ms += frame_ms;

        let mut ticks = 0;
        while self.accumulator_ms > self.tick_interval_ms && ticks < self.max_ticks_per_frame {
            self.accumulator_ms -= self.tick_interval_ms;
            ticks += 1;
        }

        if ticks == self.max_ticks_per_frame {
            self.accumulator_ms = self.accumulator_ms.min(self.tick_interval_ms);
        }

        FrameTiming { frame_ms, ticks }
    }

    /// Time banked towards the next tick.
    pub fn accumulated_ms(&self) -> f32 {
        self.accumulator_ms
    }

    /// Forgets any banked time.
    pub fn reset(&mut self) {
        self.accumulator_ms = 0.0;
    }
}

/// The time of day one tick after `time_of_day`.
pub fn next_time_of_day(time_of_day: u32) -> u32 {
    (time_of_day + 1) % DAY_LENGTH
}

/// The player's vital statistics.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlayerStats {
    /// 0 means dead
    pub health: f32,
    /// Slowly drains; at 0 health drains instead of regenerating
    pub hunger: f32,
    /// Displayed only
    pub thirst: f32,
    /// Displayed only
    pub temperature: f32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            health: 100.0,
            hunger: 100.0,
            thirst: 100.0,
            temperature: 50.0,
        }
    }
}

const MAX_HEALTH: f32 = 100.0;
const HUNGER_DECAY: f32 = 0.01;
const STARVATION_DAMAGE: f32 = 0.1;
const HEALTH_REGEN: f32 = 0.01;

impl PlayerStats {
    /// Applies one tick of decay.
    ///
    /// Health reacts to the hunger level from before this tick's decay.
    pub fn tick(&mut self) {
        let starving = self.hunger == 0.0;
        self.hunger = (self.hunger - HUNGER_DECAY).max(0.0);
        self.health = if starving {
            (self.health - STARVATION_DAMAGE).max(0.0)
        } else {
            (self.health + HEALTH_REGEN).min(MAX_HEALTH)
        };
    }

    /// Whether health has run out.
    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> GameClock {
        GameClock::new(&ClockConfig::default())
    }

    #[test]
    fn short_frames_accumulate() {
        let mut clock = clock();
        assert_eq!(clock.advance(16.0).ticks, 0);
        assert_eq!(clock.advance(16.0).ticks, 0);
        assert_eq!(clock.advance(16.0).ticks, 0);
        assert_eq!(clock.advance(16.0).ticks, 1);
        assert!((clock.accumulated_ms() - 14.0).abs() < 1e-4);
    }

    #[test]
    fn exactly_one_interval_does_not_tick() {
        let mut clock = clock();
        assert_eq!(clock.advance(50.0).ticks, 0);
        assert_eq!(clock.advance(1.0).ticks, 1);
    }

    #[test]
    fn long_frames_are_clamped() {
        let mut clock = clock();
        let timing = clock.advance(5_000.0);
        assert_eq!(timing.frame_ms, 100.0);
        assert_eq!(timing.ticks, 1);
        assert_eq!(clock.advance(-3.0).frame_ms, 0.0);
    }

    #[test]
    fn catch_up_is_capped() {
        let config = ClockConfig {
            max_frame_ms: 1_000.0,
            max_ticks_per_frame: 4,
            ..ClockConfig::default()
        };
        let mut clock = GameClock::new(&config);
        let timing = clock.advance(1_000.0);
        assert_eq!(timing.ticks, 4);
        assert!(clock.accumulated_ms() <= config.tick_interval_ms);
        // Only the single banked interval is left; it needs a little more to fire.
        assert_eq!(clock.advance(0.0).ticks, 0);
    }

    #[test]
    fn day_wraps() {
        assert_eq!(next_time_of_day(800), 801);
        assert_eq!(next_time_of_day(DAY_LENGTH - 1), 0);
    }

    #[test]
    fn fed_player_regenerates() {
        let mut stats = PlayerStats {
            health: 50.0,
            ..PlayerStats::default()
        };
        stats.tick();
        assert!((stats.hunger - 99.99).abs() < 1e-4);
        assert!((stats.health - 50.01).abs() < 1e-4);

        let mut full = PlayerStats::default();
        full.tick();
        assert_eq!(full.health, 100.0);
    }

    #[test]
    fn starving_player_loses_health() {
        let mut stats = PlayerStats {
            hunger: 0.0,
            ..PlayerStats::default()
        };
        stats.tick();
        assert_eq!(stats.hunger, 0.0);
        assert!((stats.health - 99.9).abs() < 1e-4);

        stats.health = 0.05;
        stats.tick();
        assert_eq!(stats.health, 0.0);
        assert!(stats.is_dead());
    }

    #[test]
    fn hunger_reaching_zero_hurts_from_the_next_tick() {
        let mut stats = PlayerStats {
            hunger: 0.005,
            health: 80.0,
            ..PlayerStats::default()
        };
        stats.tick();
        assert_eq!(stats.hunger, 0.0);
        assert!(stats.health > 80.0);
        stats.tick();
        assert!(stats.health < 80.01);
    }
}
