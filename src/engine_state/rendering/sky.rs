//! Sky background, sun and moon.
//!
//! The sky is a flat colour picked from the time of day. The sun and moon
//! travel on opposite ends of one circular orbit centred on the bottom middle
//! of the screen, completing a turn every day.

use std::f32::consts::PI;

use cgmath::{Point2, Vector2};

use super::{color::Rgba, Canvas};

/// Ticks in one full day.
pub const DAY_LENGTH: u32 = 2400;

const NIGHT: Rgba = Rgba::from_hex(0x0f172a);
const SUNRISE: Rgba = Rgba::from_hex(0xfdba74);
const DAY: Rgba = Rgba::from_hex(0x60a5fa);
const SUNSET: Rgba = Rgba::from_hex(0xc084fc);

const SUN_COLOR: Rgba = Rgba::from_hex(0xfde047);
const MOON_COLOR: Rgba = Rgba::from_hex(0xf1f5f9);

/// Radius of the sun disc in pixels.
pub const SUN_RADIUS: f32 = 30.0;
/// Radius of the moon disc in pixels.
pub const MOON_RADIUS: f32 = 20.0;

/// Orbit radius as a fraction of the screen height.
const ORBIT_SCALE: f32 = 0.8;
/// How far the glow reaches past a disc, relative to its radius.
const GLOW_SCALE: f32 = 1.6;
const GLOW_ALPHA: f32 = 0.25;

/// Background colour for a time of day.
pub fn sky_color(time_of_day: u32) -> Rgba {
    match time_of_day {
        301..=400 => SUNRISE,
        401..=1999 => DAY,
        2000..=2099 => SUNSET,
        _ => NIGHT,
    }
}

/// Screen position of the sun.
///
/// The orbit angle is measured with y pointing up, so the sun sits below the
/// screen at midnight and is highest at noon.
///
/// # Arguments
/// * `time_of_day` - Current tick within the day
/// * `width` - Viewport width in pixels
/// * `height` - Viewport height in pixels
pub fn sun_position(time_of_day: u32, width: f32, height: f32) -> Point2<f32> {
    let angle = 2.0 * PI * time_of_day as f32 / DAY_LENGTH as f32 - PI / 2.0;
    orbit_center(width, height) + Vector2::new(angle.cos(), -angle.sin()) * ORBIT_SCALE * height
}

/// Screen position of the moon, opposite the sun.
pub fn moon_position(time_of_day: u32, width: f32, height: f32) -> Point2<f32> {
    let center = orbit_center(width, height);
    center - (sun_position(time_of_day, width, height) - center)
}

fn orbit_center(width: f32, height: f32) -> Point2<f32> {
    Point2::new(width / 2.0, height)
}

/// Clears the canvas to the sky colour and draws the sun and moon.
pub fn draw_sky<C: Canvas>(canvas: &mut C, time_of_day: u32) {
    let (width, height) = canvas.viewport();
    canvas.clear(sky_color(time_of_day));

    draw_body(canvas, sun_position(time_of_day, width, height), SUN_RADIUS, SUN_COLOR);
    draw_body(canvas, moon_position(time_of_day, width, height), MOON_RADIUS, MOON_COLOR);
}

fn draw_body<C: Canvas>(canvas: &mut C, center: Point2<f32>, radius: f32, color: Rgba) {
    canvas.fill_circle(center, radius * GLOW_SCALE, color.with_alpha(GLOW_ALPHA));
    canvas.fill_circle(center, radius, color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::rendering::{DrawCommand, RecordingCanvas};

    #[test]
    fn colour_bands() {
        assert_eq!(sky_color(0), NIGHT);
        assert_eq!(sky_color(300), NIGHT);
        assert_eq!(sky_color(301), SUNRISE);
        assert_eq!(sky_color(400), SUNRISE);
        assert_eq!(sky_color(401), DAY);
        assert_eq!(sky_color(800), DAY);
        assert_eq!(sky_color(1999), DAY);
        assert_eq!(sky_color(2000), SUNSET);
        assert_eq!(sky_color(2099), SUNSET);
        assert_eq!(sky_color(2100), NIGHT);
    }

    #[test]
    fn sun_peaks_at_noon() {
        let sun = sun_position(1200, 800.0, 600.0);
        assert!((sun.x - 400.0).abs() < 1e-3);
        assert!((sun.y - (600.0 - 480.0)).abs() < 1e-3);

        let moon = moon_position(1200, 800.0, 600.0);
        assert!(moon.y > 600.0);
    }

    #[test]
    fn sun_starts_the_day_below_the_horizon() {
        let sun = sun_position(0, 800.0, 600.0);
        assert!((sun.x - 400.0).abs() < 1e-3);
        assert!(sun.y > 600.0);
    }

    #[test]
    fn sky_is_cleared_first() {
        let mut canvas = RecordingCanvas::new(800.0, 600.0);
        draw_sky(&mut canvas, 800);
        assert_eq!(canvas.commands[0], DrawCommand::Clear(DAY));
        assert_eq!(canvas.commands.len(), 5);
    }
}
