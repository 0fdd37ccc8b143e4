//! Sky Raider - a vertical-scrolling arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (pools, movement, spawning, collisions, game state)
//! - `game`: Frame driver that wires the simulation to its collaborators
//! - `audio`, `ui`, `snapshot`: Output seams (sound cues, HUD, renderer view)
//! - `highscores`, `settings`: Persistence and configuration

pub mod audio;
pub mod game;
pub mod highscores;
pub mod settings;
pub mod sim;
pub mod snapshot;
pub mod ui;

pub use game::Game;
pub use highscores::{HighScoreStore, JsonFileStore, MemoryStore, StorageError};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Reference frame length in ms; velocities are expressed per reference frame
    pub const REFERENCE_FRAME_MS: f32 = 16.0;
    /// Frame gaps longer than this are treated as a suspension
    pub const MAX_FRAME_GAP_MS: f32 = 100.0;

    /// Default canvas dimensions
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Off-screen recycling margins
    pub const OFFSCREEN_MARGIN: f32 = 50.0;
    pub const ENEMY_OFFSCREEN_MARGIN: f32 = 100.0;

    /// Background scroll speed (baseline for enemy movement)
    pub const SCROLL_SPEED: f32 = 2.0;

    /// Pool pre-warm hints
    pub const PROJECTILE_POOL_SIZE: usize = 100;
    pub const ENEMY_POOL_SIZE: usize = 30;
    pub const POWERUP_POOL_SIZE: usize = 10;
    pub const PARTICLE_POOL_SIZE: usize = 100;

    /// Score needed per stage
    pub const STAGE_SCORE: u64 = 10_000;
    /// Every Nth stage grants a bonus life
    pub const BONUS_LIFE_STAGE_INTERVAL: u32 = 3;
    /// Timed power-up drop interval (ms)
    pub const POWERUP_SPAWN_INTERVAL: f32 = 15_000.0;
    /// Chance a destroyed enemy drops a power-up
    pub const POWERUP_DROP_CHANCE: f64 = 0.1;
}

/// Clamp a frame delta: long gaps (backgrounded tab, debugger) count as one reference frame
#[inline]
pub fn clamp_frame_delta(dt: f32) -> f32 {
    if dt > consts::MAX_FRAME_GAP_MS {
        consts::REFERENCE_FRAME_MS
    } else {
        dt
    }
}

/// Restrict `value` to `[min, max]`
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.min(max).max(min)
}

/// Linear interpolation
#[inline]
pub fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * t
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

#[inline]
pub fn to_radians(degrees: f32) -> f32 {
    degrees.to_radians()
}

#[inline]
pub fn to_degrees(radians: f32) -> f32 {
    radians.to_degrees()
}

/// Unit direction for an angle in degrees (0 = right, -90 = up in screen space)
#[inline]
pub fn direction_from_degrees(degrees: f32) -> Vec2 {
    let r = to_radians(degrees);
    Vec2::new(r.cos(), r.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_frame_delta() {
        assert_eq!(clamp_frame_delta(16.0), 16.0);
        assert_eq!(clamp_frame_delta(100.0), 100.0);
        assert_eq!(clamp_frame_delta(250.0), consts::REFERENCE_FRAME_MS);
    }

    #[test]
    fn test_clamp_and_lerp() {
        assert_eq!(clamp(5.0, 0.0, 3.0), 3.0);
        assert_eq!(clamp(-1.0, 0.0, 3.0), 0.0);
        assert_eq!(lerp(10.0, 20.0, 0.25), 12.5);
    }

    #[test]
    fn test_direction_up() {
        let d = direction_from_degrees(-90.0);
        assert!(d.x.abs() < 1e-6);
        assert!((d.y + 1.0).abs() < 1e-6);
        assert!((distance(Vec2::ZERO, Vec2::new(3.0, 4.0)) - 5.0).abs() < 1e-6);
    }
}
