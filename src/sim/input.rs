//! Input seam: logical keys read by the simulation
//!
//! The simulation only queries key state; capturing real keyboard events is
//! the shell's job.

use serde::{Deserialize, Serialize};

use super::state::GameState;

/// Logical keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    /// Fire laser (air targets)
    Laser,
    /// Drop bomb (ground targets)
    Bomb,
    /// Pause toggle
    Pause,
}

/// Read-only key state
pub trait InputSource {
    fn is_pressed(&self, key: Key) -> bool;

    fn any_pressed(&self, keys: &[Key]) -> bool {
        keys.iter().any(|&k| self.is_pressed(k))
    }
}

/// Input for a single frame as plain flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub laser: bool,
    pub bomb: bool,
    pub pause: bool,
}

impl TickInput {
    /// Drop every held key (e.g. on focus loss)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl InputSource for TickInput {
    fn is_pressed(&self, key: Key) -> bool {
        match key {
            Key::Left => self.left,
            Key::Right => self.right,
            Key::Up => self.up,
            Key::Down => self.down,
            Key::Laser => self.laser,
            Key::Bomb => self.bomb,
            Key::Pause => self.pause,
        }
    }
}

/// Demo-mode pilot: tracks the nearest air enemy, fires constantly, and
/// drops bombs when a ground target is below.
#[derive(Debug, Clone, Default)]
pub struct Autopilot;

impl Autopilot {
    pub fn input_for(&self, state: &GameState) -> TickInput {
        let mut input = TickInput {
            laser: true,
            ..Default::default()
        };

        let me = state.player.body.center();
        let nearest_air = state
            .enemies
            .iter_active()
            .filter(|e| !e.ground_target)
            .min_by(|a, b| {
                let da = a.body.center().distance_squared(me);
                let db = b.body.center().distance_squared(me);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            });

        if let Some(enemy) = nearest_air {
            let dx = enemy.body.center().x - me.x;
            if dx < -4.0 {
                input.left = true;
            } else if dx > 4.0 {
                input.right = true;
            }
            // Back off from anything diving straight at us
            if enemy.body.center().y > me.y - 120.0 {
                input.down = true;
            }
        }

        input.bomb = state.enemies.iter_active().any(|e| {
            e.ground_target
                && e.body.pos.y > me.y
                && (e.body.center().x - me.x).abs() < e.body.size.x / 2.0
        });

        input
    }
}
