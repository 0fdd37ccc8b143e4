//! Enemy movement patterns
//!
//! A closed set of strategies stored inline with each enemy. Each variant
//! carries its own phase, so two zigzaggers never share a clock.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Body;
use crate::consts::REFERENCE_FRAME_MS;

/// Diver dive speed (px per reference frame)
pub const DIVE_SPEED: f32 = 6.0;
/// Height after which a diver commits to its dive
pub const DIVE_TRIGGER_Y: f32 = 100.0;
/// Diver target height
pub const DIVE_TARGET_Y: f32 = 300.0;
/// Distance at which a dive counts as arrived
pub const DIVE_ARRIVE_DISTANCE: f32 = 5.0;

/// Diver sub-state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DivePhase {
    /// Falling straight in from the top
    Approaching,
    /// Homing on the target point
    Diving,
    /// Done diving, drifting off the bottom
    Returning,
}

/// Per-enemy movement strategy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MovementPattern {
    Straight,
    Zigzag {
        time: f32,
        amplitude: f32,
        frequency: f32,
    },
    Curve {
        time: f32,
        amplitude: f32,
        frequency: f32,
    },
    Diver {
        target: Vec2,
        phase: DivePhase,
    },
}

impl MovementPattern {
    pub fn zigzag() -> Self {
        MovementPattern::Zigzag {
            time: 0.0,
            amplitude: 3.0,
            frequency: 0.05,
        }
    }

    pub fn curve() -> Self {
        MovementPattern::Curve {
            time: 0.0,
            amplitude: 4.0,
            frequency: 0.03,
        }
    }

    /// Diver homing on a point at `DIVE_TARGET_Y`
    pub fn diver(target_x: f32) -> Self {
        MovementPattern::Diver {
            target: Vec2::new(target_x, DIVE_TARGET_Y),
            phase: DivePhase::Approaching,
        }
    }

    /// Set the body's velocity for this frame
    pub fn apply(&mut self, body: &mut Body, dt: f32, scroll_speed: f32) {
        match self {
            MovementPattern::Straight => {
                body.vel.y = scroll_speed + 2.0;
            }
            MovementPattern::Zigzag {
                time,
                amplitude,
                frequency,
            } => {
                *time += dt / REFERENCE_FRAME_MS;
                body.vel.x = (*time * *frequency).sin() * *amplitude;
                body.vel.y = scroll_speed + 2.0;
            }
            MovementPattern::Curve {
                time,
                amplitude,
                frequency,
            } => {
                *time += dt / REFERENCE_FRAME_MS;
                body.vel.x = (*time * *frequency).cos() * *amplitude;
                body.vel.y = scroll_speed + 1.5;
            }
            MovementPattern::Diver { target, phase } => {
                if *phase == DivePhase::Approaching && body.pos.y > DIVE_TRIGGER_Y {
                    *phase = DivePhase::Diving;
                }

                match *phase {
                    DivePhase::Approaching => {
                        body.vel.y = scroll_speed + 2.0;
                    }
                    DivePhase::Diving => {
                        let to_target = *target - body.pos;
                        let dist = to_target.length();
                        if dist > DIVE_ARRIVE_DISTANCE {
                            body.vel = to_target / dist * DIVE_SPEED;
                        } else {
                            *phase = DivePhase::Returning;
                            body.vel = Vec2::new(0.0, scroll_speed + 3.0);
                        }
                    }
                    DivePhase::Returning => {
                        body.vel = Vec2::new(0.0, scroll_speed + 3.0);
                    }
                }
            }
        }
    }
}
