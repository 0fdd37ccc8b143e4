//! Shared body layout for every pooled entity kind
//!
//! Position, box size, velocity and the `active` lifecycle flag. Entities are
//! never freed; they go inactive and get reused by their pool.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::REFERENCE_FRAME_MS;

/// A moving axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height
    pub size: Vec2,
    /// Displacement per reference frame
    pub vel: Vec2,
    /// Sole lifecycle gate
    pub active: bool,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            vel: Vec2::ZERO,
            active: true,
        }
    }

    /// Advance position; `dt` in ms, scaled against the reference frame
    #[inline]
    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.vel * dt / REFERENCE_FRAME_MS;
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// True once the top-left corner leaves the canvas by more than `margin`
    pub fn is_off_screen(&self, canvas_w: f32, canvas_h: f32, margin: f32) -> bool {
        self.pos.x < -margin
            || self.pos.x > canvas_w + margin
            || self.pos.y < -margin
            || self.pos.y > canvas_h + margin
    }
}
