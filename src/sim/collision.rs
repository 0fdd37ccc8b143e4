//! Collision detection predicates
//!
//! Pure geometry: axis-aligned boxes and circles. Overlap tests are strict,
//! so shapes that only touch at an edge do not collide.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Body;

/// Immutable bounds snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Circle used by the radial test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

/// Axis-aligned box overlap
#[inline]
pub fn aabb_overlap(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

/// Circle overlap (`distance < r1 + r2`)
#[inline]
pub fn circle_overlap(a: &Circle, b: &Circle) -> bool {
    a.center.distance(b.center) < a.radius + b.radius
}

/// Inclusive point-in-box test
#[inline]
pub fn point_in_rect(point: Vec2, rect: &Rect) -> bool {
    point.x >= rect.x && point.x <= rect.right() && point.y >= rect.y && point.y <= rect.bottom()
}

/// Box test between two entity bodies
#[inline]
pub fn bodies_collide(a: &Body, b: &Body) -> bool {
    aabb_overlap(&a.bounds(), &b.bounds())
}
