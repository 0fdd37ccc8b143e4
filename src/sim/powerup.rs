//! Power-up pickups

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Body;
use super::pool::Poolable;

pub const POWERUP_SIZE: f32 = 24.0;
/// Constant downward drift (px per reference frame)
pub const POWERUP_DRIFT: f32 = 2.0;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerUpKind {
    #[default]
    Weapon,
    Life,
    Bomb,
    Shield,
}

impl PowerUpKind {
    /// Pickup burst colour (0xRRGGBB)
    pub fn color(self) -> u32 {
        match self {
            PowerUpKind::Weapon => 0xff3333,
            PowerUpKind::Life => 0x00ff00,
            PowerUpKind::Bomb => 0xffff00,
            PowerUpKind::Shield => 0x00ffff,
        }
    }
}

/// Odds for the timed drop
pub const TIMED_DROP_TABLE: [(PowerUpKind, f32); 4] = [
    (PowerUpKind::Weapon, 0.5),
    (PowerUpKind::Life, 0.2),
    (PowerUpKind::Bomb, 0.2),
    (PowerUpKind::Shield, 0.1),
];

/// Odds for drops from destroyed enemies
pub const ENEMY_DROP_TABLE: [(PowerUpKind, f32); 4] = [
    (PowerUpKind::Weapon, 0.6),
    (PowerUpKind::Life, 0.2),
    (PowerUpKind::Bomb, 0.15),
    (PowerUpKind::Shield, 0.05),
];

/// A falling pickup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PowerUp {
    pub body: Body,
    pub kind: PowerUpKind,
    /// Presentation only
    pub rotation: f32,
}

impl PowerUp {
    pub fn update(&mut self, dt: f32) {
        self.body.integrate(dt);
        self.rotation += dt * 0.003;
    }
}

impl Poolable for PowerUp {
    type Params = (Vec2, PowerUpKind);

    fn reset(&mut self, (pos, kind): (Vec2, PowerUpKind)) {
        let mut body = Body::new(pos, Vec2::splat(POWERUP_SIZE));
        body.vel = Vec2::new(0.0, POWERUP_DRIFT);
        *self = Self {
            body,
            kind,
            rotation: 0.0,
        };
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}
