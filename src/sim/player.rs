//! The player's craft: movement, weapon levels, invincibility and shield

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Body;
use super::input::{InputSource, Key};
use super::powerup::PowerUpKind;
use super::projectile::{ANGLE_UP, ShotRequest};
use crate::clamp;

pub const PLAYER_SIZE: f32 = 32.0;
/// px per reference frame on each axis
pub const PLAYER_SPEED: f32 = 5.0;
pub const PLAYER_MAX_HEALTH: i32 = 3;
/// Base laser interval (ms)
pub const LASER_FIRE_RATE: f32 = 150.0;
/// Laser interval floor (ms)
pub const LASER_MIN_FIRE_RATE: f32 = 80.0;
/// Interval reduction per weapon level above 1 (ms)
pub const LASER_RATE_BONUS_PER_LEVEL: f32 = 20.0;
pub const BOMB_FIRE_RATE: f32 = 400.0;
pub const INVINCIBLE_DURATION: f32 = 2000.0;
pub const SHIELD_DURATION: f32 = 10_000.0;
pub const MAX_WEAPON_LEVEL: u8 = 5;
pub const START_BOMBS: u32 = 3;
pub const MAX_BOMBS: u32 = 10;
pub const BOMBS_PER_PICKUP: u32 = 3;

/// One laser barrel, relative to the nose of the craft
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Muzzle {
    pub offset: Vec2,
    pub angle: f32,
    pub enhanced: bool,
}

const fn muzzle(dx: f32, dy: f32, angle: f32, enhanced: bool) -> Muzzle {
    Muzzle {
        offset: Vec2::new(dx, dy),
        angle,
        enhanced,
    }
}

/// Laser patterns indexed by weapon level - 1
const LASER_PATTERNS: [&[Muzzle]; MAX_WEAPON_LEVEL as usize] = [
    &[muzzle(0.0, 0.0, ANGLE_UP, false)],
    &[muzzle(0.0, 0.0, ANGLE_UP, true)],
    &[muzzle(-8.0, 0.0, ANGLE_UP, false), muzzle(8.0, 0.0, ANGLE_UP, false)],
    &[
        muzzle(0.0, 0.0, ANGLE_UP, false),
        muzzle(-10.0, 5.0, -80.0, false),
        muzzle(10.0, 5.0, -100.0, false),
    ],
    &[
        muzzle(0.0, 0.0, ANGLE_UP, true),
        muzzle(-8.0, 3.0, -85.0, false),
        muzzle(8.0, 3.0, -95.0, false),
        muzzle(-16.0, 8.0, -75.0, false),
        muzzle(16.0, 8.0, -105.0, false),
    ],
];

/// Barrels for a weapon level (clamped to 1..=5)
pub fn laser_pattern(level: u8) -> &'static [Muzzle] {
    let idx = level.clamp(1, MAX_WEAPON_LEVEL) as usize - 1;
    LASER_PATTERNS[idx]
}

/// A fired laser volley, expanded lazily into shot requests
#[derive(Debug, Clone, Copy)]
pub struct Volley {
    pub nose: Vec2,
    pub muzzles: &'static [Muzzle],
}

impl Volley {
    pub fn shots(&self) -> impl Iterator<Item = ShotRequest> + '_ {
        self.muzzles
            .iter()
            .map(|m| ShotRequest::laser(self.nose + m.offset, m.angle, m.enhanced))
    }

    pub fn len(&self) -> usize {
        self.muzzles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.muzzles.is_empty()
    }
}

/// Outcome of the player being hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerHit {
    /// Invincible (or already dead); nothing changed
    Blocked,
    /// Shield took the hit and is gone
    Shielded,
    /// Lost health, now invincible for a while
    Damaged,
    /// Health ran out
    Died,
}

impl PlayerHit {
    pub fn is_fatal(self) -> bool {
        self == PlayerHit::Died
    }
}

/// The player's craft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub canvas: Vec2,
    pub health: i32,
    pub max_health: i32,
    /// ms until the laser can fire again
    pub laser_cooldown: f32,
    /// ms until a bomb can drop again
    pub bomb_cooldown: f32,
    pub invincible: bool,
    /// ms spent invincible so far
    pub invincible_time: f32,
    pub weapon_level: u8,
    pub bomb_count: u32,
    pub has_shield: bool,
    /// ms the shield has been up
    pub shield_time: f32,
}

impl Player {
    pub fn new(canvas_w: f32, canvas_h: f32) -> Self {
        let canvas = Vec2::new(canvas_w, canvas_h);
        Self {
            body: Body::new(Self::spawn_point(canvas), Vec2::splat(PLAYER_SIZE)),
            canvas,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            laser_cooldown: 0.0,
            bomb_cooldown: 0.0,
            invincible: false,
            invincible_time: 0.0,
            weapon_level: 1,
            bomb_count: START_BOMBS,
            has_shield: false,
            shield_time: 0.0,
        }
    }

    fn spawn_point(canvas: Vec2) -> Vec2 {
        Vec2::new(canvas.x / 2.0 - PLAYER_SIZE / 2.0, canvas.y - 100.0)
    }

    /// Back to a fresh craft at the spawn point
    pub fn reset(&mut self) {
        *self = Self::new(self.canvas.x, self.canvas.y);
    }

    pub fn update(&mut self, dt: f32, input: &dyn InputSource) {
        if !self.body.active {
            return;
        }

        // Each axis independently; diagonals are faster
        let mut vel = Vec2::ZERO;
        if input.is_pressed(Key::Left) {
            vel.x = -PLAYER_SPEED;
        }
        if input.is_pressed(Key::Right) {
            vel.x = PLAYER_SPEED;
        }
        if input.is_pressed(Key::Up) {
            vel.y = -PLAYER_SPEED;
        }
        if input.is_pressed(Key::Down) {
            vel.y = PLAYER_SPEED;
        }
        self.body.vel = vel;
        self.body.integrate(dt);

        self.body.pos.x = clamp(self.body.pos.x, 0.0, self.canvas.x - self.body.size.x);
        self.body.pos.y = clamp(
            self.body.pos.y,
            self.canvas.y / 2.0,
            self.canvas.y - self.body.size.y,
        );

        self.laser_cooldown = (self.laser_cooldown - dt).max(0.0);
        self.bomb_cooldown = (self.bomb_cooldown - dt).max(0.0);

        if self.invincible {
            self.invincible_time += dt;
            if self.invincible_time >= INVINCIBLE_DURATION {
                self.invincible = false;
                self.invincible_time = 0.0;
            }
        }

        if self.has_shield {
            self.shield_time += dt;
            if self.shield_time >= SHIELD_DURATION {
                self.has_shield = false;
                self.shield_time = 0.0;
            }
        }
    }

    /// Laser interval at the current weapon level
    pub fn laser_fire_rate(&self) -> f32 {
        let bonus = f32::from(self.weapon_level.saturating_sub(1)) * LASER_RATE_BONUS_PER_LEVEL;
        (LASER_FIRE_RATE - bonus).max(LASER_MIN_FIRE_RATE)
    }

    /// Fire the laser pattern for the current level, if off cooldown
    pub fn fire_laser(&mut self) -> Option<Volley> {
        if self.laser_cooldown > 0.0 {
            return None;
        }
        self.laser_cooldown = self.laser_fire_rate();
        Some(Volley {
            nose: Vec2::new(self.body.pos.x + self.body.size.x / 2.0, self.body.pos.y),
            muzzles: laser_pattern(self.weapon_level),
        })
    }

    /// Drop a bomb from the belly, if off cooldown
    pub fn fire_bomb(&mut self) -> Option<ShotRequest> {
        if self.bomb_cooldown > 0.0 {
            return None;
        }
        self.bomb_cooldown = BOMB_FIRE_RATE;
        Some(ShotRequest::bomb(Vec2::new(
            self.body.pos.x + self.body.size.x / 2.0,
            self.body.pos.y + self.body.size.y,
        )))
    }

    /// Take a hit: invincibility, then shield, then health
    pub fn hit(&mut self) -> PlayerHit {
        if self.invincible || !self.body.active {
            return PlayerHit::Blocked;
        }

        if self.has_shield {
            self.has_shield = false;
            self.shield_time = 0.0;
            return PlayerHit::Shielded;
        }

        self.health -= 1;
        if self.weapon_level > 1 {
            self.weapon_level -= 1;
        }

        if self.health <= 0 {
            self.body.active = false;
            return PlayerHit::Died;
        }

        self.invincible = true;
        self.invincible_time = 0.0;
        PlayerHit::Damaged
    }

    /// Apply a pickup; false when it had no effect
    pub fn power_up(&mut self, kind: PowerUpKind) -> bool {
        match kind {
            PowerUpKind::Weapon => {
                if self.weapon_level < MAX_WEAPON_LEVEL {
                    self.weapon_level += 1;
                    true
                } else {
                    false
                }
            }
            PowerUpKind::Life => {
                if self.health < self.max_health {
                    self.health += 1;
                    true
                } else {
                    false
                }
            }
            PowerUpKind::Bomb => {
                self.bomb_count = (self.bomb_count + BOMBS_PER_PICKUP).min(MAX_BOMBS);
                true
            }
            PowerUpKind::Shield => {
                self.has_shield = true;
                self.shield_time = 0.0;
                true
            }
        }
    }
}
