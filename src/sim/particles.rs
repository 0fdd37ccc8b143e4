//! Cosmetic particles: explosions and laser trails
//!
//! Particles never collide with anything. They live in their own pool and
//! only feed the render snapshot.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::Body;
use super::pool::{Pool, Poolable};
use crate::consts::PARTICLE_POOL_SIZE;

/// 0xRRGGBB colours
pub mod colors {
    pub const ORANGE: u32 = 0xff6600;
    pub const YELLOW: u32 = 0xffff00;
    pub const CYAN: u32 = 0x00ffff;
    pub const GREEN: u32 = 0x00ff00;
    pub const RED: u32 = 0xff0000;
    pub const WHITE: u32 = 0xffffff;
}

/// Default burst size for `explosion`
pub const EXPLOSION_COUNT: usize = 10;
pub const SMALL_EXPLOSION_COUNT: usize = 5;

/// Everything needed to launch one particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleInit {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: u32,
    pub lifetime: f32,
    pub size: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Particle {
    /// `pos` is the particle centre; `vel` is px per frame
    pub body: Body,
    pub color: u32,
    /// ms
    pub lifetime: f32,
    /// ms
    pub age: f32,
}

impl Particle {
    pub fn update(&mut self, dt: f32) {
        if !self.body.active {
            return;
        }
        // Per frame, not scaled by dt
        self.body.pos += self.body.vel;
        self.age += dt;
        if self.age >= self.lifetime {
            self.body.active = false;
        }
    }

    /// 1.0 when fresh, fading to 0.0 at end of life
    pub fn alpha(&self) -> f32 {
        if self.lifetime <= 0.0 {
            return 0.0;
        }
        (1.0 - self.age / self.lifetime).clamp(0.0, 1.0)
    }
}

impl Poolable for Particle {
    type Params = ParticleInit;

    fn reset(&mut self, init: ParticleInit) {
        let mut body = Body::new(init.pos, Vec2::splat(init.size));
        body.vel = init.vel;
        *self = Self {
            body,
            color: init.color,
            lifetime: init.lifetime,
            age: 0.0,
        };
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

#[derive(Debug, Clone)]
pub struct ParticleSystem {
    pub pool: Pool<Particle>,
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self {
            pool: Pool::with_capacity(PARTICLE_POOL_SIZE),
        }
    }

    /// Radial burst, evenly spread with a little angular noise
    pub fn explosion<R: Rng + ?Sized>(&mut self, rng: &mut R, at: Vec2, count: usize, color: u32) {
        for i in 0..count {
            let angle = TAU * i as f32 / count as f32 + rng.random::<f32>() * 0.3;
            let speed = 2.0 + rng.random::<f32>() * 3.0;
            self.pool.spawn(ParticleInit {
                pos: at,
                vel: Vec2::from_angle(angle) * speed,
                color,
                lifetime: 300.0 + rng.random::<f32>() * 300.0,
                size: 2.0 + rng.random::<f32>() * 3.0,
            });
        }
    }

    /// Yellow sparks for a hit that didn't kill
    pub fn small_explosion<R: Rng + ?Sized>(&mut self, rng: &mut R, at: Vec2) {
        for _ in 0..SMALL_EXPLOSION_COUNT {
            let angle = rng.random::<f32>() * TAU;
            let speed = 1.0 + rng.random::<f32>() * 2.0;
            self.pool.spawn(ParticleInit {
                pos: at,
                vel: Vec2::from_angle(angle) * speed,
                color: colors::YELLOW,
                lifetime: 200.0 + rng.random::<f32>() * 200.0,
                size: 2.0 + rng.random::<f32>() * 2.0,
            });
        }
    }

    pub fn trail<R: Rng + ?Sized>(&mut self, rng: &mut R, at: Vec2) {
        let vel = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * 0.5;
        self.pool.spawn(ParticleInit {
            pos: at,
            vel,
            color: colors::CYAN,
            lifetime: 150.0 + rng.random::<f32>() * 100.0,
            size: 2.0,
        });
    }

    pub fn update(&mut self, dt: f32) {
        for p in self.pool.iter_active_mut() {
            p.update(dt);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.pool.iter_active()
    }

    pub fn active_count(&self) -> usize {
        self.pool.active_count()
    }

    pub fn clear(&mut self) {
        self.pool.clear();
    }
}
