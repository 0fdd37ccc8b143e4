//! Scrolling backdrop: star field, cloud layer and ground strip
//!
//! Purely visual except for `scroll_speed`, which ground targets and movement
//! patterns use as the world's baseline downward motion.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::random::random_int;
use crate::consts::SCROLL_SPEED;

pub const STAR_COUNT: usize = 100;
pub const CLOUD_COUNT: usize = 8;
/// Height of one repeating ground tile (px)
pub const GROUND_TILE_HEIGHT: f32 = 100.0;

/// Visual scroll multiplier for a stage
pub fn stage_speed(stage: u32) -> f32 {
    2.0 + stage.saturating_sub(1) as f32 * 0.5
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    /// 0.3..=1.0, twinkles each frame
    pub brightness: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cloud {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub opacity: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Background {
    pub canvas: Vec2,
    /// World scroll in px per reference frame
    pub scroll_speed: f32,
    pub stars: Vec<Star>,
    pub clouds: Vec<Cloud>,
    /// Ground scroll within one tile, `0..GROUND_TILE_HEIGHT`
    pub ground_offset: f32,
}

impl Background {
    pub fn new<R: Rng + ?Sized>(canvas_w: f32, canvas_h: f32, rng: &mut R) -> Self {
        let mut bg = Self {
            canvas: Vec2::new(canvas_w, canvas_h),
            scroll_speed: SCROLL_SPEED,
            stars: Vec::with_capacity(STAR_COUNT),
            clouds: Vec::with_capacity(CLOUD_COUNT),
            ground_offset: 0.0,
        };
        bg.populate(rng);
        bg
    }

    fn populate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let canvas = self.canvas;
        self.stars.clear();
        self.stars.extend((0..STAR_COUNT).map(|_| Star {
            pos: Vec2::new(rng.random::<f32>() * canvas.x, rng.random::<f32>() * canvas.y),
            size: rng.random::<f32>() * 2.0 + 0.5,
            speed: rng.random::<f32>() * 0.3 + 0.1,
            brightness: rng.random::<f32>().max(0.3),
        }));

        self.clouds.clear();
        for _ in 0..CLOUD_COUNT {
            let pos = Vec2::new(rng.random::<f32>() * canvas.x, rng.random::<f32>() * canvas.y);
            let size = Vec2::new(
                random_int(rng, 60, 120) as f32,
                random_int(rng, 30, 50) as f32,
            );
            self.clouds.push(Cloud {
                pos,
                size,
                speed: rng.random::<f32>() * 0.5 + 0.3,
                opacity: rng.random::<f32>() * 0.3 + 0.1,
            });
        }
        self.ground_offset = 0.0;
    }

    /// Advance one frame; layers move per frame at a stage-scaled rate
    pub fn update<R: Rng + ?Sized>(&mut self, stage: u32, rng: &mut R) {
        let base = stage_speed(stage);
        let canvas = self.canvas;

        for star in &mut self.stars {
            star.pos.y += star.speed * base;
            if star.pos.y > canvas.y {
                star.pos.y = 0.0;
                star.pos.x = rng.random::<f32>() * canvas.x;
            }
            star.brightness = (star.brightness + (rng.random::<f32>() - 0.5) * 0.1).clamp(0.3, 1.0);
        }

        for cloud in &mut self.clouds {
            cloud.pos.y += cloud.speed * base;
            if cloud.pos.y > canvas.y {
                cloud.pos.y = -cloud.size.y;
                cloud.pos.x = rng.random::<f32>() * canvas.x;
            }
        }

        self.ground_offset = (self.ground_offset + self.scroll_speed * base) % GROUND_TILE_HEIGHT;
    }

    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.scroll_speed = SCROLL_SPEED;
        self.populate(rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::random::seeded;

    #[test]
    fn test_stage_speed() {
        assert_eq!(stage_speed(1), 2.0);
        assert_eq!(stage_speed(3), 3.0);
    }

    #[test]
    fn test_layers_populated() {
        let mut rng = seeded(1);
        let bg = Background::new(800.0, 600.0, &mut rng);
        assert_eq!(bg.stars.len(), STAR_COUNT);
        assert_eq!(bg.clouds.len(), CLOUD_COUNT);
        assert_eq!(bg.scroll_speed, SCROLL_SPEED);
        assert!(bg.stars.iter().all(|s| s.pos.x < 800.0 && s.pos.y < 600.0));
    }

    #[test]
    fn test_stars_wrap_and_stay_bright_enough() {
        let mut rng = seeded(4);
        let mut bg = Background::new(800.0, 600.0, &mut rng);
        for _ in 0..2000 {
            bg.update(5, &mut rng);
        }
        for star in &bg.stars {
            assert!(star.pos.y <= 600.0);
            assert!((0.3..=1.0).contains(&star.brightness));
        }
        assert!(bg.ground_offset >= 0.0 && bg.ground_offset < GROUND_TILE_HEIGHT);
    }

    #[test]
    fn test_ground_scrolls_faster_at_higher_stage() {
        let mut rng = seeded(4);
        let mut bg = Background::new(800.0, 600.0, &mut rng);
        bg.update(1, &mut rng);
        assert_eq!(bg.ground_offset, 4.0);
        bg.reset(&mut rng);
        bg.update(3, &mut rng);
        assert_eq!(bg.ground_offset, 6.0);
    }
}
