//! Enemy spawn scheduling
//!
//! The spawner owns two timers and decides *when* and *what* to spawn. It
//! returns descriptors; instantiating them into the enemy pool is the tick's
//! job.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::enemy::{EnemyKind, SpawnRequest};
use super::random::{random_choice, random_int, weighted_random};

/// Air spawn interval at stage 1 (ms)
pub const BASE_SPAWN_INTERVAL: f32 = 1500.0;
/// Fastest air spawn interval (ms)
pub const MIN_SPAWN_INTERVAL: f32 = 800.0;
/// Interval reduction per stage above 1 (ms)
pub const SPAWN_INTERVAL_STEP: f32 = 200.0;
/// Ground target interval (ms)
pub const WAVE_INTERVAL: f32 = 5000.0;

/// Chance of the extra escort spawn from stage 2 on
pub const ESCORT_CHANCE: f64 = 0.3;

pub const AIR_SPAWN_Y: f32 = -30.0;
pub const ESCORT_SPAWN_Y: f32 = -60.0;
pub const GROUND_SPAWN_Y: f32 = -50.0;

/// Odds for the regular air spawn
pub const AIR_SPAWN_TABLE: [(EnemyKind, f32); 4] = [
    (EnemyKind::Straight, 0.4),
    (EnemyKind::Zigzag, 0.3),
    (EnemyKind::Curve, 0.2),
    (EnemyKind::Diver, 0.1),
];

const ESCORT_KINDS: [EnemyKind; 2] = [EnemyKind::Straight, EnemyKind::Zigzag];

/// Air spawn interval for a stage
pub fn spawn_interval(stage: u32) -> f32 {
    let step = stage.saturating_sub(1) as f32 * SPAWN_INTERVAL_STEP;
    (BASE_SPAWN_INTERVAL - step).max(MIN_SPAWN_INTERVAL)
}

/// Probability that a regular air spawn can shoot
pub fn shooter_chance(stage: u32) -> f64 {
    (0.1 + f64::from(stage) * 0.05).min(1.0)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemySpawner {
    /// ms since the last air spawn
    pub spawn_timer: f32,
    /// ms since the last ground spawn
    pub wave_timer: f32,
    pub stage: u32,
    pub canvas_width: f32,
}

impl EnemySpawner {
    pub fn new(canvas_width: f32) -> Self {
        Self {
            spawn_timer: 0.0,
            wave_timer: 0.0,
            stage: 1,
            canvas_width,
        }
    }

    /// Advance both timers and collect whatever is due this frame
    pub fn update<R: Rng + ?Sized>(&mut self, dt: f32, stage: u32, rng: &mut R) -> Vec<SpawnRequest> {
        self.stage = stage;
        let mut requests = Vec::new();

        self.spawn_timer += dt;
        if self.spawn_timer >= spawn_interval(stage) {
            self.spawn_timer = 0.0;

            let kind = weighted_random(rng, &AIR_SPAWN_TABLE);
            let x = self.air_x(rng);
            let can_shoot = rng.random_bool(shooter_chance(stage));
            requests.push(SpawnRequest {
                pos: Vec2::new(x, AIR_SPAWN_Y),
                kind,
                can_shoot,
                ground_target: false,
            });

            if stage >= 2 && rng.random_bool(ESCORT_CHANCE) {
                let x = self.air_x(rng);
                requests.push(SpawnRequest {
                    pos: Vec2::new(x, ESCORT_SPAWN_Y),
                    kind: *random_choice(rng, &ESCORT_KINDS),
                    can_shoot: false,
                    ground_target: false,
                });
            }
        }

        self.wave_timer += dt;
        if self.wave_timer >= WAVE_INTERVAL {
            self.wave_timer = 0.0;

            let kind = *random_choice(rng, &EnemyKind::GROUND);
            let w = self.canvas_width as i32;
            let x = random_int(rng, 100, w - 100) as f32;
            requests.push(SpawnRequest {
                pos: Vec2::new(x, GROUND_SPAWN_Y),
                kind,
                can_shoot: kind == EnemyKind::Turret,
                ground_target: true,
            });
        }

        requests
    }

    fn air_x<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        let w = self.canvas_width as i32;
        random_int(rng, 50, w - 50) as f32
    }

    pub fn reset(&mut self) {
        self.spawn_timer = 0.0;
        self.wave_timer = 0.0;
        self.stage = 1;
    }
}
