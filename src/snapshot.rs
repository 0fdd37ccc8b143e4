//! Render snapshot: a read-only view of one frame
//!
//! Built after the tick, never mutates the simulation. Lists are in draw
//! order (stars, clouds, ground, pickups, shots, air, player, particles).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{EnemyKind, GamePhase, GameState, PowerUpKind, ProjectileKind};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CloudView {
    pub pos: Vec2,
    pub size: Vec2,
    pub opacity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyView {
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: EnemyKind,
    /// 0.0..=1.0, for damage tinting
    pub health_fraction: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: ProjectileKind,
    pub angle: f32,
    pub enhanced: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerUpView {
    pub pos: Vec2,
    pub kind: PowerUpKind,
    pub rotation: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleView {
    pub pos: Vec2,
    pub size: f32,
    pub color: u32,
    pub alpha: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub size: Vec2,
    pub alive: bool,
    pub invincible: bool,
    /// Blink phase while invincible
    pub visible: bool,
    pub shield: bool,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub phase: GamePhase,
    pub canvas: Vec2,
    pub score: u64,
    pub high_score: u64,
    pub stage: u32,
    pub lives: i32,
    pub weapon_level: u8,
    pub bomb_count: u32,
    pub ground_offset: f32,
    pub stars: Vec<(Vec2, f32, f32)>,
    pub clouds: Vec<CloudView>,
    pub ground_enemies: Vec<EnemyView>,
    pub powerups: Vec<PowerUpView>,
    pub projectiles: Vec<ProjectileView>,
    pub air_enemies: Vec<EnemyView>,
    pub player: PlayerView,
    pub particles: Vec<ParticleView>,
}

/// Draws a snapshot. Must not feed anything back into the simulation.
pub trait Renderer {
    fn render(&mut self, frame: &FrameSnapshot);
}

/// Blink period while invincible (ms)
const BLINK_PERIOD: f32 = 100.0;

impl FrameSnapshot {
    pub fn from_state(state: &GameState) -> Self {
        let mut frame = Self::default();
        frame.capture(state);
        frame
    }

    /// Refill from `state`, reusing this snapshot's buffers
    pub fn capture(&mut self, state: &GameState) {
        self.phase = state.phase;
        self.canvas = state.canvas;
        self.score = state.score;
        self.high_score = state.high_score;
        self.stage = state.stage;
        self.lives = state.lives;
        self.weapon_level = state.player.weapon_level;
        self.bomb_count = state.player.bomb_count;
        self.ground_offset = state.background.ground_offset;

        self.stars.clear();
        self.stars.extend(
            state
                .background
                .stars
                .iter()
                .map(|s| (s.pos, s.size, s.brightness)),
        );

        self.clouds.clear();
        self.clouds
            .extend(state.background.clouds.iter().map(|c| CloudView {
                pos: c.pos,
                size: c.size,
                opacity: c.opacity,
            }));

        self.ground_enemies.clear();
        self.air_enemies.clear();
        for enemy in state.enemies.iter_active() {
            let view = EnemyView {
                pos: enemy.body.pos,
                size: enemy.body.size,
                kind: enemy.kind,
                health_fraction: if enemy.max_health > 0 {
                    enemy.health as f32 / enemy.max_health as f32
                } else {
                    0.0
                },
            };
            if enemy.ground_target {
                self.ground_enemies.push(view);
            } else {
                self.air_enemies.push(view);
            }
        }

        self.powerups.clear();
        self.powerups
            .extend(state.powerups.iter_active().map(|p| PowerUpView {
                pos: p.body.pos,
                kind: p.kind,
                rotation: p.rotation,
            }));

        self.projectiles.clear();
        self.projectiles
            .extend(state.projectiles.iter_active().map(|p| ProjectileView {
                pos: p.body.pos,
                size: p.body.size,
                kind: p.kind,
                angle: p.angle,
                enhanced: p.enhanced,
            }));

        let player = &state.player;
        self.player = PlayerView {
            pos: player.body.pos,
            size: player.body.size,
            alive: player.body.active,
            invincible: player.invincible,
            visible: !player.invincible
                || (player.invincible_time / BLINK_PERIOD) as u32 % 2 == 0,
            shield: player.has_shield,
        };

        self.particles.clear();
        self.particles.extend(state.particles.iter().map(|p| ParticleView {
            pos: p.body.pos,
            size: p.body.size.x,
            color: p.color,
            alpha: p.alpha(),
        }));
    }

    /// Active entity count, excluding the player and backdrop
    pub fn entity_count(&self) -> usize {
        self.ground_enemies.len()
            + self.air_enemies.len()
            + self.powerups.len()
            + self.projectiles.len()
            + self.particles.len()
    }
}

/// Renderer that keeps the last frame, for headless runs and tests
#[derive(Debug, Default)]
pub struct LastFrame {
    pub frame: FrameSnapshot,
    pub frames_rendered: u64,
}

impl Renderer for LastFrame {
    fn render(&mut self, frame: &FrameSnapshot) {
        self.frame.clone_from(frame);
        self.frames_rendered += 1;
    }
}
