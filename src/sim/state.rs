//! Game state: every pool, timer and counter the frame tick mutates

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::background::Background;
use super::enemy::{Enemy, EnemyKind};
use super::particles::ParticleSystem;
use super::player::{Player, PlayerHit};
use super::pool::{Pool, Slot};
use super::powerup::{PowerUp, PowerUpKind};
use super::projectile::Projectile;
use super::random::{GameRng, seeded};
use super::spawner::EnemySpawner;
use crate::consts::*;

/// Top-level game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    /// Title screen, nothing simulated
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Frozen; rendering continues
    Paused,
    /// Run ended
    GameOver,
}

/// Things the shell reacts to (sound cues, HUD updates, screen changes).
/// Queued during a tick and drained by the frame driver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged(GamePhase),
    LaserFired,
    BombDropped,
    EnemyDamaged,
    EnemyDestroyed { kind: EnemyKind, score: u64 },
    /// An air enemy rammed the player
    Collision,
    PlayerHit(PlayerHit),
    PowerUpCollected(PowerUpKind),
    ScoreChanged(u64),
    /// HUD refresh only
    StageChanged(u32),
    /// A new stage was reached this frame
    StageAdvanced(u32),
    LivesChanged(i32),
    WeaponLevelChanged(u8),
    HighScoreChanged(u64),
    GameOver {
        score: u64,
        high_score: u64,
        new_high_score: bool,
    },
}

/// Reusable slot buffers for passes that release members mid-iteration
#[derive(Debug, Clone, Default)]
pub(crate) struct Scratch {
    pub projectiles: Vec<Slot>,
    pub enemies: Vec<Slot>,
    pub powerups: Vec<Slot>,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was built from
    pub seed: u64,
    pub rng: GameRng,
    /// Canvas size in px
    pub canvas: Vec2,
    pub phase: GamePhase,
    pub player: Player,
    pub projectiles: Pool<Projectile>,
    pub enemies: Pool<Enemy>,
    pub powerups: Pool<PowerUp>,
    pub particles: ParticleSystem,
    pub background: Background,
    pub spawner: EnemySpawner,
    pub score: u64,
    pub high_score: u64,
    pub stage: u32,
    /// Mirrors player health for the HUD
    pub lives: i32,
    pub next_stage_threshold: u64,
    /// ms since the last timed power-up
    pub powerup_timer: f32,
    pub events: Vec<GameEvent>,
    pub(crate) scratch: Scratch,
}

impl GameState {
    /// Fresh state on the title screen
    pub fn new(canvas_w: f32, canvas_h: f32, seed: u64) -> Self {
        let mut rng = seeded(seed);
        let background = Background::new(canvas_w, canvas_h, &mut rng);
        let player = Player::new(canvas_w, canvas_h);
        let lives = player.health;
        Self {
            seed,
            rng,
            canvas: Vec2::new(canvas_w, canvas_h),
            phase: GamePhase::Menu,
            player,
            projectiles: Pool::with_capacity(PROJECTILE_POOL_SIZE),
            enemies: Pool::with_capacity(ENEMY_POOL_SIZE),
            powerups: Pool::with_capacity(POWERUP_POOL_SIZE),
            particles: ParticleSystem::new(),
            background,
            spawner: EnemySpawner::new(canvas_w),
            score: 0,
            high_score: 0,
            stage: 1,
            lives,
            next_stage_threshold: STAGE_SCORE,
            powerup_timer: 0.0,
            events: Vec::new(),
            scratch: Scratch::default(),
        }
    }

    /// Default canvas size
    pub fn with_seed(seed: u64) -> Self {
        Self::new(CANVAS_WIDTH, CANVAS_HEIGHT, seed)
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Hand queued events to the caller
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::info!("Phase {:?} -> {:?}", self.phase, phase);
        }
        self.phase = phase;
        self.emit(GameEvent::PhaseChanged(phase));
    }

    /// Begin a new run from scratch
    pub fn start(&mut self) {
        self.score = 0;
        self.stage = 1;
        self.next_stage_threshold = STAGE_SCORE;
        self.powerup_timer = 0.0;

        self.player.reset();
        self.lives = self.player.health;
        self.projectiles.clear();
        self.enemies.clear();
        self.powerups.clear();
        self.particles.clear();
        self.spawner.reset();
        self.background.reset(&mut self.rng);

        log::info!("Run started (seed {})", self.seed);
        self.set_phase(GamePhase::Playing);
        self.emit_hud();
    }

    /// Same as `start`; offered from the game-over screen
    pub fn restart(&mut self) {
        self.start();
    }

    /// Playing <-> Paused; ignored in any other phase. Returns true if toggled.
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            GamePhase::Playing => self.set_phase(GamePhase::Paused),
            GamePhase::Paused => self.set_phase(GamePhase::Playing),
            GamePhase::Menu | GamePhase::GameOver => return false,
        }
        true
    }

    pub fn return_to_menu(&mut self) {
        self.set_phase(GamePhase::Menu);
    }

    /// End the run and settle the high score
    pub(crate) fn game_over(&mut self) {
        let new_high_score = self.score > self.high_score;
        if new_high_score {
            self.high_score = self.score;
            self.emit(GameEvent::HighScoreChanged(self.high_score));
        }
        log::info!(
            "Game over at stage {} with {} points{}",
            self.stage,
            self.score,
            if new_high_score { " (new high score)" } else { "" }
        );
        self.set_phase(GamePhase::GameOver);
        self.emit(GameEvent::GameOver {
            score: self.score,
            high_score: self.high_score,
            new_high_score,
        });
    }

    /// Push every HUD value
    pub fn emit_hud(&mut self) {
        self.emit(GameEvent::ScoreChanged(self.score));
        self.emit(GameEvent::StageChanged(self.stage));
        self.emit(GameEvent::LivesChanged(self.lives));
        self.emit(GameEvent::WeaponLevelChanged(self.player.weapon_level));
    }
}
