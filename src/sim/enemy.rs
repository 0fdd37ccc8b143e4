//! Enemies: air craft with movement patterns and scrolling ground targets

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::Body;
use super::pattern::MovementPattern;
use super::pool::Poolable;
use super::projectile::ShotRequest;
use crate::consts::CANVAS_WIDTH;

/// Base interval between enemy shots (ms)
pub const ENEMY_SHOOT_RATE: f32 = 2000.0;
/// Upper bound of the random jitter added to each shot interval (ms)
pub const ENEMY_SHOOT_JITTER: f32 = 1000.0;

/// Enemy archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    #[default]
    Straight,
    Zigzag,
    Curve,
    Diver,
    Tank,
    Turret,
    Radar,
}

/// Fixed per-archetype stats
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub health: i32,
    pub score: u64,
    pub size: Vec2,
}

impl EnemyKind {
    pub const AIR: [EnemyKind; 4] = [
        EnemyKind::Straight,
        EnemyKind::Zigzag,
        EnemyKind::Curve,
        EnemyKind::Diver,
    ];
    pub const GROUND: [EnemyKind; 3] = [EnemyKind::Tank, EnemyKind::Turret, EnemyKind::Radar];

    pub fn is_ground(self) -> bool {
        matches!(self, EnemyKind::Tank | EnemyKind::Turret | EnemyKind::Radar)
    }

    pub fn stats(self) -> EnemyStats {
        let (health, score, w, h) = match self {
            EnemyKind::Straight => (1, 100, 24.0, 24.0),
            EnemyKind::Zigzag => (1, 150, 26.0, 26.0),
            EnemyKind::Curve => (2, 200, 30.0, 30.0),
            EnemyKind::Diver => (1, 250, 28.0, 28.0),
            EnemyKind::Tank => (1, 500, 32.0, 24.0),
            EnemyKind::Turret => (2, 800, 28.0, 28.0),
            EnemyKind::Radar => (3, 2000, 40.0, 40.0),
        };
        EnemyStats {
            health,
            score,
            size: Vec2::new(w, h),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EnemyKind::Straight => "straight",
            EnemyKind::Zigzag => "zigzag",
            EnemyKind::Curve => "curve",
            EnemyKind::Diver => "diver",
            EnemyKind::Tank => "tank",
            EnemyKind::Turret => "turret",
            EnemyKind::Radar => "radar",
        }
    }

    /// Movement strategy for this archetype (ground targets have none)
    fn pattern(self, dive_target_x: f32) -> Option<MovementPattern> {
        match self {
            EnemyKind::Straight => Some(MovementPattern::Straight),
            EnemyKind::Zigzag => Some(MovementPattern::zigzag()),
            EnemyKind::Curve => Some(MovementPattern::curve()),
            EnemyKind::Diver => Some(MovementPattern::diver(dive_target_x)),
            EnemyKind::Tank | EnemyKind::Turret | EnemyKind::Radar => None,
        }
    }
}

impl fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized enemy tag
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown enemy type `{0}`")]
pub struct ParseKindError(pub String);

impl FromStr for EnemyKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "straight" => Ok(EnemyKind::Straight),
            "zigzag" => Ok(EnemyKind::Zigzag),
            "curve" => Ok(EnemyKind::Curve),
            "diver" => Ok(EnemyKind::Diver),
            "tank" => Ok(EnemyKind::Tank),
            "turret" => Ok(EnemyKind::Turret),
            "radar" => Ok(EnemyKind::Radar),
            other => Err(ParseKindError(other.to_string())),
        }
    }
}

/// Spawn descriptor emitted by the spawner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnRequest {
    pub pos: Vec2,
    pub kind: EnemyKind,
    pub can_shoot: bool,
    pub ground_target: bool,
}

/// Everything needed to (re)initialize a pooled enemy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyInit {
    pub request: SpawnRequest,
    /// Delay before the first shot (ms)
    pub first_shot_delay: f32,
    /// Horizontal target for divers
    pub dive_target_x: f32,
}

impl EnemyInit {
    pub fn new(request: SpawnRequest, first_shot_delay: f32) -> Self {
        Self {
            request,
            first_shot_delay,
            dive_target_x: CANVAS_WIDTH / 2.0,
        }
    }
}

/// Per-frame inputs to an enemy update
#[derive(Debug, Clone, Copy)]
pub struct EnemyContext {
    /// Elapsed ms
    pub dt: f32,
    pub scroll_speed: f32,
}

/// Result of damaging an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyHit {
    /// Took damage, still alive
    Damaged,
    /// This hit finished it off
    Destroyed,
    /// Already destroyed; nothing happened
    Ignored,
}

/// An enemy entity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Enemy {
    pub body: Body,
    pub kind: EnemyKind,
    pub health: i32,
    pub max_health: i32,
    /// Score awarded on destruction
    pub score: u64,
    pub pattern: Option<MovementPattern>,
    pub can_shoot: bool,
    /// ms until next shot
    pub shoot_cooldown: f32,
    pub shoot_rate: f32,
    pub ground_target: bool,
}

impl Enemy {
    /// Move, then fire if the cooldown ran out
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        ctx: &EnemyContext,
        rng: &mut R,
    ) -> Option<ShotRequest> {
        if !self.body.active {
            return None;
        }

        if self.ground_target {
            self.body.vel.y = ctx.scroll_speed;
        } else if let Some(pattern) = self.pattern.as_mut() {
            pattern.apply(&mut self.body, ctx.dt, ctx.scroll_speed);
        }

        self.body.integrate(ctx.dt);

        if !self.can_shoot {
            return None;
        }
        self.shoot_cooldown -= ctx.dt;
        if self.shoot_cooldown > 0.0 {
            return None;
        }
        self.shoot_cooldown = self.shoot_rate + rng.random::<f32>() * ENEMY_SHOOT_JITTER;
        let muzzle = Vec2::new(
            self.body.pos.x + self.body.size.x / 2.0,
            self.body.pos.y + self.body.size.y,
        );
        Some(ShotRequest::enemy_bullet(muzzle))
    }

    /// Apply damage. This is the only place an enemy gets destroyed.
    pub fn hit(&mut self, damage: i32) -> EnemyHit {
        if !self.body.active || self.health <= 0 {
            return EnemyHit::Ignored;
        }
        self.health -= damage;
        if self.health <= 0 {
            self.body.active = false;
            EnemyHit::Destroyed
        } else {
            EnemyHit::Damaged
        }
    }
}

impl Poolable for Enemy {
    type Params = EnemyInit;

    fn reset(&mut self, init: EnemyInit) {
        let req = init.request;
        let stats = req.kind.stats();
        let ground_target = req.ground_target || req.kind.is_ground();
        debug_assert!(
            !req.ground_target || req.kind.is_ground(),
            "air enemy {} spawned as ground target",
            req.kind
        );

        *self = Self {
            body: Body::new(req.pos, stats.size),
            kind: req.kind,
            health: stats.health,
            max_health: stats.health,
            score: stats.score,
            pattern: if ground_target {
                None
            } else {
                req.kind.pattern(init.dive_target_x)
            },
            can_shoot: req.can_shoot || req.kind == EnemyKind::Turret,
            shoot_cooldown: init.first_shot_delay,
            shoot_rate: ENEMY_SHOOT_RATE,
            ground_target,
        };
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::random::seeded;

    fn request(kind: EnemyKind, can_shoot: bool) -> SpawnRequest {
        SpawnRequest {
            pos: Vec2::new(200.0, -30.0),
            kind,
            can_shoot,
            ground_target: kind.is_ground(),
        }
    }

    fn spawned(kind: EnemyKind, can_shoot: bool, delay: f32) -> Enemy {
        let mut e = Enemy::default();
        e.reset(EnemyInit::new(request(kind, can_shoot), delay));
        e
    }

    fn ctx(dt: f32) -> EnemyContext {
        EnemyContext {
            dt,
            scroll_speed: 2.0,
        }
    }

    #[test]
    fn test_stats_applied_on_init() {
        let e = spawned(EnemyKind::Radar, false, 0.0);
        assert_eq!(e.health, 3);
        assert_eq!(e.max_health, 3);
        assert_eq!(e.score, 2000);
        assert_eq!(e.body.size, Vec2::new(40.0, 40.0));
        assert!(e.ground_target);
        assert!(e.pattern.is_none());
    }

    #[test]
    fn test_turret_always_shoots() {
        let e = spawned(EnemyKind::Turret, false, 0.0);
        assert!(e.can_shoot);
    }

    #[test]
    fn test_two_hit_enemy_scenario() {
        let mut e = spawned(EnemyKind::Curve, false, 0.0);
        assert_eq!(e.health, 2);

        assert_eq!(e.hit(1), EnemyHit::Damaged);
        assert!(e.body.active);
        assert_eq!(e.health, 1);

        assert_eq!(e.hit(1), EnemyHit::Destroyed);
        assert!(!e.body.active);

        assert_eq!(e.hit(1), EnemyHit::Ignored);
        assert_eq!(e.hit(5), EnemyHit::Ignored);
        assert_eq!(e.health, 0);
    }

    #[test]
    fn test_ground_target_moves_with_scroll_only() {
        let mut rng = seeded(1);
        let mut e = spawned(EnemyKind::Tank, false, 0.0);
        e.update(&ctx(16.0), &mut rng);
        assert_eq!(e.body.pos, Vec2::new(200.0, -28.0));
    }

    #[test]
    fn test_air_enemy_follows_pattern() {
        let mut rng = seeded(1);
        let mut e = spawned(EnemyKind::Straight, false, 0.0);
        e.update(&ctx(16.0), &mut rng);
        assert_eq!(e.body.pos, Vec2::new(200.0, -26.0));
    }

    #[test]
    fn test_shooter_fires_when_cooldown_expires() {
        let mut rng = seeded(9);
        let mut e = spawned(EnemyKind::Straight, true, 20.0);

        assert!(e.update(&ctx(16.0), &mut rng).is_none());
        let shot = e.update(&ctx(16.0), &mut rng).expect("cooldown expired");
        assert_eq!(shot.kind, crate::sim::ProjectileKind::EnemyBullet);
        assert_eq!(shot.origin.x, e.body.pos.x + 12.0);
        assert_eq!(shot.origin.y, e.body.pos.y + 24.0);
        assert!(e.shoot_cooldown >= ENEMY_SHOOT_RATE);
        assert!(e.shoot_cooldown < ENEMY_SHOOT_RATE + ENEMY_SHOOT_JITTER);
    }

    #[test]
    fn test_non_shooter_never_fires() {
        let mut rng = seeded(3);
        let mut e = spawned(EnemyKind::Zigzag, false, 0.0);
        for _ in 0..500 {
            assert!(e.update(&ctx(16.0), &mut rng).is_none());
        }
    }

    #[test]
    fn test_kind_tags_round_trip() {
        for kind in EnemyKind::AIR.iter().chain(EnemyKind::GROUND.iter()) {
            assert_eq!(kind.as_str().parse::<EnemyKind>(), Ok(*kind));
        }
        assert_eq!(
            "boss".parse::<EnemyKind>(),
            Err(ParseKindError("boss".to_string()))
        );
    }
}
