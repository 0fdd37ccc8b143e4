//! Projectiles: player lasers and bombs, enemy bullets

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Body;
use super::pool::Poolable;
use crate::direction_from_degrees;

/// Straight up, in screen degrees
pub const ANGLE_UP: f32 = -90.0;
/// Straight down, in screen degrees
pub const ANGLE_DOWN: f32 = 90.0;

pub const LASER_SPEED: f32 = 10.0;
pub const BOMB_SPEED: f32 = 8.0;
pub const ENEMY_BULLET_SPEED: f32 = 6.0;

/// Projectile types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProjectileKind {
    /// Player weapon, hits air enemies only
    #[default]
    Laser,
    /// Player weapon, hits ground targets only
    Bomb,
    /// Fired by enemies at the player
    EnemyBullet,
}

/// A request to create a projectile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotRequest {
    /// Horizontal centre and top edge of the new projectile
    pub origin: Vec2,
    pub kind: ProjectileKind,
    /// Heading in degrees (lasers only)
    pub angle: f32,
    /// Heavier laser variant
    pub enhanced: bool,
}

impl ShotRequest {
    pub fn laser(origin: Vec2, angle: f32, enhanced: bool) -> Self {
        Self {
            origin,
            kind: ProjectileKind::Laser,
            angle,
            enhanced,
        }
    }

    pub fn bomb(origin: Vec2) -> Self {
        Self {
            origin,
            kind: ProjectileKind::Bomb,
            angle: ANGLE_DOWN,
            enhanced: false,
        }
    }

    pub fn enemy_bullet(origin: Vec2) -> Self {
        Self {
            origin,
            kind: ProjectileKind::EnemyBullet,
            angle: ANGLE_DOWN,
            enhanced: false,
        }
    }
}

/// A projectile entity
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Projectile {
    pub body: Body,
    pub kind: ProjectileKind,
    pub damage: i32,
    pub angle: f32,
    pub enhanced: bool,
}

impl Projectile {
    /// Advance along the velocity fixed at init
    pub fn update(&mut self, dt: f32) {
        self.body.integrate(dt);
    }

    pub fn is_player_owned(&self) -> bool {
        self.kind != ProjectileKind::EnemyBullet
    }

    /// Lasers only hurt air enemies, bombs only hurt ground targets
    pub fn can_damage(&self, ground_target: bool) -> bool {
        match self.kind {
            ProjectileKind::Laser => !ground_target,
            ProjectileKind::Bomb => ground_target,
            ProjectileKind::EnemyBullet => false,
        }
    }
}

impl Poolable for Projectile {
    type Params = ShotRequest;

    fn reset(&mut self, shot: ShotRequest) {
        let (size, damage, vel) = match shot.kind {
            ProjectileKind::Laser => {
                let size = if shot.enhanced {
                    Vec2::new(6.0, 16.0)
                } else {
                    Vec2::new(4.0, 12.0)
                };
                let damage = if shot.enhanced { 2 } else { 1 };
                (size, damage, direction_from_degrees(shot.angle) * LASER_SPEED)
            }
            ProjectileKind::Bomb => (Vec2::new(6.0, 8.0), 1, Vec2::new(0.0, BOMB_SPEED)),
            ProjectileKind::EnemyBullet => {
                (Vec2::new(5.0, 5.0), 1, Vec2::new(0.0, ENEMY_BULLET_SPEED))
            }
        };

        let mut body = Body::new(Vec2::new(shot.origin.x - size.x / 2.0, shot.origin.y), size);
        body.vel = vel;

        *self = Self {
            body,
            kind: shot.kind,
            damage,
            angle: shot.angle,
            enhanced: shot.enhanced,
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

    fn spawned(shot: ShotRequest) -> Projectile {
        let mut p = Projectile::default();
        p.reset(shot);
        p
    }

    #[test]
    fn test_laser_init_centres_box() {
        let p = spawned(ShotRequest::laser(Vec2::new(100.0, 200.0), ANGLE_UP, false));
        assert_eq!(p.body.pos, Vec2::new(98.0, 200.0));
        assert_eq!(p.body.size, Vec2::new(4.0, 12.0));
        assert_eq!(p.damage, 1);
        assert!(p.body.vel.x.abs() < 1e-5);
        assert!((p.body.vel.y + LASER_SPEED).abs() < 1e-5);
    }

    #[test]
    fn test_enhanced_laser_is_heavier() {
        let p = spawned(ShotRequest::laser(Vec2::new(100.0, 200.0), ANGLE_UP, true));
        assert_eq!(p.body.size, Vec2::new(6.0, 16.0));
        assert_eq!(p.damage, 2);
    }

    #[test]
    fn test_angled_laser_drifts_sideways() {
        let p = spawned(ShotRequest::laser(Vec2::ZERO, -80.0, false));
        assert!(p.body.vel.x > 0.0);
        assert!(p.body.vel.y < 0.0);
        assert!((p.body.vel.length() - LASER_SPEED).abs() < 1e-4);
    }

    #[test]
    fn test_bomb_and_bullet_fall() {
        let bomb = spawned(ShotRequest::bomb(Vec2::new(50.0, 50.0)));
        assert_eq!(bomb.body.vel, Vec2::new(0.0, BOMB_SPEED));
        let bullet = spawned(ShotRequest::enemy_bullet(Vec2::new(50.0, 50.0)));
        assert_eq!(bullet.body.vel, Vec2::new(0.0, ENEMY_BULLET_SPEED));
        assert!(!bullet.is_player_owned());
    }

    #[test]
    fn test_reuse_clears_previous_velocity() {
        let mut p = spawned(ShotRequest::laser(Vec2::ZERO, -75.0, false));
        p.reset(ShotRequest::enemy_bullet(Vec2::ZERO));
        assert_eq!(p.body.vel.x, 0.0);
    }

    #[test]
    fn test_targeting_rules() {
        let laser = spawned(ShotRequest::laser(Vec2::ZERO, ANGLE_UP, false));
        let bomb = spawned(ShotRequest::bomb(Vec2::ZERO));
        assert!(laser.can_damage(false));
        assert!(!laser.can_damage(true));
        assert!(bomb.can_damage(true));
        assert!(!bomb.can_damage(false));
    }
}
