//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given the same seed and the same inputs
//! every frame, a run replays identically:
//! - Seeded RNG only, owned by `GameState`
//! - Pools iterate in backing order
//! - No rendering, audio or platform dependencies

pub mod background;
pub mod collision;
pub mod enemy;
pub mod entity;
pub mod input;
pub mod particles;
pub mod pattern;
pub mod player;
pub mod pool;
pub mod powerup;
pub mod projectile;
pub mod random;
pub mod spawner;
pub mod state;
pub mod tick;

pub use background::Background;
pub use collision::{Circle, Rect, aabb_overlap, bodies_collide, circle_overlap, point_in_rect};
pub use enemy::{Enemy, EnemyContext, EnemyHit, EnemyInit, EnemyKind, ParseKindError, SpawnRequest};
pub use entity::Body;
pub use input::{Autopilot, InputSource, Key, TickInput};
pub use particles::{Particle, ParticleSystem};
pub use pattern::{DivePhase, MovementPattern};
pub use player::{Player, PlayerHit, Volley};
pub use pool::{Pool, Poolable, Slot};
pub use powerup::{PowerUp, PowerUpKind};
pub use projectile::{Projectile, ProjectileKind, ShotRequest};
pub use random::GameRng;
pub use spawner::EnemySpawner;
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::tick;
