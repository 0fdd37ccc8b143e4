//! Per-frame simulation step
//!
//! Order within a frame is fixed: backdrop, player, firing, power-up timer,
//! pooled entities, spawns, collisions, particles, stage check. Collision
//! stages run in sequence and each one sees the releases of the ones before.

use glam::Vec2;
use rand::Rng;

use super::collision::bodies_collide;
use super::enemy::{ENEMY_SHOOT_JITTER, EnemyContext, EnemyHit, EnemyInit, EnemyKind};
use super::input::{InputSource, Key};
use super::particles::{EXPLOSION_COUNT, colors};
use super::pool::Slot;
use super::powerup::{ENEMY_DROP_TABLE, PowerUpKind, TIMED_DROP_TABLE};
use super::projectile::ProjectileKind;
use super::random::{random_int, weighted_random};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Chance per frame that a laser leaves a trail particle
const TRAIL_CHANCE: f64 = 0.3;
/// Timed power-ups enter just above the top edge
const POWERUP_SPAWN_Y: f32 = -30.0;

const GROUND_EXPLOSION_COUNT: usize = 15;
const PLAYER_DEATH_EXPLOSION_COUNT: usize = 20;
const PLAYER_HIT_EXPLOSION_COUNT: usize = 8;
const PICKUP_EXPLOSION_COUNT: usize = 8;

/// Advance the simulation by `dt` ms. Does nothing unless playing.
pub fn tick(state: &mut GameState, input: &dyn InputSource, dt: f32) {
    if state.phase != GamePhase::Playing {
        return;
    }

    state.background.update(state.stage, &mut state.rng);
    state.player.update(dt, input);

    if input.is_pressed(Key::Laser) {
        fire_laser(state);
    }
    if input.is_pressed(Key::Bomb) {
        fire_bomb(state);
    }

    state.powerup_timer += dt;
    if state.powerup_timer >= POWERUP_SPAWN_INTERVAL {
        state.powerup_timer = 0.0;
        spawn_timed_powerup(state);
    }

    advance_powerups(state, dt);
    advance_projectiles(state, dt);
    advance_enemies(state, dt);
    spawn_enemies(state, dt);

    resolve_collisions(state);

    state.particles.update(dt);
    check_stage(state);
}

fn fire_laser(state: &mut GameState) {
    let Some(volley) = state.player.fire_laser() else {
        return;
    };
    for shot in volley.shots() {
        state.projectiles.spawn(shot);
    }
    state.emit(GameEvent::LaserFired);
}

fn fire_bomb(state: &mut GameState) {
    let Some(shot) = state.player.fire_bomb() else {
        return;
    };
    state.projectiles.spawn(shot);
    state.emit(GameEvent::BombDropped);
}

fn spawn_timed_powerup(state: &mut GameState) {
    let w = state.canvas.x as i32;
    let x = random_int(&mut state.rng, 50, w - 50) as f32;
    let kind = weighted_random(&mut state.rng, &TIMED_DROP_TABLE);
    state.powerups.spawn((Vec2::new(x, POWERUP_SPAWN_Y), kind));
    log::debug!("Timed {:?} power-up at x={}", kind, x);
}

fn advance_powerups(state: &mut GameState, dt: f32) {
    let canvas = state.canvas;
    for powerup in state.powerups.iter_active_mut() {
        powerup.update(dt);
        if powerup.body.is_off_screen(canvas.x, canvas.y, OFFSCREEN_MARGIN) {
            powerup.body.active = false;
        }
    }
}

fn advance_projectiles(state: &mut GameState, dt: f32) {
    let canvas = state.canvas;
    for projectile in state.projectiles.iter_active_mut() {
        projectile.update(dt);
        if projectile.body.is_off_screen(canvas.x, canvas.y, OFFSCREEN_MARGIN) {
            projectile.body.active = false;
            continue;
        }
        if projectile.kind == ProjectileKind::Laser && state.rng.random_bool(TRAIL_CHANCE) {
            let body = projectile.body;
            let tail = Vec2::new(body.pos.x + body.size.x / 2.0, body.pos.y + body.size.y);
            state.particles.trail(&mut state.rng, tail);
        }
    }
}

fn advance_enemies(state: &mut GameState, dt: f32) {
    let canvas = state.canvas;
    let ctx = EnemyContext {
        dt,
        scroll_speed: state.background.scroll_speed,
    };
    for enemy in state.enemies.iter_active_mut() {
        if let Some(shot) = enemy.update(&ctx, &mut state.rng) {
            state.projectiles.spawn(shot);
        }
        if enemy.body.is_off_screen(canvas.x, canvas.y, ENEMY_OFFSCREEN_MARGIN) {
            enemy.body.active = false;
        }
    }
}

fn spawn_enemies(state: &mut GameState, dt: f32) {
    let requests = state.spawner.update(dt, state.stage, &mut state.rng);
    for request in requests {
        let init = EnemyInit {
            request,
            first_shot_delay: state.rng.random::<f32>() * ENEMY_SHOOT_JITTER,
            dive_target_x: state.canvas.x / 2.0,
        };
        state.enemies.spawn(init);
        log::debug!("Spawned {} at {:?}", request.kind, request.pos);
    }
}

fn resolve_collisions(state: &mut GameState) {
    let mut shots = std::mem::take(&mut state.scratch.projectiles);
    let mut targets = std::mem::take(&mut state.scratch.enemies);
    let mut pickups = std::mem::take(&mut state.scratch.powerups);
    state.projectiles.snapshot_active(&mut shots);
    state.enemies.snapshot_active(&mut targets);

    player_shots_vs_enemies(state, &shots, &targets);
    enemy_shots_vs_player(state, &shots);
    enemies_vs_player(state, &targets);

    state.powerups.snapshot_active(&mut pickups);
    powerups_vs_player(state, &pickups);

    state.scratch.projectiles = shots;
    state.scratch.enemies = targets;
    state.scratch.powerups = pickups;
}

/// What a projectile did to the enemy it struck
struct Strike {
    outcome: EnemyHit,
    center: Vec2,
    score: u64,
    kind: EnemyKind,
    ground: bool,
}

fn player_shots_vs_enemies(state: &mut GameState, shots: &[Slot], targets: &[Slot]) {
    for &shot_slot in shots {
        let Some(&shot) = state.projectiles.get(shot_slot) else {
            continue;
        };
        if !shot.is_player_owned() {
            continue;
        }

        let mut strike = None;
        for &enemy_slot in targets {
            let Some(enemy) = state.enemies.get_mut(enemy_slot) else {
                continue;
            };
            if !shot.can_damage(enemy.ground_target) || !bodies_collide(&shot.body, &enemy.body) {
                continue;
            }
            let center = enemy.body.center();
            let (score, kind, ground) = (enemy.score, enemy.kind, enemy.ground_target);
            let outcome = enemy.hit(shot.damage);
            let strike_info = Strike {
                outcome,
                center,
                score,
                kind,
                ground,
            };
            strike = Some((enemy_slot, strike_info));
            break;
        }

        let Some((enemy_slot, strike)) = strike else {
            continue;
        };
        // One projectile, one hit
        state.projectiles.release(shot_slot);

        match strike.outcome {
            EnemyHit::Destroyed => {
                state.score += strike.score;
                let count = if strike.ground {
                    GROUND_EXPLOSION_COUNT
                } else {
                    EXPLOSION_COUNT
                };
                state
                    .particles
                    .explosion(&mut state.rng, strike.center, count, colors::ORANGE);
                if state.rng.random_bool(POWERUP_DROP_CHANCE) {
                    let kind = weighted_random(&mut state.rng, &ENEMY_DROP_TABLE);
                    state.powerups.spawn((strike.center, kind));
                    log::debug!("{} dropped {:?}", strike.kind, kind);
                }
                state.enemies.release(enemy_slot);
                state.emit(GameEvent::EnemyDestroyed {
                    kind: strike.kind,
                    score: strike.score,
                });
                state.emit(GameEvent::ScoreChanged(state.score));
            }
            EnemyHit::Damaged => {
                state.particles.small_explosion(&mut state.rng, shot.body.pos);
                state.emit(GameEvent::EnemyDamaged);
            }
            EnemyHit::Ignored => {}
        }
    }
}

fn enemy_shots_vs_player(state: &mut GameState, shots: &[Slot]) {
    for &slot in shots {
        if !state.player.body.active {
            return;
        }
        let Some(shot) = state.projectiles.get(slot) else {
            continue;
        };
        if shot.kind != ProjectileKind::EnemyBullet
            || !bodies_collide(&shot.body, &state.player.body)
        {
            continue;
        }
        state.projectiles.release(slot);
        hit_player(state);
    }
}

fn enemies_vs_player(state: &mut GameState, targets: &[Slot]) {
    for &slot in targets {
        if !state.player.body.active {
            return;
        }
        let Some(enemy) = state.enemies.get(slot) else {
            continue;
        };
        // Ground targets are underneath the flight path
        if enemy.ground_target || !bodies_collide(&enemy.body, &state.player.body) {
            continue;
        }
        let center = enemy.body.center();
        state.enemies.release(slot);
        state
            .particles
            .explosion(&mut state.rng, center, EXPLOSION_COUNT, colors::ORANGE);
        state.emit(GameEvent::Collision);
        hit_player(state);
    }
}

fn powerups_vs_player(state: &mut GameState, pickups: &[Slot]) {
    for &slot in pickups {
        if !state.player.body.active {
            return;
        }
        let Some(powerup) = state.powerups.get(slot) else {
            continue;
        };
        if !bodies_collide(&powerup.body, &state.player.body) {
            continue;
        }
        let (kind, center) = (powerup.kind, powerup.body.center());
        let applied = state.player.power_up(kind);
        // Consumed even when it had no effect
        state.powerups.release(slot);
        if applied {
            apply_pickup_feedback(state, kind, center);
        }
    }
}

fn apply_pickup_feedback(state: &mut GameState, kind: PowerUpKind, center: Vec2) {
    log::debug!("Picked up {:?}", kind);
    state.particles.explosion(
        &mut state.rng,
        center,
        PICKUP_EXPLOSION_COUNT,
        kind.color(),
    );
    state.lives = state.player.health;
    state.emit(GameEvent::PowerUpCollected(kind));
    state.emit(GameEvent::LivesChanged(state.lives));
    state.emit(GameEvent::WeaponLevelChanged(state.player.weapon_level));
}

/// Shared consequence of a bullet or a ram reaching the player
fn hit_player(state: &mut GameState) {
    let outcome = state.player.hit();
    let center = state.player.body.center();
    state.emit(GameEvent::PlayerHit(outcome));

    if outcome.is_fatal() {
        state.lives = 0;
        state.particles.explosion(
            &mut state.rng,
            center,
            PLAYER_DEATH_EXPLOSION_COUNT,
            colors::GREEN,
        );
        state.emit(GameEvent::LivesChanged(0));
        state.game_over();
        return;
    }

    state.lives = state.player.health;
    state.particles.explosion(
        &mut state.rng,
        center,
        PLAYER_HIT_EXPLOSION_COUNT,
        colors::YELLOW,
    );
    state.emit(GameEvent::LivesChanged(state.lives));
    state.emit(GameEvent::WeaponLevelChanged(state.player.weapon_level));
}

/// At most one stage per frame, however far the score overshoots
fn check_stage(state: &mut GameState) {
    if state.phase != GamePhase::Playing || state.score < state.next_stage_threshold {
        return;
    }
    state.stage += 1;
    state.next_stage_threshold += STAGE_SCORE;
    log::info!(
        "Stage {} reached (next at {})",
        state.stage,
        state.next_stage_threshold
    );
    state.emit(GameEvent::StageAdvanced(state.stage));

    if state.stage % BONUS_LIFE_STAGE_INTERVAL == 0 && state.player.health < state.player.max_health
    {
        state.player.health += 1;
        state.lives = state.player.health;
        state.emit(GameEvent::LivesChanged(state.lives));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::SpawnRequest;
    use crate::sim::input::TickInput;
    use crate::sim::particles::SMALL_EXPLOSION_COUNT;
    use crate::sim::player::PlayerHit;
    use crate::sim::powerup::PowerUp;
    use crate::sim::projectile::ShotRequest;

    const DT: f32 = 16.0;

    fn playing() -> GameState {
        let mut state = GameState::with_seed(7);
        state.start();
        state.events.clear();
        state
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    fn place_enemy(state: &mut GameState, kind: EnemyKind, pos: Vec2) -> Slot {
        state.enemies.spawn(EnemyInit::new(
            SpawnRequest {
                pos,
                kind,
                can_shoot: false,
                ground_target: kind.is_ground(),
            },
            0.0,
        ))
    }

    #[test]
    fn test_no_tick_outside_playing() {
        let mut state = GameState::with_seed(7);
        let before = state.player.body.pos;
        let input = TickInput {
            left: true,
            laser: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        assert_eq!(state.player.body.pos, before);
        assert_eq!(state.projectiles.active_count(), 0);

        state.start();
        state.toggle_pause();
        tick(&mut state, &input, DT);
        assert_eq!(state.player.body.pos, before);
    }

    #[test]
    fn test_laser_key_fires_volley() {
        let mut state = playing();
        state.player.weapon_level = 4;
        let input = TickInput {
            laser: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        assert_eq!(
            state
                .projectiles
                .iter_active()
                .filter(|p| p.kind == ProjectileKind::Laser)
                .count(),
            3
        );
        assert!(state.events.contains(&GameEvent::LaserFired));

        // Still cooling down
        state.events.clear();
        tick(&mut state, &input, DT);
        assert!(!state.events.contains(&GameEvent::LaserFired));
    }

    #[test]
    fn test_bomb_key_drops_bomb() {
        let mut state = playing();
        let input = TickInput {
            bomb: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        assert_eq!(
            state
                .projectiles
                .iter_active()
                .filter(|p| p.kind == ProjectileKind::Bomb)
                .count(),
            1
        );
        assert!(state.events.contains(&GameEvent::BombDropped));
    }

    #[test]
    fn test_destroyed_enemy_sometimes_drops_power_up_at_its_centre() {
        let droppable: Vec<PowerUpKind> = ENEMY_DROP_TABLE.iter().map(|(kind, _)| *kind).collect();
        let mut drops = 0;
        for seed in 0..300 {
            let mut state = GameState::with_seed(seed);
            state.start();
            let enemy = place_enemy(&mut state, EnemyKind::Straight, Vec2::new(300.0, 200.0));
            let center = state.enemies.get(enemy).expect("placed").body.center();
            state
                .projectiles
                .spawn(ShotRequest::laser(Vec2::new(312.0, 215.0), -90.0, false));

            resolve_collisions(&mut state);

            assert!(state.enemies.get(enemy).is_none());
            let dropped: Vec<&PowerUp> = state.powerups.iter_active().collect();
            match dropped.as_slice() {
                [] => {}
                [powerup] => {
                    drops += 1;
                    assert_eq!(powerup.body.pos, center);
                    assert!(droppable.contains(&powerup.kind));
                }
                more => panic!("one kill dropped {} power-ups", more.len()),
            }
        }
        // Roughly one kill in ten
        assert!((10..=60).contains(&drops), "{drops} drops in 300 kills");
    }

    #[test]
    fn test_damaging_hit_sparks_at_projectile() {
        let mut state = playing();
        state.particles.clear();
        let enemy = place_enemy(&mut state, EnemyKind::Curve, Vec2::new(300.0, 200.0));
        let shot = state
            .projectiles
            .spawn(ShotRequest::laser(Vec2::new(315.0, 215.0), -90.0, false));
        let shot_pos = state.projectiles.get(shot).expect("spawned").body.pos;
        let enemy_center = state.enemies.get(enemy).expect("placed").body.center();
        assert_ne!(shot_pos, enemy_center);

        resolve_collisions(&mut state);

        let survivor = state.enemies.get(enemy).expect("curve takes two hits");
        assert_eq!(survivor.health, 1);
        assert!(state.projectiles.get(shot).is_none());
        assert_eq!(state.score, 0);
        assert!(state.events.contains(&GameEvent::EnemyDamaged));

        let sparks: Vec<_> = state.particles.iter().collect();
        assert_eq!(sparks.len(), SMALL_EXPLOSION_COUNT);
        assert!(sparks.iter().all(|p| p.color == colors::YELLOW && p.body.pos == shot_pos));
        assert_eq!(state.powerups.active_count(), 0);
    }

    #[test]
    fn test_laser_destroys_air_enemy_once() {
        let mut state = playing();
        let enemy = place_enemy(&mut state, EnemyKind::Straight, Vec2::new(300.0, 200.0));
        // Two lasers stacked on the same enemy
        state
            .projectiles
            .spawn(ShotRequest::laser(Vec2::new(312.0, 215.0), -90.0, false));
        state
            .projectiles
            .spawn(ShotRequest::laser(Vec2::new(312.0, 216.0), -90.0, false));

        tick(&mut state, &idle(), DT);

        assert!(state.enemies.get(enemy).is_none());
        assert_eq!(state.score, 100);
        // The second laser had nothing left to hit
        assert_eq!(
            state
                .projectiles
                .iter_active()
                .filter(|p| p.kind == ProjectileKind::Laser)
                .count(),
            1
        );
        assert!(state.events.contains(&GameEvent::EnemyDestroyed {
            kind: EnemyKind::Straight,
            score: 100,
        }));
    }

    #[test]
    fn test_laser_passes_over_ground_targets() {
        let mut state = playing();
        let tank = place_enemy(&mut state, EnemyKind::Tank, Vec2::new(300.0, 200.0));
        let shot = state
            .projectiles
            .spawn(ShotRequest::laser(Vec2::new(316.0, 215.0), -90.0, false));
        tick(&mut state, &idle(), DT);
        assert!(state.enemies.get(tank).is_some());
        assert!(state.projectiles.get(shot).is_some());
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_bomb_damages_ground_target() {
        let mut state = playing();
        let radar = place_enemy(&mut state, EnemyKind::Radar, Vec2::new(300.0, 200.0));
        state.projectiles.spawn(ShotRequest::bomb(Vec2::new(320.0, 205.0)));
        tick(&mut state, &idle(), DT);

        let radar = state.enemies.get(radar).expect("radar survives one bomb");
        assert_eq!(radar.health, 2);
        assert!(state.events.contains(&GameEvent::EnemyDamaged));
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_enemy_bullet_hits_player() {
        let mut state = playing();
        let center = state.player.body.center();
        state
            .projectiles
            .spawn(ShotRequest::enemy_bullet(center - Vec2::new(0.0, 10.0)));
        tick(&mut state, &idle(), DT);

        assert_eq!(state.player.health, 2);
        assert_eq!(state.lives, 2);
        assert!(state.player.invincible);
        assert!(state.events.contains(&GameEvent::PlayerHit(PlayerHit::Damaged)));
        assert_eq!(
            state
                .projectiles
                .iter_active()
                .filter(|p| p.kind == ProjectileKind::EnemyBullet)
                .count(),
            0
        );
    }

    #[test]
    fn test_ramming_enemy_is_released() {
        let mut state = playing();
        let pos = state.player.body.pos;
        let enemy = place_enemy(&mut state, EnemyKind::Straight, pos);
        tick(&mut state, &idle(), DT);
        assert!(state.enemies.get(enemy).is_none());
        assert!(state.events.contains(&GameEvent::Collision));
        assert_eq!(state.player.health, 2);
        // No score for a ram
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_ground_target_does_not_ram() {
        let mut state = playing();
        let pos = state.player.body.pos;
        let tank = place_enemy(&mut state, EnemyKind::Tank, pos);
        tick(&mut state, &idle(), DT);
        assert!(state.enemies.get(tank).is_some());
        assert_eq!(state.player.health, 3);
    }

    #[test]
    fn test_capped_powerup_is_still_consumed() {
        let mut state = playing();
        assert_eq!(state.player.health, state.player.max_health);
        let pos = state.player.body.pos;
        let slot = state.powerups.spawn((pos, PowerUpKind::Life));
        tick(&mut state, &idle(), DT);
        assert!(state.powerups.get(slot).is_none());
        assert!(
            !state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::PowerUpCollected(_)))
        );
    }

    #[test]
    fn test_weapon_powerup_applies() {
        let mut state = playing();
        let pos = state.player.body.pos;
        state.powerups.spawn((pos, PowerUpKind::Weapon));
        tick(&mut state, &idle(), DT);
        assert_eq!(state.player.weapon_level, 2);
        assert!(state
            .events
            .contains(&GameEvent::PowerUpCollected(PowerUpKind::Weapon)));
        assert!(state.events.contains(&GameEvent::WeaponLevelChanged(2)));
    }

    #[test]
    fn test_death_ends_run() {
        let mut state = playing();
        state.high_score = 50;
        state.score = 300;
        state.player.health = 1;
        let center = state.player.body.center();
        state
            .projectiles
            .spawn(ShotRequest::enemy_bullet(center - Vec2::new(0.0, 10.0)));
        tick(&mut state, &idle(), DT);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.lives, 0);
        assert_eq!(state.high_score, 300);
        assert!(state.events.contains(&GameEvent::GameOver {
            score: 300,
            high_score: 300,
            new_high_score: true,
        }));

        // Frozen from here on
        let pos = state.player.body.pos;
        tick(&mut state, &idle(), DT);
        assert_eq!(state.player.body.pos, pos);
    }

    #[test]
    fn test_stage_advances_one_step_per_frame() {
        let mut state = playing();
        state.score = 35_000;
        tick(&mut state, &idle(), DT);
        assert_eq!(state.stage, 2);
        assert_eq!(state.next_stage_threshold, 20_000);
        tick(&mut state, &idle(), DT);
        assert_eq!(state.stage, 3);
        assert_eq!(state.next_stage_threshold, 30_000);
    }

    #[test]
    fn test_every_third_stage_grants_life() {
        let mut state = playing();
        state.stage = 2;
        state.next_stage_threshold = 20_000;
        state.score = 20_000;
        state.player.health = 2;
        tick(&mut state, &idle(), DT);
        assert_eq!(state.stage, 3);
        assert_eq!(state.player.health, 3);
        assert_eq!(state.lives, 3);
    }

    #[test]
    fn test_off_screen_entities_recycled() {
        let mut state = playing();
        let laser = state
            .projectiles
            .spawn(ShotRequest::laser(Vec2::new(100.0, -45.0), -90.0, false));
        let enemy = place_enemy(&mut state, EnemyKind::Straight, Vec2::new(100.0, 698.0));
        let powerup = state
            .powerups
            .spawn((Vec2::new(100.0, 649.0), PowerUpKind::Bomb));
        tick(&mut state, &idle(), DT);
        assert!(state.projectiles.get(laser).is_none());
        assert!(state.enemies.get(enemy).is_none());
        assert!(state.powerups.get(powerup).is_none());
    }

    #[test]
    fn test_timed_powerup_every_fifteen_seconds() {
        let mut state = playing();
        state.powerup_timer = POWERUP_SPAWN_INTERVAL - DT;
        tick(&mut state, &idle(), DT);
        assert_eq!(state.powerup_timer, 0.0);
        let drop = state.powerups.iter_active().next().expect("timed drop");
        assert!(drop.body.pos.x >= 50.0 && drop.body.pos.x < 750.0);
    }

    #[test]
    fn test_spawner_feeds_enemy_pool() {
        let mut state = playing();
        for _ in 0..94 {
            tick(&mut state, &idle(), DT);
        }
        assert!(state.enemies.active_count() >= 1);
    }

    #[test]
    fn test_long_run_keeps_pools_bounded() {
        let mut state = playing();
        let autopilot = crate::sim::input::Autopilot;
        for _ in 0..5_000 {
            if state.phase != GamePhase::Playing {
                state.restart();
            }
            let input = autopilot.input_for(&state);
            tick(&mut state, &input, DT);
            state.events.clear();
        }
        assert!(state.enemies.capacity() < 200);
        assert!(state.projectiles.capacity() < 1_000);
    }
}
