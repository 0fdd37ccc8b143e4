//! Frame driver
//!
//! Owns the simulation and its collaborators. One `frame` call per display
//! refresh: clamp the delta, handle the pause key, tick, route events to
//! audio/HUD/storage, then hand the renderer a fresh snapshot. Rendering
//! happens every frame, paused or not.

use crate::audio::{AudioManager, SoundEffect};
use crate::clamp_frame_delta;
use crate::highscores::HighScoreStore;
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, InputSource, Key, PlayerHit, tick};
use crate::snapshot::{FrameSnapshot, Renderer};
use crate::ui::{Hud, Screen, UiSink};

pub struct Game<U: UiSink = Hud> {
    state: GameState,
    audio: AudioManager,
    ui: U,
    store: Box<dyn HighScoreStore>,
    snapshot: FrameSnapshot,
    last_timestamp: Option<f64>,
    /// Pause key state last frame, for edge detection
    pause_held: bool,
}

impl<U: UiSink> Game<U> {
    pub fn new(settings: &Settings, mut store: Box<dyn HighScoreStore>, ui: U, mut audio: AudioManager) -> Self {
        let seed = settings.resolve_seed();
        log::info!(
            "New game {}x{} (seed {})",
            settings.canvas_width,
            settings.canvas_height,
            seed
        );

        let mut state = GameState::new(settings.canvas_width, settings.canvas_height, seed);
        state.high_score = store.load_or_default();

        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_sound_enabled(settings.sound_enabled);

        let mut game = Self {
            state,
            audio,
            ui,
            store,
            snapshot: FrameSnapshot::default(),
            last_timestamp: None,
            pause_held: false,
        };
        game.ui.update_high_score(game.state.high_score);
        game.ui.show(Screen::MainMenu);
        game
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn audio(&self) -> &AudioManager {
        &self.audio
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Run one display frame at `timestamp_ms`
    pub fn frame(&mut self, timestamp_ms: f64, input: &dyn InputSource, renderer: &mut dyn Renderer) {
        let dt = match self.last_timestamp {
            Some(last) => (timestamp_ms - last).max(0.0) as f32,
            None => 0.0,
        };
        self.last_timestamp = Some(timestamp_ms);
        let dt = clamp_frame_delta(dt);

        let pause = input.is_pressed(Key::Pause);
        if pause && !self.pause_held {
            self.state.toggle_pause();
        }
        self.pause_held = pause;

        tick(&mut self.state, input, dt);
        self.dispatch_events();

        self.snapshot.capture(&self.state);
        renderer.render(&self.snapshot);
    }

    // === UI-initiated transitions ===

    pub fn start(&mut self) {
        self.state.start();
        self.dispatch_events();
    }

    pub fn restart(&mut self) {
        self.state.restart();
        self.dispatch_events();
    }

    pub fn return_to_menu(&mut self) {
        self.state.return_to_menu();
        self.dispatch_events();
    }

    pub fn toggle_pause(&mut self) {
        self.state.toggle_pause();
        self.dispatch_events();
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        log::info!("Sound {}", if enabled { "on" } else { "off" });
        self.audio.set_sound_enabled(enabled);
    }

    fn dispatch_events(&mut self) {
        for event in self.state.events.drain(..) {
            route_event(event, &mut self.audio, &mut self.ui, self.store.as_mut());
        }
    }
}

fn route_event(
    event: GameEvent,
    audio: &mut AudioManager,
    ui: &mut dyn UiSink,
    store: &mut dyn HighScoreStore,
) {
    match event {
        GameEvent::PhaseChanged(phase) => match phase {
            GamePhase::Menu => ui.show(Screen::MainMenu),
            GamePhase::Playing => ui.show(Screen::Game),
            GamePhase::Paused => ui.show(Screen::Pause),
            // Shown with the final numbers by `GameOver`
            GamePhase::GameOver => {}
        },
        GameEvent::LaserFired => audio.play(SoundEffect::Laser),
        GameEvent::BombDropped => audio.play(SoundEffect::Bomb),
        GameEvent::EnemyDamaged => audio.play(SoundEffect::Hit),
        GameEvent::EnemyDestroyed { .. } | GameEvent::Collision => {
            audio.play(SoundEffect::Explosion)
        }
        GameEvent::PlayerHit(PlayerHit::Died) => {}
        GameEvent::PlayerHit(_) => audio.play(SoundEffect::Hit),
        GameEvent::PowerUpCollected(_) => audio.play(SoundEffect::PowerUp),
        GameEvent::ScoreChanged(score) => ui.update_score(score),
        GameEvent::StageChanged(stage) => ui.update_stage(stage),
        GameEvent::StageAdvanced(stage) => {
            audio.play(SoundEffect::PowerUp);
            ui.update_stage(stage);
        }
        GameEvent::LivesChanged(lives) => ui.update_lives(lives),
        GameEvent::WeaponLevelChanged(level) => ui.update_weapon_level(level),
        GameEvent::HighScoreChanged(high_score) => {
            ui.update_high_score(high_score);
            if let Err(err) = store.save(high_score) {
                log::warn!("Could not save high score: {err}");
            }
        }
        GameEvent::GameOver {
            score,
            high_score,
            new_high_score,
        } => {
            audio.play(SoundEffect::GameOver);
            ui.show(Screen::GameOver {
                score,
                high_score,
                new_high_score,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::{MemoryStore, StorageError};
    use crate::sim::{ShotRequest, TickInput};
    use crate::snapshot::LastFrame;
    use glam::Vec2;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Store the test can inspect after handing it to the game
    #[derive(Clone, Default)]
    struct SharedStore(Rc<RefCell<MemoryStore>>);

    impl HighScoreStore for SharedStore {
        fn load(&mut self) -> Result<u64, StorageError> {
            self.0.borrow_mut().load()
        }

        fn save(&mut self, score: u64) -> Result<(), StorageError> {
            self.0.borrow_mut().save(score)
        }
    }

    fn game_with(store: SharedStore) -> Game {
        let settings = Settings {
            seed: Some(21),
            ..Default::default()
        };
        Game::new(&settings, Box::new(store), Hud::default(), AudioManager::default())
    }

    fn game() -> Game {
        game_with(SharedStore::default())
    }

    #[test]
    fn test_starts_on_menu_with_loaded_high_score() {
        let store = SharedStore::default();
        store.0.borrow_mut().high_score = 777;
        let game = game_with(store);
        assert_eq!(game.phase(), GamePhase::Menu);
        assert_eq!(game.state().high_score, 777);
        assert_eq!(game.ui().high_score, 777);
        assert_eq!(game.ui().screen, Screen::MainMenu);
    }

    #[test]
    fn test_start_updates_hud() {
        let mut game = game();
        game.start();
        assert_eq!(game.ui().screen, Screen::Game);
        assert_eq!(game.ui().stage, 1);
        assert_eq!(game.ui().lives, 3);
        assert_eq!(game.ui().weapon_level, 1);
    }

    #[test]
    fn test_long_gap_counts_as_one_frame() {
        let mut game = game();
        game.start();
        let mut renderer = LastFrame::default();
        let left = TickInput {
            left: true,
            ..Default::default()
        };
        game.frame(1000.0, &left, &mut renderer);
        let x0 = game.state().player.body.pos.x;
        game.frame(6000.0, &left, &mut renderer);
        assert_eq!(game.state().player.body.pos.x, x0 - 5.0);
    }

    #[test]
    fn test_held_pause_key_toggles_once() {
        let mut game = game();
        game.start();
        let mut renderer = LastFrame::default();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        for i in 0..5 {
            game.frame(i as f64 * 16.0, &pause, &mut renderer);
        }
        assert_eq!(game.phase(), GamePhase::Paused);
        assert_eq!(game.ui().screen, Screen::Pause);

        game.frame(80.0, &TickInput::default(), &mut renderer);
        game.frame(96.0, &pause, &mut renderer);
        assert_eq!(game.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_paused_frames_still_render_frozen_state() {
        let mut game = game();
        game.start();
        game.toggle_pause();
        let mut renderer = LastFrame::default();
        let left = TickInput {
            left: true,
            ..Default::default()
        };
        let before = game.state().player.body.pos;
        for i in 0..10 {
            game.frame(i as f64 * 16.0, &left, &mut renderer);
        }
        assert_eq!(renderer.frames_rendered, 10);
        assert_eq!(renderer.frame.phase, GamePhase::Paused);
        assert_eq!(renderer.frame.player.pos, before);
    }

    #[test]
    fn test_new_high_score_is_persisted() {
        let store = SharedStore::default();
        store.0.borrow_mut().high_score = 100;
        let mut game = game_with(store.clone());
        game.start();

        game.state.score = 2_500;
        game.state.player.health = 1;
        let center = game.state.player.body.center();
        game.state
            .projectiles
            .spawn(ShotRequest::enemy_bullet(center - Vec2::new(0.0, 10.0)));

        let mut renderer = LastFrame::default();
        game.frame(0.0, &TickInput::default(), &mut renderer);

        assert_eq!(game.phase(), GamePhase::GameOver);
        assert_eq!(store.0.borrow().high_score, 2_500);
        assert_eq!(store.0.borrow().saves, 1);
        assert_eq!(
            game.ui().screen,
            Screen::GameOver {
                score: 2_500,
                high_score: 2_500,
                new_high_score: true,
            }
        );
    }

    #[test]
    fn test_restart_and_menu_from_game_over() {
        let mut game = game();
        game.start();
        game.state.game_over();
        game.restart();
        assert_eq!(game.phase(), GamePhase::Playing);
        game.return_to_menu();
        assert_eq!(game.phase(), GamePhase::Menu);
        assert_eq!(game.ui().screen, Screen::MainMenu);
    }

    #[test]
    fn test_sound_toggle() {
        let mut game = game();
        game.set_sound_enabled(false);
        assert!(!game.audio().is_sound_enabled());
        game.set_sound_enabled(true);
        assert!(game.audio().is_sound_enabled());
    }
}
