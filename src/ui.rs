//! UI seam: HUD counters and screen transitions
//!
//! Push-only. Menus call back into `Game` (start, restart, menu, pause,
//! sound toggle); nothing here feeds the simulation directly.

use serde::{Deserialize, Serialize};

/// Screens the shell can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Screen {
    #[default]
    MainMenu,
    Game,
    Pause,
    GameOver {
        score: u64,
        high_score: u64,
        new_high_score: bool,
    },
}

/// Receiver for HUD values and screen changes
pub trait UiSink {
    fn update_score(&mut self, score: u64);
    fn update_high_score(&mut self, high_score: u64);
    fn update_stage(&mut self, stage: u32);
    fn update_lives(&mut self, lives: i32);
    fn update_weapon_level(&mut self, level: u8);
    fn show(&mut self, screen: Screen);
}

/// Latest value of every HUD field, plus the visible screen
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub screen: Screen,
    pub score: u64,
    pub high_score: u64,
    pub stage: u32,
    pub lives: i32,
    pub weapon_level: u8,
}

impl Hud {
    /// One-line status, e.g. for a terminal
    pub fn status_line(&self) -> String {
        format!(
            "stage {} | score {} | hi {} | lives {} | weapon {}",
            self.stage, self.score, self.high_score, self.lives, self.weapon_level
        )
    }
}

impl UiSink for Hud {
    fn update_score(&mut self, score: u64) {
        self.score = score;
    }

    fn update_high_score(&mut self, high_score: u64) {
        self.high_score = high_score;
    }

    fn update_stage(&mut self, stage: u32) {
        self.stage = stage;
    }

    fn update_lives(&mut self, lives: i32) {
        self.lives = lives;
    }

    fn update_weapon_level(&mut self, level: u8) {
        self.weapon_level = level;
    }

    fn show(&mut self, screen: Screen) {
        if self.screen != screen {
            log::debug!("Screen {:?} -> {:?}", self.screen, screen);
        }
        self.screen = screen;
    }
}
