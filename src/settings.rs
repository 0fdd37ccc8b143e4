//! Game settings and preferences
//!
//! Stored as JSON next to the high score. Every field has a default, so a
//! partial or missing file still loads.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::highscores::StorageError;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Play field size in px
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Fixed RNG seed; `None` picks one per launch
    pub seed: Option<u64>,

    // === Audio ===
    pub sound_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    /// High score file
    pub high_score_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            seed: None,
            sound_enabled: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            high_score_path: PathBuf::from("sky-raider-highscore.json"),
        }
    }
}

impl Settings {
    /// Load from `path`, falling back to defaults on any problem
    pub fn load_from(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("Using default settings ({}: {err})", path.display());
                return Self::default();
            }
        };
        match serde_json::from_str::<Settings>(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings.sanitized()
            }
            Err(err) => {
                log::warn!("Ignoring malformed settings in {}: {err}", path.display());
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| StorageError::format(path, e))?;
        fs::write(path, json).map_err(|e| StorageError::io(path, e))?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Clamp volumes and reject degenerate canvas sizes
    fn sanitized(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        // Spawn lanes need at least 100 px of margin on each side
        let usable = |v: f32, min: f32| v.is_finite() && v > min;
        if !usable(self.canvas_width, 200.0) || !usable(self.canvas_height, 0.0) {
            log::warn!(
                "Canvas {}x{} too small, using {}x{}",
                self.canvas_width,
                self.canvas_height,
                CANVAS_WIDTH,
                CANVAS_HEIGHT
            );
            self.canvas_width = CANVAS_WIDTH;
            self.canvas_height = CANVAS_HEIGHT;
        }
        self
    }

    /// Seed to use for this launch
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}
