//! High score persistence
//!
//! A single best score, loaded at startup and saved whenever a run beats it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reading or writing a persisted file
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed data in {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn format(path: &Path, source: serde_json::Error) -> Self {
        StorageError::Format {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Where the high score lives
pub trait HighScoreStore {
    fn load(&mut self) -> Result<u64, StorageError>;
    fn save(&mut self, score: u64) -> Result<(), StorageError>;

    /// `load`, treating any failure as "no high score yet"
    fn load_or_default(&mut self) -> u64 {
        match self.load() {
            Ok(score) => score,
            Err(err) => {
                log::warn!("Could not load high score, starting from 0: {err}");
                0
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct HighScoreRecord {
    high_score: u64,
}

/// JSON file on disk. A missing file reads as 0.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for JsonFileStore {
    fn load(&mut self) -> Result<u64, StorageError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::info!("No high score at {}, starting fresh", self.path.display());
                return Ok(0);
            }
            Err(err) => return Err(StorageError::io(&self.path, err)),
        };
        let record: HighScoreRecord =
            serde_json::from_str(&json).map_err(|e| StorageError::format(&self.path, e))?;
        log::info!("Loaded high score {}", record.high_score);
        Ok(record.high_score)
    }

    fn save(&mut self, score: u64) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| StorageError::io(dir, e))?;
        }
        let json = serde_json::to_string_pretty(&HighScoreRecord { high_score: score })
            .map_err(|e| StorageError::format(&self.path, e))?;
        fs::write(&self.path, json).map_err(|e| StorageError::io(&self.path, e))?;
        log::info!("High score {} saved", score);
        Ok(())
    }
}

/// In-memory store for tests and sessions without a disk
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub high_score: u64,
    pub saves: u32,
}

impl HighScoreStore for MemoryStore {
    fn load(&mut self) -> Result<u64, StorageError> {
        Ok(self.high_score)
    }

    fn save(&mut self, score: u64) -> Result<(), StorageError> {
        self.high_score = score;
        self.saves += 1;
        Ok(())
    }
}
