//! High score stored as a small JSON document

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::HighScoreStore;
use crate::error::StoreError;

/// On-disk record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub high_score: u32,
}

/// JSON file backed store
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: Option<PathBuf>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A store with no usable location; every call fails softly
    pub fn unavailable() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn require_path(&self) -> Result<&Path, StoreError> {
        self.path.as_deref().ok_or(StoreError::NoLocation)
    }
}

impl HighScoreStore for JsonFileStore {
    fn load_high_score(&self) -> Result<u32, StoreError> {
        let path = self.require_path()?;
        if !path.exists() {
            log::info!("No high score file at {:?}, starting fresh", path);
            return Ok(0);
        }
        let contents = fs::read_to_string(path)?;
        let record: HighScoreRecord = serde_json::from_str(&contents)?;
        log::info!("Loaded high score {} from {:?}", record.high_score, path);
        Ok(record.high_score)
    }

    fn save_high_score(&mut self, score: u32) -> Result<(), StoreError> {
        let path = self.require_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&HighScoreRecord { high_score: score })?;
        fs::write(path, json)?;
        Ok(())
    }
}
