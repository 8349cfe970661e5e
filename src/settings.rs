//! Host configuration
//!
//! Loaded from an optional JSON file; anything missing takes its default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::InitError;

/// Session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Display ===
    /// Screen size in pixels, fixed for the session
    pub screen_width: f32,
    pub screen_height: f32,

    // === Loop ===
    /// Target tick cadence
    pub tick_interval_ms: u64,
    /// How long `Session::stop` waits for the loop thread
    pub stop_timeout_ms: u64,

    // === Gameplay ===
    pub initial_lives: i32,
    /// Fixed RNG seed; random when absent
    pub seed: Option<u64>,
    /// Fire whenever the cooldown allows, without a fire intent
    pub auto_fire: bool,
    pub player_pool_capacity: usize,
    pub enemy_pool_capacity: usize,

    // === Storage ===
    /// High score file; defaults to the platform data directory
    pub high_score_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: 480.0,
            screen_height: 640.0,

            tick_interval_ms: 16,
            stop_timeout_ms: 500,

            initial_lives: 5,
            seed: None,
            auto_fire: true,
            player_pool_capacity: 8,
            enemy_pool_capacity: 30,

            high_score_path: None,
        }
    }
}

impl Settings {
    /// Parse settings from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from a file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    log::warn!("Malformed settings in {:?}: {}", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                log::info!("Using default settings ({:?}: {})", path, e);
                Self::default()
            }
        }
    }

    /// Reject settings the simulation cannot run with
    pub fn validate(&self) -> Result<(), InitError> {
        let invalid = |reason: &str| {
            Err(InitError::InvalidSettings {
                reason: reason.to_string(),
            })
        };

        if !(self.screen_width > 0.0 && self.screen_height > 0.0) {
            return invalid("screen dimensions must be positive");
        }
        if !self.screen_width.is_finite() || !self.screen_height.is_finite() {
            return invalid("screen dimensions must be finite");
        }
        if self.tick_interval_ms == 0 {
            return invalid("tick interval must be at least 1 ms");
        }
        if self.initial_lives <= 0 {
            return invalid("initial lives must be positive");
        }
        Ok(())
    }

    /// Where the high score lives
    pub fn high_score_file(&self) -> Option<PathBuf> {
        self.high_score_path.clone().or_else(|| {
            dirs::data_local_dir().map(|dir| dir.join("galaxing").join("highscore.json"))
        })
    }
}
