use std::fmt;

use crate::assets::SpriteId;

/// Failures that prevent a session from starting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitError {
    /// A required sprite could not be resolved
    InvalidAsset { sprite: SpriteId },
    /// Settings that make the simulation meaningless
    InvalidSettings { reason: String },
    /// The simulation thread could not be spawned
    Spawn { reason: String },
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAsset { sprite } => {
                write!(f, "required sprite '{}' could not be resolved", sprite.as_str())
            }
            Self::InvalidSettings { reason } => write!(f, "invalid settings: {reason}"),
            Self::Spawn { reason } => write!(f, "failed to spawn simulation thread: {reason}"),
        }
    }
}

impl std::error::Error for InitError {}

/// High score storage failures (never fatal to a session)
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    /// No location to store scores could be determined
    NoLocation,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "high score i/o error: {e}"),
            Self::Parse(e) => write!(f, "malformed high score file: {e}"),
            Self::NoLocation => write!(f, "no data directory available for high scores"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::NoLocation => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}
