//! High score persistence
//!
//! The session loads the best score once at start and saves it again only
//! when a game beats it. Storage failures are never fatal: a failed load
//! counts as "no previous high score" and saves are best-effort.

pub mod json;

pub use json::JsonFileStore;

use crate::error::StoreError;

/// Host collaborator that keeps the best score between sessions
pub trait HighScoreStore: Send {
    fn load_high_score(&self) -> Result<u32, StoreError>;

    fn save_high_score(&mut self, score: u32) -> Result<(), StoreError>;
}

/// Load with the session's failure policy applied
pub fn load_or_zero(store: &dyn HighScoreStore) -> u32 {
    match store.load_high_score() {
        Ok(score) => score,
        Err(e) => {
            log::warn!("Could not load high score, starting from 0: {}", e);
            0
        }
    }
}

/// Save with the session's failure policy applied
pub fn save_best_effort(store: &mut dyn HighScoreStore, score: u32) {
    match store.save_high_score(score) {
        Ok(()) => log::info!("High score {} saved", score),
        Err(e) => log::warn!("Could not save high score {}: {}", score, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Volatile store
    #[derive(Debug, Clone, Default)]
    struct MemoryStore {
        score: u32,
        saves: u32,
    }

    impl MemoryStore {
        fn new(score: u32) -> Self {
            Self { score, saves: 0 }
        }
    }

    impl HighScoreStore for MemoryStore {
        fn load_high_score(&self) -> Result<u32, StoreError> {
            Ok(self.score)
        }

        fn save_high_score(&mut self, score: u32) -> Result<(), StoreError> {
            self.score = score;
            self.saves += 1;
            Ok(())
        }
    }

    struct BrokenStore;

    impl HighScoreStore for BrokenStore {
        fn load_high_score(&self) -> Result<u32, StoreError> {
            Err(StoreError::NoLocation)
        }

        fn save_high_score(&mut self, _score: u32) -> Result<(), StoreError> {
            Err(StoreError::NoLocation)
        }
    }

    #[test]
    fn test_failed_load_is_zero() {
        assert_eq!(load_or_zero(&BrokenStore), 0);
    }

    #[test]
    fn test_failed_save_is_swallowed() {
        save_best_effort(&mut BrokenStore, 100);
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new(30);
        assert_eq!(load_or_zero(&store), 30);
        save_best_effort(&mut store, 70);
        assert_eq!(store.score, 70);
        assert_eq!(store.saves, 1);
    }
}
