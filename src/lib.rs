//! Galaxing - a vertical-scrolling formation shooter
//!
//! Core modules:
//! - `sim`: Fixed-timestep simulation (entities, pooling, waves, combat, game state)
//! - `session`: Threaded simulation loop with frame pacing
//! - `platform`: Input intents and the session clock
//! - `persistence`: High score storage
//! - `assets`: Sprite geometry supplied by the host

pub mod assets;
pub mod error;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use assets::{AssetProvider, RenderHandle, SpriteId, SpriteInfo};
pub use error::{InitError, StoreError};
pub use session::{FrameSink, Session};
pub use settings::Settings;

/// Milliseconds on the session clock
pub type Millis = i64;

/// Game configuration constants
pub mod consts {
    use super::Millis;

    /// Points awarded per enemy destroyed
    pub const KILL_REWARD: u32 = 10;
    /// Starting level
    pub const INITIAL_LEVEL: u32 = 1;

    /// Player sprite is always drawn this wide; height follows the aspect ratio
    pub const PLAYER_DISPLAY_WIDTH: f32 = 60.0;
    /// Minimum distance between the player's centre and the bottom edge
    pub const PLAYER_MIN_BOTTOM_OFFSET: f32 = 60.0;
    /// Fraction of the screen height kept below the player
    pub const PLAYER_BOTTOM_FRACTION: f32 = 0.15;
    /// Horizontal pixels per tick while a move intent is held
    pub const PLAYER_SPEED: f32 = 20.0;
    pub const PLAYER_SHOT_COOLDOWN_MS: Millis = 500;
    /// Player bullets spawn this far above the player's top edge
    pub const PLAYER_BULLET_OFFSET: f32 = 20.0;
    pub const PLAYER_BULLET_SPEED: f32 = -20.0;
    pub const PLAYER_BULLET_HALF_WIDTH: f32 = 4.0;
    pub const PLAYER_BULLET_HALF_HEIGHT: f32 = 8.0;

    /// Formation rows, top row first
    pub const FORMATION_ROWS: [usize; 3] = [5, 3, 1];
    /// Enemy width = screen width / ENEMY_COLUMNS * ENEMY_WIDTH_SCALE
    pub const ENEMY_COLUMNS: f32 = 10.0;
    pub const ENEMY_WIDTH_SCALE: f32 = 0.8;
    pub const ENEMY_H_SPACING: f32 = 0.25;
    pub const ENEMY_V_SPACING: f32 = 0.3;
    pub const FORMATION_TOP_MARGIN: f32 = 0.05;
    pub const ENEMY_SPEED: f32 = 3.0;
    pub const ENEMY_ANIMATION_FRAMES: u32 = 2;
    pub const ENEMY_FRAME_DELAY_MS: Millis = 200;
    /// Fallback enemy frame aspect when the sheet reports nothing usable (60x44)
    pub const ENEMY_FRAME_ASPECT: f32 = 60.0 / 44.0;

    pub const ENEMY_SHOT_INTERVAL_MIN_MS: Millis = 1500;
    pub const ENEMY_SHOT_INTERVAL_MAX_MS: Millis = 4000;
    /// Re-rolled intervals add up to this many ms divided by the level
    pub const ENEMY_SHOT_JITTER_MS: Millis = 25_000;
    /// No enemy ever fires more often than this
    pub const ENEMY_SHOT_FLOOR_MS: Millis = 500;
    pub const ENEMY_BULLET_BASE_SPEED: f32 = 8.0;
    /// Per-level multiplier applied to the enemy bullet speed
    pub const ENEMY_BULLET_SPEED_STEP: f32 = 0.10;
    /// Enemy bullets spawn centred this far below the enemy's bottom edge
    pub const ENEMY_BULLET_OFFSET: f32 = 10.0;
    pub const ENEMY_BULLET_HALF_WIDTH: f32 = 5.0;
    pub const ENEMY_BULLET_HALF_HEIGHT: f32 = 5.0;
    /// Live enemy bullets are capped at level + ENEMY_BULLET_CAP_BONUS
    pub const ENEMY_BULLET_CAP_BONUS: u32 = 2;

    pub const EXPLOSION_FRAMES: u32 = 16;
    /// Explosion rect side relative to the source it replaces
    pub const EXPLOSION_SCALE: f32 = 1.2;

    /// Delay between clearing a wave and spawning the next
    pub const WAVE_SPAWN_DELAY_MS: Millis = 3000;

    pub const BLINK_INTERVAL_MS: Millis = 300;
    /// 3 full on/off cycles
    pub const BLINK_TOGGLES: u32 = 6;

    /// Post-game-over buttons: 0 = restart, 1 = exit
    pub const BUTTON_RESTART: usize = 0;
    pub const BUTTON_EXIT: usize = 1;
}
