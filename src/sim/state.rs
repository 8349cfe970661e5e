//! Game state and the session state machine
//!
//! Everything a tick reads or writes lives in `GameState`; the tick function
//! takes it by exclusive reference.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Enemy, Explosion, Owner, Player};
use super::pool::BulletPool;
use super::timer::Cooldown;
use super::wave::WaveSpawner;
use crate::Millis;
use crate::assets::SpriteSet;
use crate::consts::*;
use crate::settings::Settings;

/// Top-level mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// Nothing advances until resumed
    Paused,
    /// Lives ran out; waiting for restart or exit
    GameOver,
}

/// Things that happened during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    EnemyKilled { at: Vec2, score: u32 },
    PlayerHit { lives: i32 },
    WaveCleared { next_level: u32 },
    WaveSpawned { level: u32, enemies: usize },
    GameOver { score: u32, level: u32 },
    NewHighScore(u32),
    Restarted,
    Paused,
    Resumed,
    ExitRequested,
}

/// Timed visibility toggle for a freshly set high score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blink {
    remaining: u32,
    timer: Cooldown,
    visible: bool,
}

impl Default for Blink {
    fn default() -> Self {
        Self {
            remaining: 0,
            timer: Cooldown::new(0, BLINK_INTERVAL_MS),
            visible: true,
        }
    }
}

impl Blink {
    /// Start a full run of toggles, visible first
    pub fn start(now: Millis) -> Self {
        Self {
            remaining: BLINK_TOGGLES,
            timer: Cooldown::new(now, BLINK_INTERVAL_MS),
            visible: true,
        }
    }

    pub fn update(&mut self, now: Millis) {
        if self.remaining > 0 && self.timer.fire(now) {
            self.visible = !self.visible;
            self.remaining -= 1;
        }
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn is_running(&self) -> bool {
        self.remaining > 0
    }

    pub fn toggles_remaining(&self) -> u32 {
        self.remaining
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub rng: Pcg32,
    pub screen: Vec2,
    pub phase: GamePhase,
    pub score: u32,
    pub lives: i32,
    pub level: u32,
    /// Best score known to the session (loaded from storage, raised on game over)
    pub high_score: u32,
    /// The last game beat the previous high score
    pub new_high_score: bool,
    pub blink: Blink,
    /// Post-game-over button with focus
    pub focused_button: usize,
    /// Wave cleared, next one pending
    pub waiting_for_wave: bool,
    pub next_wave: Cooldown,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub player_bullets: BulletPool,
    pub enemy_bullets: BulletPool,
    pub explosions: Vec<Explosion>,
    pub spawner: WaveSpawner,
    pub sprites: SpriteSet,
    pub initial_lives: i32,
    pub auto_fire: bool,
    /// Ticks advanced while playing
    pub time_ticks: u64,
}

impl GameState {
    /// Create a session in `Playing` with the first wave in place
    pub fn new(settings: &Settings, sprites: SpriteSet, high_score: u32, seed: u64) -> Self {
        let screen = Vec2::new(settings.screen_width, settings.screen_height);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            screen,
            phase: GamePhase::Playing,
            score: 0,
            lives: settings.initial_lives,
            level: INITIAL_LEVEL,
            high_score,
            new_high_score: false,
            blink: Blink::default(),
            focused_button: BUTTON_RESTART,
            waiting_for_wave: false,
            next_wave: Cooldown::new(0, WAVE_SPAWN_DELAY_MS),
            player: Player::new(screen, sprites.player.aspect_ratio()),
            enemies: Vec::new(),
            player_bullets: BulletPool::new(Owner::Player, settings.player_pool_capacity),
            enemy_bullets: BulletPool::new(Owner::Enemy, settings.enemy_pool_capacity),
            explosions: Vec::new(),
            spawner: WaveSpawner::new(sprites.enemy.aspect_ratio()),
            sprites,
            initial_lives: settings.initial_lives,
            auto_fire: settings.auto_fire,
            time_ticks: 0,
        };
        state.spawn_wave(0);
        state
    }

    /// Replace the wave with a fresh formation
    pub fn spawn_wave(&mut self, now: Millis) -> usize {
        self.enemies = self
            .spawner
            .spawn(self.screen.x, self.screen.y, now, &mut self.rng);
        self.waiting_for_wave = false;
        log::debug!(
            "Wave spawned: level {} with {} enemies",
            self.level,
            self.enemies.len()
        );
        self.enemies.len()
    }

    /// Start the inter-wave delay if the wave is gone. Returns true when a
    /// transition was scheduled.
    pub fn schedule_next_wave(&mut self, now: Millis) -> bool {
        if !self.enemies.is_empty() || self.waiting_for_wave {
            return false;
        }
        self.level += 1;
        self.waiting_for_wave = true;
        self.next_wave = Cooldown::new(now, WAVE_SPAWN_DELAY_MS);
        true
    }

    /// Live enemy bullets allowed at the current level
    pub fn enemy_bullet_cap(&self) -> usize {
        (self.level + ENEMY_BULLET_CAP_BONUS) as usize
    }

    /// Enemy bullet speed at the current level
    pub fn enemy_bullet_speed(&self) -> f32 {
        let steps = self.level.saturating_sub(1) as f32;
        ENEMY_BULLET_BASE_SPEED * (1.0 + steps * ENEMY_BULLET_SPEED_STEP)
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    /// Playing -> Paused
    pub fn pause(&mut self) -> bool {
        if self.phase == GamePhase::Playing {
            self.phase = GamePhase::Paused;
            true
        } else {
            false
        }
    }

    /// Paused -> Playing
    pub fn resume(&mut self) -> bool {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Playing;
            true
        } else {
            false
        }
    }

    /// Playing -> GameOver. Raises the high score and starts the blink when
    /// the final score beats it.
    pub fn enter_game_over(&mut self, now: Millis) -> Vec<GameEvent> {
        self.phase = GamePhase::GameOver;
        self.focused_button = BUTTON_RESTART;
        self.new_high_score = false;
        self.blink = Blink::default();

        let mut events = vec![GameEvent::GameOver {
            score: self.score,
            level: self.level,
        }];
        log::info!("Game over: score {} at level {}", self.score, self.level);

        if self.score > self.high_score {
            self.high_score = self.score;
            self.new_high_score = true;
            self.blink = Blink::start(now);
            log::info!("New high score: {}", self.score);
            events.push(GameEvent::NewHighScore(self.score));
        }
        events
    }

    /// GameOver -> Playing with a fresh session; the high score carries over
    pub fn restart(&mut self, now: Millis) -> bool {
        if self.phase != GamePhase::GameOver {
            return false;
        }
        self.score = 0;
        self.lives = self.initial_lives;
        self.level = INITIAL_LEVEL;
        self.new_high_score = false;
        self.blink = Blink::default();
        self.focused_button = BUTTON_RESTART;
        self.player.reset(self.screen);
        self.player_bullets.clear();
        self.enemy_bullets.clear();
        self.enemies.clear();
        self.explosions.clear();
        self.spawn_wave(now);
        self.phase = GamePhase::Playing;
        true
    }

    /// Blink visibility as the renderer should show it
    pub fn high_score_visible(&self) -> bool {
        !self.new_high_score || self.blink.visible()
    }
}
