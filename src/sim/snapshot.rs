//! Read-only frame view handed to the renderer

use serde::{Deserialize, Serialize};

use super::entity::{Owner, Simulate};
use super::rect::Rect;
use super::state::{GamePhase, GameState};
use crate::assets::RenderHandle;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteView {
    pub rect: Rect,
    pub sprite: RenderHandle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyView {
    pub rect: Rect,
    pub sprite: RenderHandle,
    /// Frame within the enemy sheet (kind and animation combined)
    pub frame: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletView {
    pub rect: Rect,
    pub owner: Owner,
    pub sprite: Option<RenderHandle>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplosionView {
    pub rect: Rect,
    pub frame: u32,
    pub sprite: Option<RenderHandle>,
}

/// HUD scalars
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u32,
    pub lives: i32,
    pub level: u32,
    pub high_score: u32,
    pub game_over: bool,
    pub new_high_score: bool,
    /// Whether the high score line should be drawn this frame
    pub blink_visible: bool,
    pub paused: bool,
    pub waiting_for_wave: bool,
    /// 0 = restart, 1 = exit
    pub focused_button: usize,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub player: SpriteView,
    pub enemies: Vec<EnemyView>,
    pub bullets: Vec<BulletView>,
    pub explosions: Vec<ExplosionView>,
    pub hud: Hud,
}

impl FrameSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let sprites = &state.sprites;

        let enemies = state
            .enemies
            .iter()
            .map(|e| EnemyView {
                rect: e.rect(),
                sprite: sprites.enemy.handle,
                frame: e.sheet_frame(),
            })
            .collect();

        let bullets = state
            .player_bullets
            .active_iter()
            .map(|b| (b, sprites.player_bullet))
            .chain(
                state
                    .enemy_bullets
                    .active_iter()
                    .map(|b| (b, sprites.enemy_bullet)),
            )
            .map(|(b, sprite)| BulletView {
                rect: b.rect(),
                owner: b.owner,
                sprite,
            })
            .collect();

        let explosions = state
            .explosions
            .iter()
            .filter(|x| !x.finished)
            .map(|x| ExplosionView {
                rect: x.rect(),
                frame: x.frame,
                sprite: sprites.explosion,
            })
            .collect();

        Self {
            tick: state.time_ticks,
            player: SpriteView {
                rect: state.player.rect(),
                sprite: sprites.player.handle,
            },
            enemies,
            bullets,
            explosions,
            hud: Hud {
                score: state.score,
                lives: state.lives,
                level: state.level,
                high_score: state.high_score,
                game_over: state.phase == GamePhase::GameOver,
                new_high_score: state.new_high_score,
                blink_visible: state.high_score_visible(),
                paused: state.phase == GamePhase::Paused,
                waiting_for_wave: state.waiting_for_wave,
                focused_button: state.focused_button,
            },
        }
    }
}
