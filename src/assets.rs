//! Sprite geometry supplied by the host
//!
//! The simulation never sees pixels. The host resolves each logical sprite
//! to an opaque handle plus its intrinsic size; only the aspect ratio is
//! used, to derive entity extents.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::InitError;

/// Logical sprite identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteId {
    Player,
    /// One animation frame of the enemy sheet
    Enemy,
    PlayerBullet,
    EnemyBullet,
    Explosion,
}

impl SpriteId {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpriteId::Player => "player",
            SpriteId::Enemy => "enemy",
            SpriteId::PlayerBullet => "player_bullet",
            SpriteId::EnemyBullet => "enemy_bullet",
            SpriteId::Explosion => "explosion",
        }
    }
}

/// Opaque renderer-side handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RenderHandle(pub u32);

/// Aspect ratio used when a sprite reports a zero height
pub const DEFAULT_ASPECT_RATIO: f32 = 1.0;

/// A resolved sprite
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteInfo {
    pub handle: RenderHandle,
    pub width: f32,
    pub height: f32,
}

impl SpriteInfo {
    pub fn new(handle: RenderHandle, width: f32, height: f32) -> Self {
        Self {
            handle,
            width,
            height,
        }
    }

    /// width / height, falling back to `DEFAULT_ASPECT_RATIO` for
    /// degenerate sources
    pub fn aspect_ratio(&self) -> f32 {
        if self.height > 0.0 && self.width > 0.0 {
            self.width / self.height
        } else {
            DEFAULT_ASPECT_RATIO
        }
    }
}

/// Host collaborator that resolves sprites
pub trait AssetProvider {
    fn sprite(&self, id: SpriteId) -> Option<SpriteInfo>;
}

/// Fixed table of sprites, handy for headless hosts and tests
#[derive(Debug, Clone, Default)]
pub struct StaticAssets {
    sprites: HashMap<SpriteId, SpriteInfo>,
}

impl StaticAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: SpriteId, width: f32, height: f32) -> Self {
        let handle = RenderHandle(self.sprites.len() as u32 + 1);
        self.sprites.insert(id, SpriteInfo::new(handle, width, height));
        self
    }

    /// Sizes of the stock sprite set
    pub fn stock() -> Self {
        Self::new()
            .with(SpriteId::Player, 64.0, 64.0)
            .with(SpriteId::Enemy, 60.0, 44.0)
            .with(SpriteId::PlayerBullet, 8.0, 16.0)
            .with(SpriteId::EnemyBullet, 10.0, 10.0)
            .with(SpriteId::Explosion, 64.0, 64.0)
    }
}

impl AssetProvider for StaticAssets {
    fn sprite(&self, id: SpriteId) -> Option<SpriteInfo> {
        self.sprites.get(&id).copied()
    }
}

/// Sprites resolved once at session start
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteSet {
    pub player: SpriteInfo,
    pub enemy: SpriteInfo,
    pub player_bullet: Option<RenderHandle>,
    pub enemy_bullet: Option<RenderHandle>,
    pub explosion: Option<RenderHandle>,
}

impl SpriteSet {
    /// Resolve the sprite set. Player and enemy geometry are required;
    /// bullet and explosion sprites are optional (the renderer may draw
    /// plain rects for them).
    pub fn resolve(assets: &dyn AssetProvider) -> Result<Self, InitError> {
        let required = |id: SpriteId| {
            assets
                .sprite(id)
                .ok_or(InitError::InvalidAsset { sprite: id })
        };
        let optional = |id: SpriteId| assets.sprite(id).map(|s| s.handle);

        Ok(Self {
            player: required(SpriteId::Player)?,
            enemy: required(SpriteId::Enemy)?,
            player_bullet: optional(SpriteId::PlayerBullet),
            enemy_bullet: optional(SpriteId::EnemyBullet),
            explosion: optional(SpriteId::Explosion),
        })
    }
}
