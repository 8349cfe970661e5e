//! Simulated entities
//!
//! Each entity kind is a flat data struct. They share the `Simulate`
//! capability: a position, fixed half-extents, a bounding rect derived from
//! the two, and a per-tick update.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::timer::Cooldown;
use crate::Millis;
use crate::consts::*;

/// Per-tick context handed to entity updates
#[derive(Debug, Clone, Copy)]
pub struct TickContext {
    /// Session clock
    pub now: Millis,
    /// Screen width and height
    pub screen: Vec2,
}

/// Shared capability of everything the simulation advances
pub trait Simulate {
    fn position(&self) -> Vec2;

    fn half_extents(&self) -> Vec2;

    /// Bounding rect, always derived from position and half-extents
    fn rect(&self) -> Rect {
        Rect::from_center(self.position(), self.half_extents())
    }

    fn update(&mut self, ctx: &TickContext);
}

/// Who fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

impl Owner {
    pub fn bullet_half_extents(&self) -> Vec2 {
        match self {
            Owner::Player => Vec2::new(PLAYER_BULLET_HALF_WIDTH, PLAYER_BULLET_HALF_HEIGHT),
            Owner::Enemy => Vec2::new(ENEMY_BULLET_HALF_WIDTH, ENEMY_BULLET_HALF_HEIGHT),
        }
    }
}

/// The player's ship
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub half: Vec2,
    /// Fire-rate limiter
    pub shot: Cooldown,
}

impl Player {
    /// Create the player at its spawn point. `aspect` is the sprite's
    /// width/height; the display width is fixed.
    pub fn new(screen: Vec2, aspect: f32) -> Self {
        let aspect = if aspect > 0.0 { aspect } else { 1.0 };
        let width = PLAYER_DISPLAY_WIDTH;
        let height = width / aspect;
        Self {
            pos: Self::spawn_point(screen),
            half: Vec2::new(width / 2.0, height / 2.0),
            shot: Cooldown::ready(PLAYER_SHOT_COOLDOWN_MS),
        }
    }

    /// Horizontally centred, near the bottom of the screen
    pub fn spawn_point(screen: Vec2) -> Vec2 {
        let bottom_offset = (screen.y * PLAYER_BOTTOM_FRACTION).max(PLAYER_MIN_BOTTOM_OFFSET);
        Vec2::new(screen.x / 2.0, screen.y - bottom_offset)
    }

    /// Return to the spawn point with a ready weapon
    pub fn reset(&mut self, screen: Vec2) {
        self.pos = Self::spawn_point(screen);
        self.shot = Cooldown::ready(PLAYER_SHOT_COOLDOWN_MS);
    }

    /// Apply held move intents, then keep the ship fully on screen
    pub fn steer(&mut self, left: bool, right: bool, screen_width: f32) {
        if left {
            self.pos.x -= PLAYER_SPEED;
        }
        if right {
            self.pos.x += PLAYER_SPEED;
        }
        self.clamp_to(screen_width);
    }

    pub fn clamp_to(&mut self, screen_width: f32) {
        if self.pos.x - self.half.x < 0.0 {
            self.pos.x = self.half.x;
        }
        if self.pos.x + self.half.x > screen_width {
            self.pos.x = screen_width - self.half.x;
        }
    }

    /// Where a fresh player bullet starts
    pub fn muzzle(&self) -> Vec2 {
        let rect = self.rect();
        Vec2::new(rect.center().x, rect.top - PLAYER_BULLET_OFFSET)
    }
}

impl Simulate for Player {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn half_extents(&self) -> Vec2 {
        self.half
    }

    /// Position is driven by intents in `steer`; nothing moves on its own
    fn update(&mut self, _ctx: &TickContext) {}
}

/// A formation enemy
#[derive(Debug, Clone)]
pub struct Enemy {
    pub pos: Vec2,
    pub half: Vec2,
    pub vel_x: f32,
    /// Formation row; selects the sprite row, never physics
    pub kind: u32,
    /// Current animation frame in 0..ENEMY_ANIMATION_FRAMES
    pub frame: u32,
    pub anim: Cooldown,
    pub shot: Cooldown,
}

impl Enemy {
    /// Create an enemy whose first shot is desynchronised from the wave
    pub fn new(pos: Vec2, size: Vec2, kind: u32, now: Millis, rng: &mut impl Rng) -> Self {
        let interval = rng.random_range(ENEMY_SHOT_INTERVAL_MIN_MS..=ENEMY_SHOT_INTERVAL_MAX_MS);
        let offset = rng.random_range(0..interval);
        Self {
            pos,
            half: size / 2.0,
            vel_x: ENEMY_SPEED,
            kind,
            frame: 0,
            anim: Cooldown::new(0, ENEMY_FRAME_DELAY_MS),
            shot: Cooldown::new(now - offset, interval),
        }
    }

    /// Index into the enemy sheet: each kind owns a run of animation frames
    pub fn sheet_frame(&self) -> u32 {
        self.kind * ENEMY_ANIMATION_FRAMES + self.frame
    }

    /// Where this enemy's bullets start (bottom centre, offset downward)
    pub fn muzzle(&self) -> Vec2 {
        let rect = self.rect();
        Vec2::new(rect.center().x, rect.bottom + ENEMY_BULLET_OFFSET)
    }

    /// Mark a shot fired at `now` and pick the next interval
    pub fn reload(&mut self, now: Millis, level: u32, rng: &mut impl Rng) {
        self.shot.rearm_with(now, next_shot_interval(level, rng));
    }
}

/// Shot interval after firing: the random span shrinks as the level rises
pub fn next_shot_interval(level: u32, rng: &mut impl Rng) -> Millis {
    let span = (ENEMY_SHOT_JITTER_MS / Millis::from(level.max(1))).max(1);
    (ENEMY_SHOT_INTERVAL_MIN_MS + rng.random_range(0..span)).max(ENEMY_SHOT_FLOOR_MS)
}

impl Simulate for Enemy {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn half_extents(&self) -> Vec2 {
        self.half
    }

    fn update(&mut self, ctx: &TickContext) {
        self.pos.x += self.vel_x;

        // Reflect off the edge we're heading into
        let rect = self.rect();
        if (rect.left <= 0.0 && self.vel_x < 0.0) || (rect.right >= ctx.screen.x && self.vel_x > 0.0)
        {
            self.vel_x = -self.vel_x;
        }

        if self.anim.fire(ctx.now) {
            self.frame = (self.frame + 1) % ENEMY_ANIMATION_FRAMES;
        }
    }
}

/// A pooled projectile
#[derive(Debug, Clone)]
pub struct Bullet {
    pub pos: Vec2,
    /// Signed vertical speed per tick (negative travels up)
    pub speed: f32,
    pub owner: Owner,
    pub active: bool,
}

impl Bullet {
    pub fn inactive(owner: Owner) -> Self {
        Self {
            pos: Vec2::ZERO,
            speed: 0.0,
            owner,
            active: false,
        }
    }

    /// Entirely outside the screen in its direction of travel
    pub fn is_off_screen(&self, screen_height: f32) -> bool {
        let rect = self.rect();
        if self.speed < 0.0 {
            rect.bottom < 0.0
        } else if self.speed > 0.0 {
            rect.top > screen_height
        } else {
            rect.bottom < 0.0 || rect.top > screen_height
        }
    }
}

impl Simulate for Bullet {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn half_extents(&self) -> Vec2 {
        self.owner.bullet_half_extents()
    }

    fn update(&mut self, _ctx: &TickContext) {
        if self.active {
            self.pos.y += self.speed;
        }
    }
}

/// A kill/hit effect
#[derive(Debug, Clone)]
pub struct Explosion {
    pub pos: Vec2,
    /// Side of the source the explosion replaces
    pub size: f32,
    /// Current animation frame in 0..EXPLOSION_FRAMES
    pub frame: u32,
    pub finished: bool,
}

impl Explosion {
    /// Explosion centred on `source`, sized to its larger side
    pub fn covering(source: &Rect) -> Self {
        Self {
            pos: source.center(),
            size: source.width().max(source.height()),
            frame: 0,
            finished: false,
        }
    }
}

impl Simulate for Explosion {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn half_extents(&self) -> Vec2 {
        Vec2::splat(self.size * EXPLOSION_SCALE / 2.0)
    }

    fn update(&mut self, _ctx: &TickContext) {
        if self.finished {
            return;
        }
        if self.frame + 1 >= EXPLOSION_FRAMES {
            self.finished = true;
        } else {
            self.frame += 1;
        }
    }
}
