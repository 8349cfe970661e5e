//! Formation wave generation
//!
//! A wave is a stack of horizontally centred rows, widest row on top. Enemy
//! size scales with the screen width so the formation looks the same on
//! every display.

use glam::Vec2;
use rand::Rng;

use super::entity::Enemy;
use crate::Millis;
use crate::consts::*;

/// Lays out enemy formations
#[derive(Debug, Clone, PartialEq)]
pub struct WaveSpawner {
    /// Enemies per row, top row first
    pub rows: Vec<usize>,
    /// Enemy frame width / height
    pub enemy_aspect: f32,
}

impl Default for WaveSpawner {
    fn default() -> Self {
        Self::new(ENEMY_FRAME_ASPECT)
    }
}

impl WaveSpawner {
    pub fn new(enemy_aspect: f32) -> Self {
        Self {
            rows: FORMATION_ROWS.to_vec(),
            enemy_aspect: if enemy_aspect > 0.0 {
                enemy_aspect
            } else {
                ENEMY_FRAME_ASPECT
            },
        }
    }

    pub fn with_rows(mut self, rows: &[usize]) -> Self {
        self.rows = rows.to_vec();
        self
    }

    /// Size of one enemy on a screen of the given width
    pub fn enemy_size(&self, screen_width: f32) -> Vec2 {
        let width = screen_width / ENEMY_COLUMNS * ENEMY_WIDTH_SCALE;
        Vec2::new(width, width / self.enemy_aspect)
    }

    /// Build a fresh, independent wave. Slots that would cross the right
    /// edge of the screen are dropped.
    pub fn spawn(
        &self,
        screen_width: f32,
        screen_height: f32,
        now: Millis,
        rng: &mut impl Rng,
    ) -> Vec<Enemy> {
        let size = self.enemy_size(screen_width);
        let h_spacing = size.x * ENEMY_H_SPACING;
        let v_spacing = size.y * ENEMY_V_SPACING;

        let mut enemies = Vec::with_capacity(self.rows.iter().sum());
        let mut center_y = size.y / 2.0 + screen_height * FORMATION_TOP_MARGIN;

        for (row, &count) in self.rows.iter().enumerate() {
            let row_width = count as f32 * size.x + count.saturating_sub(1) as f32 * h_spacing;
            let mut left = ((screen_width - row_width) / 2.0).max(0.0);

            for _ in 0..count {
                if left + size.x > screen_width {
                    break;
                }
                let pos = Vec2::new(left + size.x / 2.0, center_y);
                enemies.push(Enemy::new(pos, size, row as u32, now, rng));
                left += size.x + h_spacing;
            }

            center_y += size.y + v_spacing;
        }

        enemies
    }
}
