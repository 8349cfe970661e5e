//! Combat resolution
//!
//! Runs once per tick after all kinematics, in a fixed order: player
//! bullets against enemies, then enemy bullets against the player, then
//! off-screen pruning of whatever is still live.

use glam::Vec2;

use super::entity::{Enemy, Explosion, Player, Simulate};
use super::pool::BulletPool;

/// Result of one combat pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombatReport {
    /// Centres of enemies destroyed this tick
    pub kills: Vec<Vec2>,
    /// Number of enemy bullets that struck the player
    pub player_hits: u32,
    /// Lives reached zero during this pass
    pub lives_depleted: bool,
    /// Bullets deactivated for leaving the screen
    pub pruned: usize,
}

/// Each live player bullet destroys at most the first enemy it overlaps
/// (first in wave order).
pub fn player_bullets_vs_enemies(
    bullets: &mut BulletPool,
    enemies: &mut Vec<Enemy>,
    explosions: &mut Vec<Explosion>,
) -> Vec<Vec2> {
    let mut kills = Vec::new();

    for handle in bullets.active_handles() {
        let Some(bullet_rect) = bullets.get(handle).map(|b| b.rect()) else {
            continue;
        };

        if let Some(idx) = enemies.iter().position(|e| bullet_rect.intersects(&e.rect())) {
            bullets.deactivate(handle);
            let enemy = enemies.remove(idx);
            let rect = enemy.rect();
            explosions.push(Explosion::covering(&rect));
            kills.push(rect.center());
        }
    }

    kills
}

/// Enemy bullets against the single player rect. Each hit costs one life;
/// scanning stops once lives reach zero.
pub fn enemy_bullets_vs_player(
    bullets: &mut BulletPool,
    player: &Player,
    lives: &mut i32,
    explosions: &mut Vec<Explosion>,
) -> u32 {
    let player_rect = player.rect();
    let mut hits = 0;

    for handle in bullets.active_handles() {
        if *lives <= 0 {
            break;
        }
        let hit = bullets
            .get(handle)
            .is_some_and(|b| b.rect().intersects(&player_rect));
        if hit {
            bullets.deactivate(handle);
            *lives -= 1;
            hits += 1;
            explosions.push(Explosion::covering(&player_rect));
        }
    }

    hits
}

/// Full combat pass. Score and game-over transitions are applied by the
/// caller from the returned report.
pub fn resolve(
    player_bullets: &mut BulletPool,
    enemy_bullets: &mut BulletPool,
    enemies: &mut Vec<Enemy>,
    player: &Player,
    lives: &mut i32,
    explosions: &mut Vec<Explosion>,
    screen_height: f32,
) -> CombatReport {
    let kills = player_bullets_vs_enemies(player_bullets, enemies, explosions);

    let was_alive = *lives > 0;
    let player_hits = enemy_bullets_vs_player(enemy_bullets, player, lives, explosions);

    let pruned = player_bullets.prune_off_screen(screen_height)
        + enemy_bullets.prune_off_screen(screen_height);

    CombatReport {
        kills,
        player_hits,
        lives_depleted: was_alive && *lives <= 0,
        pruned,
    }
}
