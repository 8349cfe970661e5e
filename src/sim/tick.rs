//! Fixed timestep simulation tick
//!
//! Advances the game by one step on the session clock. Inputs are merged
//! into a `TickInput` before the tick runs; everything else is read from
//! and written to `GameState`.

use rand::Rng;

use super::collision;
use super::entity::{Simulate, TickContext};
use super::state::{GameEvent, GamePhase, GameState};
use crate::Millis;
use crate::consts::*;

/// Direction to move the post-game-over button focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMove {
    Prev,
    Next,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Move intents (held)
    pub move_left: bool,
    pub move_right: bool,
    /// Fire request
    pub fire: bool,
    pub pause: bool,
    pub resume: bool,
    pub restart: bool,
    pub exit: bool,
    /// Post-game-over menu navigation
    pub focus: Option<FocusMove>,
    /// Activate the focused button
    pub confirm: bool,
}

/// Advance the game state by one fixed timestep at session time `now`
pub fn tick(state: &mut GameState, input: &TickInput, now: Millis) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if input.exit {
        events.push(GameEvent::ExitRequested);
    }

    match state.phase {
        GamePhase::Paused => {
            if input.resume && state.resume() {
                events.push(GameEvent::Resumed);
            }
            return events;
        }
        GamePhase::GameOver => {
            tick_game_over(state, input, now, &mut events);
            return events;
        }
        GamePhase::Playing => {
            if input.pause && state.pause() {
                events.push(GameEvent::Paused);
                return events;
            }
        }
    }

    state.time_ticks += 1;
    let ctx = TickContext {
        now,
        screen: state.screen,
    };

    // Wave lifecycle
    if state.schedule_next_wave(now) {
        events.push(GameEvent::WaveCleared {
            next_level: state.level,
        });
    }
    if state.waiting_for_wave && state.next_wave.elapsed(now) {
        let enemies = state.spawn_wave(now);
        events.push(GameEvent::WaveSpawned {
            level: state.level,
            enemies,
        });
    }

    // Player
    state
        .player
        .steer(input.move_left, input.move_right, state.screen.x);
    state.player.update(&ctx);
    // One player bullet in flight; it frees up on a kill or off the top
    let bullet_in_flight = state.player_bullets.active_count() > 0;
    if (input.fire || state.auto_fire)
        && !state.waiting_for_wave
        && !bullet_in_flight
        && state.player.shot.elapsed(now)
    {
        let muzzle = state.player.muzzle();
        if state.player_bullets.fire(muzzle, PLAYER_BULLET_SPEED).is_some() {
            state.player.shot.rearm(now);
        } else {
            log::trace!("Player bullet pool exhausted, shot dropped");
        }
    }

    // Enemies
    for enemy in &mut state.enemies {
        enemy.update(&ctx);
    }
    enemy_fire(state, now);

    // Bullets
    state.player_bullets.update(&ctx);
    state.enemy_bullets.update(&ctx);

    // Explosions that finished last tick go; the rest advance one frame
    state.explosions.retain(|x| !x.finished);
    for explosion in &mut state.explosions {
        explosion.update(&ctx);
    }

    let report = collision::resolve(
        &mut state.player_bullets,
        &mut state.enemy_bullets,
        &mut state.enemies,
        &state.player,
        &mut state.lives,
        &mut state.explosions,
        state.screen.y,
    );

    for at in report.kills {
        state.score = state.score.saturating_add(KILL_REWARD);
        events.push(GameEvent::EnemyKilled {
            at,
            score: state.score,
        });
    }
    if report.player_hits > 0 {
        events.push(GameEvent::PlayerHit { lives: state.lives });
    }
    if report.lives_depleted {
        events.extend(state.enter_game_over(now));
    }

    events
}

/// Let a few randomly chosen enemies shoot, subject to their own timers and
/// the level's bullet cap
fn enemy_fire(state: &mut GameState, now: Millis) {
    if state.enemies.is_empty() || state.waiting_for_wave {
        return;
    }

    let candidates = state.enemies.len().min(state.level as usize).max(1);
    let cap = state.enemy_bullet_cap();
    let speed = state.enemy_bullet_speed();
    let level = state.level;

    for _ in 0..candidates {
        if state.enemy_bullets.active_count() >= cap {
            break;
        }
        let idx = state.rng.random_range(0..state.enemies.len());
        let enemy = &mut state.enemies[idx];
        if !enemy.shot.elapsed(now) {
            continue;
        }
        if state.enemy_bullets.fire(enemy.muzzle(), speed).is_some() {
            enemy.reload(now, level, &mut state.rng);
        } else {
            log::trace!("Enemy bullet pool exhausted, shot dropped");
            break;
        }
    }
}

fn tick_game_over(
    state: &mut GameState,
    input: &TickInput,
    now: Millis,
    events: &mut Vec<GameEvent>,
) {
    state.blink.update(now);

    match input.focus {
        Some(FocusMove::Prev) => state.focused_button = BUTTON_RESTART,
        Some(FocusMove::Next) => state.focused_button = BUTTON_EXIT,
        None => {}
    }

    let restart = input.restart || (input.confirm && state.focused_button == BUTTON_RESTART);
    let exit = input.confirm && state.focused_button == BUTTON_EXIT;

    if restart && state.restart(now) {
        events.push(GameEvent::Restarted);
        events.push(GameEvent::WaveSpawned {
            level: state.level,
            enemies: state.enemies.len(),
        });
    } else if exit && !input.exit {
        events.push(GameEvent::ExitRequested);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{SpriteSet, StaticAssets};
    use crate::settings::Settings;
    use crate::sim::entity::Owner;
    use crate::sim::timer::Cooldown;
    use glam::Vec2;

    const DT: Millis = 16;

    fn new_state(settings: &Settings) -> GameState {
        let sprites = SpriteSet::resolve(&StaticAssets::stock()).unwrap();
        GameState::new(settings, sprites, 0, 12345)
    }

    fn quiet_settings() -> Settings {
        Settings {
            auto_fire: false,
            ..Settings::default()
        }
    }

    /// Enemy bullet that overlaps the player after this tick's update
    fn shoot_player(state: &mut GameState) {
        let speed = state.enemy_bullet_speed();
        let at = state.player.pos - Vec2::new(0.0, speed);
        state.enemy_bullets.fire(at, speed);
    }

    #[test]
    fn test_first_tick() {
        let mut state = new_state(&Settings::default());
        let events = tick(&mut state, &TickInput::default(), 0);
        assert_eq!(state.time_ticks, 1);
        assert!(events.is_empty());
        // Auto fire shoots immediately
        assert_eq!(state.player_bullets.active_count(), 1);
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut state = new_state(&quiet_settings());
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire, 0);
        assert_eq!(state.player_bullets.active_count(), 1);
        tick(&mut state, &fire, PLAYER_SHOT_COOLDOWN_MS - 1);
        assert_eq!(state.player_bullets.active_count(), 1);

        // Bullet gone but the cooldown still runs
        for h in state.player_bullets.active_handles() {
            state.player_bullets.deactivate(h);
        }
        tick(&mut state, &fire, PLAYER_SHOT_COOLDOWN_MS - 1);
        assert_eq!(state.player_bullets.active_count(), 0);
        tick(&mut state, &fire, PLAYER_SHOT_COOLDOWN_MS);
        assert_eq!(state.player_bullets.active_count(), 1);
    }

    #[test]
    fn test_no_second_shot_while_bullet_in_flight() {
        let mut state = new_state(&quiet_settings());
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire, 0);
        tick(&mut state, &fire, 10 * PLAYER_SHOT_COOLDOWN_MS);
        assert_eq!(state.player_bullets.active_count(), 1);
    }

    #[test]
    fn test_single_player_bullet_on_tall_screen() {
        let mut state = new_state(&Settings {
            screen_height: 1600.0,
            ..Settings::default()
        });
        // Out of reach of the player's bullets
        for enemy in &mut state.enemies {
            enemy.pos.y = -1000.0;
        }

        let mut now = 0;
        let mut peak = 0;
        let mut shots = 0;
        let mut previous = 0;
        for _ in 0..200 {
            tick(&mut state, &TickInput::default(), now);
            let live = state.player_bullets.active_count();
            if live > previous {
                shots += 1;
            }
            previous = live;
            peak = peak.max(live);
            now += DT;
        }
        assert_eq!(peak, 1);
        // The next shot follows once the previous bullet leaves the top
        assert!(shots >= 2, "only {} shots", shots);
    }

    #[test]
    fn test_kill_frees_the_shot() {
        let mut state = new_state(&quiet_settings());
        let target = state.enemies[0].pos;
        let at = target + Vec2::new(ENEMY_SPEED, -PLAYER_BULLET_SPEED);
        state.player_bullets.fire(at, PLAYER_BULLET_SPEED);
        tick(&mut state, &TickInput::default(), 0);
        assert_eq!(state.enemies.len(), 8);
        assert_eq!(state.player_bullets.active_count(), 0);

        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire, DT);
        assert_eq!(state.player_bullets.active_count(), 1);
    }

    /// Bullets fired by enemies in the first tick of a wave where every
    /// enemy is ready to shoot
    fn shots_in_one_tick(seed: u64, level: u32, alive: usize) -> usize {
        let sprites = SpriteSet::resolve(&StaticAssets::stock()).unwrap();
        let mut state = GameState::new(&quiet_settings(), sprites, 0, seed);
        state.level = level;
        state.enemies.truncate(alive);
        for enemy in &mut state.enemies {
            enemy.shot = Cooldown::ready(ENEMY_SHOT_INTERVAL_MIN_MS);
        }
        tick(&mut state, &TickInput::default(), 0);
        state.enemy_bullets.active_count()
    }

    #[test]
    fn test_shooters_per_tick_bounded_by_level_and_wave() {
        // level 3 with 9 enemies: at most 3; level 6 with 2 enemies: at most 2
        for (level, alive, bound) in [(1, 9, 1), (3, 9, 3), (6, 2, 2)] {
            let counts: Vec<usize> = (0..50)
                .map(|seed| shots_in_one_tick(seed, level, alive))
                .collect();
            assert!(counts.iter().all(|&n| n >= 1 && n <= bound));
            assert_eq!(counts.iter().copied().max(), Some(bound));
        }
    }

    #[test]
    fn test_enemy_bullet_spawns_below_shooter() {
        let mut state = new_state(&quiet_settings());
        state.enemies.truncate(1);
        state.enemies[0].shot = Cooldown::ready(ENEMY_SHOT_INTERVAL_MIN_MS);
        let speed = state.enemy_bullet_speed();
        tick(&mut state, &TickInput::default(), 0);

        let shooter = state.enemies[0].rect();
        let bullet = state.enemy_bullets.active_iter().next().unwrap();
        // Fired after the enemy moved, then advanced once
        assert!((bullet.pos.x - shooter.center().x).abs() < 1e-4);
        assert!((bullet.pos.y - (shooter.bottom + ENEMY_BULLET_OFFSET + speed)).abs() < 1e-4);
    }

    #[test]
    fn test_no_fire_without_intent() {
        let mut state = new_state(&quiet_settings());
        tick(&mut state, &TickInput::default(), 0);
        assert_eq!(state.player_bullets.active_count(), 0);
    }

    #[test]
    fn test_move_intents() {
        let mut state = new_state(&quiet_settings());
        let x = state.player.pos.x;
        let left = TickInput {
            move_left: true,
            ..Default::default()
        };
        tick(&mut state, &left, 0);
        assert_eq!(state.player.pos.x, x - PLAYER_SPEED);

        let both = TickInput {
            move_left: true,
            move_right: true,
            ..Default::default()
        };
        tick(&mut state, &both, DT);
        assert_eq!(state.player.pos.x, x - PLAYER_SPEED);
    }

    #[test]
    fn test_kill_scores_ten() {
        let mut state = new_state(&quiet_settings());
        let target = state.enemies[0].pos;
        // Compensate for this tick's movement of both bullet and enemy
        let at = target + Vec2::new(ENEMY_SPEED, -PLAYER_BULLET_SPEED);
        state.player_bullets.fire(at, PLAYER_BULLET_SPEED);

        let events = tick(&mut state, &TickInput::default(), 0);
        assert_eq!(state.score, KILL_REWARD);
        assert_eq!(state.enemies.len(), 8);
        assert!(matches!(
            events.as_slice(),
            [GameEvent::EnemyKilled { score: 10, .. }]
        ));
        assert_eq!(state.explosions.len(), 1);
        assert_eq!(state.explosions[0].frame, 0);
    }

    #[test]
    fn test_score_only_grows_in_tens() {
        let mut state = new_state(&Settings {
            initial_lives: 1000,
            ..Settings::default()
        });
        let mut last = 0;
        let mut now = 0;
        for _ in 0..3000 {
            let input = TickInput {
                move_left: (now / 2000) % 2 == 0,
                move_right: (now / 2000) % 2 == 1,
                ..Default::default()
            };
            let events = tick(&mut state, &input, now);
            let kills = events
                .iter()
                .filter(|e| matches!(e, GameEvent::EnemyKilled { .. }))
                .count() as u32;
            assert_eq!(state.score, last + kills * KILL_REWARD);
            last = state.score;
            now += DT;
        }
        assert!(state.score > 0);
    }

    #[test]
    fn test_game_over_on_last_life() {
        let mut state = new_state(&Settings {
            initial_lives: 3,
            ..quiet_settings()
        });
        state.enemies.clear();
        let mut now = 0;

        for expected_lives in [2, 1] {
            shoot_player(&mut state);
            tick(&mut state, &TickInput::default(), now);
            assert_eq!(state.lives, expected_lives);
            assert_eq!(state.phase, GamePhase::Playing);
            now += DT;
        }

        shoot_player(&mut state);
        let events = tick(&mut state, &TickInput::default(), now);
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(events.contains(&GameEvent::GameOver { score: 0, level: 2 }));
    }

    #[test]
    fn test_default_lives_game_over_on_fifth_hit() {
        let mut state = new_state(&quiet_settings());
        state.enemies.clear();
        for i in 0..5 {
            shoot_player(&mut state);
            tick(&mut state, &TickInput::default(), i * DT);
            let expected = if i < 4 {
                GamePhase::Playing
            } else {
                GamePhase::GameOver
            };
            assert_eq!(state.phase, expected, "after hit {}", i + 1);
        }
    }

    #[test]
    fn test_off_screen_bullets_pruned() {
        let mut state = new_state(&quiet_settings());
        let h = state.screen.y;
        let speed = state.enemy_bullet_speed();
        state.enemy_bullets.fire(Vec2::new(5.0, h + 50.0), speed);
        state
            .player_bullets
            .fire(Vec2::new(5.0, -50.0), PLAYER_BULLET_SPEED);

        tick(&mut state, &TickInput::default(), 0);
        assert_eq!(state.enemy_bullets.active_count(), 0);
        assert_eq!(state.player_bullets.active_count(), 0);
    }

    #[test]
    fn test_wave_lifecycle() {
        let mut state = new_state(&Settings::default());
        state.enemies.clear();

        let events = tick(&mut state, &TickInput::default(), 1000);
        assert!(events.contains(&GameEvent::WaveCleared { next_level: 2 }));
        assert!(state.waiting_for_wave);
        assert_eq!(state.level, 2);
        // No shooting while the next wave is pending
        assert_eq!(state.player_bullets.active_count(), 0);

        tick(&mut state, &TickInput::default(), 1000 + WAVE_SPAWN_DELAY_MS - 1);
        assert!(state.waiting_for_wave);
        assert!(state.enemies.is_empty());

        let events = tick(&mut state, &TickInput::default(), 1000 + WAVE_SPAWN_DELAY_MS);
        assert!(!state.waiting_for_wave);
        assert_eq!(state.enemies.len(), 9);
        assert_eq!(state.level, 2);
        assert!(events.contains(&GameEvent::WaveSpawned {
            level: 2,
            enemies: 9
        }));
    }

    #[test]
    fn test_bullets_keep_flying_between_waves() {
        let mut state = new_state(&quiet_settings());
        state.enemies.clear();
        let speed = state.enemy_bullet_speed();
        state.enemy_bullets.fire(Vec2::new(10.0, 100.0), speed);
        tick(&mut state, &TickInput::default(), 0);
        assert!(state.waiting_for_wave);
        let b = state.enemy_bullets.active_iter().next().unwrap();
        assert_eq!(b.pos.y, 108.0);
    }

    #[test]
    fn test_enemy_bullets_capped_by_level() {
        let mut state = new_state(&Settings {
            initial_lives: 100_000,
            ..quiet_settings()
        });
        let mut now = 0;
        let mut peak = 0;
        for _ in 0..5000 {
            tick(&mut state, &TickInput::default(), now);
            let live = state.enemy_bullets.active_count();
            assert!(live <= state.enemy_bullet_cap());
            peak = peak.max(live);
            now += DT;
        }
        assert!(peak > 0, "enemies never fired");
        assert!(state.enemy_bullets.active_iter().all(|b| b.owner == Owner::Enemy));
    }

    #[test]
    fn test_enemy_shot_uses_level_speed() {
        let mut state = new_state(&Settings {
            initial_lives: 100_000,
            ..quiet_settings()
        });
        state.level = 4;
        let mut now = 0;
        while state.enemy_bullets.active_count() == 0 {
            tick(&mut state, &TickInput::default(), now);
            now += DT;
        }
        let b = state.enemy_bullets.active_iter().next().unwrap();
        assert!((b.speed - 8.0 * 1.3).abs() < 1e-4);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut state = new_state(&Settings::default());
        tick(&mut state, &TickInput::default(), 0);
        let events = tick(
            &mut state,
            &TickInput {
                pause: true,
                ..Default::default()
            },
            DT,
        );
        assert_eq!(events, vec![GameEvent::Paused]);
        assert_eq!(state.phase, GamePhase::Paused);

        let ticks = state.time_ticks;
        let enemy_x = state.enemies[0].pos.x;
        let bullets = state.player_bullets.active_count();
        for i in 2..100 {
            tick(&mut state, &TickInput::default(), i * DT);
        }
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.enemies[0].pos.x, enemy_x);
        assert_eq!(state.player_bullets.active_count(), bullets);

        let events = tick(
            &mut state,
            &TickInput {
                resume: true,
                ..Default::default()
            },
            100 * DT,
        );
        assert_eq!(events, vec![GameEvent::Resumed]);
        tick(&mut state, &TickInput::default(), 101 * DT);
        assert_eq!(state.time_ticks, ticks + 1);
    }

    #[test]
    fn test_high_score_blink_through_ticks() {
        let mut state = new_state(&quiet_settings());
        state.enemies.clear();
        state.score = 40;
        state.lives = 1;
        shoot_player(&mut state);
        let events = tick(&mut state, &TickInput::default(), 1000);
        assert!(events.contains(&GameEvent::NewHighScore(40)));
        assert_eq!(state.high_score, 40);

        let mut visible = Vec::new();
        let mut now = 1000;
        for _ in 0..10 {
            now += BLINK_INTERVAL_MS;
            tick(&mut state, &TickInput::default(), now);
            visible.push(state.high_score_visible());
        }
        assert_eq!(
            visible,
            vec![false, true, false, true, false, true, true, true, true, true]
        );
    }

    #[test]
    fn test_restart_resets_session() {
        let mut state = new_state(&Settings::default());
        state.high_score = 5;
        state.score = 120;
        state.level = 4;
        state.lives = 1;
        state.enemies.truncate(2);
        let player_rect = state.player.rect();
        state
            .explosions
            .push(crate::sim::entity::Explosion::covering(&player_rect));
        state.player.pos.x = 10.0;
        shoot_player(&mut state);
        let speed = state.enemy_bullet_speed();
        state.enemy_bullets.fire(Vec2::new(20.0, 20.0), speed);
        tick(&mut state, &TickInput::default(), 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.high_score, 120);

        let events = tick(
            &mut state,
            &TickInput {
                restart: true,
                ..Default::default()
            },
            DT,
        );
        assert_eq!(events[0], GameEvent::Restarted);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 5);
        assert_eq!(state.level, 1);
        assert_eq!(state.high_score, 120);
        assert!(!state.new_high_score);
        assert_eq!(state.player_bullets.active_count(), 0);
        assert_eq!(state.enemy_bullets.active_count(), 0);
        assert!(state.explosions.is_empty());
        assert_eq!(state.player.pos, crate::sim::entity::Player::spawn_point(state.screen));

        let mut rng = rand_pcg::Pcg32::new(0xcafe, 0xf00d);
        let fresh = state.spawner.spawn(state.screen.x, state.screen.y, DT, &mut rng);
        assert_eq!(state.enemies.len(), fresh.len());
        for (a, b) in state.enemies.iter().zip(&fresh) {
            assert_eq!(a.pos, b.pos);
            assert_eq!(a.kind, b.kind);
        }
    }

    #[test]
    fn test_game_over_menu() {
        let mut state = new_state(&quiet_settings());
        state.enemies.clear();
        state.lives = 1;
        shoot_player(&mut state);
        tick(&mut state, &TickInput::default(), 0);
        assert_eq!(state.focused_button, BUTTON_RESTART);

        let next = TickInput {
            focus: Some(FocusMove::Next),
            ..Default::default()
        };
        tick(&mut state, &next, DT);
        assert_eq!(state.focused_button, BUTTON_EXIT);

        let confirm = TickInput {
            confirm: true,
            ..Default::default()
        };
        let events = tick(&mut state, &confirm, 2 * DT);
        assert_eq!(events, vec![GameEvent::ExitRequested]);
        assert_eq!(state.phase, GamePhase::GameOver);

        let prev = TickInput {
            focus: Some(FocusMove::Prev),
            confirm: true,
            ..Default::default()
        };
        let events = tick(&mut state, &prev, 3 * DT);
        assert_eq!(events[0], GameEvent::Restarted);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_restart_ignored_while_playing() {
        let mut state = new_state(&quiet_settings());
        state.score = 30;
        let events = tick(
            &mut state,
            &TickInput {
                restart: true,
                ..Default::default()
            },
            0,
        );
        assert!(!events.contains(&GameEvent::Restarted));
        assert_eq!(state.score, 30);
    }

    #[test]
    fn test_exhausted_pools_never_panic() {
        let mut state = new_state(&Settings {
            player_pool_capacity: 0,
            enemy_pool_capacity: 0,
            ..Settings::default()
        });
        let mut now = 0;
        for _ in 0..500 {
            tick(
                &mut state,
                &TickInput {
                    fire: true,
                    ..Default::default()
                },
                now,
            );
            now += DT;
        }
        assert_eq!(state.player_bullets.active_count(), 0);
        assert_eq!(state.enemy_bullets.active_count(), 0);
        assert_eq!(state.enemies.len(), 9);
    }

    #[test]
    fn test_determinism() {
        let settings = Settings::default();
        let mut state1 = new_state(&settings);
        let mut state2 = new_state(&settings);

        let inputs = [
            TickInput {
                move_left: true,
                ..Default::default()
            },
            TickInput {
                fire: true,
                ..Default::default()
            },
            TickInput {
                move_right: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        let mut now = 0;
        for round in 0..400 {
            let input = &inputs[round % inputs.len()];
            tick(&mut state1, input, now);
            tick(&mut state2, input, now);
            now += DT;
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.lives, state2.lives);
        assert_eq!(state1.enemies.len(), state2.enemies.len());
        assert_eq!(
            state1.enemy_bullets.active_count(),
            state2.enemy_bullets.active_count()
        );
        assert_eq!(state1.player.pos, state2.player.pos);
    }
}
