//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given the same seed, inputs and clock
//! readings, a session plays out identically:
//! - Time comes in as an explicit session-clock reading
//! - Seeded RNG only
//! - Stable iteration order (wave order, pool slot order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod pool;
pub mod rect;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod timer;
pub mod wave;

pub use collision::CombatReport;
pub use entity::{Bullet, Enemy, Explosion, Owner, Player, Simulate, TickContext};
pub use pool::{BulletHandle, BulletPool};
pub use rect::Rect;
pub use snapshot::{BulletView, EnemyView, ExplosionView, FrameSnapshot, Hud, SpriteView};
pub use state::{Blink, GameEvent, GamePhase, GameState};
pub use tick::{FocusMove, TickInput, tick};
pub use timer::Cooldown;
pub use wave::WaveSpawner;
