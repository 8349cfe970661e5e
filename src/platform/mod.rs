//! Platform abstraction layer
//!
//! Host-facing plumbing around the simulation:
//! - Input intents delivered from any thread
//! - The pausable session clock and tick pacing

pub mod input;
pub mod time;

pub use input::{InputHandle, InputReceiver, Intent, channel};
pub use time::{FramePacer, SessionClock};
