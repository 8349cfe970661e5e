//! Input intents
//!
//! Held movement is mirrored in atomic flags; one-shot commands go through a
//! channel. Either may be written from any thread. The simulation thread
//! merges both into a `TickInput` right before each tick, so an intent that
//! arrives mid-tick applies on the next one.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use crate::sim::{FocusMove, TickInput};

/// Device-agnostic player intents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    MoveLeft(bool),
    MoveRight(bool),
    Fire,
    Pause,
    Resume,
    Restart,
    Exit,
    FocusPrev,
    FocusNext,
    Confirm,
}

#[derive(Debug, Default)]
struct HeldFlags {
    left: AtomicBool,
    right: AtomicBool,
}

/// Sending side; cheap to clone and hand to input threads
#[derive(Debug, Clone)]
pub struct InputHandle {
    held: Arc<HeldFlags>,
    commands: Sender<Intent>,
}

/// Receiving side, owned by the simulation loop
#[derive(Debug)]
pub struct InputReceiver {
    held: Arc<HeldFlags>,
    commands: Receiver<Intent>,
}

/// Create a connected handle/receiver pair
pub fn channel() -> (InputHandle, InputReceiver) {
    let held = Arc::new(HeldFlags::default());
    let (tx, rx) = mpsc::channel();
    (
        InputHandle {
            held: Arc::clone(&held),
            commands: tx,
        },
        InputReceiver { held, commands: rx },
    )
}

impl InputHandle {
    pub fn send(&self, intent: Intent) {
        match intent {
            Intent::MoveLeft(on) => self.held.left.store(on, Ordering::Release),
            Intent::MoveRight(on) => self.held.right.store(on, Ordering::Release),
            other => {
                if self.commands.send(other).is_err() {
                    log::trace!("Input dropped after session end: {:?}", other);
                }
            }
        }
    }

    pub fn move_left(&self, on: bool) {
        self.send(Intent::MoveLeft(on));
    }

    pub fn move_right(&self, on: bool) {
        self.send(Intent::MoveRight(on));
    }

    pub fn fire(&self) {
        self.send(Intent::Fire);
    }

    pub fn pause(&self) {
        self.send(Intent::Pause);
    }

    pub fn resume(&self) {
        self.send(Intent::Resume);
    }

    pub fn restart(&self) {
        self.send(Intent::Restart);
    }

    pub fn exit(&self) {
        self.send(Intent::Exit);
    }

    pub fn focus_prev(&self) {
        self.send(Intent::FocusPrev);
    }

    pub fn focus_next(&self) {
        self.send(Intent::FocusNext);
    }

    pub fn confirm(&self) {
        self.send(Intent::Confirm);
    }
}

impl InputReceiver {
    /// Merge held flags and every pending command into one tick's input
    pub fn drain(&self) -> TickInput {
        let mut input = TickInput {
            move_left: self.held.left.load(Ordering::Acquire),
            move_right: self.held.right.load(Ordering::Acquire),
            ..Default::default()
        };

        loop {
            match self.commands.try_recv() {
                Ok(intent) => apply(&mut input, intent),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        input
    }
}

fn apply(input: &mut TickInput, intent: Intent) {
    match intent {
        Intent::MoveLeft(on) => input.move_left = on,
        Intent::MoveRight(on) => input.move_right = on,
        Intent::Fire => input.fire = true,
        Intent::Pause => {
            input.pause = true;
            input.resume = false;
        }
        Intent::Resume => {
            input.resume = true;
            input.pause = false;
        }
        Intent::Restart => input.restart = true,
        Intent::Exit => input.exit = true,
        Intent::FocusPrev => input.focus = Some(FocusMove::Prev),
        Intent::FocusNext => input.focus = Some(FocusMove::Next),
        Intent::Confirm => input.confirm = true,
    }
}
