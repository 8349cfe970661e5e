//! Threaded session loop
//!
//! One dedicated thread owns the tick cadence. Each iteration drains input,
//! reads the session clock, runs one tick and publishes a frame, all inside a
//! single critical section on the shared state. Hosts interact only through
//! the input handle, the latest frame, and `stop`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::assets::{AssetProvider, SpriteSet};
use crate::error::InitError;
use crate::persistence::{self, HighScoreStore};
use crate::platform::{FramePacer, InputHandle, InputReceiver, SessionClock, channel};
use crate::settings::Settings;
use crate::sim::{FrameSnapshot, GameEvent, GameState, tick};

/// Receives one snapshot per tick (the renderer seam)
pub trait FrameSink: Send {
    fn present(&mut self, frame: &FrameSnapshot);
}

/// Sink that discards frames, for hosts that poll `latest_frame`
#[derive(Debug, Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn present(&mut self, _frame: &FrameSnapshot) {}
}

struct Shared {
    state: GameState,
    latest: Option<FrameSnapshot>,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(|poisoned| {
        log::warn!("Session state lock poisoned; recovering");
        poisoned.into_inner()
    })
}

/// A running game session
pub struct Session {
    shared: Arc<Mutex<Shared>>,
    running: Arc<AtomicBool>,
    input: InputHandle,
    thread: Option<JoinHandle<()>>,
    stop_timeout: Duration,
    seed: u64,
}

impl Session {
    /// Validate the setup, load the high score and start the loop thread
    pub fn start(
        settings: &Settings,
        assets: &dyn AssetProvider,
        store: Box<dyn HighScoreStore>,
        sink: Box<dyn FrameSink>,
    ) -> Result<Self, InitError> {
        settings.validate()?;
        let sprites = SpriteSet::resolve(assets)?;
        let high_score = persistence::load_or_zero(store.as_ref());
        let seed = settings.seed.unwrap_or_else(rand::random);

        log::info!(
            "Starting session: seed {}, screen {}x{}, high score {}",
            seed,
            settings.screen_width,
            settings.screen_height,
            high_score
        );

        let state = GameState::new(settings, sprites, high_score, seed);
        let latest = Some(FrameSnapshot::capture(&state));
        let shared = Arc::new(Mutex::new(Shared { state, latest }));
        let running = Arc::new(AtomicBool::new(true));
        let (input, receiver) = channel();

        let worker = Worker {
            shared: Arc::clone(&shared),
            running: Arc::clone(&running),
            input: receiver,
            clock: SessionClock::start(),
            pacer: FramePacer::new(Duration::from_millis(settings.tick_interval_ms)),
            store,
            sink,
        };

        let thread = thread::Builder::new()
            .name("galaxing-sim".into())
            .spawn(move || worker.run())
            .map_err(|e| InitError::Spawn {
                reason: e.to_string(),
            })?;

        Ok(Self {
            shared,
            running,
            input,
            thread: Some(thread),
            stop_timeout: Duration::from_millis(settings.stop_timeout_ms),
            seed,
        })
    }

    /// Handle for delivering intents; clone it freely
    pub fn input(&self) -> InputHandle {
        self.input.clone()
    }

    pub fn pause(&self) {
        self.input.pause();
    }

    pub fn resume(&self) {
        self.input.resume();
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Most recently published frame
    pub fn latest_frame(&self) -> Option<FrameSnapshot> {
        lock(&self.shared).latest.clone()
    }

    /// Inspect the live state between ticks
    pub fn with_state<R>(&self, f: impl FnOnce(&GameState) -> R) -> R {
        f(&lock(&self.shared).state)
    }

    /// False once the loop was asked to exit or stopped
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
            && self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// End the session. The in-flight tick completes first; the wait for the
    /// loop thread is bounded by the configured stop timeout.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        let Some(thread) = self.thread.take() else {
            return;
        };

        let deadline = Instant::now() + self.stop_timeout;
        while !thread.is_finished() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }

        if thread.is_finished() {
            if thread.join().is_err() {
                log::error!("Simulation thread panicked");
            }
            log::info!("Session stopped");
        } else {
            log::warn!(
                "Simulation thread did not stop within {:?}; detaching",
                self.stop_timeout
            );
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.stop();
    }
}

struct Worker {
    shared: Arc<Mutex<Shared>>,
    running: Arc<AtomicBool>,
    input: InputReceiver,
    clock: SessionClock,
    pacer: FramePacer,
    store: Box<dyn HighScoreStore>,
    sink: Box<dyn FrameSink>,
}

impl Worker {
    fn run(mut self) {
        log::debug!("Simulation loop started at {:?}", self.pacer.interval());
        while self.running.load(Ordering::Acquire) {
            self.step();
            let wait = self.pacer.remaining();
            if !wait.is_zero() {
                thread::sleep(wait);
            }
        }
        log::debug!("Simulation loop exited");
    }

    fn step(&mut self) {
        let input = self.input.drain();

        let (events, frame) = {
            let mut shared = lock(&self.shared);
            let now = self.clock.advance(shared.state.is_paused());
            let events = tick(&mut shared.state, &input, now);
            let frame = FrameSnapshot::capture(&shared.state);
            shared.latest = Some(frame.clone());
            (events, frame)
        };

        for event in &events {
            self.handle(event);
        }
        self.sink.present(&frame);
    }

    fn handle(&mut self, event: &GameEvent) {
        match event {
            GameEvent::NewHighScore(score) => {
                persistence::save_best_effort(self.store.as_mut(), *score);
            }
            GameEvent::ExitRequested => {
                log::info!("Exit requested");
                self.running.store(false, Ordering::Release);
            }
            GameEvent::WaveCleared { next_level } => {
                log::debug!("Wave cleared; level {} incoming", next_level);
            }
            GameEvent::Paused => log::debug!("Paused"),
            GameEvent::Resumed => log::debug!("Resumed"),
            GameEvent::Restarted => log::info!("Restarted"),
            _ => {}
        }
    }
}
