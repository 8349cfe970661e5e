//! Galaxing headless entry point
//!
//! Runs a session with stock sprite geometry and an autopilot that sweeps the
//! ship back and forth. Frames go to the log instead of a screen.
//!
//! Usage: galaxing [settings.json] [seconds]

use std::path::Path;
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use galaxing::assets::StaticAssets;
use galaxing::persistence::{HighScoreStore, JsonFileStore};
use galaxing::sim::FrameSnapshot;
use galaxing::{FrameSink, Session, Settings};

const DEFAULT_RUN_SECS: u64 = 60;
const SWEEP_MS: u128 = 1200;
const LOG_EVERY_TICKS: u64 = 120;

/// Logs a one-line summary every couple of seconds
struct LogSink {
    last_logged: u64,
}

impl FrameSink for LogSink {
    fn present(&mut self, frame: &FrameSnapshot) {
        if frame.tick >= self.last_logged + LOG_EVERY_TICKS {
            self.last_logged = frame.tick;
            let hud = &frame.hud;
            log::info!(
                "tick {}: score {} lives {} level {} enemies {} bullets {}",
                frame.tick,
                hud.score,
                hud.lives,
                hud.level,
                frame.enemies.len(),
                frame.bullets.len()
            );
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Galaxing (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = args
        .next()
        .map(|path| Settings::load(Path::new(&path)))
        .unwrap_or_default();
    let run_for = Duration::from_secs(
        args.next()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_RUN_SECS),
    );

    let store: Box<dyn HighScoreStore> = match settings.high_score_file() {
        Some(path) => Box::new(JsonFileStore::new(path)),
        None => Box::new(JsonFileStore::unavailable()),
    };

    let mut session = match Session::start(
        &settings,
        &StaticAssets::stock(),
        store,
        Box::new(LogSink { last_logged: 0 }),
    ) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Could not start session: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let input = session.input();
    let started = Instant::now();
    let mut heading_left = false;
    let mut leaving = false;

    while session.is_running() && started.elapsed() < run_for {
        let left = (started.elapsed().as_millis() / SWEEP_MS) % 2 == 0;
        if left != heading_left {
            heading_left = left;
            input.move_left(left);
            input.move_right(!left);
        }

        let game_over = session.latest_frame().is_some_and(|f| f.hud.game_over);
        if game_over && !leaving {
            leaving = true;
            log::info!("Choosing exit from the game over menu");
            input.focus_next();
            input.confirm();
        }

        thread::sleep(Duration::from_millis(50));
    }

    session.stop();
    if let Some(frame) = session.latest_frame() {
        log::info!(
            "Final score {} (high score {})",
            frame.hud.score,
            frame.hud.high_score
        );
    }
    ExitCode::SUCCESS
}
