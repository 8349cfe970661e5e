//! Session time and tick pacing

use std::time::{Duration, Instant};

use crate::Millis;

/// Milliseconds of unpaused session time
#[derive(Debug, Clone)]
pub struct SessionClock {
    elapsed: Duration,
    last: Instant,
}

impl SessionClock {
    pub fn start() -> Self {
        Self {
            elapsed: Duration::ZERO,
            last: Instant::now(),
        }
    }

    /// Account for real time since the last reading. While `frozen` the
    /// clock does not move, so no timer can elapse during a pause.
    pub fn advance(&mut self, frozen: bool) -> Millis {
        let real = Instant::now();
        if !frozen {
            self.elapsed += real.saturating_duration_since(self.last);
        }
        self.last = real;
        self.now()
    }

    pub fn now(&self) -> Millis {
        Millis::try_from(self.elapsed.as_millis()).unwrap_or(Millis::MAX)
    }
}

/// Sleeps until the next tick boundary
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval: Duration,
    next: Instant,
}

impl FramePacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next: Instant::now() + interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time left until the next boundary (zero when overrun). An overrun
    /// resynchronises instead of bursting to catch up.
    pub fn remaining(&mut self) -> Duration {
        let now = Instant::now();
        if now >= self.next {
            let late = now - self.next;
            if late > self.interval {
                log::debug!("Tick overran by {:?}", late);
            }
            self.next = now + self.interval;
            Duration::ZERO
        } else {
            let wait = self.next - now;
            self.next += self.interval;
            wait
        }
    }
}
