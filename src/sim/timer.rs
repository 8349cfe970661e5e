//! Wall-clock cooldowns
//!
//! Every timed behaviour in the simulation (player fire rate, enemy shot
//! timers, animation frames, wave delay, high score blink) is expressed as
//! `armed_at + interval` on the session clock.

use crate::Millis;

/// A re-armable interval timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cooldown {
    armed_at: Millis,
    interval: Millis,
}

impl Cooldown {
    pub fn new(armed_at: Millis, interval: Millis) -> Self {
        Self {
            armed_at,
            interval: interval.max(0),
        }
    }

    /// A cooldown that has already elapsed at time zero
    pub fn ready(interval: Millis) -> Self {
        Self::new(-interval.max(0), interval)
    }

    /// True once at least `interval` ms have passed since arming
    #[inline]
    pub fn elapsed(&self, now: Millis) -> bool {
        now - self.armed_at >= self.interval
    }

    /// Restart the interval from `now`
    #[inline]
    pub fn rearm(&mut self, now: Millis) {
        self.armed_at = now;
    }

    /// Restart from `now` with a new interval
    pub fn rearm_with(&mut self, now: Millis, interval: Millis) {
        self.armed_at = now;
        self.interval = interval.max(0);
    }

    /// If elapsed, re-arm at `now` and report true
    pub fn fire(&mut self, now: Millis) -> bool {
        if self.elapsed(now) {
            self.armed_at = now;
            true
        } else {
            false
        }
    }

    pub fn armed_at(&self) -> Millis {
        self.armed_at
    }

    pub fn interval(&self) -> Millis {
        self.interval
    }

    /// Absolute time at which the cooldown elapses
    pub fn deadline(&self) -> Millis {
        self.armed_at + self.interval
    }
}
