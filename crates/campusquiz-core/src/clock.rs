//! Round countdown driven by explicit ticks.
//!
//! Nothing here reads the wall clock. A scheduler (the CLI's tokio interval,
//! or a test loop) calls [`Countdown::tick`] at a fixed small interval.

use std::time::Duration;

/// Ticks that make up one game second.
pub const TICKS_PER_SECOND: u32 = 100;

/// Default length of a round in game seconds.
pub const DEFAULT_ROUND_SECONDS: u32 = 60;

/// Default real-time spacing between ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(10);

/// Time left on the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeRemaining {
    pub seconds: u32,
    pub centis: u32,
}

impl TimeRemaining {
    pub fn is_zero(self) -> bool {
        self.seconds == 0 && self.centis == 0
    }
}

impl std::fmt::Display for TimeRemaining {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.seconds, self.centis)
    }
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Time was deducted and some remains.
    Running(TimeRemaining),
    /// This tick used up the last of the time.
    Expired,
    /// The countdown was not running; nothing changed.
    Stopped,
}

/// A seconds/centiseconds countdown.
#[derive(Debug, Clone)]
pub struct Countdown {
    round_seconds: u32,
    remaining: TimeRemaining,
    running: bool,
}

impl Countdown {
    /// A stopped countdown set to `round_seconds:00`.
    pub fn new(round_seconds: u32) -> Self {
        Self {
            round_seconds,
            remaining: TimeRemaining {
                seconds: round_seconds,
                centis: 0,
            },
            running: false,
        }
    }

    /// Rewind to a full round and start running.
    pub fn start(&mut self) {
        self.reset();
        self.running = true;
    }

    /// Stop the countdown. Stopping twice is harmless.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Stop and rewind to a full round.
    pub fn reset(&mut self) {
        self.running = false;
        self.remaining = TimeRemaining {
            seconds: self.round_seconds,
            centis: 0,
        };
    }

    /// Deduct one centisecond, borrowing a second when needed.
    pub fn tick(&mut self) -> Tick {
        if !self.running {
            return Tick::Stopped;
        }
        if self.remaining.centis == 0 {
            if self.remaining.seconds == 0 {
                self.running = false;
                return Tick::Expired;
            }
            self.remaining.seconds -= 1;
            self.remaining.centis = TICKS_PER_SECOND;
        }
        self.remaining.centis -= 1;

        if self.remaining.is_zero() {
            self.running = false;
            Tick::Expired
        } else {
            Tick::Running(self.remaining)
        }
    }

    pub fn remaining(&self) -> TimeRemaining {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn round_seconds(&self) -> u32 {
        self.round_seconds
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(DEFAULT_ROUND_SECONDS)
    }
}
