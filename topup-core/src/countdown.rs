//! Whole-second countdowns driven by the one-second UI tick.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Countdown {
    remaining_secs: u32,
}

impl Countdown {
    #[must_use]
    pub const fn new(secs: u32) -> Self {
        Self {
            remaining_secs: secs,
        }
    }

    #[must_use]
    pub const fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// Advance one second. Returns `true` on the tick that reaches zero.
    pub const fn tick(&mut self) -> bool {
        if self.remaining_secs == 0 {
            return false;
        }
        self.remaining_secs -= 1;
        self.remaining_secs == 0
    }
}

/// `HH:MM:SS`; hours are not wrapped at 24.
#[must_use]
pub fn format_duration(mut secs: u64) -> String {
    let hours = secs / 3_600;
    secs -= hours * 3_600;
    let minutes = secs / 60;
    secs -= minutes * 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}
