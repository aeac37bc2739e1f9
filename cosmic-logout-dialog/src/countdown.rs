// Copyright 2023 System76 <info@system76.com>
// SPDX-License-Identifier: GPL-3.0-only

/// Seconds left before the dialog answers on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    initial: u32,
    remaining: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Seconds to display for this tick.
    Remaining(u32),
    Expired,
}

impl Countdown {
    /// Returns `None` for a zero or negative timeout, which disables the
    /// countdown.
    pub fn new(timeout_secs: i32) -> Option<Self> {
        let initial = u32::try_from(timeout_secs).ok().filter(|&t| t > 0)?;
        Some(Self {
            initial,
            remaining: initial,
        })
    }

    /// Yields the value to show and counts down. Once zero has been
    /// reached the next tick expires.
    pub fn tick(&mut self) -> Tick {
        if self.remaining == 0 {
            return Tick::Expired;
        }

        let shown = self.remaining;
        self.remaining -= 1;
        Tick::Remaining(shown)
    }

    pub fn fraction(&self, shown: u32) -> f32 {
        (shown as f32 / self.initial as f32).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_for_non_positive_timeouts() {
        assert_eq!(Countdown::new(0), None);
        assert_eq!(Countdown::new(-5), None);
    }

    #[test]
    fn expires_after_showing_every_second() {
        let mut countdown = Countdown::new(3).unwrap();
        assert_eq!(countdown.tick(), Tick::Remaining(3));
        assert_eq!(countdown.tick(), Tick::Remaining(2));
        assert_eq!(countdown.tick(), Tick::Remaining(1));
        assert_eq!(countdown.tick(), Tick::Expired);
        assert_eq!(countdown.tick(), Tick::Expired);
    }

    #[test]
    fn fraction_tracks_initial_timeout() {
        let countdown = Countdown::new(120).unwrap();
        assert_eq!(countdown.fraction(120), 1.0);
        assert_eq!(countdown.fraction(30), 0.25);
        assert_eq!(countdown.fraction(0), 0.0);
    }
}
