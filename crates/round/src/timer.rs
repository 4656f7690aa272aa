//! Whole-second countdown driven by an external periodic tick.
//!
//! The countdown owns no scheduling resources. Whoever owns it (a session task
//! in practice) registers the periodic tick and calls [`Countdown::tick`] once
//! per second; stopping the countdown simply makes further ticks inert.

use core::num::NonZeroU32;

/// Outcome of a single tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// The countdown is stopped or has already expired.
    Idle,
    /// The countdown moved to the given number of remaining seconds.
    Running(u32),
    /// The countdown just reached zero. Reported exactly once per run.
    Expired,
}

#[derive(Clone, Debug, Default)]
pub struct Countdown {
    remaining: u32,
    active: bool,
}

impl Countdown {
    pub const fn new() -> Self {
        Self { remaining: 0, active: false }
    }

    /// Begins a fresh run. Any previous run is stopped first.
    pub fn start(&mut self, budget: NonZeroU32) {
        self.stop();
        self.remaining = budget.get();
        self.active = true;
    }

    pub fn tick(&mut self) -> Tick {
        if !self.active || self.remaining == 0 {
            return Tick::Idle;
        }

        self.remaining -= 1;
        if self.remaining > 0 {
            return Tick::Running(self.remaining);
        }

        self.active = false;
        Tick::Expired
    }

    /// Halts the countdown without expiring it. Idempotent.
    pub fn stop(&mut self) {
        self.active = false;
    }

    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    pub const fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn secs(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn counts_down_to_a_single_expiry() {
        let mut countdown = Countdown::new();
        countdown.start(secs(15));
        assert_eq!(countdown.remaining(), 15);

        let mut seen = Vec::from([countdown.remaining()]);
        let mut expiries = 0;
        for _ in 0..20 {
            match countdown.tick() {
                Tick::Running(remaining) => seen.push(remaining),
                Tick::Expired => {
                    expiries += 1;
                    seen.push(countdown.remaining());
                }
                Tick::Idle => {}
            }
        }

        let expected: Vec<_> = (0..=15).rev().collect();
        assert_eq!(seen, expected);
        assert_eq!(expiries, 1);
        assert!(!countdown.is_active());
    }

    #[test]
    fn expires_on_the_last_tick() {
        let mut countdown = Countdown::new();
        countdown.start(secs(2));
        assert_eq!(countdown.tick(), Tick::Running(1));
        assert_eq!(countdown.tick(), Tick::Expired);
        assert_eq!(countdown.tick(), Tick::Idle);
        assert_eq!(countdown.remaining(), 0);
    }

    #[test]
    fn stop_is_idempotent_and_never_expires() {
        let mut countdown = Countdown::new();
        countdown.start(secs(3));
        assert_eq!(countdown.tick(), Tick::Running(2));
        assert_eq!(countdown.tick(), Tick::Running(1));

        countdown.stop();
        countdown.stop();
        countdown.stop();
        assert!(!countdown.is_active());
        assert_eq!(countdown.remaining(), 1);

        for _ in 0..5 {
            assert_eq!(countdown.tick(), Tick::Idle);
        }
        assert_eq!(countdown.remaining(), 1);
    }

    #[test]
    fn stop_after_expiry_is_a_no_op() {
        let mut countdown = Countdown::new();
        countdown.start(secs(1));
        assert_eq!(countdown.tick(), Tick::Expired);
        countdown.stop();
        assert_eq!(countdown.remaining(), 0);
        assert_eq!(countdown.tick(), Tick::Idle);
    }

    #[test]
    fn restart_replaces_the_running_countdown() {
        let mut countdown = Countdown::new();
        countdown.start(secs(5));
        countdown.tick();
        countdown.tick();

        countdown.start(secs(4));
        assert_eq!(countdown.remaining(), 4);
        assert_eq!(countdown.tick(), Tick::Running(3));
    }

    #[test]
    fn fresh_countdown_is_idle() {
        let mut countdown = Countdown::default();
        assert!(!countdown.is_active());
        assert_eq!(countdown.tick(), Tick::Idle);
    }
}
