#![no_std]
extern crate alloc;

pub mod error;
pub mod machine;
pub mod resolve;
pub mod timer;

use core::num::NonZeroU32;

pub use error::ConfigurationError;
pub use machine::{Answered, Event, Phase, QuestionRound, Signal, Verdict};
pub use resolve::{resolve, Resolved};
pub use timer::{Countdown, Tick};

/// Seconds granted to answer a question unless configured otherwise.
pub const DEFAULT_BUDGET: NonZeroU32 = match NonZeroU32::new(15) {
    Some(budget) => budget,
    None => unreachable!(),
};
