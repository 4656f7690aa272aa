#![no_std]
extern crate alloc;

pub mod contact;
pub mod question;
pub mod score;

pub use contact::{ContactError, UserInfo};
pub use question::{Language, Question, QuestionKind};
pub use score::{total_score, LeaderboardEntry, ScoreTier};
