use alloc::string::String;
use serde::{Deserialize, Serialize};

/// Message band shown on the results screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    Outstanding,
    Great,
    Good,
    Thanks,
}

impl ScoreTier {
    pub const fn from_total(total: u32) -> Self {
        match total {
            80.. => Self::Outstanding,
            60..=79 => Self::Great,
            40..=59 => Self::Good,
            _ => Self::Thanks,
        }
    }
}

/// Final score including the account bonus, if the participant claimed it.
pub const fn total_score(base: u32, has_account: bool, bonus_points: u32) -> u32 {
    if has_account {
        base.saturating_add(bonus_points)
    } else {
        base
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub first_name: String,
    pub score: u32,
    /// Completion time in milliseconds since the Unix epoch.
    pub timestamp: u64,
}
