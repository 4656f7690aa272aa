use crate::{error, Database, ParticipantId, TryStreamExt};
use core::num::NonZeroI32;
use model::{Language, LeaderboardEntry, UserInfo};
use std::{
    sync::{Mutex, MutexGuard},
    time::{SystemTime, UNIX_EPOCH},
};

/// Final score of a completed quiz.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuizResult {
    pub participant: ParticipantId,
    /// Total including the account bonus.
    pub score: u32,
    /// `None` when the participant never answered the website question.
    pub has_account: Option<bool>,
}

/// Durable record of participants, their results, and grand prize entries.
pub enum Ledger {
    Postgres(Database),
    Memory(MemoryLedger),
}

impl Default for Ledger {
    fn default() -> Self {
        Self::Memory(MemoryLedger::default())
    }
}

impl From<Database> for Ledger {
    fn from(db: Database) -> Self {
        Self::Postgres(db)
    }
}

impl Ledger {
    pub async fn save_participant(&self, info: &UserInfo, language: Language) -> error::Result<ParticipantId> {
        match self {
            Self::Postgres(db) => db.save_participant(info, language).await,
            Self::Memory(mem) => mem.save_participant(info, language),
        }
    }

    pub async fn save_result(&self, result: &QuizResult) -> error::Result<()> {
        match self {
            Self::Postgres(db) => db.save_result(result).await,
            Self::Memory(mem) => mem.save_result(result),
        }
    }

    pub async fn enter_grand_prize(&self, participant: ParticipantId) -> error::Result<()> {
        match self {
            Self::Postgres(db) => db.enter_grand_prize(participant).await,
            Self::Memory(mem) => mem.enter_grand_prize(participant),
        }
    }

    /// Highest scores first; ties go to whoever finished earlier.
    pub async fn leaderboard(&self, limit: u32) -> error::Result<Vec<LeaderboardEntry>> {
        match self {
            Self::Postgres(db) => db.leaderboard(limit).await?.try_collect().await,
            Self::Memory(mem) => mem.leaderboard(limit),
        }
    }
}

struct Row {
    participant: ParticipantId,
    score: u32,
    has_account: Option<bool>,
    entered_grand_prize: bool,
    completed_at: u64,
}

#[derive(Default)]
struct Records {
    participants: Vec<(UserInfo, Language)>,
    results: Vec<Row>,
}

/// Process-local ledger used when no database is configured.
#[derive(Default)]
pub struct MemoryLedger(Mutex<Records>);

fn now_millis() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |elapsed| elapsed.as_millis() as u64)
}

impl MemoryLedger {
    fn lock(&self) -> error::Result<MutexGuard<'_, Records>> {
        self.0.lock().map_err(|_| error::Error::Fatal)
    }

    fn save_participant(&self, info: &UserInfo, language: Language) -> error::Result<ParticipantId> {
        if info.validate().is_err() {
            return Err(error::Error::BadInput);
        }

        let mut records = self.lock()?;
        let id = i32::try_from(records.participants.len() + 1).map_err(|_| error::Error::Fatal)?;
        let id = NonZeroI32::new(id).ok_or(error::Error::Fatal)?;
        records.participants.push((info.clone(), language));
        Ok(id)
    }

    fn save_result(&self, result: &QuizResult) -> error::Result<()> {
        let mut records = self.lock()?;
        if records.participant(result.participant).is_none() {
            return Err(error::Error::NotFound);
        }

        // One result per participant.
        if records.results.iter().any(|row| row.participant == result.participant) {
            return Err(error::Error::BadInput);
        }

        records.results.push(Row {
            participant: result.participant,
            score: result.score,
            has_account: result.has_account,
            entered_grand_prize: false,
            completed_at: now_millis(),
        });
        Ok(())
    }

    fn enter_grand_prize(&self, participant: ParticipantId) -> error::Result<()> {
        let mut records = self.lock()?;
        let row = records.results.iter_mut().find(|row| row.participant == participant).ok_or(error::Error::NotFound)?;
        row.entered_grand_prize = true;
        Ok(())
    }

    fn leaderboard(&self, limit: u32) -> error::Result<Vec<LeaderboardEntry>> {
        let records = self.lock()?;
        let mut rows: Vec<_> = records.results.iter().collect();
        rows.sort_by(|a, b| b.score.cmp(&a.score).then(a.completed_at.cmp(&b.completed_at)));

        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        rows.into_iter()
            .take(limit)
            .map(|row| -> error::Result<LeaderboardEntry> {
                let (info, _) = records.participant(row.participant).ok_or(error::Error::Fatal)?;
                Ok(LeaderboardEntry { first_name: info.first_name.clone(), score: row.score, timestamp: row.completed_at })
            })
            .collect()
    }

    #[cfg(test)]
    /// Whether the participant's result has been entered into the grand prize draw.
    pub fn has_entered_grand_prize(&self, participant: ParticipantId) -> bool {
        self.0
            .lock()
            .map(|records| records.results.iter().any(|row| row.participant == participant && row.entered_grand_prize))
            .unwrap_or(false)
    }

    #[cfg(test)]
    /// Account answer stored with the participant's result, if any result exists.
    pub fn recorded_account(&self, participant: ParticipantId) -> Option<Option<bool>> {
        let records = self.0.lock().ok()?;
        records.results.iter().find(|row| row.participant == participant).map(|row| row.has_account)
    }
}

impl Records {
    fn participant(&self, id: ParticipantId) -> Option<&(UserInfo, Language)> {
        let index = usize::try_from(id.get()).ok()?.checked_sub(1)?;
        self.participants.get(index)
    }
}
