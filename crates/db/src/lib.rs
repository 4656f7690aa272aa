pub mod error;
pub mod ledger;
pub mod repo;
pub mod seed;

use core::num::NonZeroI32;
use model::{Language, LeaderboardEntry, UserInfo};
use tokio_postgres::error::SqlState;

pub use futures_util::{TryStream, TryStreamExt};
pub use ledger::{Ledger, MemoryLedger, QuizResult};
pub use repo::{JsonFile, Memory, QuestionRepository};
pub use tokio_postgres::{tls::NoTls, Client, Config};

/// Identifier assigned to a participant by the ledger.
pub type ParticipantId = NonZeroI32;

/// Table definitions expected by [`Database`].
pub const SCHEMA: &str = include_str!("../schema.sql");

pub struct Database(Client);

impl From<Client> for Database {
    fn from(client: Client) -> Self {
        Self(client)
    }
}

fn deserialize_entry_from_row(row: tokio_postgres::Row) -> error::Result<LeaderboardEntry> {
    let first_name = row.try_get("first_name").map_err(|_| error::Error::Fatal)?;
    let score: i32 = row.try_get("score").map_err(|_| error::Error::Fatal)?;
    let timestamp: i64 = row.try_get("timestamp").map_err(|_| error::Error::Fatal)?;
    let score = u32::try_from(score).map_err(|_| error::Error::Fatal)?;
    let timestamp = u64::try_from(timestamp).map_err(|_| error::Error::Fatal)?;
    Ok(LeaderboardEntry { first_name, score, timestamp })
}

impl Database {
    /// Creates the tables if they do not exist yet.
    pub async fn migrate(&self) -> error::Result<()> {
        self.0.batch_execute(SCHEMA).await.map_err(|_| error::Error::Fatal)
    }

    pub async fn save_participant(&self, info: &UserInfo, language: Language) -> error::Result<ParticipantId> {
        let err = match self
            .0
            .query_one(
                "INSERT INTO participant (first_name, company_name, email, language) VALUES ($1, $2, $3, $4) RETURNING id",
                &[&info.first_name.trim(), &info.company_name.trim(), &info.email.trim(), &language.code()],
            )
            .await
        {
            Ok(row) => {
                let id: i32 = row.try_get("id").map_err(|_| error::Error::Fatal)?;
                return NonZeroI32::new(id).ok_or(error::Error::Fatal);
            }
            Err(err) => err,
        };

        let err = err.as_db_error().ok_or(error::Error::Fatal)?;
        Err(match *err.code() {
            // Blank or malformed contact details.
            SqlState::CHECK_VIOLATION => error::Error::BadInput,
            // Contact details longer than the column allows.
            SqlState::STRING_DATA_RIGHT_TRUNCATION => error::Error::BadInput,
            _ => error::Error::Fatal,
        })
    }

    pub async fn save_result(&self, result: &QuizResult) -> error::Result<()> {
        let pid = result.participant.get();
        let score = i32::try_from(result.score).map_err(|_| error::Error::BadInput)?;
        let err = match self
            .0
            .execute(
                "INSERT INTO result (participant, score, has_account) VALUES ($1, $2, $3)",
                &[&pid, &score, &result.has_account],
            )
            .await
        {
            Ok(1) => return Ok(()),
            Err(err) => err,
            _ => return Err(error::Error::Fatal),
        };

        let err = err.as_db_error().ok_or(error::Error::Fatal)?;
        Err(match *err.code() {
            // The participant was never saved.
            SqlState::FOREIGN_KEY_VIOLATION => error::Error::NotFound,
            // A result has already been recorded for this participant.
            SqlState::UNIQUE_VIOLATION => error::Error::BadInput,
            _ => error::Error::Fatal,
        })
    }

    pub async fn enter_grand_prize(&self, participant: ParticipantId) -> error::Result<()> {
        let pid = participant.get();
        match self
            .0
            .execute("UPDATE result SET entered_grand_prize = TRUE WHERE participant = $1", &[&pid])
            .await
        {
            Ok(0) => Err(error::Error::NotFound),
            Ok(_) => Ok(()),
            Err(_) => Err(error::Error::Fatal),
        }
    }

    pub async fn leaderboard(
        &self,
        limit: u32,
    ) -> error::Result<impl TryStream<Ok = LeaderboardEntry, Error = error::Error> + '_> {
        let limit = i64::from(limit);
        Ok(self
            .0
            .query_raw(
                "SELECT p.first_name, r.score, (EXTRACT(EPOCH FROM r.completed_at) * 1000)::BIGINT AS timestamp \
                 FROM result r JOIN participant p ON p.id = r.participant \
                 ORDER BY r.score DESC, r.completed_at ASC LIMIT $1",
                &[&limit],
            )
            .await
            .map_err(|_| error::Error::Fatal)?
            .map_err(|_| error::Error::Fatal)
            .and_then(|row| core::future::ready(deserialize_entry_from_row(row))))
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, Database, Language, NoTls, QuizResult, TryStreamExt, UserInfo};

    #[tokio::test(flavor = "current_thread")]
    #[ignore = "requires a PostgreSQL instance configured through PG_* variables"]
    async fn database_test() {
        use std::env::var;
        let user = var("PG_USERNAME").unwrap();
        let pass = var("PG_PASSWORD").unwrap();
        let host = var("PG_HOSTNAME").unwrap();
        let data = var("PG_DATABASE").unwrap();

        let (client, conn) = Config::new()
            .user(&user)
            .password(&pass)
            .host(&host)
            .dbname(&data)
            .port(5432)
            .connect(NoTls)
            .await
            .expect("cannot connect to database");
        let handle = tokio::spawn(conn);
        let db = Database::from(client);
        db.migrate().await.unwrap();

        // Blank names violate the check constraint
        let blank = UserInfo { first_name: "  ".into(), company_name: "Acme".into(), email: "a@acme.io".into() };
        assert!(matches!(db.save_participant(&blank, Language::Primary).await, Err(super::error::Error::BadInput)));

        // Participant and result
        let info = UserInfo { first_name: "Ada".into(), company_name: "Acme".into(), email: "ada@acme.io".into() };
        let pid = db.save_participant(&info, Language::Alt).await.unwrap();
        let result = QuizResult { participant: pid, score: i32::MAX as u32, has_account: Some(true) };
        db.save_result(&result).await.unwrap();
        assert!(matches!(db.save_result(&result).await, Err(super::error::Error::BadInput)));
        db.enter_grand_prize(pid).await.unwrap();

        // Highest score tops the board
        let board: Vec<_> = db.leaderboard(10).await.unwrap().try_collect().await.unwrap();
        assert_eq!(board[0].first_name, "Ada");
        assert_eq!(board[0].score, i32::MAX as u32);

        drop(db);
        handle.await.unwrap().unwrap();
    }
}
