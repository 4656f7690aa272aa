use anyhow::Context;
use api::{Rules, Settings};
use core::{num::NonZeroU32, str::FromStr, time::Duration};
use std::path::PathBuf;

/// Connection parameters for the PostgreSQL ledger.
#[derive(Debug, PartialEq, Eq)]
pub struct Postgres {
    pub host: String,
    pub user: String,
    pub password: String,
    pub dbname: String,
}

#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub questions: PathBuf,
    pub settings: Settings,
    /// `None` keeps the ledger in memory.
    pub postgres: Option<Postgres>,
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(value) => value.parse().with_context(|| format!("invalid {key}")),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port: u16 = lookup("PORT").context("missing PORT")?.parse().context("invalid PORT")?;
        let questions = lookup("QUESTIONS_PATH").map_or_else(|| PathBuf::from("questions.json"), PathBuf::from);

        let defaults = Rules::default();
        let budget: NonZeroU32 = parse_or(&lookup, "QUESTION_SECONDS", defaults.budget)?;
        let bonus_points = parse_or(&lookup, "BONUS_POINTS", defaults.bonus_points)?;
        let idle = parse_or(&lookup, "IDLE_SECONDS", Settings::default().idle.as_secs())?;
        let settings = Settings { rules: Rules { budget, bonus_points }, idle: Duration::from_secs(idle) };

        let postgres = match lookup("PG_HOSTNAME") {
            Some(host) => Some(Postgres {
                host,
                user: lookup("PG_USERNAME").context("missing PG_USERNAME")?,
                password: lookup("PG_PASSWORD").context("missing PG_PASSWORD")?,
                dbname: lookup("PG_DATABASE").context("missing PG_DATABASE")?,
            }),
            None => None,
        };

        Ok(Self { port, questions, settings, postgres })
    }
}
