//! Where the question set lives between kiosk restarts.

use crate::{error, seed};
use model::Question;
use std::{
    fs, io,
    path::PathBuf,
    sync::{PoisonError, RwLock},
};

pub trait QuestionRepository: Send + Sync {
    /// Returns the current question set. Never fails: unreadable storage falls back to defaults.
    fn get(&self) -> Vec<Question>;
    fn put(&self, questions: &[Question]) -> error::Result<()>;
}

/// Question set stored as a JSON array on disk.
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Option<Vec<Question>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::info!("question file {} does not exist yet", self.path.display());
                return None;
            }
            Err(err) => {
                log::warn!("cannot read question file {}: {err}", self.path.display());
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(questions) => Some(questions),
            Err(err) => {
                log::warn!("malformed question file {}: {err}", self.path.display());
                None
            }
        }
    }
}

impl QuestionRepository for JsonFile {
    fn get(&self) -> Vec<Question> {
        if let Some(questions) = self.read() {
            return questions;
        }

        let questions = seed::default_questions();
        match self.put(&questions) {
            Ok(()) => log::info!("seeded {} with {} default questions", self.path.display(), questions.len()),
            Err(err) => log::error!("cannot seed question file {}: {err}", self.path.display()),
        }
        questions
    }

    fn put(&self, questions: &[Question]) -> error::Result<()> {
        let bytes = serde_json::to_vec_pretty(questions)?;
        fs::write(&self.path, bytes)?;
        Ok(())
    }
}

/// Question set held in memory for the lifetime of the process.
#[derive(Default)]
pub struct Memory(RwLock<Vec<Question>>);

impl From<Vec<Question>> for Memory {
    fn from(questions: Vec<Question>) -> Self {
        Self(RwLock::new(questions))
    }
}

impl QuestionRepository for Memory {
    fn get(&self) -> Vec<Question> {
        self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn put(&self, questions: &[Question]) -> error::Result<()> {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = questions.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("trivia-{}-{name}.json", std::process::id()));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn missing_file_is_seeded() {
        let path = scratch("missing");
        let repo = JsonFile::new(&path);

        let questions = repo.get();
        assert_eq!(questions, seed::default_questions());
        assert!(path.exists());

        // The seeded file is read back on the next call.
        assert_eq!(repo.get(), questions);
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let path = scratch("malformed");
        fs::write(&path, b"{ not json").unwrap();

        let repo = JsonFile::new(&path);
        assert_eq!(repo.get().len(), seed::default_questions().len());
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn stored_questions_survive() {
        let path = scratch("stored");
        let repo = JsonFile::new(&path);
        let questions = [Question::yes_no("1", "Is water wet?", "Yes", 5)];
        repo.put(&questions).unwrap();

        let reopened = JsonFile::new(&path);
        assert_eq!(reopened.get(), questions);
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn memory_replaces_the_whole_set() {
        let repo = Memory::default();
        assert!(repo.get().is_empty());

        repo.put(&[Question::yes_no("1", "First?", "Yes", 5), Question::yes_no("2", "Second?", "No", 5)]).unwrap();
        assert_eq!(repo.get().len(), 2);

        repo.put(&[]).unwrap();
        assert!(repo.get().is_empty());
    }
}
