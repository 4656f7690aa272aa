use core::fmt::{self, Display};
use std::io;

#[derive(Debug)]
pub enum Error {
    /// The record violates a constraint of the store.
    BadInput,
    /// The referenced participant or result does not exist.
    NotFound,
    /// The question file could not be read or written.
    Io,
    /// Unrecoverable error.
    Fatal,
}

impl From<io::Error> for Error {
    fn from(_: io::Error) -> Self {
        Self::Io
    }
}

impl From<serde_json::Error> for Error {
    fn from(_: serde_json::Error) -> Self {
        Self::Fatal
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BadInput => "Record rejected by the store.",
            Self::NotFound => "Record not found.",
            Self::Io => "Failed to access the question file.",
            Self::Fatal => "Unexpected storage error.",
        })
    }
}

impl std::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
