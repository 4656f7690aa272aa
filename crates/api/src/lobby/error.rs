use core::fmt::{self, Display};
use hyper::StatusCode;

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    UnknownRoute,
    MethodNotAllowed,
    BadRequest,
    UnknownSession,
    /// The ledger could not record the participant.
    Storage,
    Fatal,
}

impl Error {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::UnknownRoute | Self::UnknownSession => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Storage => StatusCode::SERVICE_UNAVAILABLE,
            Self::Fatal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UnknownRoute => "Resource not found.",
            Self::MethodNotAllowed => "Method not allowed.",
            Self::BadRequest => "Malformed request.",
            Self::UnknownSession => "Session not found. It may have already expired.",
            Self::Storage => "We could not save your details. Please try again.",
            Self::Fatal => "Oops! We have encountered an unrecoverable error on our end.",
        })
    }
}

pub type Result<T> = core::result::Result<T, Error>;
