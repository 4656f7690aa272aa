use core::fmt::{self, Display};
use serde::Serialize;

/// Malformed question data detected while resolving a question for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigurationError {
    /// A multiple-choice question has no options in the requested language.
    NoOptions,
    /// The correct answer is not one of the options offered.
    AnswerNotOffered,
}

impl Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NoOptions => "This question has no answer options.",
            Self::AnswerNotOffered => "The correct answer for this question is not among its options.",
        })
    }
}
