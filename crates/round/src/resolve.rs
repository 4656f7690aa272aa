use crate::error::ConfigurationError;
use alloc::boxed::Box;
use model::{Language, Question, QuestionKind};

/// Fixed choices for yes/no questions, per language.
pub const fn yes_no(language: Language) -> [&'static str; 2] {
    match language {
        Language::Primary => ["Yes", "No"],
        Language::Alt => ["Oui", "Non"],
    }
}

/// Question content as it should be presented in one language.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolved {
    pub text: Box<str>,
    pub options: Box<[Box<str>]>,
    pub correct_answer: Box<str>,
}

impl Resolved {
    pub fn offers(&self, answer: &str) -> bool {
        self.options.iter().any(|option| &**option == answer)
    }
}

/// Picks the prompt, choices and correct answer for `language`, falling back to
/// the primary fields wherever a translation is missing or empty.
pub fn resolve(question: &Question, language: Language) -> Result<Resolved, ConfigurationError> {
    let alt = language.is_alt();

    let text = match question.text_alt.as_deref().filter(|text| !text.is_empty()) {
        Some(text) if alt => text,
        _ => question.text.as_str(),
    };

    let options: Box<[Box<str>]> = match question.kind {
        QuestionKind::YesNo => yes_no(language).into_iter().map(Box::from).collect(),
        QuestionKind::MultipleChoice => {
            let source = if alt && !question.options_alt.is_empty() { &question.options_alt } else { &question.options };
            source.iter().map(|option| Box::from(option.as_str())).collect()
        }
    };

    if options.is_empty() {
        return Err(ConfigurationError::NoOptions);
    }

    let correct_answer = match question.correct_answer_alt.as_deref().filter(|answer| !answer.is_empty()) {
        Some(answer) if alt => answer,
        _ => question.correct_answer.as_str(),
    };

    let resolved = Resolved { text: text.into(), options, correct_answer: correct_answer.into() };
    if !resolved.offers(correct_answer) {
        return Err(ConfigurationError::AnswerNotOffered);
    }

    Ok(resolved)
}
