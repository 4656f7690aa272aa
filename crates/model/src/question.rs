use alloc::{string::String, vec::Vec};
use serde::{Deserialize, Serialize};

/// Locales supported by the question content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Language {
    /// English. Used whenever a translated field is missing.
    #[default]
    #[serde(rename = "en")]
    Primary,
    /// French. Selects the `*Fr` fields of a [`Question`] when present.
    #[serde(rename = "fr")]
    Alt,
}

impl Language {
    pub const fn code(self) -> &'static str {
        match self {
            Self::Primary => "en",
            Self::Alt => "fr",
        }
    }

    pub const fn is_alt(self) -> bool {
        matches!(self, Self::Alt)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum QuestionKind {
    /// Choices are the fixed yes/no pair of the active language.
    #[serde(rename = "yesno")]
    YesNo,
    /// Choices come from the question itself.
    #[serde(rename = "multiple")]
    MultipleChoice,
}

/// Acceptable schema for trivia questions. Field names follow the JSON files
/// that the kiosk stores on disk.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    /// Prompt in the primary language.
    #[serde(rename = "questionText")]
    pub text: String,
    /// Prompt in the alternate language.
    #[serde(rename = "questionTextFr", default, skip_serializing_if = "Option::is_none")]
    pub text_alt: Option<String>,
    #[serde(rename = "questionType")]
    pub kind: QuestionKind,
    /// Choice labels. Empty for yes/no questions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(rename = "optionsFr", default, skip_serializing_if = "Vec::is_empty")]
    pub options_alt: Vec<String>,
    /// Label of the correct choice. Must match one of the choices exactly.
    #[serde(rename = "correctAnswer")]
    pub correct_answer: String,
    #[serde(rename = "correctAnswerFr", default, skip_serializing_if = "Option::is_none")]
    pub correct_answer_alt: Option<String>,
    /// Points awarded for a correct answer.
    pub points: u32,
    /// Image shown as an interstitial slide after the feedback.
    #[serde(rename = "imageSlideBefore", default, skip_serializing_if = "Option::is_none")]
    pub educational_image: Option<String>,
}

impl Question {
    pub fn yes_no(id: &str, text: &str, correct_answer: &str, points: u32) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            text_alt: None,
            kind: QuestionKind::YesNo,
            options: Vec::new(),
            options_alt: Vec::new(),
            correct_answer: correct_answer.into(),
            correct_answer_alt: None,
            points,
            educational_image: None,
        }
    }

    pub fn multiple_choice(id: &str, text: &str, options: &[&str], correct_answer: &str, points: u32) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            text_alt: None,
            kind: QuestionKind::MultipleChoice,
            options: options.iter().map(|&option| option.into()).collect(),
            options_alt: Vec::new(),
            correct_answer: correct_answer.into(),
            correct_answer_alt: None,
            points,
            educational_image: None,
        }
    }

    /// Attaches the alternate-language prompt and answer. The alternate options
    /// are left untouched when `options` is empty.
    pub fn with_alt(mut self, text: &str, options: &[&str], correct_answer: &str) -> Self {
        self.text_alt = Some(text.into());
        if !options.is_empty() {
            self.options_alt = options.iter().map(|&option| option.into()).collect();
        }
        self.correct_answer_alt = Some(correct_answer.into());
        self
    }

    pub fn with_image(mut self, url: &str) -> Self {
        self.educational_image = Some(url.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stored_question_format() {
        let json = r#"{
            "id": "6",
            "questionText": "Is the company Canadian owned?",
            "questionType": "yesno",
            "correctAnswer": "Yes",
            "correctAnswerFr": "Oui",
            "points": 10,
            "imageSlideBefore": "https://example.com/canada.png"
        }"#;
        let question: Question = serde_json::from_str(json).unwrap();
        assert_eq!(question.kind, QuestionKind::YesNo);
        assert!(question.options.is_empty());
        assert!(question.text_alt.is_none());
        assert_eq!(question.correct_answer_alt.as_deref(), Some("Oui"));
        assert_eq!(question.educational_image.as_deref(), Some("https://example.com/canada.png"));
    }

    #[test]
    fn omits_missing_translations() {
        let question = Question::multiple_choice("2", "Founded?", &["1955", "1962"], "1962", 15);
        let json = serde_json::to_string(&question).unwrap();
        assert!(json.contains(r#""questionType":"multiple""#));
        assert!(!json.contains("optionsFr"));
        assert!(!json.contains("imageSlideBefore"));
        let back: Question = serde_json::from_str(&json).unwrap();
        assert_eq!(back, question);
    }

    #[test]
    fn empty_alt_options_keep_translations() {
        let question = Question::multiple_choice("1", "Largest?", &["Mars", "Jupiter"], "Jupiter", 10)
            .with_alt("Plus grande?", &["Mars", "Jupiter", "Saturne"], "Jupiter")
            .with_alt("La plus grande?", &[], "Jupiter");
        assert_eq!(question.text_alt.as_deref(), Some("La plus grande?"));
        assert_eq!(question.options_alt.len(), 3);
        assert_eq!(question.options_alt[2], "Saturne");
    }

    #[test]
    fn language_codes() {
        assert_eq!(Language::default(), Language::Primary);
        assert_eq!(Language::Alt.code(), "fr");
        let lang: Language = serde_json::from_str(r#""fr""#).unwrap();
        assert!(lang.is_alt());
    }
}
