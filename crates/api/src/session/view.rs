use super::{AnswerRecord, Session, Stage};
use alloc::boxed::Box;
use model::{total_score, ContactError, Language, ScoreTier, UserInfo};
use round::{ConfigurationError, Phase, QuestionRound, Verdict};
use serde::Serialize;

/// Everything the kiosk needs to draw the current screen.
#[derive(Debug, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum View<'a> {
    Language { language: Language },
    Welcome { language: Language },
    UserInfo { language: Language, contact: Option<&'a UserInfo>, errors: &'a [ContactError] },
    Question(QuestionView<'a>),
    NoQuestions { language: Language },
    WebsiteBonus { language: Language, score: u32, bonus_points: u32 },
    RegisterPrompt { language: Language, bonus_points: u32 },
    Results(ResultsView<'a>),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView<'a> {
    pub language: Language,
    /// One-based position of the question in the quiz.
    pub number: usize,
    pub total: usize,
    pub score: u32,
    pub phase: Phase,
    pub text: &'a str,
    pub options: &'a [Box<str>],
    pub points: u32,
    pub time_remaining: u32,
    pub selected: Option<&'a str>,
    pub verdict: Option<Verdict>,
    /// Revealed once the answer is locked.
    pub correct_answer: Option<&'a str>,
    /// Only present while the educational slide is up.
    pub educational_image: Option<&'a str>,
    /// Set when the question cannot be displayed and may only be skipped.
    pub configuration_error: Option<ConfigurationError>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsView<'a> {
    pub language: Language,
    pub first_name: &'a str,
    pub base_score: u32,
    pub bonus: u32,
    pub total: u32,
    pub tier: ScoreTier,
    pub has_account: bool,
    pub entered_grand_prize: bool,
    pub answers: &'a [AnswerRecord],
}

/// Response body for every session request.
#[derive(Debug, Serialize)]
pub struct Reply<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<&'a str>,
    /// Set only on the response to a correct selection.
    pub celebrate: bool,
    #[serde(flatten)]
    pub view: View<'a>,
}

impl Session {
    pub fn view(&self) -> View<'_> {
        let language = self.language;
        match &self.stage {
            Stage::Language => View::Language { language },
            Stage::Welcome => View::Welcome { language },
            Stage::UserInfo(errors) => View::UserInfo { language, contact: self.contact.as_ref(), errors },
            Stage::Quiz(round) => View::Question(self.question_view(round)),
            Stage::NoQuestions => View::NoQuestions { language },
            Stage::WebsiteBonus => {
                View::WebsiteBonus { language, score: self.score, bonus_points: self.rules.bonus_points }
            }
            Stage::RegisterPrompt => View::RegisterPrompt { language, bonus_points: self.rules.bonus_points },
            &Stage::Results { has_account, entered } => {
                let total = total_score(self.score, has_account, self.rules.bonus_points);
                View::Results(ResultsView {
                    language,
                    first_name: self.contact.as_ref().map_or("", |contact| contact.first_name.as_str()),
                    base_score: self.score,
                    bonus: total - self.score,
                    total,
                    tier: ScoreTier::from_total(total),
                    has_account,
                    entered_grand_prize: entered,
                    answers: &self.answers,
                })
            }
        }
    }

    fn question_view<'a>(&'a self, round: &'a QuestionRound) -> QuestionView<'a> {
        let question = round.question();
        let (text, options, correct_answer, configuration_error) = match round.resolved() {
            Ok(resolved) => (&*resolved.text, &*resolved.options, Some(&*resolved.correct_answer), None),
            Err(err) => {
                let text = match &question.text_alt {
                    Some(text) if round.language().is_alt() => text.as_str(),
                    _ => question.text.as_str(),
                };
                (text, &[][..], None, Some(err))
            }
        };

        let locked = round.is_locked();
        QuestionView {
            language: round.language(),
            number: self.index + 1,
            total: self.questions.len(),
            score: self.score,
            phase: round.phase(),
            text,
            options,
            points: question.points,
            time_remaining: round.time_remaining(),
            selected: Some(round.selected()).filter(|selected| locked && !selected.is_empty()),
            verdict: round.verdict(),
            correct_answer: correct_answer.filter(|_| locked),
            educational_image: question.educational_image.as_deref().filter(|_| round.phase() == Phase::EducationalSlide),
            configuration_error,
        }
    }
}
