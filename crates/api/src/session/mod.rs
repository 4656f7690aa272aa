//! Screen sequence of one kiosk visit.
//!
//! A [`Session`] is pure state: it never touches storage. Commands that need
//! the ledger return an [`Effect`] which the owner carries out before calling
//! back into the session (see [`Session::admit`]).

mod view;

pub use view::{QuestionView, Reply, ResultsView, View};

use alloc::{boxed::Box, string::String, sync::Arc, vec::Vec};
use core::num::NonZeroU32;
use db::{ParticipantId, QuizResult};
use model::{total_score, ContactError, Language, Question, UserInfo};
use round::{Answered, Event, QuestionRound, Signal};
use serde::{Deserialize, Serialize};

/// Participant input, tagged by `action` on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Command {
    ChooseLanguage { language: Language },
    Start,
    Back,
    SubmitContact(UserInfo),
    Select { answer: String },
    Advance,
    Skip,
    Bonus { has_account: bool },
    ContinueWithoutRegistering,
    EnterGrandPrize,
    Home,
}

/// Follow-up work requested by [`Session::apply`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    Nothing,
    /// The selected answer is correct.
    Celebrate,
    /// Valid contact details that must be saved before the quiz can start.
    Register(UserInfo),
    /// The quiz is over and its result should be recorded.
    Complete(QuizResult),
    GrandPrize(ParticipantId),
}

/// Knobs shared by every session.
#[derive(Clone, Copy, Debug)]
pub struct Rules {
    /// Seconds granted per question.
    pub budget: NonZeroU32,
    /// Points added when the participant already has a website account.
    pub bonus_points: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self { budget: round::DEFAULT_BUDGET, bonus_points: 25 }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub question_id: String,
    pub selected: Box<str>,
    pub correct: bool,
    pub points: u32,
}

#[derive(Debug)]
enum Stage {
    Language,
    Welcome,
    /// Holds the problems found in the last submission.
    UserInfo(Vec<ContactError>),
    Quiz(QuestionRound),
    NoQuestions,
    WebsiteBonus,
    RegisterPrompt,
    Results { has_account: bool, entered: bool },
}

#[derive(Debug)]
pub struct Session {
    rules: Rules,
    language: Language,
    stage: Stage,
    contact: Option<UserInfo>,
    participant: Option<ParticipantId>,
    questions: Vec<Arc<Question>>,
    index: usize,
    score: u32,
    answers: Vec<AnswerRecord>,
    fresh_round: bool,
}

impl Session {
    pub fn new(rules: Rules) -> Self {
        Self {
            rules,
            language: Language::default(),
            stage: Stage::Language,
            contact: None,
            participant: None,
            questions: Vec::new(),
            index: 0,
            score: 0,
            answers: Vec::new(),
            fresh_round: false,
        }
    }

    pub fn apply(&mut self, command: Command) -> Effect {
        match command {
            Command::Home => {
                self.reset();
                Effect::Nothing
            }
            Command::ChooseLanguage { language } if matches!(self.stage, Stage::Language) => {
                self.language = language;
                self.stage = Stage::Welcome;
                Effect::Nothing
            }
            Command::Start if matches!(self.stage, Stage::Welcome) => {
                self.stage = Stage::UserInfo(Vec::new());
                Effect::Nothing
            }
            Command::Back => {
                match self.stage {
                    Stage::Welcome => self.stage = Stage::Language,
                    Stage::UserInfo(_) => self.stage = Stage::Welcome,
                    _ => {}
                }
                Effect::Nothing
            }
            Command::SubmitContact(info) if matches!(self.stage, Stage::UserInfo(_)) => self.submit(info),
            Command::Select { answer } => self.forward(Event::Select(&answer)),
            Command::Advance => self.forward(Event::Advance),
            Command::Skip => self.forward(Event::Skip),
            Command::Bonus { has_account: true } if matches!(self.stage, Stage::WebsiteBonus) => self.complete(true),
            Command::Bonus { has_account: false } if matches!(self.stage, Stage::WebsiteBonus) => {
                self.stage = Stage::RegisterPrompt;
                Effect::Nothing
            }
            Command::ContinueWithoutRegistering if matches!(self.stage, Stage::RegisterPrompt) => self.complete(false),
            Command::EnterGrandPrize => self.enter_grand_prize(),
            other => {
                log::debug!("ignoring {other:?} on the current screen");
                Effect::Nothing
            }
        }
    }

    /// Starts the quiz for a participant whose contact details were saved.
    pub fn admit(&mut self, participant: ParticipantId, questions: Vec<Question>) {
        if !matches!(self.stage, Stage::UserInfo(_)) {
            log::warn!("participant {participant} admitted outside of the contact screen");
            return;
        }

        self.participant = Some(participant);
        self.questions = questions.into_iter().map(Arc::new).collect();
        self.index = 0;
        self.score = 0;
        self.answers.clear();

        if self.questions.is_empty() {
            log::warn!("no questions available for participant {participant}");
            self.stage = Stage::NoQuestions;
            return;
        }

        self.activate_current();
    }

    /// Delivers one elapsed second to the active question, if any.
    pub fn tick(&mut self) {
        if let Stage::Quiz(round) = &mut self.stage {
            round.handle(Event::Tick);
        }
    }

    pub fn is_counting(&self) -> bool {
        matches!(&self.stage, Stage::Quiz(round) if round.is_counting())
    }

    /// Reports (once) that a new question was activated since the last call.
    pub fn take_fresh_round(&mut self) -> bool {
        core::mem::take(&mut self.fresh_round)
    }

    pub const fn language(&self) -> Language {
        self.language
    }

    pub const fn score(&self) -> u32 {
        self.score
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    /// Stops any running countdown before the session is dropped.
    pub fn close(&mut self) {
        if let Stage::Quiz(round) = &mut self.stage {
            round.discard();
        }
    }

    fn reset(&mut self) {
        self.close();
        *self = Self::new(self.rules);
    }

    fn submit(&mut self, info: UserInfo) -> Effect {
        let result = info.validate();
        self.contact = Some(info.clone());
        match result {
            Ok(()) => {
                self.stage = Stage::UserInfo(Vec::new());
                Effect::Register(info)
            }
            Err(errors) => {
                self.stage = Stage::UserInfo(errors);
                Effect::Nothing
            }
        }
    }

    fn forward(&mut self, event: Event<'_>) -> Effect {
        let Stage::Quiz(round) = &mut self.stage else {
            return Effect::Nothing;
        };

        match round.handle(event) {
            None => Effect::Nothing,
            Some(Signal::Celebrate) => Effect::Celebrate,
            Some(Signal::Answered(answered)) => {
                self.record(answered);
                Effect::Nothing
            }
        }
    }

    fn record(&mut self, Answered { selected, correct, points }: Answered) {
        let Stage::Quiz(round) = &mut self.stage else {
            return;
        };

        round.discard();
        let question_id = round.question().id.clone();
        self.score = self.score.saturating_add(points);
        self.answers.push(AnswerRecord { question_id, selected, correct, points });
        self.index += 1;
        self.activate_current();
    }

    fn activate_current(&mut self) {
        match self.questions.get(self.index) {
            Some(question) => {
                let round = QuestionRound::activate(Arc::clone(question), self.language, self.rules.budget);
                self.stage = Stage::Quiz(round);
                self.fresh_round = true;
            }
            None => {
                log::info!("quiz finished with {} points", self.score);
                self.stage = Stage::WebsiteBonus;
            }
        }
    }

    fn complete(&mut self, has_account: bool) -> Effect {
        self.stage = Stage::Results { has_account, entered: false };
        let score = total_score(self.score, has_account, self.rules.bonus_points);
        match self.participant {
            Some(participant) => Effect::Complete(QuizResult { participant, score, has_account: Some(has_account) }),
            None => Effect::Nothing,
        }
    }

    fn enter_grand_prize(&mut self) -> Effect {
        let Stage::Results { entered, .. } = &mut self.stage else {
            return Effect::Nothing;
        };

        if *entered {
            return Effect::Nothing;
        }

        *entered = true;
        self.participant.map_or(Effect::Nothing, Effect::GrandPrize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use round::Phase;

    fn rules() -> Rules {
        Rules { budget: NonZeroU32::new(3).unwrap(), bonus_points: 25 }
    }

    fn contact() -> UserInfo {
        UserInfo { first_name: "Ada".into(), company_name: "Acme".into(), email: "ada@acme.io".into() }
    }

    fn participant() -> ParticipantId {
        ParticipantId::new(7).unwrap()
    }

    fn questions() -> Vec<Question> {
        alloc::vec![
            Question::multiple_choice("1", "Largest planet?", &["Mars", "Jupiter"], "Jupiter", 20),
            Question::yes_no("2", "Is water wet?", "Yes", 10).with_image("https://example.com/water.png"),
        ]
    }

    fn admitted(questions: Vec<Question>) -> Session {
        let mut session = Session::new(rules());
        session.apply(Command::ChooseLanguage { language: Language::Primary });
        session.apply(Command::Start);
        assert_eq!(session.apply(Command::SubmitContact(contact())), Effect::Register(contact()));
        session.admit(participant(), questions);
        session
    }

    fn select(answer: &str) -> Command {
        Command::Select { answer: answer.into() }
    }

    fn phase(session: &Session) -> Option<Phase> {
        match &session.stage {
            Stage::Quiz(round) => Some(round.phase()),
            _ => None,
        }
    }

    #[test]
    fn parses_wire_commands() {
        let command: Command = serde_json::from_str(r#"{"action":"choose_language","language":"fr"}"#).unwrap();
        assert_eq!(command, Command::ChooseLanguage { language: Language::Alt });

        let command: Command = serde_json::from_str(
            r#"{"action":"submit_contact","firstName":"Ada","companyName":"Acme","email":"ada@acme.io"}"#,
        )
        .unwrap();
        assert_eq!(command, Command::SubmitContact(contact()));

        let command: Command = serde_json::from_str(r#"{"action":"bonus","hasAccount":true}"#).unwrap();
        assert_eq!(command, Command::Bonus { has_account: true });

        assert!(serde_json::from_str::<Command>(r#"{"action":"teleport"}"#).is_err());
    }

    #[test]
    fn navigates_intro_screens() {
        let mut session = Session::new(rules());
        assert_eq!(session.apply(Command::Start), Effect::Nothing);
        assert!(matches!(session.stage, Stage::Language));

        session.apply(Command::ChooseLanguage { language: Language::Alt });
        assert!(matches!(session.stage, Stage::Welcome));
        assert_eq!(session.language(), Language::Alt);

        session.apply(Command::Back);
        assert!(matches!(session.stage, Stage::Language));

        session.apply(Command::ChooseLanguage { language: Language::Primary });
        session.apply(Command::Start);
        assert!(matches!(session.stage, Stage::UserInfo(_)));
        session.apply(Command::Back);
        assert!(matches!(session.stage, Stage::Welcome));
    }

    #[test]
    fn invalid_contact_stays_on_form() {
        let mut session = Session::new(rules());
        session.apply(Command::ChooseLanguage { language: Language::Primary });
        session.apply(Command::Start);

        let info = UserInfo { email: "nope".into(), ..contact() };
        assert_eq!(session.apply(Command::SubmitContact(info)), Effect::Nothing);
        let Stage::UserInfo(errors) = &session.stage else {
            panic!("left the contact form");
        };
        assert_eq!(errors.as_slice(), [ContactError::InvalidEmail]);
    }

    #[test]
    fn plays_through_to_results() {
        let mut session = admitted(questions());
        assert!(session.take_fresh_round());
        assert!(!session.take_fresh_round());
        assert!(session.is_counting());

        // Correct answer, no image: straight to the next question.
        assert_eq!(session.apply(select("Jupiter")), Effect::Celebrate);
        assert!(!session.is_counting());
        session.apply(Command::Advance);
        assert!(session.take_fresh_round());
        assert_eq!(phase(&session), Some(Phase::Answering));

        // Wrong answer followed by the educational slide.
        assert_eq!(session.apply(select("No")), Effect::Nothing);
        session.apply(Command::Advance);
        assert_eq!(phase(&session), Some(Phase::EducationalSlide));
        session.apply(Command::Advance);
        assert!(matches!(session.stage, Stage::WebsiteBonus));

        assert_eq!(session.score(), 20);
        assert_eq!(session.answers().len(), 2);
        assert!(!session.answers()[1].correct);

        let effect = session.apply(Command::Bonus { has_account: true });
        assert_eq!(
            effect,
            Effect::Complete(QuizResult { participant: participant(), score: 45, has_account: Some(true) })
        );

        assert_eq!(session.apply(Command::EnterGrandPrize), Effect::GrandPrize(participant()));
        assert_eq!(session.apply(Command::EnterGrandPrize), Effect::Nothing);
    }

    #[test]
    fn declining_the_bonus_asks_to_register() {
        let mut session = admitted(alloc::vec![Question::yes_no("1", "Is water wet?", "Yes", 10)]);
        session.apply(select("Yes"));
        session.apply(Command::Advance);

        assert_eq!(session.apply(Command::Bonus { has_account: false }), Effect::Nothing);
        assert!(matches!(session.stage, Stage::RegisterPrompt));

        let effect = session.apply(Command::ContinueWithoutRegistering);
        assert_eq!(
            effect,
            Effect::Complete(QuizResult { participant: participant(), score: 10, has_account: Some(false) })
        );
    }

    #[test]
    fn ticks_run_out_the_clock() {
        let mut session = admitted(questions());
        for _ in 0..3 {
            session.tick();
        }
        assert!(!session.is_counting());
        assert_eq!(phase(&session), Some(Phase::Feedback));

        // A late selection does not change the locked answer.
        assert_eq!(session.apply(select("Jupiter")), Effect::Nothing);
        session.apply(Command::Advance);
        assert_eq!(&*session.answers()[0].selected, "");
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn empty_question_set() {
        let session = admitted(Vec::new());
        assert!(matches!(session.stage, Stage::NoQuestions));
        assert!(!session.is_counting());
    }

    #[test]
    fn home_discards_the_round() {
        let mut session = admitted(questions());
        assert!(session.is_counting());

        session.apply(Command::Home);
        assert!(matches!(session.stage, Stage::Language));
        assert!(!session.is_counting());
        assert_eq!(session.score(), 0);
        assert!(session.contact.is_none());

        // Ticks after going home are inert.
        session.tick();
        assert!(matches!(session.stage, Stage::Language));
    }

    #[test]
    fn commands_out_of_place_are_ignored() {
        let mut session = admitted(questions());
        assert_eq!(session.apply(Command::Bonus { has_account: true }), Effect::Nothing);
        assert_eq!(session.apply(Command::EnterGrandPrize), Effect::Nothing);
        assert_eq!(session.apply(Command::SubmitContact(contact())), Effect::Nothing);
        assert_eq!(phase(&session), Some(Phase::Answering));
    }
}
