//! Life cycle of a single question on screen.
//!
//! A [`QuestionRound`] is created when a question becomes active and is
//! discarded once it reports [`Signal::Answered`]. Every event is accepted in
//! every phase; events that make no sense for the current phase are ignored.

use crate::{
    error::ConfigurationError,
    resolve::{resolve, Resolved},
    timer::{Countdown, Tick},
};
use alloc::{boxed::Box, sync::Arc};
use core::num::NonZeroU32;
use model::{Language, Question};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Choices are open and the countdown is running.
    Answering,
    /// The answer is locked and its verdict is shown.
    Feedback,
    /// The question's educational image is shown.
    EducationalSlide,
    /// The round has reported its answer. Terminal.
    Advancing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Correct,
    Incorrect,
    TimeUp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event<'a> {
    /// The participant picked one of the displayed choices.
    Select(&'a str),
    /// One second has elapsed.
    Tick,
    /// The participant asked for the next screen.
    Advance,
    /// The participant passed on a question that cannot be displayed.
    Skip,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Answered {
    /// Empty when the countdown ran out or the question was skipped.
    pub selected: Box<str>,
    pub correct: bool,
    /// Points earned by this answer.
    pub points: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Signal {
    /// Advisory: the participant answered correctly.
    Celebrate,
    /// Terminal: the round is over.
    Answered(Answered),
}

#[derive(Debug)]
pub struct QuestionRound {
    question: Arc<Question>,
    language: Language,
    resolved: Result<Resolved, ConfigurationError>,
    countdown: Countdown,
    selected: Box<str>,
    locked: bool,
    correct: bool,
    phase: Phase,
    slide_shown: bool,
    discarded: bool,
}

impl QuestionRound {
    /// Resolves the question for `language` and starts the countdown.
    pub fn activate(question: Arc<Question>, language: Language, budget: NonZeroU32) -> Self {
        let resolved = resolve(&question, language);
        match &resolved {
            Ok(_) => log::debug!("question {} activated ({}, {budget}s)", question.id, language.code()),
            Err(err) => log::warn!("question {} cannot be displayed in {}: {err}", question.id, language.code()),
        }

        let mut countdown = Countdown::new();
        countdown.start(budget);
        Self {
            question,
            language,
            resolved,
            countdown,
            selected: Box::default(),
            locked: false,
            correct: false,
            phase: Phase::Answering,
            slide_shown: false,
            discarded: false,
        }
    }

    pub fn handle(&mut self, event: Event<'_>) -> Option<Signal> {
        if self.discarded {
            return None;
        }

        match (self.phase, event) {
            (Phase::Answering, Event::Select(answer)) => self.on_select(answer),
            (Phase::Answering, Event::Skip) if self.resolved.is_err() => {
                self.lock();
                None
            }
            (_, Event::Tick) => {
                if self.countdown.tick() == Tick::Expired {
                    self.on_expire();
                }
                None
            }
            (Phase::Feedback, Event::Advance) => {
                if self.question.educational_image.is_some() && !self.slide_shown {
                    self.slide_shown = true;
                    self.phase = Phase::EducationalSlide;
                    return None;
                }
                Some(self.finish())
            }
            (Phase::EducationalSlide, Event::Advance) => Some(self.finish()),
            _ => None,
        }
    }

    /// Stops the countdown and turns every later event into a no-op.
    pub fn discard(&mut self) {
        self.countdown.stop();
        self.discarded = true;
    }

    fn on_select(&mut self, answer: &str) -> Option<Signal> {
        if self.locked {
            return None;
        }

        let Ok(resolved) = &self.resolved else {
            return None;
        };

        if !resolved.offers(answer) {
            log::debug!("ignoring unknown choice {answer:?} for question {}", self.question.id);
            return None;
        }

        self.selected = answer.into();
        self.lock();
        self.correct.then_some(Signal::Celebrate)
    }

    fn on_expire(&mut self) {
        if self.locked || self.phase != Phase::Answering {
            return;
        }
        log::debug!("time is up for question {}", self.question.id);
        self.lock();
    }

    fn lock(&mut self) {
        self.correct = match &self.resolved {
            Ok(resolved) => *self.selected == *resolved.correct_answer,
            Err(_) => false,
        };
        self.locked = true;
        self.countdown.stop();
        self.phase = Phase::Feedback;
    }

    fn finish(&mut self) -> Signal {
        self.phase = Phase::Advancing;
        self.countdown.stop();
        Signal::Answered(Answered {
            selected: self.selected.clone(),
            correct: self.correct,
            points: if self.correct { self.question.points } else { 0 },
        })
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub const fn language(&self) -> Language {
        self.language
    }

    pub fn resolved(&self) -> Result<&Resolved, ConfigurationError> {
        self.resolved.as_ref().map_err(|&err| err)
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    /// Only meaningful once [`is_locked`](Self::is_locked) holds.
    pub const fn is_correct(&self) -> bool {
        self.correct
    }

    pub const fn time_remaining(&self) -> u32 {
        self.countdown.remaining()
    }

    /// Whether the owner should keep delivering [`Event::Tick`].
    pub const fn is_counting(&self) -> bool {
        !self.discarded && self.countdown.is_active()
    }

    pub fn verdict(&self) -> Option<Verdict> {
        if !self.locked {
            return None;
        }

        Some(if self.correct {
            Verdict::Correct
        } else if self.countdown.remaining() == 0 {
            Verdict::TimeUp
        } else {
            Verdict::Incorrect
        })
    }
}
