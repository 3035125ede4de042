use chrono::Duration;
use quiz_core::Rank;
use quiz_core::model::{Feedback, Guess, QuizSession};

/// Everything the presentation layer needs to draw the current question.
///
/// Holds data only; wording and layout belong to the presenter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub game: String,
    /// One-based question number.
    pub number: usize,
    pub total: usize,
    pub scenario: String,
    pub choices: Vec<Guess>,
    /// Present once the question has been submitted.
    pub answered: Option<Feedback>,
}

impl QuestionView {
    #[must_use]
    pub fn from_session(session: &QuizSession) -> Option<Self> {
        let case = session.current_case()?;
        Some(Self {
            game: session.game_label().to_owned(),
            number: session.index() + 1,
            total: session.total(),
            scenario: case.scenario().to_owned(),
            choices: session.variant().guess_options(),
            answered: session.feedback().cloned(),
        })
    }

    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.answered.is_some()
    }
}

/// Final outcome of a completed play-through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub game: String,
    pub score: u32,
    pub total: usize,
    pub rank: Rank,
    pub elapsed: Option<Duration>,
}

impl ResultView {
    #[must_use]
    pub fn from_session(session: &QuizSession) -> Option<Self> {
        let rank = session.final_rank()?;
        Some(Self {
            game: session.game_label().to_owned(),
            score: session.score(),
            total: session.total(),
            rank,
            elapsed: session.elapsed(),
        })
    }
}
