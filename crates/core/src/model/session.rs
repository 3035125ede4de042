use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::model::{Feedback, GameVariant, Guess, ScenarioCase};
use crate::rank::Rank;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz already completed")]
    Completed,

    #[error("current question has not been answered yet")]
    NotAnswered,

    #[error("quiz is still in progress")]
    InProgress,

    #[error("case order must be a permutation of 0..{expected}")]
    InvalidOrder { expected: usize },
}

/// Externally visible state of a play-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    InProgress {
        index: usize,
        score: u32,
        answered: bool,
    },
    Completed {
        score: u32,
    },
}

/// Aggregated view of session progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

/// One player's play-through of a game variant.
///
/// Cases are visited sequentially in `order`, each exactly once. A question
/// scores at most once: the stored feedback doubles as the answered flag.
pub struct QuizSession {
    variant: Arc<GameVariant>,
    order: Vec<usize>,
    current: usize,
    score: u32,
    answered: Option<Feedback>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Start a session that visits cases in catalog order.
    #[must_use]
    pub fn new(variant: Arc<GameVariant>, started_at: DateTime<Utc>) -> Self {
        let order = (0..variant.cases().len()).collect();
        Self::from_parts(variant, order, started_at)
    }

    /// Start a session that visits cases in the given order.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidOrder` unless `order` is a permutation of the
    /// variant's case indices.
    pub fn with_order(
        variant: Arc<GameVariant>,
        order: Vec<usize>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, QuizError> {
        validate_order(&order, variant.cases().len())?;
        Ok(Self::from_parts(variant, order, started_at))
    }

    fn from_parts(variant: Arc<GameVariant>, order: Vec<usize>, started_at: DateTime<Utc>) -> Self {
        Self {
            variant,
            order,
            current: 0,
            score: 0,
            answered: None,
            started_at,
            completed_at: None,
        }
    }

    #[must_use]
    pub fn variant(&self) -> &GameVariant {
        &self.variant
    }

    #[must_use]
    pub fn game_label(&self) -> &str {
        self.variant.label()
    }

    /// Time from start to completion; `None` while in progress.
    #[must_use]
    pub fn elapsed(&self) -> Option<Duration> {
        self.completed_at.map(|done| done - self.started_at)
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Number of questions in this play-through.
    #[must_use]
    pub fn total(&self) -> usize {
        self.order.len()
    }

    /// Zero-based index of the current question; equals `total()` once complete.
    #[must_use]
    pub fn index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current >= self.order.len()
    }

    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.answered.is_some()
    }

    /// Questions submitted so far, including the current one if answered.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.current + usize::from(self.answered.is_some())
    }

    #[must_use]
    pub fn state(&self) -> QuizState {
        if self.is_complete() {
            QuizState::Completed { score: self.score }
        } else {
            QuizState::InProgress {
                index: self.current,
                score: self.score,
                answered: self.is_answered(),
            }
        }
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.total(),
            answered: self.answered_count(),
            remaining: self.total().saturating_sub(self.answered_count()),
            is_complete: self.is_complete(),
        }
    }

    #[must_use]
    pub fn current_case(&self) -> Option<&ScenarioCase> {
        self.order
            .get(self.current)
            .and_then(|&i| self.variant.cases().get(i))
    }

    /// Feedback already given for the current question, if any.
    #[must_use]
    pub fn feedback(&self) -> Option<&Feedback> {
        self.answered.as_ref()
    }

    /// Rank for the final score; `None` until the session completes.
    #[must_use]
    pub fn final_rank(&self) -> Option<Rank> {
        self.is_complete()
            .then(|| Rank::from_score(self.score, self.total()))
    }

    /// Judge a guess for the current question.
    ///
    /// Only the first submit per question scores. Later calls return the
    /// stored feedback unchanged.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Completed` if every question has been played.
    pub fn submit(&mut self, guess: Guess) -> Result<&Feedback, QuizError> {
        if self.answered.is_none() {
            let case = self.current_case().ok_or(QuizError::Completed)?;
            let feedback = Feedback::judge(case, guess);
            if feedback.is_correct() {
                self.score += 1;
            }
            self.answered = Some(feedback);
        }
        self.answered.as_ref().ok_or(QuizError::Completed)
    }

    /// Move to the next question; stamps `completed_at` after the last one.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Completed` if already finished and
    /// `QuizError::NotAnswered` if the current question was not submitted.
    pub fn advance(&mut self, at: DateTime<Utc>) -> Result<QuizState, QuizError> {
        if self.is_complete() {
            return Err(QuizError::Completed);
        }
        if self.answered.take().is_none() {
            return Err(QuizError::NotAnswered);
        }

        self.current += 1;
        if self.is_complete() {
            self.completed_at = Some(at);
        }
        Ok(self.state())
    }

    /// Play again with a fresh case order.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InProgress` if the session has not completed and
    /// `QuizError::InvalidOrder` if `order` is not a permutation of the cases.
    pub fn restart(&mut self, order: Vec<usize>, started_at: DateTime<Utc>) -> Result<(), QuizError> {
        if !self.is_complete() {
            return Err(QuizError::InProgress);
        }
        validate_order(&order, self.variant.cases().len())?;

        self.order = order;
        self.current = 0;
        self.score = 0;
        self.answered = None;
        self.started_at = started_at;
        self.completed_at = None;
        Ok(())
    }
}

fn validate_order(order: &[usize], len: usize) -> Result<(), QuizError> {
    let mut seen = vec![false; len];
    if order.len() != len || len == 0 {
        return Err(QuizError::InvalidOrder { expected: len });
    }
    for &i in order {
        match seen.get_mut(i) {
            Some(slot) if !*slot => *slot = true,
            _ => return Err(QuizError::InvalidOrder { expected: len }),
        }
    }
    Ok(())
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("game", &self.variant.label())
            .field("order", &self.order)
            .field("current", &self.current)
            .field("score", &self.score)
            .field("answered", &self.answered.is_some())
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::time::fixed_now;

    fn ml_session() -> QuizSession {
        QuizSession::new(Arc::new(catalog::ml_game()), fixed_now())
    }

    fn play(session: &mut QuizSession, guess: Guess) {
        session.submit(guess).unwrap();
        session.advance(fixed_now()).unwrap();
    }

    #[test]
    fn spotify_segments_scores_with_clustering_detail() {
        let mut session = ml_session();
        assert_eq!(
            session.current_case().unwrap().scenario(),
            "Spotify Listener Segments"
        );

        let feedback = session.submit(Guess::label("Unsupervised")).unwrap().clone();
        assert!(feedback.is_correct());
        assert_eq!(feedback.detail, "Clustering");
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn repeated_submit_does_not_rescore() {
        let mut session = ml_session();
        session.submit(Guess::label("Unsupervised")).unwrap();
        let again = session.submit(Guess::label("Supervised")).unwrap();

        assert!(again.is_correct());
        assert_eq!(session.score(), 1);
        assert_eq!(session.answered_count(), 1);
    }

    #[test]
    fn advance_requires_an_answer() {
        let mut session = ml_session();
        let err = session.advance(fixed_now()).unwrap_err();
        assert_eq!(err, QuizError::NotAnswered);
        assert_eq!(session.index(), 0);
    }

    #[test]
    fn completes_after_last_question() {
        let mut session = ml_session();
        for _ in 0..session.total() {
            assert!(session.final_rank().is_none());
            play(&mut session, Guess::Unsure);
        }

        assert!(session.is_complete());
        assert_eq!(session.state(), QuizState::Completed { score: 0 });
        assert_eq!(session.completed_at(), Some(fixed_now()));
        assert_eq!(session.final_rank(), Some(Rank::Rookie));
        assert_eq!(
            session.submit(Guess::Unsure).unwrap_err(),
            QuizError::Completed
        );
        assert_eq!(session.advance(fixed_now()).unwrap_err(), QuizError::Completed);
    }

    #[test]
    fn four_of_five_is_pro_and_one_is_rookie() {
        // Catalog answers: Unsupervised, Supervised, Supervised, Unsupervised, Unsupervised.
        let mut session = ml_session();
        for guess in ["Unsupervised", "Supervised", "Supervised", "Unsupervised", "Supervised"] {
            play(&mut session, Guess::label(guess));
        }
        assert_eq!(session.score(), 4);
        assert_eq!(session.final_rank(), Some(Rank::Pro));

        let mut session = ml_session();
        for guess in ["Unsupervised", "Unsupervised", "Unsupervised", "Supervised", "Supervised"] {
            play(&mut session, Guess::label(guess));
        }
        assert_eq!(session.score(), 1);
        assert_eq!(session.final_rank(), Some(Rank::Rookie));
    }

    #[test]
    fn restart_only_from_completed_and_resets_counters() {
        let mut session = ml_session();
        play(&mut session, Guess::label("Unsupervised"));
        assert_eq!(
            session.restart(vec![0, 1, 2, 3, 4], fixed_now()).unwrap_err(),
            QuizError::InProgress
        );

        while !session.is_complete() {
            play(&mut session, Guess::label("Unsupervised"));
        }
        session.restart(vec![4, 3, 2, 1, 0], fixed_now()).unwrap();

        assert_eq!(
            session.state(),
            QuizState::InProgress {
                index: 0,
                score: 0,
                answered: false
            }
        );
        assert_eq!(
            session.current_case().unwrap().scenario(),
            "Credit Card Fraud Detection"
        );
        assert!(session.completed_at().is_none());
    }

    #[test]
    fn elapsed_spans_start_to_completion() {
        let started = fixed_now();
        let mut session = QuizSession::new(Arc::new(catalog::dl_game()), started);
        for _ in 0..session.total() {
            assert!(session.elapsed().is_none());
            session.submit(Guess::label("CNN")).unwrap();
            session.advance(started + Duration::seconds(42)).unwrap();
        }
        assert_eq!(session.elapsed(), Some(Duration::seconds(42)));
    }

    #[test]
    fn progress_counts_down_remaining_questions() {
        let mut session = ml_session();
        assert_eq!(
            session.progress(),
            SessionProgress {
                total: 5,
                answered: 0,
                remaining: 5,
                is_complete: false
            }
        );
        session.submit(Guess::Unsure).unwrap();
        assert_eq!(session.progress().remaining, 4);
        session.advance(fixed_now()).unwrap();
        assert_eq!(session.progress().answered, 1);
    }

    #[test]
    fn order_must_be_a_permutation() {
        let variant = Arc::new(catalog::ml_game());
        for bad in [vec![0, 1, 2, 3], vec![0, 0, 1, 2, 3], vec![0, 1, 2, 3, 9]] {
            let err = QuizSession::with_order(Arc::clone(&variant), bad, fixed_now()).unwrap_err();
            assert_eq!(err, QuizError::InvalidOrder { expected: 5 });
        }
    }

    #[test]
    fn score_never_exceeds_answered_questions() {
        let mut session = ml_session();
        let guesses = ["Unsupervised", "Supervised", "Unsupervised", "Unsupervised", "Unsupervised"];
        for guess in guesses {
            session.submit(Guess::label(guess)).unwrap();
            session.submit(Guess::label(guess)).unwrap();
            let answered = session.answered_count();
            assert!(session.score() as usize <= answered);
            assert!(answered <= session.total());
            session.advance(fixed_now()).unwrap();
        }
        assert_eq!(session.progress().remaining, 0);
    }
}
