use std::sync::Arc;

use rand::rng;
use rand::seq::SliceRandom;

use quiz_core::Clock;
use quiz_core::model::{Feedback, GameVariant, Guess, QuizSession, QuizState, SessionProgress};

use super::view::{QuestionView, ResultView};
use crate::error::QuizServiceError;
use crate::leaderboard_service::{LeaderboardService, ScoreSubmission};

/// Result of submitting a guess for the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerResult {
    pub feedback: Feedback,
    pub score: u32,
    pub progress: SessionProgress,
}

/// Orchestrates play-throughs: case ordering, time, and score submission.
///
/// Each play-through visits every case of its game exactly once. With
/// shuffling on (the default) the order is drawn once per start or restart.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    leaderboard: LeaderboardService,
    shuffle: bool,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, leaderboard: LeaderboardService) -> Self {
        Self {
            clock,
            leaderboard,
            shuffle: true,
        }
    }

    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    fn case_order(&self, len: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..len).collect();
        if self.shuffle {
            order.as_mut_slice().shuffle(&mut rng());
        }
        order
    }

    /// Start a new play-through of `variant`.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Quiz` if the generated order is rejected.
    pub fn start(&self, variant: Arc<GameVariant>) -> Result<QuizSession, QuizServiceError> {
        let order = self.case_order(variant.cases().len());
        tracing::debug!(game = variant.label(), ?order, "starting quiz");
        Ok(QuizSession::with_order(variant, order, self.clock.now())?)
    }

    #[must_use]
    pub fn question(&self, session: &QuizSession) -> Option<QuestionView> {
        QuestionView::from_session(session)
    }

    /// Judge a guess for the current question. Repeat submits are harmless.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Quiz` if the session already completed.
    pub fn answer(
        &self,
        session: &mut QuizSession,
        guess: Guess,
    ) -> Result<AnswerResult, QuizServiceError> {
        let feedback = session.submit(guess)?.clone();
        Ok(AnswerResult {
            feedback,
            score: session.score(),
            progress: session.progress(),
        })
    }

    /// Move on to the next question.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Quiz` if the current question is unanswered or
    /// the session already completed.
    pub fn next(&self, session: &mut QuizSession) -> Result<QuizState, QuizServiceError> {
        let state = session.advance(self.clock.now())?;
        if let QuizState::Completed { score } = state {
            tracing::debug!(game = session.game_label(), score, "quiz completed");
        }
        Ok(state)
    }

    #[must_use]
    pub fn result(&self, session: &QuizSession) -> Option<ResultView> {
        ResultView::from_session(session)
    }

    /// Submit the final score of a completed session under `name`.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::NotFinished` if the session is still in progress.
    pub async fn submit_score(
        &self,
        session: &QuizSession,
        name: &str,
    ) -> Result<ScoreSubmission, QuizServiceError> {
        if !session.is_complete() {
            return Err(QuizServiceError::NotFinished);
        }
        Ok(self
            .leaderboard
            .record(name, session.score(), session.game_label())
            .await)
    }

    /// Reset a completed session with a freshly drawn case order.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Quiz` if the session is still in progress.
    pub fn play_again(&self, session: &mut QuizSession) -> Result<(), QuizServiceError> {
        let order = self.case_order(session.total());
        session.restart(order, self.clock.now())?;
        tracing::debug!(game = session.game_label(), "quiz restarted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::catalog;
    use quiz_core::model::QuizError;
    use quiz_core::time::fixed_clock;

    fn ordered_service() -> QuizLoopService {
        QuizLoopService::new(fixed_clock(), LeaderboardService::in_memory()).with_shuffle(false)
    }

    #[test]
    fn shuffled_order_visits_every_case_once() {
        let service = QuizLoopService::new(fixed_clock(), LeaderboardService::in_memory());
        for _ in 0..20 {
            let mut order = service.case_order(5);
            order.sort_unstable();
            assert_eq!(order, vec![0, 1, 2, 3, 4]);
        }
    }

    #[test]
    fn question_view_reflects_answer_state() {
        let service = ordered_service();
        let mut session = service.start(Arc::new(catalog::dl_game())).unwrap();

        let view = service.question(&session).unwrap();
        assert_eq!(view.number, 1);
        assert_eq!(view.total, 5);
        assert_eq!(view.scenario, "Google Lens recognizes a plant");
        assert_eq!(view.choices.len(), 3);
        assert!(!view.is_answered());

        let result = service.answer(&mut session, Guess::label("GAN")).unwrap();
        assert!(!result.feedback.is_correct());
        assert_eq!(result.feedback.to_string(), "Nope! It was CNN (Image classifier)");
        assert_eq!(result.progress.remaining, 4);
        assert!(service.question(&session).unwrap().is_answered());
    }

    #[test]
    fn next_before_answer_is_rejected() {
        let service = ordered_service();
        let mut session = service.start(Arc::new(catalog::ml_game())).unwrap();
        let err = service.next(&mut session).unwrap_err();
        assert!(matches!(err, QuizServiceError::Quiz(QuizError::NotAnswered)));
    }

    #[tokio::test]
    async fn submit_score_requires_completion() {
        let service = ordered_service();
        let session = service.start(Arc::new(catalog::ml_game())).unwrap();
        let err = service.submit_score(&session, "Ada").await.unwrap_err();
        assert!(matches!(err, QuizServiceError::NotFinished));
    }
}
