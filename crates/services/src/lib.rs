#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod leaderboard_service;
pub mod quiz;

pub use quiz_core::Clock;

pub use app_services::{AppServices, StoreBackend};
pub use error::{AppServicesError, QuizServiceError};
pub use leaderboard_service::{DEFAULT_TOP, LeaderboardService, ScoreSubmission};
pub use quiz::{AnswerResult, QuestionView, QuizLoopService, ResultView};
