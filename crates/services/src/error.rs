//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::QuizError;
use storage::flat_file::CsvInitError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `QuizLoopService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServiceError {
    #[error("quiz is not finished yet")]
    NotFinished,
    #[error(transparent)]
    Quiz(#[from] QuizError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Csv(#[from] CsvInitError),
}
