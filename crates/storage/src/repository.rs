use async_trait::async_trait;
use quiz_core::model::{LeaderboardEntry, rank_entries};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::flat_file::{CsvInitError, CsvLeaderboard};
use crate::sqlite::{SqliteInitError, SqliteRepository};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Append-only store of submitted scores.
#[async_trait]
pub trait LeaderboardRepository: Send + Sync {
    /// Append an entry. Existing entries are never touched.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the entry cannot be stored.
    async fn append_entry(&self, entry: &LeaderboardEntry) -> Result<(), StorageError>;

    /// Load every entry in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing medium cannot be read or decoded.
    async fn list_entries(&self) -> Result<Vec<LeaderboardEntry>, StorageError>;

    /// Up to `limit` entries by descending score, ties in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing medium cannot be read or decoded.
    async fn top_entries(
        &self,
        limit: usize,
        game: Option<&str>,
    ) -> Result<Vec<LeaderboardEntry>, StorageError> {
        let entries = self.list_entries().await?;
        Ok(rank_entries(entries, limit, game))
    }
}

/// Process-scoped leaderboard. Each instance is isolated from every other.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    entries: Arc<Mutex<Vec<LeaderboardEntry>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LeaderboardRepository for InMemoryRepository {
    async fn append_entry(&self, entry: &LeaderboardEntry) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(entry.clone());
        Ok(())
    }

    async fn list_entries(&self) -> Result<Vec<LeaderboardEntry>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

/// Owned handle to the configured leaderboard backend.
#[derive(Clone)]
pub struct Storage {
    pub leaderboard: Arc<dyn LeaderboardRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            leaderboard: Arc::new(InMemoryRepository::new()),
        }
    }

    /// Build a `Storage` backed by a CSV file with a `Name,Score,Game` header.
    ///
    /// # Errors
    ///
    /// Returns `CsvInitError` if the parent directory cannot be created.
    pub fn csv(path: impl Into<std::path::PathBuf>) -> Result<Self, CsvInitError> {
        let repo = CsvLeaderboard::open(path)?;
        Ok(Self {
            leaderboard: Arc::new(repo),
        })
    }

    /// Build a `Storage` backed by `SQLite`.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if connection or migrations cannot be
    /// completed.
    pub async fn sqlite(database_url: &str) -> Result<Self, SqliteInitError> {
        let repo = SqliteRepository::connect(database_url).await?;
        repo.migrate().await?;
        Ok(Self {
            leaderboard: Arc::new(repo),
        })
    }
}
