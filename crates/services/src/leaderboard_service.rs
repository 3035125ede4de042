use std::sync::Arc;

use quiz_core::model::LeaderboardEntry;
use storage::repository::{InMemoryRepository, LeaderboardRepository};

/// Number of rows the leaderboard shows by default.
pub const DEFAULT_TOP: usize = 10;

/// What happened to a score submitted at the end of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreSubmission {
    Recorded,
    /// Blank player name; nothing was stored.
    SkippedEmptyName,
    /// The store rejected the write. The failure has been logged.
    NotSaved,
}

/// Leaderboard facade that never lets storage failures reach the quiz flow.
///
/// Reads from an unreadable store come back empty and failed writes are
/// reported as `ScoreSubmission::NotSaved`; both are logged at `warn`.
#[derive(Clone)]
pub struct LeaderboardService {
    entries: Arc<dyn LeaderboardRepository>,
}

impl LeaderboardService {
    #[must_use]
    pub fn new(entries: Arc<dyn LeaderboardRepository>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryRepository::new()))
    }

    /// Record a score unless the player name is blank.
    pub async fn record(&self, name: &str, score: u32, game: &str) -> ScoreSubmission {
        let Some(entry) = LeaderboardEntry::new(name, score, game) else {
            tracing::debug!(game, "discarding score with empty player name");
            return ScoreSubmission::SkippedEmptyName;
        };

        match self.entries.append_entry(&entry).await {
            Ok(()) => {
                tracing::info!(name = entry.name(), score, game, "score recorded");
                ScoreSubmission::Recorded
            }
            Err(err) => {
                tracing::warn!(error = %err, game, "failed to record score");
                ScoreSubmission::NotSaved
            }
        }
    }

    /// Highest scores first, optionally for a single game.
    pub async fn top(&self, limit: usize, game: Option<&str>) -> Vec<LeaderboardEntry> {
        match self.entries.top_entries(limit, game).await {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(error = %err, "leaderboard unreadable, showing it as empty");
                Vec::new()
            }
        }
    }
}
