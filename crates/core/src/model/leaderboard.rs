use serde::{Deserialize, Serialize};

/// One submitted score.
///
/// Field names match the flat `Name, Score, Game` table used by durable stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Score")]
    score: u32,
    #[serde(rename = "Game")]
    game: String,
}

impl LeaderboardEntry {
    /// Build an entry, trimming the player name.
    ///
    /// Returns `None` when the name is empty or whitespace, in which case the
    /// submission is discarded.
    #[must_use]
    pub fn new(name: &str, score: u32, game: impl Into<String>) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_owned(),
            score,
            game: game.into(),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn game(&self) -> &str {
        &self.game
    }

    /// Persisted rows with a blank name are treated as absent.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// Highest scores first, ties kept in insertion order, optionally for one game.
///
/// `entries` must be supplied in insertion order.
#[must_use]
pub fn rank_entries(
    entries: impl IntoIterator<Item = LeaderboardEntry>,
    limit: usize,
    game: Option<&str>,
) -> Vec<LeaderboardEntry> {
    let mut out: Vec<LeaderboardEntry> = entries
        .into_iter()
        .filter(|e| game.is_none_or(|g| e.game == g))
        .collect();
    // `sort_by` is stable, so equal scores keep their insertion order.
    out.sort_by(|a, b| b.score.cmp(&a.score));
    out.truncate(limit);
    out
}
