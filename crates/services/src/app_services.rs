use std::path::PathBuf;
use std::sync::Arc;

use quiz_core::catalog;
use quiz_core::model::GameVariant;
use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::leaderboard_service::LeaderboardService;
use crate::quiz::QuizLoopService;

/// Where submitted scores live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Lives as long as the process.
    Memory,
    Csv(PathBuf),
    /// A normalized `sqlite://` URL.
    Sqlite(String),
}

/// Assembles app-facing services around one owned leaderboard store.
#[derive(Clone)]
pub struct AppServices {
    games: Vec<Arc<GameVariant>>,
    quiz_loop: Arc<QuizLoopService>,
    leaderboard: LeaderboardService,
}

impl AppServices {
    /// Build services for the built-in games on top of the chosen backend.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the durable store cannot be initialized.
    pub async fn new(
        backend: &StoreBackend,
        clock: Clock,
        shuffle: bool,
    ) -> Result<Self, AppServicesError> {
        let storage = match backend {
            StoreBackend::Memory => Storage::in_memory(),
            StoreBackend::Csv(path) => Storage::csv(path.clone())?,
            StoreBackend::Sqlite(url) => Storage::sqlite(url).await?,
        };
        tracing::info!(?backend, "leaderboard store ready");
        Ok(Self::from_storage(&storage, clock, shuffle))
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock, shuffle: bool) -> Self {
        let leaderboard = LeaderboardService::new(Arc::clone(&storage.leaderboard));
        let quiz_loop =
            Arc::new(QuizLoopService::new(clock, leaderboard.clone()).with_shuffle(shuffle));
        let games = catalog::builtin_games().into_iter().map(Arc::new).collect();

        Self {
            games,
            quiz_loop,
            leaderboard,
        }
    }

    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::from_storage(&Storage::in_memory(), clock, true)
    }

    #[must_use]
    pub fn games(&self) -> &[Arc<GameVariant>] {
        &self.games
    }

    /// Look up a game by label, ignoring ASCII case.
    #[must_use]
    pub fn game(&self, label: &str) -> Option<Arc<GameVariant>> {
        self.games
            .iter()
            .find(|g| g.label().eq_ignore_ascii_case(label.trim()))
            .cloned()
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn leaderboard(&self) -> &LeaderboardService {
        &self.leaderboard
    }
}
