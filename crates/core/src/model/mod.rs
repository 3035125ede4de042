mod case;
mod feedback;
mod leaderboard;
mod session;
mod variant;

pub use case::{Guess, ScenarioCase};
pub use feedback::{Feedback, Verdict};
pub use leaderboard::{LeaderboardEntry, rank_entries};
pub use session::{QuizError, QuizSession, QuizState, SessionProgress};
pub use variant::{GameError, GameVariant};
