use std::fmt;

/// Coarse label derived from a final score.
///
/// Thresholds scale with the number of questions: `Pro` from 80% and
/// `Explorer` from 40%, which gives 4 and 2 for a five-question game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    Rookie,
    Explorer,
    Pro,
}

impl Rank {
    #[must_use]
    pub fn from_score(score: u32, total: usize) -> Self {
        let score = u64::from(score);
        let total = u64::try_from(total).unwrap_or(u64::MAX);
        if score.saturating_mul(5) >= total.saturating_mul(4) {
            Rank::Pro
        } else if score.saturating_mul(5) >= total.saturating_mul(2) {
            Rank::Explorer
        } else {
            Rank::Rookie
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Rank::Rookie => "Rookie",
            Rank::Explorer => "Explorer",
            Rank::Pro => "Pro",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
