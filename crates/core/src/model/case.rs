use std::fmt;

/// One quiz question: a scenario paired with its correct label.
///
/// `detail` carries the explanatory subtype or hint shown alongside the
/// answer once the player has guessed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioCase {
    scenario: String,
    answer: String,
    detail: String,
}

impl ScenarioCase {
    #[must_use]
    pub fn new(
        scenario: impl Into<String>,
        answer: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            scenario: scenario.into(),
            answer: answer.into(),
            detail: detail.into(),
        }
    }

    #[must_use]
    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Exact label comparison against the correct answer.
    #[must_use]
    pub fn is_answered_by(&self, guess: &Guess) -> bool {
        match guess {
            Guess::Label(label) => label == &self.answer,
            Guess::Unsure => false,
        }
    }
}

/// A player's choice for a single question.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Guess {
    /// One of the game's answer labels.
    Label(String),
    /// The neutral "I'm not sure" option. Always scored as incorrect.
    Unsure,
}

impl Guess {
    #[must_use]
    pub fn label(label: impl Into<String>) -> Self {
        Self::Label(label.into())
    }
}

impl fmt::Display for Guess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Guess::Label(label) => write!(f, "{label}"),
            Guess::Unsure => write!(f, "I'm not sure"),
        }
    }
}
