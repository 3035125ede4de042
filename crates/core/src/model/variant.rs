use std::collections::HashSet;

use thiserror::Error;

use crate::model::{Guess, ScenarioCase};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameError {
    #[error("game label cannot be empty")]
    EmptyLabel,

    #[error("game {game} has no cases")]
    NoCases { game: String },

    #[error("game {game} lists choice {choice} more than once")]
    DuplicateChoice { game: String, choice: String },

    #[error("case \"{scenario}\" answers {answer}, which is not a choice in game {game}")]
    UnknownAnswer {
        game: String,
        scenario: String,
        answer: String,
    },
}

/// A playable quiz: its label, answer choices and case list.
///
/// Every case answer is guaranteed to be one of `choices`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameVariant {
    label: String,
    title: String,
    choices: Vec<String>,
    allow_unsure: bool,
    cases: Vec<ScenarioCase>,
}

impl GameVariant {
    /// Build a validated game variant.
    ///
    /// # Errors
    ///
    /// Returns `GameError::EmptyLabel` for a blank label, `GameError::NoCases` when
    /// `cases` is empty, `GameError::DuplicateChoice` for repeated choices, and
    /// `GameError::UnknownAnswer` when a case answer is not among `choices`.
    pub fn new(
        label: impl Into<String>,
        title: impl Into<String>,
        choices: Vec<String>,
        cases: Vec<ScenarioCase>,
    ) -> Result<Self, GameError> {
        let label = label.into().trim().to_owned();
        if label.is_empty() {
            return Err(GameError::EmptyLabel);
        }
        if cases.is_empty() {
            return Err(GameError::NoCases { game: label });
        }

        let mut seen = HashSet::with_capacity(choices.len());
        for choice in &choices {
            if !seen.insert(choice.as_str()) {
                return Err(GameError::DuplicateChoice {
                    game: label,
                    choice: choice.clone(),
                });
            }
        }

        if let Some(bad) = cases.iter().find(|c| !seen.contains(c.answer())) {
            return Err(GameError::UnknownAnswer {
                game: label,
                scenario: bad.scenario().to_owned(),
                answer: bad.answer().to_owned(),
            });
        }

        Ok(Self {
            label,
            title: title.into(),
            choices,
            allow_unsure: false,
            cases,
        })
    }

    /// Offer the neutral "I'm not sure" option after the regular choices.
    #[must_use]
    pub fn with_unsure(mut self, allow: bool) -> Self {
        self.allow_unsure = allow;
        self
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    #[must_use]
    pub fn cases(&self) -> &[ScenarioCase] {
        &self.cases
    }

    /// Ordered guess options as presented to the player.
    #[must_use]
    pub fn guess_options(&self) -> Vec<Guess> {
        let mut options: Vec<Guess> = self.choices.iter().cloned().map(Guess::Label).collect();
        if self.allow_unsure {
            options.push(Guess::Unsure);
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choices() -> Vec<String> {
        vec!["Supervised".into(), "Unsupervised".into()]
    }

    #[test]
    fn rejects_answer_outside_choices() {
        let cases = vec![ScenarioCase::new("Face ID", "CNN", "Facial recognition")];
        let err = GameVariant::new("ML", "ML Matchmaker", choices(), cases).unwrap_err();
        assert!(matches!(err, GameError::UnknownAnswer { ref answer, .. } if answer == "CNN"));
    }

    #[test]
    fn rejects_empty_case_list() {
        let err = GameVariant::new("ML", "ML Matchmaker", choices(), Vec::new()).unwrap_err();
        assert_eq!(err, GameError::NoCases { game: "ML".into() });
    }

    #[test]
    fn rejects_duplicate_choices() {
        let cases = vec![ScenarioCase::new("Gmail Spam Filter", "Supervised", "Classification")];
        let err = GameVariant::new(
            "ML",
            "ML Matchmaker",
            vec!["Supervised".into(), "Supervised".into()],
            cases,
        )
        .unwrap_err();
        assert!(matches!(err, GameError::DuplicateChoice { .. }));
    }

    #[test]
    fn unsure_option_is_appended_last() {
        let cases = vec![ScenarioCase::new("Gmail Spam Filter", "Supervised", "Classification")];
        let variant = GameVariant::new(" ML ", "ML Matchmaker", choices(), cases)
            .unwrap()
            .with_unsure(true);

        assert_eq!(variant.label(), "ML");
        assert_eq!(
            variant.guess_options(),
            vec![
                Guess::label("Supervised"),
                Guess::label("Unsupervised"),
                Guess::Unsure
            ]
        );
    }
}
