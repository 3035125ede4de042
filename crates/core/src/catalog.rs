//! Built-in game variants.

use crate::model::{GameVariant, ScenarioCase};

pub const ML_LABEL: &str = "ML";
pub const DL_LABEL: &str = "DL";

/// Supervised vs. unsupervised learning, with a neutral "not sure" option.
///
/// # Panics
///
/// Panics only if the case table below is edited to use an undeclared answer.
#[must_use]
pub fn ml_game() -> GameVariant {
    let cases = vec![
        ScenarioCase::new("Spotify Listener Segments", "Unsupervised", "Clustering"),
        ScenarioCase::new("Amazon Demand Forecasting", "Supervised", "Regression"),
        ScenarioCase::new("Gmail Spam Filter", "Supervised", "Classification"),
        ScenarioCase::new(
            "Netflix Recommendation System",
            "Unsupervised",
            "Dimensionality Reduction",
        ),
        ScenarioCase::new("Credit Card Fraud Detection", "Unsupervised", "Clustering"),
    ];
    GameVariant::new(
        ML_LABEL,
        "ML Matchmaker",
        vec!["Supervised".into(), "Unsupervised".into()],
        cases,
    )
    .expect("built-in ML cases are valid")
    .with_unsure(true)
}

/// CNN vs. GAN vs. Transformer.
///
/// # Panics
///
/// Panics only if the case table below is edited to use an undeclared answer.
#[must_use]
pub fn dl_game() -> GameVariant {
    let cases = vec![
        ScenarioCase::new("Google Lens recognizes a plant", "CNN", "Image classifier"),
        ScenarioCase::new("DALL·E generates pizza ad art", "GAN", "Image generator"),
        ScenarioCase::new("ChatGPT writes emails", "Transformer", "Text generator"),
        ScenarioCase::new("Face ID unlocks your phone", "CNN", "Facial recognition"),
        ScenarioCase::new("Midjourney creates AI artwork", "GAN", "AI Art"),
    ];
    GameVariant::new(
        DL_LABEL,
        "DL Matchmaker",
        vec!["CNN".into(), "GAN".into(), "Transformer".into()],
        cases,
    )
    .expect("built-in DL cases are valid")
}

/// All built-in games, in menu order.
#[must_use]
pub fn builtin_games() -> Vec<GameVariant> {
    vec![ml_game(), dl_game()]
}
