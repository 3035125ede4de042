use std::fmt;

use crate::model::{Guess, ScenarioCase};

/// How a guess was judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
    /// The player picked the neutral option; scored as incorrect but shown softer.
    Unsure,
}

/// Immediate result of submitting a guess for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub verdict: Verdict,
    pub guess: Guess,
    pub answer: String,
    pub detail: String,
}

impl Feedback {
    #[must_use]
    pub fn judge(case: &ScenarioCase, guess: Guess) -> Self {
        let verdict = if case.is_answered_by(&guess) {
            Verdict::Correct
        } else if guess == Guess::Unsure {
            Verdict::Unsure
        } else {
            Verdict::Incorrect
        };

        Self {
            verdict,
            guess,
            answer: case.answer().to_owned(),
            detail: case.detail().to_owned(),
        }
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.verdict == Verdict::Correct
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (lead, verb) = match self.verdict {
            Verdict::Correct => ("Correct!", "It's"),
            Verdict::Incorrect => ("Nope!", "It was"),
            Verdict::Unsure => ("No worries!", "It was"),
        };
        write!(f, "{lead} {verb} {} ({})", self.answer, self.detail)
    }
}
