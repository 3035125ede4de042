//! Line-oriented terminal front end for the quiz.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use quiz_core::model::{Feedback, GameVariant, Guess, LeaderboardEntry, QuizSession, Verdict};
use services::{AppServices, DEFAULT_TOP, QuestionView, ResultView, ScoreSubmission};

type AppResult<T> = Result<T, Box<dyn std::error::Error>>;

/// What the player picked on the end-of-game menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    PlayAgain,
    SwitchGame,
    Leaderboard,
    Quit,
}

/// One line of input at the guess prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Turn {
    Guess(Guess),
    Switch,
}

/// How a run through the questions stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoundEnd {
    Completed,
    Switched,
    InputEnded,
}

/// The game after `current` in catalog order, wrapping around.
fn next_game(services: &AppServices, current: &GameVariant) -> Arc<GameVariant> {
    let games = services.games();
    let position = games
        .iter()
        .position(|g| g.label() == current.label())
        .unwrap_or(0);
    games
        .get((position + 1) % games.len().max(1))
        .map_or_else(|| Arc::new(current.clone()), Arc::clone)
}

/// Terminal presenter over arbitrary input/output streams.
pub struct Terminal<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.output
    }

    /// Show `message` and read one trimmed line; `None` on end of input.
    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_owned()))
    }

    /// Run games until the player quits or input ends.
    pub async fn play(&mut self, services: &AppServices, first_game: &str) -> AppResult<()> {
        let quiz = services.quiz_loop();
        let mut sessions: HashMap<String, QuizSession> = HashMap::new();
        let mut current = services
            .game(first_game)
            .ok_or_else(|| format!("unknown game: {first_game}"))?;

        writeln!(self.output, "Matchmaker: ML & DL Edition")?;
        loop {
            let session = match sessions.entry(current.label().to_owned()) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => entry.insert(quiz.start(Arc::clone(&current))?),
            };
            if session.is_complete() {
                quiz.play_again(session)?;
            }

            writeln!(self.output, "\n== {} ==", current.title())?;
            if session.answered_count() > 0 {
                writeln!(
                    self.output,
                    "Resuming at scenario {} of {}, score {}",
                    session.index() + 1,
                    session.total(),
                    session.score()
                )?;
            }
            match self.run_questions(services, session)? {
                RoundEnd::Completed => {}
                RoundEnd::Switched => {
                    current = next_game(services, &current);
                    continue;
                }
                RoundEnd::InputEnded => return Ok(()),
            }

            let Some(result) = quiz.result(session) else {
                return Ok(());
            };
            self.show_result(&result)?;
            if !self.offer_leaderboard(services, session).await? {
                return Ok(());
            }

            loop {
                match self.menu()? {
                    Some(MenuChoice::PlayAgain) => break,
                    Some(MenuChoice::SwitchGame) => {
                        current = next_game(services, &current);
                        break;
                    }
                    Some(MenuChoice::Leaderboard) => {
                        self.show_leaderboard(services, None, DEFAULT_TOP).await?;
                    }
                    Some(MenuChoice::Quit) | None => return Ok(()),
                }
            }
        }
    }

    /// Play the remaining questions of `session`. A paused session picks up
    /// where it left off.
    fn run_questions(
        &mut self,
        services: &AppServices,
        session: &mut QuizSession,
    ) -> AppResult<RoundEnd> {
        let quiz = services.quiz_loop();
        while let Some(view) = quiz.question(session) {
            self.show_question(&view)?;

            if let Some(feedback) = &view.answered {
                self.show_feedback(feedback)?;
            } else {
                let guess = match self.read_guess(&view)? {
                    Some(Turn::Guess(guess)) => guess,
                    Some(Turn::Switch) => return Ok(RoundEnd::Switched),
                    None => return Ok(RoundEnd::InputEnded),
                };
                let answer = quiz.answer(session, guess)?;
                self.show_feedback(&answer.feedback)?;
                writeln!(
                    self.output,
                    "Score: {} ({} remaining)",
                    answer.score, answer.progress.remaining
                )?;
            }

            if self.prompt("Press Enter for the next question ")?.is_none() {
                return Ok(RoundEnd::InputEnded);
            }
            quiz.next(session)?;
        }
        Ok(RoundEnd::Completed)
    }

    fn show_feedback(&mut self, feedback: &Feedback) -> io::Result<()> {
        let marker = match feedback.verdict {
            Verdict::Correct => "[+]",
            Verdict::Incorrect => "[x]",
            Verdict::Unsure => "[?]",
        };
        writeln!(self.output, "{marker} {feedback}")
    }

    fn show_question(&mut self, view: &QuestionView) -> io::Result<()> {
        writeln!(
            self.output,
            "\nScenario {} of {}: {}",
            view.number, view.total, view.scenario
        )?;
        for (i, option) in view.choices.iter().enumerate() {
            writeln!(self.output, "  {}) {option}", i + 1)?;
        }
        Ok(())
    }

    /// Accepts an option number or label, or `s` to switch game; re-prompts until valid.
    fn read_guess(&mut self, view: &QuestionView) -> io::Result<Option<Turn>> {
        loop {
            let Some(line) = self.prompt("Your guess ([s] switch game): ")? else {
                return Ok(None);
            };
            if line.eq_ignore_ascii_case("s") || line.eq_ignore_ascii_case("switch") {
                return Ok(Some(Turn::Switch));
            }
            if let Some(guess) = parse_guess(&line, &view.choices) {
                return Ok(Some(Turn::Guess(guess)));
            }
            writeln!(
                self.output,
                "Pick a number between 1 and {}.",
                view.choices.len()
            )?;
        }
    }

    fn show_result(&mut self, result: &ResultView) -> io::Result<()> {
        writeln!(self.output, "\n---")?;
        writeln!(self.output, "Your Rank: {}", result.rank)?;
        writeln!(
            self.output,
            "Final Score: {} / {}",
            result.score, result.total
        )?;
        if let Some(elapsed) = result.elapsed {
            writeln!(self.output, "Time: {}s", elapsed.num_seconds())?;
        }
        Ok(())
    }

    /// Returns `false` if input ended.
    async fn offer_leaderboard(
        &mut self,
        services: &AppServices,
        session: &QuizSession,
    ) -> AppResult<bool> {
        let Some(name) = self.prompt("Enter your name for the leaderboard (blank to skip): ")?
        else {
            return Ok(false);
        };
        let outcome = services.quiz_loop().submit_score(session, &name).await?;
        match outcome {
            ScoreSubmission::Recorded => writeln!(self.output, "Score submitted!")?,
            ScoreSubmission::SkippedEmptyName => writeln!(self.output, "Score not submitted.")?,
            ScoreSubmission::NotSaved => {
                writeln!(self.output, "Could not save your score this time.")?;
            }
        }
        Ok(true)
    }

    fn menu(&mut self) -> io::Result<Option<MenuChoice>> {
        loop {
            let Some(line) =
                self.prompt("\n[p]lay again, [s]witch game, [l]eaderboard, [q]uit: ")?
            else {
                return Ok(None);
            };
            let choice = match line.to_ascii_lowercase().as_str() {
                "p" | "play" | "" => MenuChoice::PlayAgain,
                "s" | "switch" => MenuChoice::SwitchGame,
                "l" | "leaderboard" => MenuChoice::Leaderboard,
                "q" | "quit" => MenuChoice::Quit,
                _ => continue,
            };
            return Ok(Some(choice));
        }
    }

    /// Print the top scores, optionally for one game.
    pub async fn show_leaderboard(
        &mut self,
        services: &AppServices,
        game: Option<&str>,
        limit: usize,
    ) -> io::Result<()> {
        let entries = services.leaderboard().top(limit, game).await;
        writeln!(self.output, "\nLeaderboard")?;
        if entries.is_empty() {
            return writeln!(self.output, "No leaderboard data yet. Be the first!");
        }
        self.write_table(&entries)
    }

    fn write_table(&mut self, entries: &[LeaderboardEntry]) -> io::Result<()> {
        let width = entries
            .iter()
            .map(|e| e.name().chars().count())
            .max()
            .unwrap_or(0)
            .max("Name".len());
        writeln!(self.output, "{:>3}  {:<width$}  {:>5}  Game", "#", "Name", "Score")?;
        for (i, entry) in entries.iter().enumerate() {
            writeln!(
                self.output,
                "{:>3}  {:<width$}  {:>5}  {}",
                i + 1,
                entry.name(),
                entry.score(),
                entry.game()
            )?;
        }
        Ok(())
    }
}

fn parse_guess(line: &str, options: &[Guess]) -> Option<Guess> {
    if let Ok(n) = line.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| options.get(i)).cloned();
    }
    options
        .iter()
        .find(|option| match option {
            Guess::Label(label) => label.eq_ignore_ascii_case(line),
            Guess::Unsure => line == "?",
        })
        .cloned()
}
