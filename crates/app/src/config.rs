use std::fmt;
use std::path::{Path, PathBuf};

use services::{DEFAULT_TOP, StoreBackend};

pub const STORE_ENV: &str = "MATCHMAKER_STORE";
pub const GAME_ENV: &str = "MATCHMAKER_GAME";
pub const SHUFFLE_ENV: &str = "MATCHMAKER_SHUFFLE";

#[derive(Debug, PartialEq, Eq)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidStore { raw: String },
    InvalidLimit { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidStore { raw } => write!(
                f,
                "invalid store value: {raw} (expected memory, csv:<path> or sqlite:<path>)"
            ),
            ArgsError::InvalidLimit { raw } => write!(f, "invalid --limit value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  matchmaker [play] [--game ml|dl] [--store <spec>] [--ordered]");
    eprintln!("  matchmaker leaderboard [--game ml|dl] [--limit <n>] [--store <spec>]");
    eprintln!();
    eprintln!("Store specs:");
    eprintln!("  memory            scores last until the process exits (default)");
    eprintln!("  csv:<path>        flat Name,Score,Game file");
    eprintln!("  sqlite:<path>     SQLite database file");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  {STORE_ENV}, {GAME_ENV}, {SHUFFLE_ENV}=0, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play,
    Leaderboard,
    Help,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "play" => Some(Self::Play),
            "leaderboard" => Some(Self::Leaderboard),
            "help" | "--help" | "-h" => Some(Self::Help),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub command: Command,
    pub store: StoreBackend,
    /// Game label to open first; for `leaderboard`, the optional filter.
    pub game: Option<String>,
    pub shuffle: bool,
    pub limit: usize,
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    /// Parse command-line arguments, falling back to `env` for unset values.
    ///
    /// Flags win over environment variables, which win over defaults.
    pub fn parse(
        argv: impl IntoIterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut args = argv.into_iter().peekable();

        // Default behavior: play when no subcommand is provided.
        let command = match args.peek().map(String::as_str) {
            None => Command::Play,
            Some(first) if first.starts_with("--") && first != "--help" => Command::Play,
            Some(first) => {
                let cmd = Command::from_arg(first)
                    .ok_or_else(|| ArgsError::UnknownCommand(first.to_owned()))?;
                args.next();
                cmd
            }
        };

        // The env spec is only parsed when no `--store` flag overrides it.
        let env_store = env(STORE_ENV).filter(|s| !s.trim().is_empty());
        let mut store = None;
        let mut game = env(GAME_ENV).filter(|g| !g.trim().is_empty());
        let mut shuffle = env(SHUFFLE_ENV).is_none_or(|raw| !is_falsy(&raw));
        let mut limit = DEFAULT_TOP;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--store" => store = Some(parse_store(&require_value(&mut args, "--store")?)?),
                "--game" => game = Some(require_value(&mut args, "--game")?),
                "--ordered" => shuffle = false,
                "--limit" => {
                    let value = require_value(&mut args, "--limit")?;
                    limit = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidLimit { raw: value.clone() })?;
                }
                "--help" | "-h" => {
                    return Ok(Self {
                        command: Command::Help,
                        store: store.unwrap_or(StoreBackend::Memory),
                        game,
                        shuffle,
                        limit,
                    });
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let store = match (store, env_store) {
            (Some(store), _) => store,
            (None, Some(raw)) => parse_store(&raw)?,
            (None, None) => StoreBackend::Memory,
        };
        Ok(Self {
            command,
            store,
            game,
            shuffle,
            limit,
        })
    }
}

fn is_falsy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

/// Parse a store spec: `memory`, `csv:<path>` or `sqlite:<path-or-url>`.
pub fn parse_store(raw: &str) -> Result<StoreBackend, ArgsError> {
    let trimmed = raw.trim();
    let invalid = || ArgsError::InvalidStore {
        raw: raw.to_owned(),
    };

    if trimmed.eq_ignore_ascii_case("memory") {
        return Ok(StoreBackend::Memory);
    }
    if let Some(path) = trimmed.strip_prefix("csv:") {
        if path.trim().is_empty() {
            return Err(invalid());
        }
        return Ok(StoreBackend::Csv(PathBuf::from(path.trim())));
    }
    if trimmed.starts_with("sqlite:") {
        let url = normalize_sqlite_url(trimmed);
        if url == "sqlite://" {
            return Err(invalid());
        }
        return Ok(StoreBackend::Sqlite(url));
    }
    Err(invalid())
}

fn normalize_sqlite_url(raw: &str) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw.to_owned();
    }

    let path_str = raw.strip_prefix("sqlite:").unwrap_or(raw).trim();
    if path_str.is_empty() {
        return "sqlite://".to_owned();
    }
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Create the `SQLite` file and its parent directory so the pool can open it.
pub fn prepare_sqlite_file(db_url: &str) -> std::io::Result<()> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }
    let Some(path) = db_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Ok(());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}
