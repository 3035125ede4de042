use std::io;

use quiz_core::Clock;
use quiz_core::catalog::ML_LABEL;
use services::{AppServices, StoreBackend};
use tracing_subscriber::EnvFilter;

mod config;
mod terminal;

use config::{Args, Command, print_usage};
use terminal::Terminal;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("matchmaker=info,services=info,storage=info"));
    // Logs go to stderr so they never interleave with quiz prompts.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse(std::env::args().skip(1), |key| std::env::var(key).ok())
        .inspect_err(|_| print_usage())?;
    tracing::debug!(command = ?args.command, store = ?args.store, "starting matchmaker");

    if args.command == Command::Help {
        print_usage();
        return Ok(());
    }

    // Keep filesystem preparation in the binary glue so services stay pure.
    if let StoreBackend::Sqlite(url) = &args.store {
        config::prepare_sqlite_file(url)?;
    }
    let services = AppServices::new(&args.store, Clock::default_clock(), args.shuffle).await?;

    let stdin = io::stdin();
    let mut terminal = Terminal::new(stdin.lock(), io::stdout());
    match args.command {
        Command::Play => {
            let game = args.game.as_deref().unwrap_or(ML_LABEL);
            terminal.play(&services, game).await?;
        }
        Command::Leaderboard => {
            let game = match args.game.as_deref() {
                Some(label) => Some(
                    services
                        .game(label)
                        .ok_or_else(|| format!("unknown game: {label}"))?,
                ),
                None => None,
            };
            terminal
                .show_leaderboard(&services, game.as_ref().map(|g| g.label()), args.limit)
                .await?;
        }
        Command::Help => {}
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
