#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Hunters in a terminal.

mod config;
mod input;
mod render;

use std::{
    path::PathBuf,
    sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError},
    thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use hunters_core::{Difficulty, GameMode, WELCOME_BANNER};
use hunters_ledger::ScoreLedger;
use hunters_session::{register, MatchOptions, ScoreSink, Session};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    config::HostConfig,
    input::{spawn_reader, Input},
};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

#[derive(Parser, Debug)]
#[command(name = "hunters")]
#[command(about = "Escape the hunters, or hunt them down, on a generated tile map")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play matches until you decline a rematch
    Play {
        /// Name recorded in the score ledger
        #[arg(long)]
        name: String,
        /// Difficulty label (Fácil, Normal, Difícil or easy, normal, hard)
        #[arg(long, default_value = "Normal")]
        difficulty: Difficulty,
        /// Side of the chase to play
        #[arg(long, value_enum, default_value_t = CliMode::Escape)]
        mode: CliMode,
        /// Seed of the first match; a random one is drawn when omitted
        #[arg(long)]
        seed: Option<u64>,
        /// Score ledger file
        #[arg(long)]
        scores: Option<PathBuf>,
        /// TOML file overriding match rules
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print both top-five lists
    Scores {
        /// Score ledger file
        #[arg(long)]
        scores: Option<PathBuf>,
        /// TOML file that may name the score ledger
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum CliMode {
    /// Run for the exit
    Escape,
    /// Chase the enemies
    Hunter,
}

impl From<CliMode> for GameMode {
    fn from(mode: CliMode) -> Self {
        match mode {
            CliMode::Escape => GameMode::Escape,
            CliMode::Hunter => GameMode::Hunter,
        }
    }
}

/// Entry point for the Hunters command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            name,
            difficulty,
            mode,
            seed,
            scores,
            config,
        } => {
            let config = HostConfig::load(config.as_deref())?;
            let scores = config.scores_path(scores);
            play(
                &name,
                difficulty,
                mode.into(),
                seed.unwrap_or_else(rand::random),
                config,
                scores,
            )
        }
        Commands::Scores { scores, config } => {
            let config = HostConfig::load(config.as_deref())?;
            let ledger = ScoreLedger::open(config.scores_path(scores));
            println!("{}", render::rankings(&ledger));
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn play(
    name: &str,
    difficulty: Difficulty,
    mode: GameMode,
    first_seed: u64,
    config: HostConfig,
    scores: PathBuf,
) -> Result<()> {
    let mut ledger = ScoreLedger::open(&scores);
    info!(path = %scores.display(), "score ledger opened");

    let (sender, receiver) = mpsc::channel();
    let _reader = spawn_reader(sender).context("failed to spawn stdin reader thread")?;

    println!("{WELCOME_BANNER}");
    println!("{}", render::rankings(&ledger));

    let mut seed = first_seed;
    loop {
        let options = MatchOptions {
            seed,
            rules: config.rules.clone(),
        };
        let mut session = register(name, difficulty, mode, options, &mut ledger)
            .context("failed to register match")?;
        let input_open = run_match(&mut session, &receiver);

        if let Some(summary) = session.summary() {
            println!("{}", render::summary(&summary));
        }
        drop(session);
        println!("{}", render::rankings(&ledger));

        if !input_open || !ask_play_again(&receiver) {
            return Ok(());
        }
        seed = seed.wrapping_add(1);
    }
}

/// Drives one match at the configured tick cadence.
///
/// Returns whether stdin is still open once the match ends.
fn run_match<S: ScoreSink>(session: &mut Session<S>, receiver: &Receiver<Input>) -> bool {
    let tick = session.rules().tick();
    let mut input_open = true;
    let mut deadline = Instant::now();

    loop {
        while input_open {
            match receiver.try_recv() {
                Ok(Input::Commands(commands)) => {
                    for command in commands {
                        let _ = session.apply_input(command);
                    }
                }
                Ok(Input::Answer(_)) => {}
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!("stdin closed, forfeiting the match");
                    input_open = false;
                    let _ = session.forfeit();
                }
            }
        }

        let report = session.step();
        let snapshot = session.snapshot();
        print!("{CLEAR_SCREEN}{}", render::board(&snapshot));
        println!("{}", render::status_line(&snapshot, &report));
        if report.status.is_terminal() {
            return input_open;
        }

        deadline += tick;
        thread::sleep(deadline.saturating_duration_since(Instant::now()));
    }
}

fn ask_play_again(receiver: &Receiver<Input>) -> bool {
    println!("Play again? [y/n]");
    loop {
        match receiver.recv_timeout(Duration::from_secs(300)) {
            Ok(Input::Answer(answer)) => return answer,
            Ok(Input::Commands(_)) => println!("Please answer y or n."),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => return false,
        }
    }
}
