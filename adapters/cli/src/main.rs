#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs an Ananas Hunt session in the terminal.

mod settings;
mod terminal;

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use ananas_core::{GameConfig, Outcome};
use ananas_rendering::TextFrame;
use ananas_system_actors::InputDisposition;
use ananas_system_dungeon::SeededRandom;
use ananas_system_session::Session;
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use settings::Overrides;

const CLEAR_SCREEN: &str = "\x1b[H\x1b[2J";
const QUIT_COMMAND: &str = "q";

/// Find the ananas before Pedro catches you.
#[derive(Debug, Parser)]
#[command(name = "ananas-hunt", version, about)]
struct CliArgs {
    /// TOML file with game settings; flags below take precedence.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seed for dungeon generation and placement.
    #[arg(long)]
    seed: Option<u64>,

    /// Display width in cells.
    #[arg(long)]
    width: Option<u32>,

    /// Display height in cells, message rows included.
    #[arg(long)]
    height: Option<u32>,

    /// Number of boxes to hide.
    #[arg(long)]
    markers: Option<usize>,

    /// Keys to play without reading the terminal, e.g. "llj ".
    #[arg(long, value_name = "KEYS")]
    script: Option<String>,
}

impl CliArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            seed: self.seed,
            width: self.width,
            height: self.height,
            markers: self.markers,
        }
    }
}

/// Entry point for the Ananas Hunt command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();

    let config = settings::resolve(settings::load(args.config.as_deref())?, &args.overrides())?;
    let seed = config.seed.unwrap_or_else(rand::random);
    info!(seed, width = config.width, height = config.height, "ananas_hunt_starting");

    let mut session = Session::new(&config, &mut SeededRandom::seeded(seed))
        .with_context(|| format!("failed to create a session from seed {seed}"))?;
    let mut frame = frame_for(&config);
    session.start(&mut frame).context("failed to start the session")?;

    match args.script.as_deref() {
        Some(script) => play_script(&mut session, &mut frame, script)?,
        None => play_interactive(&mut session, &mut frame)?,
    }

    info!(outcome = ?session.outcome(), "ananas_hunt_finished");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn frame_for(config: &GameConfig) -> TextFrame {
    TextFrame::new(config.width, config.play_height(), config.message_rows)
}

fn play_script(session: &mut Session, frame: &mut TextFrame, script: &str) -> Result<()> {
    for event in terminal::decode_line(script) {
        if session.is_finished() {
            break;
        }
        let disposition = session.handle_input(event, frame)?;
        log_disposition(event.key_code(), disposition);
    }

    let mut stdout = io::stdout().lock();
    for line in frame.plain_lines() {
        writeln!(stdout, "{line}")?;
    }
    writeln!(stdout, "outcome: {}", outcome_label(session.outcome()))?;
    Ok(())
}

fn play_interactive(session: &mut Session, frame: &mut TextFrame) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    draw(&mut stdout, frame)?;

    for line in stdin.lock().lines() {
        let line = line.context("failed to read from standard input")?;
        if line.trim() == QUIT_COMMAND {
            info!("player_quit");
            break;
        }

        for event in terminal::decode_line(&line) {
            let disposition = session.handle_input(event, frame)?;
            log_disposition(event.key_code(), disposition);
        }
        draw(&mut stdout, frame)?;

        if session.is_finished() {
            break;
        }
    }
    Ok(())
}

fn draw(out: &mut impl Write, frame: &TextFrame) -> io::Result<()> {
    write!(out, "{CLEAR_SCREEN}{}", frame.to_ansi())?;
    out.flush()
}

fn log_disposition(key: u32, disposition: InputDisposition) {
    debug!(key, ?disposition, "input_handled");
}

fn outcome_label(outcome: Option<Outcome>) -> &'static str {
    match outcome {
        Some(Outcome::Victory) => "victory",
        Some(Outcome::Captured) => "captured",
        None => "undecided",
    }
}
