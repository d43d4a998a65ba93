use std::io::{stdin, stdout};

use anyhow::{Context, Result};
use cheddah_core::{
    fen,
    game::{Board, Side},
    session::Session,
    shell,
};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Play chess on a text board: select a piece, see where it can go, move it.
#[derive(Parser, Debug)]
#[command(name = "cheddah", version, about)]
struct Args {
    /// Starting position as a FEN placement, optionally followed by the side
    /// to move, e.g. "8/8/8/8/3N4/8/8/8 w"
    #[arg(long)]
    fen: Option<String>,

    /// Begin the game right away instead of waiting for `start`
    #[arg(long)]
    start: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .context("Invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let (board, side) = match &args.fen {
        Some(placement) => fen::parse_position(placement)?,
        None => (Board::starting(), Side::White),
    };
    info!(placement = %board.to_placement(), %side, "Loaded position");

    let mut session = Session::new(board, side);
    if args.start {
        session.start();
    }

    shell::start_shell(&mut session, stdin().lock(), stdout().lock())
}
