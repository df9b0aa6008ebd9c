//! Engine-vs-engine self-play driver
//!
//! Plays one game between two engine instances and prints the final
//! board followed by a JSON result record.

use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;
use log::info;
use serde::Serialize;

use chess_core::{attempt_move, game_status, Engine, GameStatus, Position, SearchLimits, Winner};

#[derive(Parser, Debug)]
#[command(about = "Play one engine-vs-engine game")]
struct Args {
    /// Search depth for both engines
    #[arg(long, default_value_t = 4)]
    depth: u8,

    /// Optional per-move time budget in milliseconds
    #[arg(long)]
    time_ms: Option<u64>,

    /// Abort the game after this many half-moves
    #[arg(long, default_value_t = 400)]
    moves: u32,
}

/// Game outcome as the stored record spells it
#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum Outcome {
    White,
    Black,
    Draw,
}

impl From<Option<Winner>> for Outcome {
    fn from(winner: Option<Winner>) -> Self {
        match winner {
            Some(Winner::White) => Outcome::White,
            Some(Winner::Black) => Outcome::Black,
            None => Outcome::Draw,
        }
    }
}

#[derive(Serialize)]
struct GameRecord {
    winner: Outcome,
    depth: u8,
    half_moves: u32,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let limits = SearchLimits {
        depth: args.depth,
        time: args.time_ms.map(Duration::from_millis),
        ..Default::default()
    };

    // Each seat keeps its own transposition table
    let mut engines = [Engine::new(limits), Engine::new(limits)];

    let mut pos = Position::startpos();
    let mut half_moves = 0u32;

    let winner = loop {
        match game_status(&pos) {
            GameStatus::Ongoing => {}
            GameStatus::Checkmate(winner) => break Some(winner),
            GameStatus::Stalemate | GameStatus::ForcedDraw => break None,
        }

        if half_moves >= args.moves {
            info!("half-move cap reached, scoring as draw");
            break None;
        }

        let seat = pos.side_to_move.index();
        let mv = match engines[seat].choose_move(&pos) {
            Some(mv) => mv,
            None => bail!("search returned no move for an ongoing game"),
        };

        info!("{:?} plays {}", pos.side_to_move, mv);

        pos = match attempt_move(&pos, mv) {
            Some(next) => next,
            None => bail!("engine proposed illegal move {mv}"),
        };
        half_moves += 1;
    };

    println!("{pos}");

    let record = GameRecord {
        winner: Outcome::from(winner),
        depth: args.depth,
        half_moves,
    };
    println!("{}", serde_json::to_string(&record)?);

    Ok(())
}
