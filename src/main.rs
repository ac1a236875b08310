use anyhow::{Context, Result};
use chess_arbiter::{Board, ConsoleHandler, GameConfig};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play a game of chess between two people at one terminal", long_about = None)]
struct Args {
    /// Full moves before the game is declared a draw
    #[arg(long, default_value_t = 50)]
    move_limit: u32,

    /// Play on until checkmate or stalemate
    #[arg(long, conflicts_with = "move_limit")]
    no_move_limit: bool,

    /// Starting piece placement in FEN; white moves first
    #[arg(long)]
    fen: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = GameConfig {
        move_limit: (!args.no_move_limit).then_some(args.move_limit),
    };
    let board = match &args.fen {
        Some(fen) => Board::from_fen(fen).with_context(|| format!("loading position `{fen}`"))?,
        None => Board::new(),
    };

    log::info!("starting game, move limit {:?}", config.move_limit);
    let mut console = ConsoleHandler::from_board(board, config).context("starting position")?;
    console.run()
}
