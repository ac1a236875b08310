use thiserror::Error;

use crate::piece::Color;
use crate::position::Position;

/// Failures caused by malformed input. An illegal move is not one of these:
/// legality checks answer `Ok(false)` and let the caller ask again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    #[error("square ({column}, {row}) is off the board")]
    OutOfRange { column: i16, row: i16 },

    #[error("`{0}` is not a square in algebraic notation")]
    InvalidNotation(String),

    #[error("`{0}` is not a playing color")]
    InvalidColorToken(String),

    #[error("cannot move from {0} onto itself")]
    IllegalSelfMove(Position),

    #[error("no piece on {0}")]
    EmptySquare(Position),

    #[error("the king on {0} cannot be captured")]
    KingCapture(Position),

    #[error("{0} has no king")]
    MissingKing(Color),

    #[error("{0} has more than one king")]
    DuplicateKing(Color),

    #[error("{0} is in check but it is not their turn")]
    OpponentInCheck(Color),

    #[error("invalid FEN placement: {0}")]
    InvalidFen(String),
}

pub type Result<T> = std::result::Result<T, ChessError>;
