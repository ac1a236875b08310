pub mod board;
pub mod console;
pub mod error;
pub mod game;
pub mod movegen;
pub mod piece;
pub mod position;
pub mod rules;
pub mod speculative;

pub use board::{Board, BoardView, MoveRecord, Turn};
pub use console::ConsoleHandler;
pub use error::{ChessError, Result};
pub use game::{Game, GameConfig, Rejection, Submission};
pub use movegen::MoveGenerator;
pub use piece::{Color, Outcome, Piece, PieceId, PieceKind, PieceRef, ShadowPiece, StoredPiece};
pub use position::Position;
pub use rules::MoveRule;
pub use speculative::SpeculativeBoard;
