use std::fmt;

use log::{debug, info};

use crate::board::{Board, BoardView, MoveRecord, Turn};
use crate::error::{ChessError, Result};
use crate::movegen::MoveGenerator;
use crate::piece::{Color, Outcome, Piece, PieceKind, PieceRef, StoredPiece};
use crate::position::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    /// The game is drawn once black completes this full move. `None` plays on indefinitely.
    pub move_limit: Option<u32>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            move_limit: Some(50),
        }
    }
}

/// Why a submitted turn was not played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    GameOver,
    NoPiece,
    NotYourPiece,
    OwnPieceAtDestination,
    IllegalMove,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let reason = match self {
            Rejection::GameOver => "the game is over",
            Rejection::NoPiece => "there is no piece on that square",
            Rejection::NotYourPiece => "that piece belongs to the other side",
            Rejection::OwnPieceAtDestination => "the destination holds one of your pieces",
            Rejection::IllegalMove => "that piece cannot move there",
        };
        f.write_str(reason)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Accepted(MoveRecord),
    Rejected(Rejection),
}

impl Submission {
    pub fn accepted(&self) -> bool {
        matches!(self, Submission::Accepted(_))
    }

    pub fn record(&self) -> Option<&MoveRecord> {
        match self {
            Submission::Accepted(record) => Some(record),
            Submission::Rejected(_) => None,
        }
    }

    pub fn captured(&self) -> Option<&StoredPiece> {
        self.record().and_then(|record| record.captured())
    }

    pub fn is_check(&self) -> bool {
        self.record().map_or(false, |record| record.is_check())
    }

    pub fn is_checkmate(&self) -> bool {
        self.record().map_or(false, |record| record.is_checkmate())
    }
}

/// A game in progress: the board plus whose turn it is and how it ended.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    side_to_move: Color,
    move_number: u32,
    outcome: Option<Outcome>,
    history: Vec<MoveRecord>,
    config: GameConfig,
    generator: MoveGenerator,
}

impl Game {
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    pub fn with_config(config: GameConfig) -> Self {
        Self::unchecked(Board::new(), Color::White, config)
    }

    /// Starts a game from an arbitrary position. The side that just moved must not be
    /// left in check; a position that is already mate or stalemate starts finished.
    pub fn from_board(board: Board, side_to_move: Color, config: GameConfig) -> Result<Self> {
        let mut game = Self::unchecked(board, side_to_move, config);
        let waiting = side_to_move.opposite();
        if game.generator.is_king_in_check(&game.board, waiting)? {
            return Err(ChessError::OpponentInCheck(waiting));
        }

        if game.generator.is_checkmate(&game.board, side_to_move)? {
            info!("{side_to_move} starts checkmated");
            game.outcome = Some(Outcome::Winner(waiting));
        } else if game.generator.generate_moves(&game.board, side_to_move)?.is_empty() {
            info!("{side_to_move} starts stalemated");
            game.outcome = Some(Outcome::Draw);
        }
        Ok(game)
    }

    fn unchecked(board: Board, side_to_move: Color, config: GameConfig) -> Self {
        Self {
            board,
            side_to_move,
            move_number: 1,
            outcome: None,
            history: Vec::new(),
            config,
            generator: MoveGenerator::new(),
        }
    }

    /// Plays `turn` for the side to move if it is legal. A refused turn leaves the game
    /// unchanged and is reported as [`Submission::Rejected`], not as an error.
    pub fn submit_move(&mut self, turn: Turn) -> Result<Submission> {
        if let Some(rejection) = self.check_turn(turn)? {
            debug!("rejected {turn} for {}: {rejection}", self.side_to_move);
            return Ok(Submission::Rejected(rejection));
        }

        let record = self.board.apply(turn)?;
        self.history.push(record);
        let mover = self.side_to_move;

        if record.is_checkmate() {
            info!("{record}: checkmate, {mover} wins");
            self.outcome = Some(Outcome::Winner(mover));
        } else if !record.is_check() && self.generator.generate_moves(&self.board, mover.opposite())?.is_empty() {
            info!("{record}: stalemate");
            self.outcome = Some(Outcome::Draw);
        } else if mover == Color::Black && self.config.move_limit.map_or(false, |limit| self.move_number >= limit) {
            info!("move limit of {} reached, draw", self.move_number);
            self.outcome = Some(Outcome::Draw);
        } else {
            if mover == Color::Black {
                self.move_number += 1;
            }
            self.side_to_move = mover.opposite();
        }
        Ok(Submission::Accepted(record))
    }

    fn check_turn(&self, turn: Turn) -> Result<Option<Rejection>> {
        if self.outcome.is_some() {
            return Ok(Some(Rejection::GameOver));
        }
        let Some(mover) = self.board.piece_at(turn.from) else {
            return Ok(Some(Rejection::NoPiece));
        };
        if mover.color() != self.side_to_move {
            return Ok(Some(Rejection::NotYourPiece));
        }
        let destination = self.board.piece_at(turn.to);
        if destination.map_or(false, |piece| piece.color() == self.side_to_move) {
            return Ok(Some(Rejection::OwnPieceAtDestination));
        }
        if destination.map_or(false, |piece| piece.kind() == PieceKind::King) {
            return Ok(Some(Rejection::IllegalMove));
        }
        let rule = mover.kind().rule_for(destination.is_some());
        if rule.is_valid_move(turn.from, turn.to, self.side_to_move, &self.board)? {
            Ok(None)
        } else {
            Ok(Some(Rejection::IllegalMove))
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Full-move number, starting at 1 and advancing after black moves.
    pub fn move_number(&self) -> u32 {
        self.move_number
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// Legal turns for the side to move.
    pub fn legal_moves(&self) -> Result<Vec<Turn>> {
        if self.is_finished() {
            return Ok(Vec::new());
        }
        self.generator.generate_moves(&self.board, self.side_to_move)
    }

    pub fn is_threatened(&self, square: Position, attacker: Color) -> Result<bool> {
        self.generator.is_square_threatened(&self.board, square, attacker)
    }

    pub fn threatening_pieces(&self, square: Position, attacker: Color) -> Result<Vec<PieceRef<'_>>> {
        self.generator.threatening_pieces(&self.board, square, attacker)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
