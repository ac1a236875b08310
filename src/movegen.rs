use log::trace;

use crate::board::{BoardView, Turn};
use crate::error::Result;
use crate::piece::{Color, Piece, PieceKind, PieceRef};
use crate::position::Position;

/// Threat detection, checkmate search and legal move generation over any [`BoardView`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveGenerator;

impl MoveGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Whether any piece of `attacker` could capture onto `square`.
    ///
    /// Only shape and path are checked. Whether the attacker would expose its own king
    /// by striking does not matter here.
    pub fn is_square_threatened<B: BoardView + ?Sized>(
        &self,
        board: &B,
        square: Position,
        attacker: Color,
    ) -> Result<bool> {
        for piece in board.pieces(attacker) {
            if self.threatens(&piece, square, board)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Every piece of `attacker` that could capture onto `square`.
    pub fn threatening_pieces<'b, B: BoardView + ?Sized>(
        &self,
        board: &'b B,
        square: Position,
        attacker: Color,
    ) -> Result<Vec<PieceRef<'b>>> {
        let mut threats = Vec::new();
        for piece in board.pieces(attacker) {
            if self.threatens(&piece, square, board)? {
                threats.push(piece);
            }
        }
        Ok(threats)
    }

    fn threatens<B: BoardView + ?Sized>(&self, piece: &PieceRef<'_>, square: Position, board: &B) -> Result<bool> {
        match piece.position() {
            Some(from) if from != square => {
                piece
                    .kind()
                    .capture_rule()
                    .is_valid_piece_move(from, square, piece.color(), board)
            }
            _ => Ok(false),
        }
    }

    pub fn is_king_in_check<B: BoardView + ?Sized>(&self, board: &B, color: Color) -> Result<bool> {
        match board.king(color).position() {
            Some(square) => self.is_square_threatened(board, square, color.opposite()),
            None => Ok(false),
        }
    }

    /// Neighbouring squares the king of `color` can legally move to.
    pub fn king_escape_squares<B: BoardView + ?Sized>(&self, board: &B, color: Color) -> Result<Vec<Position>> {
        let Some(from) = board.king(color).position() else {
            return Ok(Vec::new());
        };
        let rule = PieceKind::King.move_rule();
        let mut escapes = Vec::new();
        for to in from.neighbors() {
            if rule.is_valid_move(from, to, color, board)? {
                escapes.push(to);
            }
        }
        Ok(escapes)
    }

    /// Every legal turn that gets the king of `color` out of check: king steps,
    /// and, against a single attacker, blocks and captures.
    pub fn defending_moves<B: BoardView + ?Sized>(&self, board: &B, color: Color) -> Result<Vec<Turn>> {
        self.find_defences(board, color, false)
    }

    /// The king of `color` is in check and no legal turn resolves it.
    pub fn is_checkmate<B: BoardView + ?Sized>(&self, board: &B, color: Color) -> Result<bool> {
        if !self.is_king_in_check(board, color)? {
            return Ok(false);
        }
        Ok(self.find_defences(board, color, true)?.is_empty())
    }

    fn find_defences<B: BoardView + ?Sized>(&self, board: &B, color: Color, first_only: bool) -> Result<Vec<Turn>> {
        let king = board.king(color);
        let Some(king_square) = king.position() else {
            return Ok(Vec::new());
        };

        let mut defences = Vec::new();
        let king_rule = king.kind().move_rule();
        for to in king_square.neighbors() {
            if king_rule.is_valid_move(king_square, to, color, board)? {
                defences.push(Turn::new(king_square, to));
                if first_only {
                    return Ok(defences);
                }
            }
        }

        let attackers = self.threatening_pieces(board, king_square, color.opposite())?;
        let [attacker] = attackers.as_slice() else {
            trace!("{} attackers on {color} king at {king_square}, no block or capture", attackers.len());
            return Ok(defences);
        };
        let Some(target) = attacker.position() else {
            return Ok(defences);
        };
        let blocks = attacker
            .kind()
            .capture_rule()
            .intermediary_positions(target, king_square, attacker.color());
        trace!("single attacker on {target}, {} blocking squares", blocks.len());

        for piece in board.pieces(color) {
            if piece.kind() == PieceKind::King {
                continue;
            }
            let Some(from) = piece.position() else {
                continue;
            };
            let move_rule = piece.kind().move_rule();
            for &square in &blocks {
                if move_rule.is_valid_move(from, square, color, board)? {
                    defences.push(Turn::new(from, square));
                    if first_only {
                        return Ok(defences);
                    }
                }
            }
            if piece.kind().capture_rule().is_valid_move(from, target, color, board)? {
                defences.push(Turn::new(from, target));
                if first_only {
                    return Ok(defences);
                }
            }
        }
        Ok(defences)
    }

    /// Every legal turn for `color`. A move onto an enemy piece is judged by the capture rule.
    pub fn generate_moves<B: BoardView + ?Sized>(&self, board: &B, color: Color) -> Result<Vec<Turn>> {
        let mut moves = Vec::new();
        for piece in board.pieces(color) {
            let Some(from) = piece.position() else {
                continue;
            };
            for to in Position::all() {
                if to == from {
                    continue;
                }
                let occupant = board.piece_at(to);
                if occupant.map_or(false, |other| other.color() == color) {
                    continue;
                }
                let rule = piece.kind().rule_for(occupant.is_some());
                if rule.is_valid_move(from, to, color, board)? {
                    moves.push(Turn::new(from, to));
                }
            }
        }
        Ok(moves)
    }
}
