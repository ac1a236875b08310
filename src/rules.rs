use crate::board::{BoardView, Turn};
use crate::error::{ChessError, Result};
use crate::movegen::MoveGenerator;
use crate::piece::{Color, Piece, PieceKind};
use crate::position::{Position, BOARD_SIZE};
use crate::speculative::SpeculativeBoard;

/// Straight-line movement along the enabled axes, up to `max_distance` squares,
/// with every square in between empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearRule {
    vertical: bool,
    horizontal: bool,
    diagonal: bool,
    max_distance: u8,
}

impl LinearRule {
    pub const fn new(vertical: bool, horizontal: bool, diagonal: bool, max_distance: u8) -> Self {
        Self {
            vertical,
            horizontal,
            diagonal,
            max_distance,
        }
    }

    fn is_valid_shape(&self, column_distance: u8, row_distance: u8) -> bool {
        let linear = (self.vertical && column_distance == 0)
            || (self.horizontal && row_distance == 0)
            || (self.diagonal && column_distance == row_distance);
        linear && column_distance.max(row_distance) <= self.max_distance
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRule {
    Linear(LinearRule),
    /// One square along one axis and two along the other. Never blocked.
    Knight,
    /// Forward advance onto an empty square; two squares from the pawn row.
    PawnMove,
    /// One square diagonally forward.
    PawnCapture,
}

pub static KING_RULE: MoveRule = MoveRule::Linear(LinearRule::new(true, true, true, 1));
pub static QUEEN_RULE: MoveRule = MoveRule::Linear(LinearRule::new(true, true, true, BOARD_SIZE));
pub static ROOK_RULE: MoveRule = MoveRule::Linear(LinearRule::new(true, true, false, BOARD_SIZE));
pub static BISHOP_RULE: MoveRule = MoveRule::Linear(LinearRule::new(false, false, true, BOARD_SIZE));
pub static KNIGHT_RULE: MoveRule = MoveRule::Knight;
pub static PAWN_MOVE_RULE: MoveRule = MoveRule::PawnMove;
pub static PAWN_CAPTURE_RULE: MoveRule = MoveRule::PawnCapture;

impl PieceKind {
    pub fn move_rule(&self) -> &'static MoveRule {
        match self {
            PieceKind::King => &KING_RULE,
            PieceKind::Queen => &QUEEN_RULE,
            PieceKind::Rook => &ROOK_RULE,
            PieceKind::Bishop => &BISHOP_RULE,
            PieceKind::Knight => &KNIGHT_RULE,
            PieceKind::Pawn => &PAWN_MOVE_RULE,
        }
    }

    /// Rule for moves onto an enemy piece. Also decides which squares a piece threatens.
    pub fn capture_rule(&self) -> &'static MoveRule {
        match self {
            PieceKind::Pawn => &PAWN_CAPTURE_RULE,
            other => other.move_rule(),
        }
    }

    pub fn rule_for(&self, capturing: bool) -> &'static MoveRule {
        if capturing {
            self.capture_rule()
        } else {
            self.move_rule()
        }
    }
}

impl MoveRule {
    /// Full legality: the move fits the rule on `board`, and the mover's own king
    /// is not attacked on the board as it would stand after the move.
    pub fn is_valid_move<B: BoardView + ?Sized>(
        &self,
        from: Position,
        to: Position,
        color: Color,
        board: &B,
    ) -> Result<bool> {
        if !self.is_valid_piece_move(from, to, color, board)? {
            return Ok(false);
        }
        let Some(after) = SpeculativeBoard::new(board, Turn::new(from, to)) else {
            return Ok(false);
        };
        Ok(!MoveGenerator::new().is_king_in_check(&after, color)?)
    }

    /// Shape and path legality on `board` as it stands, ignoring check.
    pub(crate) fn is_valid_piece_move<B: BoardView + ?Sized>(
        &self,
        from: Position,
        to: Position,
        color: Color,
        board: &B,
    ) -> Result<bool> {
        if from == to {
            return Err(ChessError::IllegalSelfMove(from));
        }
        let destination = board.piece_at(to);
        if destination.map_or(false, |piece| piece.color() == color) {
            return Ok(false);
        }

        let (columns, rows) = from.delta(to);
        let legal = match self {
            MoveRule::Linear(rule) => {
                rule.is_valid_shape(columns.unsigned_abs(), rows.unsigned_abs())
                    && is_path_clear(from, to, board)
            }
            MoveRule::Knight => {
                let (a, b) = (columns.unsigned_abs(), rows.unsigned_abs());
                a.min(b) == 1 && a.max(b) == 2
            }
            MoveRule::PawnMove => {
                let forward = color.forward();
                columns == 0
                    && destination.is_none()
                    && (rows == forward
                        || (rows == 2 * forward
                            && from.row() == color.pawn_row()
                            && is_path_clear(from, to, board)))
            }
            MoveRule::PawnCapture => rows == color.forward() && columns.abs() == 1,
        };
        Ok(legal)
    }

    /// Squares strictly between `from` and `to` that would block this move if occupied,
    /// ordered from `from` outwards. Empty for knights and single steps.
    pub fn intermediary_positions(&self, from: Position, to: Position, _color: Color) -> Vec<Position> {
        match self {
            MoveRule::Knight | MoveRule::PawnCapture => Vec::new(),
            MoveRule::Linear(_) | MoveRule::PawnMove => Line::between(from, to)
                .map(|line| line.collect())
                .unwrap_or_default(),
        }
    }
}

fn is_path_clear<B: BoardView + ?Sized>(from: Position, to: Position, board: &B) -> bool {
    Line::between(from, to).map_or(true, |mut line| line.all(|square| board.piece_at(square).is_none()))
}

/// Walks the squares strictly between two squares on a shared row, column or diagonal.
#[derive(Debug, Clone)]
pub struct Line {
    current: Position,
    end: Position,
    step: (i8, i8),
}

impl Line {
    /// `None` unless the two squares are distinct and aligned.
    pub fn between(from: Position, to: Position) -> Option<Self> {
        let (columns, rows) = from.delta(to);
        let aligned = columns == 0 || rows == 0 || columns.abs() == rows.abs();
        if from == to || !aligned {
            return None;
        }
        Some(Self {
            current: from,
            end: to,
            step: (columns.signum(), rows.signum()),
        })
    }
}

impl Iterator for Line {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        let next = self.current.offset(self.step.0, self.step.1)?;
        if next == self.end {
            return None;
        }
        self.current = next;
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use pretty_assertions::assert_eq;

    fn pos(s: &str) -> Position {
        s.parse().unwrap()
    }

    fn squares(list: &[&str]) -> Vec<Position> {
        list.iter().map(|s| pos(s)).collect()
    }

    #[test]
    fn test_lone_rook_reaches_its_row_and_column() {
        let board = Board::from_fen("k6K/8/8/8/3R4/8/8/8").unwrap();
        let from = pos("d4");
        let mut reachable = Vec::new();
        for to in Position::all().filter(|&to| to != from) {
            if ROOK_RULE.is_valid_move(from, to, Color::White, &board).unwrap() {
                reachable.push(to);
            }
        }
        let expected: Vec<Position> = Position::all()
            .filter(|&to| to != from && (to.row() == 4 || to.column() == 4))
            .collect();
        assert_eq!(reachable.len(), 14);
        assert_eq!(reachable, expected);
    }

    #[test]
    fn test_sliding_pieces_are_blocked() {
        let board = Board::new();
        assert!(!ROOK_RULE.is_valid_move(pos("a1"), pos("a3"), Color::White, &board).unwrap());
        assert!(!BISHOP_RULE.is_valid_move(pos("c1"), pos("e3"), Color::White, &board).unwrap());
        assert!(!QUEEN_RULE.is_valid_move(pos("d1"), pos("d4"), Color::White, &board).unwrap());
    }

    #[test]
    fn test_own_piece_at_destination() {
        let board = Board::new();
        assert!(!KING_RULE.is_valid_piece_move(pos("e1"), pos("d1"), Color::White, &board).unwrap());
        assert!(!KNIGHT_RULE.is_valid_piece_move(pos("b1"), pos("d2"), Color::White, &board).unwrap());
    }

    #[test]
    fn test_knight_jumps() {
        let board = Board::new();
        assert!(KNIGHT_RULE.is_valid_move(pos("b1"), pos("c3"), Color::White, &board).unwrap());
        assert!(KNIGHT_RULE.is_valid_move(pos("g8"), pos("f6"), Color::Black, &board).unwrap());
        assert!(!KNIGHT_RULE.is_valid_move(pos("b1"), pos("b3"), Color::White, &board).unwrap());
        assert!(!KNIGHT_RULE.is_valid_move(pos("b1"), pos("d3"), Color::White, &board).unwrap());
    }

    #[test]
    fn test_king_single_step() {
        let board = Board::from_fen("k7/8/8/8/4K3/8/8/8").unwrap();
        assert!(KING_RULE.is_valid_move(pos("e4"), pos("f5"), Color::White, &board).unwrap());
        assert!(KING_RULE.is_valid_move(pos("e4"), pos("e3"), Color::White, &board).unwrap());
        assert!(!KING_RULE.is_valid_move(pos("e4"), pos("e6"), Color::White, &board).unwrap());
        assert!(!KING_RULE.is_valid_move(pos("e4"), pos("g5"), Color::White, &board).unwrap());
    }

    #[test]
    fn test_pawn_advances() {
        let board = Board::new();
        assert!(PAWN_MOVE_RULE.is_valid_move(pos("e2"), pos("e3"), Color::White, &board).unwrap());
        assert!(PAWN_MOVE_RULE.is_valid_move(pos("e2"), pos("e4"), Color::White, &board).unwrap());
        assert!(PAWN_MOVE_RULE.is_valid_move(pos("d7"), pos("d5"), Color::Black, &board).unwrap());
        assert!(!PAWN_MOVE_RULE.is_valid_move(pos("e2"), pos("e5"), Color::White, &board).unwrap());
        assert!(!PAWN_MOVE_RULE.is_valid_move(pos("e2"), pos("f3"), Color::White, &board).unwrap());
        assert!(!PAWN_MOVE_RULE.is_valid_move(pos("d7"), pos("d8"), Color::Black, &board).unwrap());
    }

    #[test]
    fn test_pawn_double_step_needs_pawn_row_and_clear_path() {
        // White pawns on e3 and c2, black knight on c3, black pawn on g4 facing g2.
        let board = Board::from_fen("k7/8/8/8/6p1/2n1P3/2P3P1/K7").unwrap();
        assert!(!PAWN_MOVE_RULE.is_valid_move(pos("e3"), pos("e5"), Color::White, &board).unwrap());
        assert!(PAWN_MOVE_RULE.is_valid_move(pos("e3"), pos("e4"), Color::White, &board).unwrap());
        assert!(!PAWN_MOVE_RULE.is_valid_move(pos("c2"), pos("c4"), Color::White, &board).unwrap());
        assert!(!PAWN_MOVE_RULE.is_valid_move(pos("c2"), pos("c3"), Color::White, &board).unwrap());
        assert!(!PAWN_MOVE_RULE.is_valid_move(pos("g2"), pos("g4"), Color::White, &board).unwrap());
        assert!(PAWN_MOVE_RULE.is_valid_move(pos("g2"), pos("g3"), Color::White, &board).unwrap());
    }

    #[test]
    fn test_pawn_capture_is_forward_diagonal() {
        let board = Board::from_fen("k7/8/8/3p4/4P3/8/8/K7").unwrap();
        assert!(PAWN_CAPTURE_RULE.is_valid_move(pos("e4"), pos("d5"), Color::White, &board).unwrap());
        assert!(PAWN_CAPTURE_RULE.is_valid_move(pos("d5"), pos("e4"), Color::Black, &board).unwrap());
        assert!(!PAWN_CAPTURE_RULE.is_valid_move(pos("e4"), pos("d3"), Color::White, &board).unwrap());
        assert!(!PAWN_CAPTURE_RULE.is_valid_move(pos("e4"), pos("e5"), Color::White, &board).unwrap());
        assert!(!PAWN_CAPTURE_RULE.is_valid_move(pos("e4"), pos("c6"), Color::White, &board).unwrap());
    }

    #[test]
    fn test_move_onto_itself_is_an_error() {
        let board = Board::new();
        assert_eq!(
            ROOK_RULE.is_valid_move(pos("a1"), pos("a1"), Color::White, &board),
            Err(ChessError::IllegalSelfMove(pos("a1")))
        );
    }

    #[test]
    fn test_pinned_piece_cannot_leave_the_pin_line() {
        // White bishop on e2 shields its king on e1 from the rook on e8.
        let board = Board::from_fen("k3r3/8/8/8/8/8/4B3/4K3").unwrap();
        let (from, to) = (pos("e2"), pos("d3"));
        assert!(BISHOP_RULE.is_valid_piece_move(from, to, Color::White, &board).unwrap());
        assert!(!BISHOP_RULE.is_valid_move(from, to, Color::White, &board).unwrap());
    }

    #[test]
    fn test_pinned_piece_may_move_along_the_pin() {
        let board = Board::from_fen("k3r3/8/8/8/8/8/4R3/4K3").unwrap();
        assert!(ROOK_RULE.is_valid_move(pos("e2"), pos("e5"), Color::White, &board).unwrap());
        assert!(ROOK_RULE.is_valid_move(pos("e2"), pos("e8"), Color::White, &board).unwrap());
        assert!(!ROOK_RULE.is_valid_move(pos("e2"), pos("a2"), Color::White, &board).unwrap());
    }

    #[test]
    fn test_king_cannot_step_into_attack() {
        let board = Board::from_fen("k7/8/8/8/8/8/r7/4K3").unwrap();
        assert!(!KING_RULE.is_valid_move(pos("e1"), pos("e2"), Color::White, &board).unwrap());
        assert!(KING_RULE.is_valid_move(pos("e1"), pos("f1"), Color::White, &board).unwrap());
    }

    #[test]
    fn test_intermediary_positions() {
        assert_eq!(
            ROOK_RULE.intermediary_positions(pos("a1"), pos("a5"), Color::White),
            squares(&["a2", "a3", "a4"])
        );
        assert_eq!(
            BISHOP_RULE.intermediary_positions(pos("f4"), pos("c1"), Color::White),
            squares(&["e3", "d2"])
        );
        assert_eq!(
            PAWN_MOVE_RULE.intermediary_positions(pos("e7"), pos("e5"), Color::Black),
            squares(&["e6"])
        );
        assert!(KING_RULE.intermediary_positions(pos("e1"), pos("e2"), Color::White).is_empty());
        assert!(KNIGHT_RULE.intermediary_positions(pos("b1"), pos("c3"), Color::White).is_empty());
        assert!(PAWN_CAPTURE_RULE.intermediary_positions(pos("e4"), pos("d5"), Color::White).is_empty());
    }

    #[test]
    fn test_line_requires_alignment() {
        assert!(Line::between(pos("a1"), pos("b3")).is_none());
        assert!(Line::between(pos("a1"), pos("a1")).is_none());
        assert_eq!(Line::between(pos("h8"), pos("e5")).unwrap().count(), 2);
    }

    #[test]
    fn test_rule_table() {
        assert_eq!(PieceKind::Pawn.move_rule(), &PAWN_MOVE_RULE);
        assert_eq!(PieceKind::Pawn.capture_rule(), &PAWN_CAPTURE_RULE);
        assert_eq!(PieceKind::Queen.capture_rule(), &QUEEN_RULE);
        assert_eq!(PieceKind::Pawn.rule_for(true), &PAWN_CAPTURE_RULE);
    }
}
