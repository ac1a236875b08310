use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::error::{ChessError, Result};
use crate::movegen::MoveGenerator;
use crate::piece::{Color, Piece, PieceId, PieceKind, PieceRef, StoredPiece};
use crate::position::{Position, BOARD_SIZE};
use crate::speculative::SpeculativeBoard;

/// Read access shared by the authoritative board and its speculative projections.
pub trait BoardView {
    fn piece_at(&self, position: Position) -> Option<PieceRef<'_>>;

    /// Pieces of `color` still in play. The returned list is a snapshot.
    fn pieces(&self, color: Color) -> Vec<PieceRef<'_>>;

    fn king(&self, color: Color) -> PieceRef<'_>;

    /// The board as it would stand after `turn`. `None` when the origin is empty.
    fn speculate(&self, turn: Turn) -> Option<SpeculativeBoard<'_, Self>>
    where
        Self: Sized,
    {
        SpeculativeBoard::new(self, turn)
    }
}

/// A proposed move: the piece on `from` goes to `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Turn {
    pub from: Position,
    pub to: Position,
}

impl Turn {
    pub fn new(from: Position, to: Position) -> Self {
        Self { from, to }
    }
}

impl FromStr for Turn {
    type Err = ChessError;

    /// Accepts `e2e4`, `e2-e4` and `e2 e4`.
    fn from_str(s: &str) -> Result<Self> {
        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect();
        if compact.len() != 4 || !compact.is_ascii() {
            return Err(ChessError::InvalidNotation(s.trim().to_string()));
        }
        let from = compact[..2].parse()?;
        let to = compact[2..].parse()?;
        Ok(Turn::new(from, to))
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// What happened when a turn was applied. Never changes once created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveRecord {
    turn: Turn,
    moved: StoredPiece,
    captured: Option<StoredPiece>,
    check: bool,
    checkmate: bool,
}

impl MoveRecord {
    pub fn turn(&self) -> Turn {
        self.turn
    }

    /// The moving piece, at its new square.
    pub fn moved(&self) -> &StoredPiece {
        &self.moved
    }

    pub fn captured(&self) -> Option<&StoredPiece> {
        self.captured.as_ref()
    }

    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// Whether the opponent is in check after this move.
    pub fn is_check(&self) -> bool {
        self.check
    }

    pub fn is_checkmate(&self) -> bool {
        self.checkmate
    }
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let link = if self.is_capture() { 'x' } else { '-' };
        let suffix = if self.checkmate {
            "#"
        } else if self.check {
            "+"
        } else {
            ""
        };
        write!(
            f,
            "{}{}{}{}{}",
            self.moved.kind().abbreviation(),
            self.turn.from,
            link,
            self.turn.to,
            suffix
        )
    }
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// The authoritative game board. Pieces are never dropped: a capture moves the piece
/// from the in-play list to the captured list and clears its position.
#[derive(Debug, Clone)]
pub struct Board {
    store: Vec<StoredPiece>,
    occupancy: HashMap<Position, PieceId>,
    in_play: [Vec<PieceId>; 2],
    captured: [Vec<PieceId>; 2],
    kings: [PieceId; 2],
}

impl Board {
    /// The standard starting position.
    pub fn new() -> Self {
        let mut board = Self::unplaced();
        let mut kings = [PieceId(0); 2];
        for position in Position::all() {
            let back_rank = BACK_RANK[(position.column() - 1) as usize];
            let (kind, color) = match position.row() {
                1 => (back_rank, Color::White),
                2 => (PieceKind::Pawn, Color::White),
                7 => (PieceKind::Pawn, Color::Black),
                8 => (back_rank, Color::Black),
                _ => continue,
            };
            let id = board.place(kind, color, position);
            if kind == PieceKind::King {
                kings[color.index()] = id;
            }
        }
        board.kings = kings;
        board
    }

    /// Builds a board from the piece-placement field of a FEN string. Any further
    /// FEN fields are ignored. Each side needs exactly one king.
    pub fn from_fen(fen: &str) -> Result<Self> {
        let placement = fen
            .split_whitespace()
            .next()
            .ok_or_else(|| ChessError::InvalidFen("empty placement".to_string()))?;
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != BOARD_SIZE as usize {
            return Err(ChessError::InvalidFen(format!(
                "expected {BOARD_SIZE} ranks, found {}",
                ranks.len()
            )));
        }

        let mut board = Self::unplaced();
        let mut kings = [None; 2];
        for (rank_index, rank) in ranks.iter().enumerate() {
            let row = BOARD_SIZE - rank_index as u8;
            let mut column: u8 = 1;
            let mut after_digit = false;
            for c in rank.chars() {
                if let Some(empty) = c.to_digit(10) {
                    if empty == 0 || after_digit {
                        return Err(ChessError::InvalidFen(format!(
                            "rank {row} has a malformed gap count"
                        )));
                    }
                    column = column.saturating_add(empty as u8);
                    after_digit = true;
                    continue;
                }
                after_digit = false;
                let (kind, color) = PieceKind::from_fen_char(c)
                    .ok_or_else(|| ChessError::InvalidFen(format!("unknown piece `{c}`")))?;
                let position = Position::new(column, row)
                    .map_err(|_| ChessError::InvalidFen(format!("rank {row} is too long")))?;
                let id = board.place(kind, color, position);
                if kind == PieceKind::King && kings[color.index()].replace(id).is_some() {
                    return Err(ChessError::DuplicateKing(color));
                }
                column += 1;
            }
            if column != BOARD_SIZE + 1 {
                return Err(ChessError::InvalidFen(format!(
                    "rank {row} does not cover {BOARD_SIZE} squares"
                )));
            }
        }

        board.kings = [
            kings[0].ok_or(ChessError::MissingKing(Color::White))?,
            kings[1].ok_or(ChessError::MissingKing(Color::Black))?,
        ];
        Ok(board)
    }

    fn unplaced() -> Self {
        Self {
            store: Vec::with_capacity(32),
            occupancy: HashMap::with_capacity(32),
            in_play: Default::default(),
            captured: Default::default(),
            kings: [PieceId(0); 2],
        }
    }

    fn place(&mut self, kind: PieceKind, color: Color, position: Position) -> PieceId {
        let id = PieceId(self.store.len());
        self.store.push(StoredPiece::new(id, kind, color, position));
        self.occupancy.insert(position, id);
        self.in_play[color.index()].push(id);
        id
    }

    /// Pieces of `color` taken so far, in capture order.
    pub fn captured(&self, color: Color) -> Vec<StoredPiece> {
        self.captured[color.index()]
            .iter()
            .map(|id| self.store[id.0])
            .collect()
    }

    /// Applies `turn` without judging it. Legality belongs to the rules; the board only
    /// refuses turns that would break its own invariants (empty origin, king capture).
    ///
    /// A piece on the destination is captured before the mover is relocated. The returned
    /// record carries the opponent's check and checkmate status after the move.
    pub fn apply(&mut self, turn: Turn) -> Result<MoveRecord> {
        if turn.from == turn.to {
            return Err(ChessError::IllegalSelfMove(turn.from));
        }
        let mover = *self
            .occupancy
            .get(&turn.from)
            .ok_or(ChessError::EmptySquare(turn.from))?;
        if let Some(target) = self.occupancy.get(&turn.to) {
            if self.store[target.0].kind() == PieceKind::King {
                return Err(ChessError::KingCapture(turn.to));
            }
        }

        let captured = self.occupancy.remove(&turn.to).map(|id| self.capture(id));
        self.occupancy.remove(&turn.from);
        self.occupancy.insert(turn.to, mover);
        self.store[mover.0].set_position(Some(turn.to));
        let moved = self.store[mover.0];

        let generator = MoveGenerator::new();
        let opponent = moved.color().opposite();
        let check = generator.is_king_in_check(self, opponent)?;
        let checkmate = check && generator.is_checkmate(self, opponent)?;

        let record = MoveRecord {
            turn,
            moved,
            captured,
            check,
            checkmate,
        };
        debug!("applied {record} for {}", moved.color());
        Ok(record)
    }

    fn capture(&mut self, id: PieceId) -> StoredPiece {
        let piece = &mut self.store[id.0];
        piece.set_position(None);
        let snapshot = *piece;
        let color = snapshot.color().index();
        self.in_play[color].retain(|&other| other != id);
        self.captured[color].push(id);
        snapshot
    }

    pub fn is_in_check(&self, color: Color) -> Result<bool> {
        MoveGenerator::new().is_king_in_check(self, color)
    }

    pub fn is_checkmate(&self, color: Color) -> Result<bool> {
        MoveGenerator::new().is_checkmate(self, color)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardView for Board {
    fn piece_at(&self, position: Position) -> Option<PieceRef<'_>> {
        self.occupancy
            .get(&position)
            .map(|id| PieceRef::Stored(&self.store[id.0]))
    }

    fn pieces(&self, color: Color) -> Vec<PieceRef<'_>> {
        self.in_play[color.index()]
            .iter()
            .map(|id| PieceRef::Stored(&self.store[id.0]))
            .collect()
    }

    fn king(&self, color: Color) -> PieceRef<'_> {
        PieceRef::Stored(&self.store[self.kings[color.index()].0])
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut result = String::new();
        for row in (1..=BOARD_SIZE).rev() {
            result.push_str(&format!("{row} "));
            for column in 1..=BOARD_SIZE {
                let square = Position::new(column, row).map_err(|_| fmt::Error)?;
                match self.piece_at(square) {
                    Some(piece) => result.push(piece.kind().fen_char(piece.color())),
                    None => result.push('.'),
                }
                if column < BOARD_SIZE {
                    result.push(' ');
                }
            }
            result.push('\n');
        }
        result.push_str("  ");
        let files: Vec<String> = (0..BOARD_SIZE)
            .map(|file| ((b'a' + file) as char).to_string())
            .collect();
        result.push_str(&files.join(" "));
        write!(f, "{}", result)
    }
}
