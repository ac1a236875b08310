use std::fmt;
use std::str::FromStr;

use crate::error::ChessError;
use crate::position::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Letter used in move notation. Pawns have none.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            PieceKind::Pawn => "",
            PieceKind::Knight => "N",
            PieceKind::Bishop => "B",
            PieceKind::Rook => "R",
            PieceKind::Queen => "Q",
            PieceKind::King => "K",
        }
    }

    /// FEN letter for a piece of this kind and color.
    pub fn fen_char(&self, color: Color) -> char {
        let c = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    pub fn from_fen_char(c: char) -> Option<(PieceKind, Color)> {
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some((kind, color))
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            PieceKind::Pawn => "pawn",
            PieceKind::Knight => "knight",
            PieceKind::Bishop => "bishop",
            PieceKind::Rook => "rook",
            PieceKind::Queen => "queen",
            PieceKind::King => "king",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row direction this color's pawns advance in.
    pub fn forward(&self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Row this color's pawns start on.
    pub fn pawn_row(&self) -> u8 {
        match self {
            Color::White => 2,
            Color::Black => 7,
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Color::White => f.write_str("white"),
            Color::Black => f.write_str("black"),
        }
    }
}

impl FromStr for Color {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "w" | "white" => Ok(Color::White),
            "b" | "black" => Ok(Color::Black),
            _ => Err(ChessError::InvalidColorToken(s.to_string())),
        }
    }
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Winner(Color),
    Draw,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Outcome::Winner(color) => write!(f, "{color}"),
            Outcome::Draw => f.write_str("draw"),
        }
    }
}

impl TryFrom<Outcome> for Color {
    type Error = ChessError;

    fn try_from(outcome: Outcome) -> Result<Self, Self::Error> {
        match outcome {
            Outcome::Winner(color) => Ok(color),
            Outcome::Draw => Err(ChessError::InvalidColorToken(outcome.to_string())),
        }
    }
}

/// Index of a piece in the board's piece store. Stable for the life of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceId(pub(crate) usize);

/// What every piece can report, whatever board it was read from.
pub trait Piece {
    fn id(&self) -> PieceId;
    fn kind(&self) -> PieceKind;
    fn color(&self) -> Color;
    /// `None` once the piece has been captured.
    fn position(&self) -> Option<Position>;

    /// Two-character label such as `wN` or `bP`.
    fn short_name(&self) -> String {
        let color = match self.color() {
            Color::White => 'w',
            Color::Black => 'b',
        };
        let kind = self.kind().fen_char(Color::White);
        format!("{color}{kind}")
    }
}

fn same_state(a: &impl Piece, b: &impl Piece) -> bool {
    a.kind() == b.kind() && a.color() == b.color() && a.position() == b.position()
}

/// A piece owned by the authoritative board.
#[derive(Debug, Clone, Copy)]
pub struct StoredPiece {
    id: PieceId,
    kind: PieceKind,
    color: Color,
    position: Option<Position>,
}

impl StoredPiece {
    pub(crate) fn new(id: PieceId, kind: PieceKind, color: Color, position: Position) -> Self {
        Self {
            id,
            kind,
            color,
            position: Some(position),
        }
    }

    pub(crate) fn set_position(&mut self, position: Option<Position>) {
        self.position = position;
    }
}

impl Piece for StoredPiece {
    fn id(&self) -> PieceId {
        self.id
    }

    fn kind(&self) -> PieceKind {
        self.kind
    }

    fn color(&self) -> Color {
        self.color
    }

    fn position(&self) -> Option<Position> {
        self.position
    }
}

impl PartialEq for StoredPiece {
    fn eq(&self, other: &Self) -> bool {
        same_state(self, other)
    }
}

impl fmt::Display for StoredPiece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.color, self.kind)
    }
}

/// A stored piece seen at the square a hypothetical move would put it on.
/// The wrapped piece is never touched.
#[derive(Debug, Clone, Copy)]
pub struct ShadowPiece<'a> {
    inner: &'a StoredPiece,
    position: Position,
}

impl<'a> ShadowPiece<'a> {
    pub(crate) fn new(inner: &'a StoredPiece, position: Position) -> Self {
        Self { inner, position }
    }
}

impl Piece for ShadowPiece<'_> {
    fn id(&self) -> PieceId {
        self.inner.id
    }

    fn kind(&self) -> PieceKind {
        self.inner.kind
    }

    fn color(&self) -> Color {
        self.inner.color
    }

    fn position(&self) -> Option<Position> {
        Some(self.position)
    }
}

impl PartialEq for ShadowPiece<'_> {
    fn eq(&self, other: &Self) -> bool {
        same_state(self, other)
    }
}

/// A piece as returned by a board query: either the stored piece itself or
/// its shadow on a speculative board.
#[derive(Debug, Clone, Copy)]
pub enum PieceRef<'a> {
    Stored(&'a StoredPiece),
    Shadow(ShadowPiece<'a>),
}

impl<'a> PieceRef<'a> {
    /// The underlying stored piece, whichever variant this is.
    pub fn stored(&self) -> &'a StoredPiece {
        match *self {
            PieceRef::Stored(piece) => piece,
            PieceRef::Shadow(shadow) => shadow.inner,
        }
    }
}

impl Piece for PieceRef<'_> {
    fn id(&self) -> PieceId {
        self.stored().id
    }

    fn kind(&self) -> PieceKind {
        self.stored().kind
    }

    fn color(&self) -> Color {
        self.stored().color
    }

    fn position(&self) -> Option<Position> {
        match self {
            PieceRef::Stored(piece) => piece.position,
            PieceRef::Shadow(shadow) => Some(shadow.position),
        }
    }
}

impl PartialEq for PieceRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        same_state(self, other)
    }
}

impl PartialEq<StoredPiece> for PieceRef<'_> {
    fn eq(&self, other: &StoredPiece) -> bool {
        same_state(self, other)
    }
}
