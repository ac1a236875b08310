use crate::board::{BoardView, Turn};
use crate::piece::{Color, Piece, PieceRef, ShadowPiece, StoredPiece};
use crate::position::Position;

/// The board as it would look after one hypothetical turn.
///
/// Nothing is copied: queries for the turn's two squares are answered here and
/// everything else is read straight from `base`. Build one per legality probe and
/// drop it when the probe is done.
#[derive(Debug)]
pub struct SpeculativeBoard<'a, B: BoardView + ?Sized> {
    base: &'a B,
    turn: Turn,
    mover: &'a StoredPiece,
    captured: Option<&'a StoredPiece>,
}

impl<'a, B: BoardView + ?Sized> SpeculativeBoard<'a, B> {
    /// `None` when there is no piece on the turn's origin.
    pub fn new(base: &'a B, turn: Turn) -> Option<Self> {
        let mover = base.piece_at(turn.from)?.stored();
        let captured = if turn.from == turn.to {
            None
        } else {
            base.piece_at(turn.to).map(|piece| piece.stored())
        };
        Some(Self {
            base,
            turn,
            mover,
            captured,
        })
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    fn shadow(&self) -> PieceRef<'a> {
        PieceRef::Shadow(ShadowPiece::new(self.mover, self.turn.to))
    }
}

impl<B: BoardView + ?Sized> BoardView for SpeculativeBoard<'_, B> {
    fn piece_at(&self, position: Position) -> Option<PieceRef<'_>> {
        if position == self.turn.to {
            Some(self.shadow())
        } else if position == self.turn.from {
            None
        } else {
            self.base.piece_at(position)
        }
    }

    fn pieces(&self, color: Color) -> Vec<PieceRef<'_>> {
        let captured = self.captured.map(|piece| piece.id());
        self.base
            .pieces(color)
            .into_iter()
            .filter(|piece| Some(piece.id()) != captured)
            .map(|piece| {
                if piece.id() == self.mover.id() {
                    self.shadow()
                } else {
                    piece
                }
            })
            .collect()
    }

    fn king(&self, color: Color) -> PieceRef<'_> {
        let king = self.base.king(color);
        if king.id() == self.mover.id() {
            self.shadow()
        } else {
            king
        }
    }
}
