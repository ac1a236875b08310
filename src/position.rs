use std::fmt;
use std::str::FromStr;

use crate::error::{ChessError, Result};

/// Number of columns and rows on the board.
pub const BOARD_SIZE: u8 = 8;

/// A square on the board, stored as a 1-based (column, row) pair.
///
/// Column 1 is the `a` file and row 1 is white's back rank, so `Position::new(4, 4)`
/// is `d4`. Both axes are checked on construction; a `Position` is always on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    column: u8,
    row: u8,
}

impl Position {
    pub fn new(column: u8, row: u8) -> Result<Self> {
        Self::checked(column as i16, row as i16).ok_or(ChessError::OutOfRange {
            column: column as i16,
            row: row as i16,
        })
    }

    fn checked(column: i16, row: i16) -> Option<Self> {
        let in_range = |index: i16| (1..=BOARD_SIZE as i16).contains(&index);
        if in_range(column) && in_range(row) {
            Some(Self {
                column: column as u8,
                row: row as u8,
            })
        } else {
            None
        }
    }

    pub fn column(&self) -> u8 {
        self.column
    }

    pub fn row(&self) -> u8 {
        self.row
    }

    /// The square shifted by the given number of columns and rows, if it is still on the board.
    pub fn offset(&self, columns: i8, rows: i8) -> Option<Self> {
        Self::checked(
            self.column as i16 + columns as i16,
            self.row as i16 + rows as i16,
        )
    }

    /// Signed column and row displacement from `self` to `other`.
    pub fn delta(&self, other: Position) -> (i8, i8) {
        (
            other.column as i8 - self.column as i8,
            other.row as i8 - self.row as i8,
        )
    }

    /// Up to eight surrounding squares. Squares off the edge are skipped.
    pub fn neighbors(&self) -> impl Iterator<Item = Position> + '_ {
        const SHIFTS: [(i8, i8); 8] = [
            (-1, -1), (-1, 0), (-1, 1),
            (0, -1), (0, 1),
            (1, -1), (1, 0), (1, 1),
        ];
        SHIFTS
            .iter()
            .filter_map(move |&(columns, rows)| self.offset(columns, rows))
    }

    /// Every square on the board, `a1, b1, .., h1, a2, .., h8`.
    pub fn all() -> impl Iterator<Item = Position> {
        (1..=BOARD_SIZE).flat_map(|row| (1..=BOARD_SIZE).map(move |column| Position { column, row }))
    }

    pub fn file_char(&self) -> char {
        (b'a' + self.column - 1) as char
    }

    pub fn to_algebraic(&self) -> String {
        format!("{}{}", self.file_char(), self.row)
    }
}

impl FromStr for Position {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        let (file, rank) = match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) if file.is_ascii_alphabetic() && rank.is_ascii_digit() => {
                (file.to_ascii_lowercase(), rank)
            }
            _ => return Err(ChessError::InvalidNotation(s.to_string())),
        };
        let column = file as i16 - 'a' as i16 + 1;
        let row = rank as i16 - '0' as i16;
        Self::checked(column, row).ok_or(ChessError::OutOfRange { column, row })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algebraic_round_trip() {
        for column in 1..=BOARD_SIZE {
            for row in 1..=BOARD_SIZE {
                let position = Position::new(column, row).unwrap();
                let parsed: Position = position.to_algebraic().parse().unwrap();
                assert_eq!(parsed, position);
            }
        }
    }

    #[test]
    fn test_known_squares() {
        assert_eq!("a1".parse::<Position>().unwrap(), Position::new(1, 1).unwrap());
        assert_eq!("d4".parse::<Position>().unwrap(), Position::new(4, 4).unwrap());
        assert_eq!("H8".parse::<Position>().unwrap(), Position::new(8, 8).unwrap());
        assert_eq!(Position::new(5, 2).unwrap().to_string(), "e2");
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(Position::new(0, 1), Err(ChessError::OutOfRange { column: 0, row: 1 }));
        assert_eq!(Position::new(1, 9), Err(ChessError::OutOfRange { column: 1, row: 9 }));
        assert_eq!(
            "i1".parse::<Position>(),
            Err(ChessError::OutOfRange { column: 9, row: 1 })
        );
        assert_eq!(
            "a9".parse::<Position>(),
            Err(ChessError::OutOfRange { column: 1, row: 9 })
        );
        assert_eq!(
            "a0".parse::<Position>(),
            Err(ChessError::OutOfRange { column: 1, row: 0 })
        );
    }

    #[test]
    fn test_malformed_notation() {
        for text in ["", "e", "e10", "44", "ee", "e2 "] {
            assert_eq!(
                text.parse::<Position>(),
                Err(ChessError::InvalidNotation(text.to_string())),
                "{text:?}"
            );
        }
    }

    #[test]
    fn test_neighbors_filter_edges() {
        let corner: Position = "a1".parse().unwrap();
        let mut around: Vec<String> = corner.neighbors().map(|p| p.to_string()).collect();
        around.sort();
        assert_eq!(around, vec!["a2", "b1", "b2"]);

        let center: Position = "e5".parse().unwrap();
        assert_eq!(center.neighbors().count(), 8);
    }

    #[test]
    fn test_all_squares() {
        let squares: Vec<Position> = Position::all().collect();
        assert_eq!(squares.len(), 64);
        assert_eq!(squares[0].to_string(), "a1");
        assert_eq!(squares[63].to_string(), "h8");
    }
}
