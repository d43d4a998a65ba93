use std::{
    fmt::{Display, Formatter},
    ops::{Index, IndexMut},
    str::FromStr,
};

use anyhow::{anyhow, Result};

pub type CoordTyp = u8;
pub type CoordOffsetTyp = i8;

type BoardData = [[Option<Piece>; 8]; 8];

/// A snapshot of the 64 squares, each holding at most one piece.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    pieces: BoardData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    #[default]
    White,
    Black,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub side: Side,
    /// Only consulted for pawns, which lose the double step once they move.
    pub has_moved: bool,
}

impl Side {
    pub const fn opposite(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// Row direction a pawn of this side advances in.
    pub const fn forward(self) -> CoordOffsetTyp {
        match self {
            Side::White => 1,
            Side::Black => -1,
        }
    }

    /// Zero-based row the side's pawns start on.
    pub const fn pawn_row(self) -> CoordTyp {
        match self {
            Side::White => 1,
            Side::Black => 6,
        }
    }

    pub const fn to_char(self) -> char {
        match self {
            Side::White => 'w',
            Side::Black => 'b',
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::White => write!(f, "White"),
            Side::Black => write!(f, "Black"),
        }
    }
}

impl Piece {
    pub const fn new(kind: PieceKind, side: Side) -> Self {
        Self {
            kind,
            side,
            has_moved: false,
        }
    }

    /// The same piece after its first move.
    pub const fn moved(self) -> Self {
        Self {
            has_moved: true,
            ..self
        }
    }

    pub fn is_opponent(self, side: Side) -> bool {
        self.side != side
    }

    pub fn from_char(c: char) -> Option<Self> {
        let side = if c.is_ascii_uppercase() {
            Side::White
        } else {
            Side::Black
        };

        let kind = match c.to_ascii_uppercase() {
            'K' => PieceKind::King,
            'Q' => PieceKind::Queen,
            'R' => PieceKind::Rook,
            'B' => PieceKind::Bishop,
            'N' => PieceKind::Knight,
            'P' => PieceKind::Pawn,
            _ => return None,
        };

        Some(Self::new(kind, side))
    }

    pub fn to_char(self) -> char {
        let c = match self.kind {
            PieceKind::King => 'K',
            PieceKind::Queen => 'Q',
            PieceKind::Rook => 'R',
            PieceKind::Bishop => 'B',
            PieceKind::Knight => 'N',
            PieceKind::Pawn => 'P',
        };

        match self.side {
            Side::White => c,
            Side::Black => c.to_ascii_lowercase(),
        }
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl FromStr for Piece {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c).ok_or_else(|| anyhow!("Invalid piece: {s}")),
            _ => Err(anyhow!("Invalid piece: {s}")),
        }
    }
}

impl Board {
    pub const fn empty() -> Self {
        Self {
            pieces: [[None; 8]; 8],
        }
    }

    /// The standard initial array with nothing moved yet.
    pub fn starting() -> Self {
        use PieceKind::*;

        const BACK_ROW: [PieceKind; 8] = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

        let mut board = Self::empty();
        for (column, &kind) in BACK_ROW.iter().enumerate() {
            let column = column as CoordTyp;
            board.put(Square::new(column, 0), Piece::new(kind, Side::White));
            board.put(Square::new(column, 1), Piece::new(Pawn, Side::White));
            board.put(Square::new(column, 6), Piece::new(Pawn, Side::Black));
            board.put(Square::new(column, 7), Piece::new(kind, Side::Black));
        }

        board
    }

    pub fn get(&self, square: Square) -> Option<Piece> {
        if square.is_valid() {
            return self[square];
        }

        None
    }

    /// Places `piece` on `square`, returning whatever stood there before.
    pub fn put(&mut self, square: Square, piece: Piece) -> Option<Piece> {
        self[square].replace(piece)
    }

    pub fn take(&mut self, square: Square) -> Option<Piece> {
        self[square].take()
    }

    pub fn is_occupied_by(&self, square: Square, side: Side) -> bool {
        self[square].is_some_and(|p| p.side == side)
    }

    /// Occupied squares in A1, B1, ..., H8 order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        (0..8).flat_map(move |row| {
            (0..8).filter_map(move |column| {
                let square = Square::new(column, row);
                self[square].map(|piece| (square, piece))
            })
        })
    }

    /// Moves the piece on `m.from` to `m.to`, marking it as moved.
    ///
    /// Returns the captured piece, if any. Does not check the move against
    /// any rules.
    pub fn apply(&mut self, m: &Move) -> Result<Option<Piece>> {
        let piece = self
            .take(m.from)
            .ok_or_else(|| anyhow!("No piece to move on {}", m.from))?;

        Ok(self.put(m.to, piece.moved()))
    }
}

impl Index<Square> for Board {
    type Output = Option<Piece>;

    fn index(&self, index: Square) -> &Self::Output {
        &self.pieces[index.row as usize][index.column as usize]
    }
}

impl IndexMut<Square> for Board {
    fn index_mut(&mut self, index: Square) -> &mut Self::Output {
        &mut self.pieces[index.row as usize][index.column as usize]
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting()
    }
}

pub(crate) fn char_to_column(c: char) -> Result<CoordTyp> {
    match c.to_ascii_uppercase() {
        c @ 'A'..='H' => Ok(c as CoordTyp - b'A'),
        _ => Err(anyhow!("Invalid column: {c}")),
    }
}

pub(crate) fn column_to_char(column: CoordTyp) -> char {
    (b'A' + column) as char
}

/// Zero-based grid coordinate: column 0 is `A`, row 0 is `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, PartialOrd, Ord)]
pub struct Square {
    pub row: CoordTyp,
    pub column: CoordTyp,
}

impl Square {
    pub const fn new(column: CoordTyp, row: CoordTyp) -> Self {
        Self { row, column }
    }

    pub const fn is_valid(&self) -> bool {
        self.column < 8 && self.row < 8
    }

    /// Steps by `(columns, rows)`, or `None` when that leaves the board.
    pub fn offset(&self, offset: (CoordOffsetTyp, CoordOffsetTyp)) -> Option<Self> {
        let s = Self {
            column: self.column.checked_add_signed(offset.0)?,
            row: self.row.checked_add_signed(offset.1)?,
        };

        if !s.is_valid() {
            return None;
        }

        Some(s)
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", column_to_char(self.column), self.row + 1)
    }
}

impl FromStr for Square {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        let (Some(column), Some(row), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(anyhow!("Invalid square: {s}"));
        };

        let row = match row.to_digit(10) {
            Some(r @ 1..=8) => r as CoordTyp - 1,
            _ => return Err(anyhow!("Invalid row in square: {s}")),
        };

        Ok(Self::new(char_to_column(column)?, row))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

impl FromStr for Move {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() != 4 || !s.is_ascii() {
            return Err(anyhow!("Invalid move: {s}"));
        }

        Ok(Move {
            from: Square::from_str(&s[0..2])?,
            to: Square::from_str(&s[2..4])?,
        })
    }
}
