use std::iter::FusedIterator;

use crate::{
    game::{Board, CoordOffsetTyp, Piece, PieceKind, Square},
    util::SquareSet,
    MoveGenerator,
};

type Offset = (CoordOffsetTyp, CoordOffsetTyp);

const ROOK_DIRECTIONS: [Offset; 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRECTIONS: [Offset; 4] = [(1, 1), (-1, -1), (1, -1), (-1, 1)];
const QUEEN_DIRECTIONS: [Offset; 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
];

const KNIGHT_OFFSETS: [Offset; 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_OFFSETS: [Offset; 8] = [
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
];

/// Pawn steps in the order they are tried: single push, double push, then
/// the two diagonal captures.
const PAWN_STAGES: usize = 4;

/// Geometry and occupancy rules only: no castling, en passant, promotion or
/// king safety.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BasicRules;

impl MoveGenerator for BasicRules {
    fn candidate_squares(&self, board: &Board, from: Square, piece: Piece) -> SquareSet {
        candidate_squares(board, from, piece)
    }
}

/// Every square `piece` standing on `from` may move to.
///
/// `board[from]` must hold `piece`; debug builds assert this.
pub fn candidate_squares(board: &Board, from: Square, piece: Piece) -> SquareSet {
    destinations(board, from, piece).collect()
}

/// Lazy version of [`candidate_squares`]. Each destination is yielded once.
pub fn destinations(board: &Board, from: Square, piece: Piece) -> Destinations<'_> {
    debug_assert!(from.is_valid(), "{from:?} is off the board");
    debug_assert_eq!(
        board[from],
        Some(piece),
        "{piece} is not standing on {from}"
    );

    let pattern = match piece.kind {
        PieceKind::Rook => Pattern::Sliding(&ROOK_DIRECTIONS),
        PieceKind::Bishop => Pattern::Sliding(&BISHOP_DIRECTIONS),
        PieceKind::Queen => Pattern::Sliding(&QUEEN_DIRECTIONS),
        PieceKind::Knight => Pattern::Offsetting(&KNIGHT_OFFSETS),
        PieceKind::King => Pattern::Offsetting(&KING_OFFSETS),
        PieceKind::Pawn => Pattern::Pawn,
    };

    Destinations {
        board,
        from,
        piece,
        pattern,
        index: 0,
        cursor: None,
    }
}

#[derive(Debug, Clone, Copy)]
enum Pattern {
    Sliding(&'static [Offset]),
    Offsetting(&'static [Offset]),
    Pawn,
}

/// Destinations of a single piece, generated on demand.
///
/// Cloning before iterating, or calling [`Destinations::rewind`], replays the
/// same sequence.
#[derive(Debug, Clone)]
pub struct Destinations<'a> {
    board: &'a Board,
    from: Square,
    piece: Piece,
    pattern: Pattern,
    // Current direction, offset or pawn stage
    index: usize,
    // Last square reached along the current ray
    cursor: Option<Square>,
}

impl Destinations<'_> {
    pub fn rewind(&mut self) {
        self.index = 0;
        self.cursor = None;
    }

    fn next_ray(&mut self) {
        self.index += 1;
        self.cursor = None;
    }

    fn next_sliding(&mut self, directions: &[Offset]) -> Option<Square> {
        while let Some(&direction) = directions.get(self.index) {
            let Some(dest) = self.cursor.unwrap_or(self.from).offset(direction) else {
                self.next_ray();
                continue;
            };

            match self.board[dest] {
                None => {
                    self.cursor = Some(dest);
                    return Some(dest);
                }
                Some(blocker) => {
                    self.next_ray();
                    if blocker.is_opponent(self.piece.side) {
                        return Some(dest);
                    }
                }
            }
        }

        None
    }

    fn next_offsetting(&mut self, offsets: &[Offset]) -> Option<Square> {
        while let Some(&offset) = offsets.get(self.index) {
            self.index += 1;

            if let Some(dest) = self.from.offset(offset) {
                if !self.board.is_occupied_by(dest, self.piece.side) {
                    return Some(dest);
                }
            }
        }

        None
    }

    fn next_pawn(&mut self) -> Option<Square> {
        let rank_offset = self.piece.side.forward();
        let is_empty = |s: &Square| self.board[*s].is_none();

        while self.index < PAWN_STAGES {
            let stage = self.index;
            self.index += 1;

            let dest = match stage {
                0 => self.from.offset((0, rank_offset)).filter(is_empty),
                1 if !self.piece.has_moved => self
                    .from
                    .offset((0, rank_offset))
                    .filter(is_empty)
                    .and_then(|_| self.from.offset((0, rank_offset * 2)))
                    .filter(is_empty),
                1 => None,
                _ => {
                    let file_offset = if stage == 2 { -1 } else { 1 };
                    self.from
                        .offset((file_offset, rank_offset))
                        .filter(|&s| {
                            self.board[s].is_some_and(|p| p.is_opponent(self.piece.side))
                        })
                }
            };

            if dest.is_some() {
                return dest;
            }
        }

        None
    }
}

impl Iterator for Destinations<'_> {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        match self.pattern {
            Pattern::Sliding(directions) => self.next_sliding(directions),
            Pattern::Offsetting(offsets) => self.next_offsetting(offsets),
            Pattern::Pawn => self.next_pawn(),
        }
    }
}

impl FusedIterator for Destinations<'_> {}
