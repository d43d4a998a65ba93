use game::{Board, Piece, Square};
use util::SquareSet;

pub mod debug;
pub mod fen;
pub mod game;
pub mod movegen;
pub mod renderer;
pub mod session;
pub mod shell;
pub mod util;

/// Computes where a piece may move on a read-only board.
///
/// Implementations are pure: the same inputs always give the same set, and
/// the board is never modified.
pub trait MoveGenerator {
    fn candidate_squares(&self, board: &Board, from: Square, piece: Piece) -> SquareSet;
}
