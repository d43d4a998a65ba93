use anyhow::Result;

use crate::{
    game::{Board, Move, Side},
    movegen::destinations,
};

/// Every move available to `side`, piece by piece in A1..H8 order.
pub fn side_moves(board: &Board, side: Side) -> Vec<Move> {
    board
        .pieces()
        .filter(|(_, piece)| piece.side == side)
        .flat_map(|(from, piece)| destinations(board, from, piece).map(move |to| Move::new(from, to)))
        .collect()
}

/// Counts leaf positions `depth` plies deep, alternating sides.
///
/// Positions are not checked for king safety, so the counts only agree with
/// published perft numbers while neither king can be attacked.
pub fn gen_node_nums(board: &Board, side: Side, depth: usize) -> Result<usize> {
    let moves = side_moves(board, side);
    if depth <= 1 {
        return Ok(moves.len());
    }

    let mut move_count = 0;

    for m in moves {
        let mut board_clone = board.clone();
        board_clone.apply(&m)?;
        move_count += gen_node_nums(&board_clone, side.opposite(), depth - 1)?;
    }

    Ok(move_count)
}
