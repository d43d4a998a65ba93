//! Loading and writing boards through the piece placement field of FEN.
//!
//! Only the placement and, optionally, the side to move are read. Any later
//! FEN fields are accepted and ignored since castling, en passant and the
//! move clocks have no meaning here.

use anyhow::{anyhow, bail, Result};
use nom::{
    branch::alt,
    character::complete::{char, one_of, space0, space1},
    combinator::{all_consuming, map, map_opt, opt, rest, value},
    multi::{many1, separated_list1},
    sequence::{pair, preceded, terminated},
    IResult,
};

use crate::game::{Board, CoordTyp, Piece, PieceKind, Side, Square};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Piece(Piece),
    Gap(CoordTyp),
}

fn piece(i: &str) -> IResult<&str, Piece> {
    map_opt(one_of("KQRBNPkqrbnp"), Piece::from_char)(i)
}

fn gap(i: &str) -> IResult<&str, CoordTyp> {
    map(one_of("12345678"), |c| c as CoordTyp - b'0')(i)
}

fn row(i: &str) -> IResult<&str, Vec<Token>> {
    many1(alt((map(piece, Token::Piece), map(gap, Token::Gap))))(i)
}

fn placement(i: &str) -> IResult<&str, Vec<Vec<Token>>> {
    separated_list1(char('/'), row)(i)
}

fn side(i: &str) -> IResult<&str, Side> {
    alt((value(Side::White, char('w')), value(Side::Black, char('b'))))(i)
}

fn position(i: &str) -> IResult<&str, (Vec<Vec<Token>>, Option<Side>)> {
    pair(
        preceded(space0, placement),
        opt(terminated(
            preceded(space1, side),
            // Castling rights, en passant target and clocks
            opt(preceded(space1, rest)),
        )),
    )(i)
}

fn build_board(rows: Vec<Vec<Token>>) -> Result<Board> {
    if rows.len() != 8 {
        bail!("Expected 8 rows in placement, found {}", rows.len());
    }

    let mut board = Board::empty();

    // Rows are listed from the 8th down to the 1st
    for (tokens, row) in rows.into_iter().zip((0..8).rev()) {
        let mut column: CoordTyp = 0;
        let mut after_gap = false;

        for token in tokens {
            match token {
                Token::Gap(_) if after_gap => {
                    bail!("Row {} has two gaps in a row", row + 1);
                }
                Token::Gap(n) => {
                    column = column.saturating_add(n);
                    after_gap = true;
                }
                Token::Piece(piece) => {
                    if column >= 8 {
                        bail!("Row {} has more than 8 squares", row + 1);
                    }

                    board.put(Square::new(column, row), infer_has_moved(piece, row));
                    column += 1;
                    after_gap = false;
                }
            }
        }

        if column != 8 {
            bail!("Row {} has {column} squares instead of 8", row + 1);
        }
    }

    Ok(board)
}

/// Placement does not record history, so a pawn away from its home row is
/// taken to have moved. Every other piece is loaded as unmoved.
fn infer_has_moved(piece: Piece, row: CoordTyp) -> Piece {
    if piece.kind == PieceKind::Pawn && row != piece.side.pawn_row() {
        piece.moved()
    } else {
        piece
    }
}

/// Parses a placement field, optionally followed by the side to move
/// (White when absent).
pub fn parse_position(input: &str) -> Result<(Board, Side)> {
    let (_, (rows, side)) = all_consuming(position)(input.trim_end())
        .map_err(|_| anyhow!("Invalid position: {input:?}"))?;

    Ok((build_board(rows)?, side.unwrap_or_default()))
}

impl Board {
    pub const DEFAULT_PLACEMENT: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

    pub fn from_placement(placement: &str) -> Result<Board> {
        parse_position(placement).map(|(board, _)| board)
    }

    pub fn to_placement(&self) -> String {
        (0..8)
            .rev()
            .map(|row| {
                let mut row_str = String::new();

                let mut consecutive_empty = 0;
                for column in 0..8 {
                    match self[Square::new(column, row)] {
                        None => consecutive_empty += 1,
                        Some(piece) => {
                            if consecutive_empty > 0 {
                                row_str.push_str(&consecutive_empty.to_string());
                                consecutive_empty = 0;
                            }

                            row_str.push(piece.to_char());
                        }
                    }
                }

                if consecutive_empty > 0 {
                    row_str.push_str(&consecutive_empty.to_string());
                }

                row_str
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}
