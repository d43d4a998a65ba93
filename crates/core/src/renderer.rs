use std::fmt::{Display, Formatter};

use crate::{
    game::{Board, Square},
    session::Highlights,
};

const ROW_SEPARATOR: &str = " +---+---+---+---+---+---+---+---+";

/// A board drawn together with a selection and its destinations.
#[derive(Debug)]
pub struct Highlighted<'a> {
    board: &'a Board,
    highlights: &'a Highlights,
}

/// Marks the selected square as `[P]`, quiet destinations as ` * ` and
/// capture destinations as `(p)`.
pub fn render_with_highlights<'a>(board: &'a Board, highlights: &'a Highlights) -> Highlighted<'a> {
    Highlighted { board, highlights }
}

fn draw(f: &mut Formatter<'_>, board: &Board, highlights: Option<&Highlights>) -> std::fmt::Result {
    for row in (0..8).rev() {
        writeln!(f, "{ROW_SEPARATOR}")?;
        write!(f, " |")?;
        for column in 0..8 {
            let square = Square::new(column, row);
            let piece = board[square].map_or(' ', |p| p.to_char());

            let (open, close) = match highlights {
                Some(h) if h.selected == Some(square) => ('[', ']'),
                Some(h) if h.captures.contains(square) => ('(', ')'),
                _ => (' ', ' '),
            };

            let piece = match highlights {
                Some(h) if h.quiet.contains(square) => '*',
                _ => piece,
            };

            write!(f, "{open}{piece}{close}|")?;
        }
        writeln!(f, " {}", row + 1)?;
    }

    writeln!(f, "{ROW_SEPARATOR}")?;
    writeln!(f, "   A   B   C   D   E   F   G   H")?;

    Ok(())
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        draw(f, self, None)?;
        writeln!(f)?;
        writeln!(f, "Placement: {}", self.to_placement())
    }
}

impl Display for Highlighted<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        draw(f, self.board, Some(self.highlights))
    }
}
