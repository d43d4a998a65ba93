use std::{
    fmt::{Display, Formatter},
    ops::Index,
};

use crate::game::{CoordTyp, Square};

/// A set of squares packed into one bit per square, A1 in the lowest bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct SquareSet(pub u64);

impl SquareSet {
    pub const EMPTY: Self = Self(0);

    fn index(square: Square) -> usize {
        (square.row * 8 + square.column) as usize
    }

    fn square(index: u32) -> Square {
        Square::new((index % 8) as CoordTyp, (index / 8) as CoordTyp)
    }

    /// Returns `true` if the square was not in the set yet.
    pub fn insert(&mut self, square: Square) -> bool {
        let fresh = !self.contains(square);
        self.0 |= 1u64 << Self::index(square);
        fresh
    }

    pub fn contains(&self, square: Square) -> bool {
        (self.0 >> Self::index(square)) & 1 == 1
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn iter(&self) -> Squares {
        Squares(self.0)
    }
}

impl Index<Square> for SquareSet {
    type Output = bool;

    fn index(&self, index: Square) -> &Self::Output {
        if self.contains(index) {
            &true
        } else {
            &false
        }
    }
}

impl FromIterator<Square> for SquareSet {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for square in iter {
            set.insert(square);
        }
        set
    }
}

impl IntoIterator for SquareSet {
    type Item = Square;
    type IntoIter = Squares;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for &SquareSet {
    type Item = Square;
    type IntoIter = Squares;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Display for SquareSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, square) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{square}")?;
        }

        Ok(())
    }
}

/// Iterates a [`SquareSet`] from A1 towards H8.
#[derive(Debug, Clone)]
pub struct Squares(u64);

impl Iterator for Squares {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0 == 0 {
            return None;
        }

        let index = self.0.trailing_zeros();
        self.0 &= self.0 - 1;
        Some(SquareSet::square(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.0.count_ones() as usize;
        (len, Some(len))
    }
}

impl ExactSizeIterator for Squares {}
