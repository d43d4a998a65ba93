use std::fmt::{Display, Formatter};

use anyhow::{bail, ensure, Context, Result};
use derivative::Derivative;
use tracing::{debug, info};

use crate::{
    game::{Board, Move, Piece, Side, Square},
    movegen::BasicRules,
    util::SquareSet,
    MoveGenerator,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationKind {
    Quiet,
    Capture,
}

/// The selected square and where its piece can go, split by whether the
/// destination is empty or holds an enemy piece.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Highlights {
    pub selected: Option<Square>,
    pub quiet: SquareSet,
    pub captures: SquareSet,
}

impl Highlights {
    pub fn kind_of(&self, square: Square) -> Option<DestinationKind> {
        if self.quiet.contains(square) {
            Some(DestinationKind::Quiet)
        } else if self.captures.contains(square) {
            Some(DestinationKind::Capture)
        } else {
            None
        }
    }

    pub fn destinations(&self) -> SquareSet {
        self.quiet.union(self.captures)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub mv: Move,
    /// The piece as it stood before moving.
    pub piece: Piece,
    pub captured: Option<Piece>,
}

impl Display for MoveRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.captured {
            Some(captured) => write!(
                f,
                "{} {}x{} takes {captured}",
                self.piece, self.mv.from, self.mv.to
            ),
            None => write!(f, "{} {}-{}", self.piece, self.mv.from, self.mv.to),
        }
    }
}

/// Caller-side game state: whose turn it is, the current selection and the
/// moves played so far. The board is only ever changed through [`Session::move_to`].
#[derive(Derivative)]
#[derivative(Debug(bound = ""), Clone(bound = "R: Clone"), Default(bound = "R: Default"))]
pub struct Session<R = BasicRules> {
    board: Board,
    side_to_move: Side,
    started: bool,
    highlights: Highlights,
    history: Vec<MoveRecord>,
    #[derivative(Debug = "ignore")]
    rules: R,
}

impl Session<BasicRules> {
    pub fn new(board: Board, side_to_move: Side) -> Self {
        Self::with_rules(board, side_to_move, BasicRules)
    }
}

impl<R: MoveGenerator> Session<R> {
    pub fn with_rules(board: Board, side_to_move: Side, rules: R) -> Self {
        Self {
            board,
            side_to_move,
            started: false,
            highlights: Highlights::default(),
            history: vec![],
            rules,
        }
    }

    pub fn start(&mut self) {
        if !self.started {
            info!(side = %self.side_to_move, "Game started");
        }

        self.started = true;
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    pub fn selected(&self) -> Option<Square> {
        self.highlights.selected
    }

    pub fn highlights(&self) -> &Highlights {
        &self.highlights
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn clear_selection(&mut self) {
        self.highlights = Highlights::default();
    }

    /// Where the piece on `square` could go, regardless of whose turn it is.
    pub fn destinations_of(&self, square: Square) -> Result<SquareSet> {
        let piece = self
            .board
            .get(square)
            .with_context(|| format!("There is no piece on {square}"))?;

        Ok(self.rules.candidate_squares(&self.board, square, piece))
    }

    /// Selects the piece on `square`, replacing any earlier selection.
    /// Selecting the square that is already selected deselects it.
    pub fn select(&mut self, square: Square) -> Result<&Highlights> {
        ensure!(self.started, "The game has not started yet");

        if self.highlights.selected == Some(square) {
            debug!(%square, "Deselected piece");
            self.clear_selection();
            return Ok(&self.highlights);
        }

        self.clear_selection();

        let piece = self.board[square].with_context(|| format!("There is no piece on {square}"))?;
        if piece.side != self.side_to_move {
            bail!("It is {}'s turn, the piece on {square} is {}", self.side_to_move, piece.side);
        }

        let mut highlights = Highlights {
            selected: Some(square),
            ..Default::default()
        };

        for dest in self.rules.candidate_squares(&self.board, square, piece) {
            if self.board[dest].is_some() {
                highlights.captures.insert(dest);
            } else {
                highlights.quiet.insert(dest);
            }
        }

        debug!(
            %square,
            quiet = highlights.quiet.len(),
            captures = highlights.captures.len(),
            "Selected piece"
        );

        self.highlights = highlights;
        Ok(&self.highlights)
    }

    /// Moves the selected piece to `to` and hands the turn to the other side.
    pub fn move_to(&mut self, to: Square) -> Result<MoveRecord> {
        ensure!(self.started, "The game has not started yet");

        let from = self.highlights.selected.context("No piece is selected")?;
        if self.highlights.kind_of(to).is_none() {
            bail!("{to} is not a destination of the piece on {from}");
        }

        let mv = Move::new(from, to);
        let piece = self.board[from].with_context(|| format!("There is no piece on {from}"))?;
        let captured = self.board.apply(&mv)?;

        let record = MoveRecord {
            mv,
            piece,
            captured,
        };
        info!(%record, "Moved piece");

        self.history.push(record);
        self.clear_selection();
        self.end_turn();

        Ok(record)
    }

    fn end_turn(&mut self) {
        // TODO: detect check and checkmate for the side about to move
        self.side_to_move = self.side_to_move.opposite();
    }
}
