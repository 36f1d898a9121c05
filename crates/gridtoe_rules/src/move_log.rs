//! Append-only move log and board reconstruction.
//!
//! The log is the single source of truth for a game: boards are never
//! stored, only rebuilt from it.

use super::action::{MoveError, RecordedMove};
use super::invariants::{
    AlternatingTurnInvariant, DistinctPositionsInvariant, GaplessNumberingInvariant,
    InvariantSet, InvariantViolation,
};
use super::{Board, BoardSize};
use tracing::{instrument, trace};

/// The invariants every persisted move log must satisfy.
pub type MoveLogInvariants = (
    AlternatingTurnInvariant,
    GaplessNumberingInvariant,
    DistinctPositionsInvariant,
);

/// Ordered moves of one game, as read from storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveLog {
    moves: Vec<RecordedMove>,
}

impl MoveLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the moves in log order.
    pub fn moves(&self) -> &[RecordedMove] {
        &self.moves
    }

    /// Number of moves.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// True when no move has been made.
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// `max(move_number) + 1`, or 1 for an empty log.
    pub fn next_move_number(&self) -> u32 {
        self.moves
            .iter()
            .map(|m| m.move_number)
            .max()
            .unwrap_or(0)
            + 1
    }

    /// Whether any move already targets `position`.
    pub fn contains_position(&self, position: usize) -> bool {
        self.moves.iter().any(|m| m.position == position)
    }

    /// Appends a move. No validation; see [`crate::apply_move`].
    pub fn push(&mut self, recorded: RecordedMove) {
        self.moves.push(recorded);
    }

    /// Rebuilds the board from every move in the log.
    #[instrument(skip(self), fields(moves = self.moves.len()))]
    pub fn board(&self, size: BoardSize) -> Result<Board, MoveError> {
        self.board_at(size, self.moves.len())
    }

    /// Rebuilds the board as it stood after the first `step` moves.
    ///
    /// `step` larger than the log is clamped to its length.
    #[instrument(skip(self), fields(moves = self.moves.len()))]
    pub fn board_at(&self, size: BoardSize, step: usize) -> Result<Board, MoveError> {
        let mut board = Board::new(size);
        for recorded in self.moves.iter().take(step) {
            trace!(move_number = recorded.move_number, position = recorded.position, "Replaying move");
            board.place(recorded.position, recorded.player)?;
        }
        Ok(board)
    }

    /// Checks every [`MoveLogInvariants`] member, collecting all violations.
    #[instrument(skip(self), fields(moves = self.moves.len()))]
    pub fn verify(&self) -> Result<(), Vec<InvariantViolation>> {
        <MoveLogInvariants as InvariantSet<MoveLog>>::check_all(self)
    }
}

impl From<Vec<RecordedMove>> for MoveLog {
    fn from(moves: Vec<RecordedMove>) -> Self {
        Self { moves }
    }
}

impl FromIterator<RecordedMove> for MoveLog {
    fn from_iter<I: IntoIterator<Item = RecordedMove>>(iter: I) -> Self {
        Self {
            moves: iter.into_iter().collect(),
        }
    }
}
