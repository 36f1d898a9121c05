//! First-class action types for N×N tic-tac-toe.
//!
//! A [`Move`] is a player's intent; a [`RecordedMove`] is a move that has
//! been accepted and numbered in a game's log.

use super::{GameStatus, Player};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A proposed move: a player placing their mark at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The player making the move.
    pub player: Player,
    /// Row-major cell index.
    pub position: usize,
}

impl Move {
    /// Creates a new move.
    #[instrument]
    pub fn new(player: Player, position: usize) -> Self {
        Self { player, position }
    }

    /// Returns the player making this move.
    pub fn player(&self) -> Player {
        self.player
    }

    /// Returns the position of this move.
    pub fn position(&self) -> usize {
        self.position
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.player, self.position)
    }
}

/// An accepted move, numbered from 1 within its game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordedMove {
    /// 1-based sequence number within the game.
    pub move_number: u32,
    /// Row-major cell index.
    pub position: usize,
    /// The player who moved.
    pub player: Player,
}

impl RecordedMove {
    /// Creates a recorded move.
    pub fn new(move_number: u32, position: usize, player: Player) -> Self {
        Self {
            move_number,
            position,
            player,
        }
    }

    /// Drops the sequence number.
    pub fn as_move(&self) -> Move {
        Move::new(self.player, self.position)
    }
}

/// Reasons a proposed move is refused.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The game no longer accepts moves.
    #[display("Cannot add a move to a game that is {_0}")]
    NotInProgress(GameStatus),

    /// It's not this player's turn.
    #[display("It's {expected}'s turn, not {attempted}'s")]
    WrongTurn {
        /// The player who holds the turn.
        expected: Player,
        /// The player who tried to move.
        attempted: Player,
    },

    /// The cell already holds a mark.
    #[display("Position {_0} is already taken")]
    PositionTaken(usize),

    /// The cell does not exist on this board.
    #[display("Position {position} is out of bounds for a board with {cells} cells")]
    InvalidPosition {
        /// Requested cell index.
        position: usize,
        /// Number of cells on the board.
        cells: usize,
    },

    /// A move-log invariant was violated (postcondition failure).
    #[display("Invariant violation: {_0}")]
    InvariantViolation(String),
}

impl std::error::Error for MoveError {}
