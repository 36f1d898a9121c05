//! Game rules for N×N tic-tac-toe.
//!
//! Pure functions that evaluate a board. They hold no state and are safe to
//! call from any thread, on any well-formed board, at any point in a game.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{Line, check_winner, winning_line, windows};

use super::{Board, Player, Winner};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Result of evaluating a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Nobody has won and free cells remain.
    Undecided,
    /// The player completed a line of the board's win length.
    Win(Player),
    /// Every cell is occupied and nobody won.
    Draw,
}

impl Outcome {
    /// The winner to record for a decided game.
    pub fn winner(&self) -> Option<Winner> {
        match self {
            Outcome::Undecided => None,
            Outcome::Win(player) => Some(Winner::from(*player)),
            Outcome::Draw => Some(Winner::Draw),
        }
    }

    /// True once the game is over.
    pub fn is_decided(&self) -> bool {
        !matches!(self, Outcome::Undecided)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Undecided => write!(f, "In progress"),
            Outcome::Win(player) => write!(f, "Player {} wins", player),
            Outcome::Draw => write!(f, "Draw"),
        }
    }
}

/// Decides whether the board is won, drawn, or still open.
///
/// A win takes precedence over a full board.
#[instrument(skip(board), fields(size = %board.size(), occupied = board.occupied()))]
pub fn detect(board: &Board) -> Outcome {
    let outcome = if let Some(player) = check_winner(board) {
        Outcome::Win(player)
    } else if is_full(board) {
        Outcome::Draw
    } else {
        Outcome::Undecided
    };
    debug!(%outcome, "Board evaluated");
    outcome
}
