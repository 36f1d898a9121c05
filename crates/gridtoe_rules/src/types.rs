//! Core domain types for N×N tic-tac-toe.

use crate::action::MoveError;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Player in the game.
///
/// String forms are `"X"` and `"O"`; parsing is case-insensitive.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Player {
    /// Player X (goes first).
    #[strum(to_string = "X")]
    X,
    /// Player O (goes second).
    #[strum(to_string = "O")]
    O,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Square {
    /// Empty cell.
    #[default]
    Empty,
    /// Cell occupied by a player.
    Occupied(Player),
}

impl Square {
    /// Returns the occupying player, if any.
    pub fn player(self) -> Option<Player> {
        match self {
            Square::Empty => None,
            Square::Occupied(player) => Some(player),
        }
    }
}

/// Lifecycle status of a game. Only `InProgress` accepts moves.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum GameStatus {
    /// Game is ongoing.
    InProgress,
    /// Game ended in a win or a draw.
    Completed,
    /// Game was given up before it ended.
    Abandoned,
}

impl GameStatus {
    /// Returns true for statuses that no longer accept moves.
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

/// Recorded result of a completed game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Winner {
    /// Player X won.
    #[strum(to_string = "X")]
    X,
    /// Player O won.
    #[strum(to_string = "O")]
    O,
    /// Nobody won and the board filled up.
    #[serde(rename = "draw")]
    #[strum(to_string = "draw")]
    Draw,
}

impl From<Player> for Winner {
    fn from(player: Player) -> Self {
        match player {
            Player::X => Winner::X,
            Player::O => Winner::O,
        }
    }
}

/// Board size outside the supported range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display("Invalid board_size {_0}! Expected a number between 3 and 10.")]
pub struct InvalidBoardSize(pub usize);

impl std::error::Error for InvalidBoardSize {}

/// Side length `N` of a square board, always within `3..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct BoardSize(usize);

impl BoardSize {
    /// Smallest supported side length.
    pub const MIN: usize = 3;
    /// Largest supported side length.
    pub const MAX: usize = 10;
    /// Side length used when a game is created without one.
    pub const DEFAULT: BoardSize = BoardSize(3);

    /// Validates a side length.
    #[instrument]
    pub fn new(size: usize) -> Result<Self, InvalidBoardSize> {
        if (Self::MIN..=Self::MAX).contains(&size) {
            Ok(Self(size))
        } else {
            Err(InvalidBoardSize(size))
        }
    }

    /// Returns the side length.
    pub fn get(self) -> usize {
        self.0
    }

    /// Number of cells on the board (`N²`).
    pub fn cells(self) -> usize {
        self.0 * self.0
    }

    /// Consecutive cells needed to win: 3 on 3×3, 4 on 4×4, 5 on anything larger.
    pub fn win_length(self) -> usize {
        match self.0 {
            3 => 3,
            4 => 4,
            _ => 5,
        }
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<usize> for BoardSize {
    type Error = InvalidBoardSize;

    fn try_from(size: usize) -> Result<Self, Self::Error> {
        Self::new(size)
    }
}

impl From<BoardSize> for usize {
    fn from(size: BoardSize) -> Self {
        size.0
    }
}

impl std::fmt::Display for BoardSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.0, self.0)
    }
}

/// N×N board stored row-major: cell `(row, col)` lives at `row * N + col`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: BoardSize,
    squares: Vec<Square>,
}

impl Board {
    /// Creates a new empty board.
    #[instrument]
    pub fn new(size: BoardSize) -> Self {
        Self {
            size,
            squares: vec![Square::Empty; size.cells()],
        }
    }

    /// Wraps an existing cell sequence. Returns `None` unless it holds exactly `N²` cells.
    pub fn from_squares(size: BoardSize, squares: Vec<Square>) -> Option<Self> {
        (squares.len() == size.cells()).then_some(Self { size, squares })
    }

    /// Returns the board size.
    pub fn size(&self) -> BoardSize {
        self.size
    }

    /// Gets the square at the given position.
    pub fn get(&self, pos: usize) -> Option<Square> {
        self.squares.get(pos).copied()
    }

    /// Checks if a square is empty. Out-of-range positions are not empty.
    pub fn is_empty(&self, pos: usize) -> bool {
        matches!(self.get(pos), Some(Square::Empty))
    }

    /// Places a mark on an empty, in-range square.
    pub fn place(&mut self, pos: usize, player: Player) -> Result<(), MoveError> {
        match self.squares.get_mut(pos) {
            None => Err(MoveError::InvalidPosition {
                position: pos,
                cells: self.size.cells(),
            }),
            Some(Square::Occupied(_)) => Err(MoveError::PositionTaken(pos)),
            Some(square) => {
                *square = Square::Occupied(player);
                Ok(())
            }
        }
    }

    /// Returns all squares.
    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    /// Number of occupied squares.
    pub fn occupied(&self) -> usize {
        self.squares.iter().filter(|s| **s != Square::Empty).count()
    }

    /// Positions that are still free, ascending.
    pub fn empty_positions(&self) -> Vec<usize> {
        self.squares
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == Square::Empty)
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Formats the board as a grid; empty cells show their position.
    pub fn display(&self) -> String {
        let n = self.size.get();
        let width = (self.size.cells() - 1).to_string().len();
        let rows: Vec<String> = (0..n)
            .map(|row| {
                (0..n)
                    .map(|col| {
                        let pos = row * n + col;
                        let symbol = match self.squares[pos] {
                            Square::Empty => pos.to_string(),
                            Square::Occupied(player) => player.to_string(),
                        };
                        format!("{symbol:>width$}")
                    })
                    .collect::<Vec<_>>()
                    .join("|")
            })
            .collect();
        let separator = vec!["-".repeat(width); n].join("+");
        rows.join(&format!("\n{separator}\n"))
    }
}
