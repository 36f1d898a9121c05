//! Pure rules for N×N tic-tac-toe.
//!
//! Boards range from 3×3 to 10×10. The number of marks in a row needed to
//! win grows with the board: 3 on 3×3, 4 on 4×4, 5 on anything larger.
//!
//! # Architecture
//!
//! - **Types**: players, squares, statuses and the row-major [`Board`]
//! - **Rules**: win detection ([`rules::detect`]) over every window that fits
//! - **Machine**: the per-game move state machine ([`apply_move`])
//! - **Log**: the append-only [`MoveLog`] that boards are rebuilt from
//! - **Invariants**: properties every persisted log must satisfy
//!
//! # Example
//!
//! ```
//! use gridtoe_rules::{BoardSize, GameStatus, Move, Player, Winner, replay};
//!
//! let moves = [(Player::X, 0), (Player::O, 3), (Player::X, 1), (Player::O, 4), (Player::X, 2)]
//!     .map(|(player, pos)| Move::new(player, pos));
//! let (snapshot, log) = replay(BoardSize::DEFAULT, moves).unwrap();
//! assert_eq!(snapshot.status, GameStatus::Completed);
//! assert_eq!(snapshot.winner, Some(Winner::X));
//! assert_eq!(log.len(), 5);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod contracts;
mod invariants;
mod move_log;
mod machine;
mod types;

pub mod rules;

pub use action::{Move, MoveError, RecordedMove};
pub use contracts::{
    GameIsOpen, LegalMove, LogStaysConsistent, PlayersTurn, PositionIsFree, WithinBounds,
};
pub use invariants::{
    AlternatingTurnInvariant, DistinctPositionsInvariant, GaplessNumberingInvariant, Invariant,
    InvariantSet, InvariantViolation,
};
pub use move_log::{MoveLog, MoveLogInvariants};
pub use machine::{Snapshot, Transition, apply_move, replay};
pub use rules::{Outcome, detect};
pub use types::{Board, BoardSize, GameStatus, InvalidBoardSize, Player, Square, Winner};
