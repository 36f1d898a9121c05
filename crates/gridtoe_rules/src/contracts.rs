//! Contract-based validation for proposed moves.
//!
//! Each precondition is a small named check. [`LegalMove`] composes them in
//! the order callers rely on: the first failing check is the one reported.

use super::action::{Move, MoveError};
use super::machine::Snapshot;
use super::{GameStatus, MoveLog};
use tracing::{instrument, warn};

/// Precondition: The game must still accept moves.
pub struct GameIsOpen;

impl GameIsOpen {
    /// Rejects with [`MoveError::NotInProgress`] for terminal games.
    #[instrument(skip_all)]
    pub fn check(snapshot: &Snapshot) -> Result<(), MoveError> {
        if snapshot.status != GameStatus::InProgress {
            warn!(status = %snapshot.status, "Move on closed game");
            Err(MoveError::NotInProgress(snapshot.status))
        } else {
            Ok(())
        }
    }
}

/// Precondition: It must be the player's turn.
pub struct PlayersTurn;

impl PlayersTurn {
    /// Rejects with [`MoveError::WrongTurn`], naming the player who holds the turn.
    #[instrument(skip(snapshot))]
    pub fn check(mov: &Move, snapshot: &Snapshot) -> Result<(), MoveError> {
        if mov.player != snapshot.current_player {
            Err(MoveError::WrongTurn {
                expected: snapshot.current_player,
                attempted: mov.player,
            })
        } else {
            Ok(())
        }
    }
}

/// Precondition: No earlier move may target the same position.
pub struct PositionIsFree;

impl PositionIsFree {
    /// Rejects with [`MoveError::PositionTaken`].
    #[instrument(skip(log))]
    pub fn check(mov: &Move, log: &MoveLog) -> Result<(), MoveError> {
        if log.contains_position(mov.position) {
            Err(MoveError::PositionTaken(mov.position))
        } else {
            Ok(())
        }
    }
}

/// Precondition: The position must exist on the board.
pub struct WithinBounds;

impl WithinBounds {
    /// Rejects with [`MoveError::InvalidPosition`].
    #[instrument(skip(snapshot))]
    pub fn check(mov: &Move, snapshot: &Snapshot) -> Result<(), MoveError> {
        let cells = snapshot.board_size.cells();
        if mov.position >= cells {
            Err(MoveError::InvalidPosition {
                position: mov.position,
                cells,
            })
        } else {
            Ok(())
        }
    }
}

/// Composite precondition: open game, right player, free cell, on the board.
pub struct LegalMove;

impl LegalMove {
    /// Validates all preconditions for a move, short-circuiting on the first failure.
    #[instrument(skip(snapshot, log))]
    pub fn check(mov: &Move, snapshot: &Snapshot, log: &MoveLog) -> Result<(), MoveError> {
        GameIsOpen::check(snapshot)?;
        PlayersTurn::check(mov, snapshot)?;
        PositionIsFree::check(mov, log)?;
        WithinBounds::check(mov, snapshot)?;
        Ok(())
    }
}

/// Postcondition: The log produced by a move still satisfies every
/// move-log invariant.
pub struct LogStaysConsistent;

impl LogStaysConsistent {
    /// Maps invariant violations to [`MoveError::InvariantViolation`].
    #[instrument(skip_all)]
    pub fn check(after: &MoveLog) -> Result<(), MoveError> {
        after.verify().map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            MoveError::InvariantViolation(format!("Postcondition failed: {}", descriptions))
        })
    }
}
