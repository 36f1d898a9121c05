//! Per-game move state machine.
//!
//! `InProgress` is the only state that accepts moves; `Completed` and
//! `Abandoned` are terminal. [`apply_move`] is pure: it reads a snapshot and
//! a log and returns the next snapshot plus the move to append. Callers are
//! responsible for persisting both atomically.

use super::action::{Move, MoveError, RecordedMove};
use super::contracts::LegalMove;
use super::rules::{self, Outcome};
use super::{Board, BoardSize, GameStatus, MoveLog, Player, Winner};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// The mutable summary fields of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Side length of the board.
    pub board_size: BoardSize,
    /// Lifecycle status.
    pub status: GameStatus,
    /// Player who holds the turn.
    pub current_player: Player,
    /// Recorded result; only set on completed games via the move path.
    pub winner: Option<Winner>,
}

impl Snapshot {
    /// Snapshot of a freshly created game: in progress, X to move.
    pub fn new_game(board_size: BoardSize) -> Self {
        Self {
            board_size,
            status: GameStatus::InProgress,
            current_player: Player::X,
            winner: None,
        }
    }
}

/// Everything an accepted move changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Snapshot after the move, finalized when the move decided the game.
    pub snapshot: Snapshot,
    /// The move to append to the log.
    pub recorded: RecordedMove,
    /// Outcome of the board after the move.
    pub outcome: Outcome,
    /// Board after the move.
    pub board: Board,
}

/// Validates `proposed` against the game and computes the resulting state.
///
/// Checks run in order and the first failure is returned:
/// not in progress, wrong turn, position taken, position out of bounds.
///
/// On success the turn passes to the opponent even when the move ends the
/// game, and a win or draw sets `status` to `Completed` with its `winner`.
#[instrument(skip(snapshot, log), fields(status = %snapshot.status, moves = log.len()))]
pub fn apply_move(
    snapshot: &Snapshot,
    log: &MoveLog,
    proposed: Move,
) -> Result<Transition, MoveError> {
    LegalMove::check(&proposed, snapshot, log)?;

    let recorded = RecordedMove::new(log.next_move_number(), proposed.position, proposed.player);

    let mut board = log.board(snapshot.board_size)?;
    board.place(recorded.position, recorded.player)?;

    #[cfg(debug_assertions)]
    {
        let mut after = log.clone();
        after.push(recorded);
        super::contracts::LogStaysConsistent::check(&after)?;
    }

    let outcome = rules::detect(&board);
    let mut next = Snapshot {
        current_player: proposed.player.opponent(),
        ..*snapshot
    };
    if let Some(winner) = outcome.winner() {
        next.status = GameStatus::Completed;
        next.winner = Some(winner);
        info!(%winner, move_number = recorded.move_number, "Game decided");
    }

    debug!(
        move_number = recorded.move_number,
        position = recorded.position,
        player = %recorded.player,
        next_player = %next.current_player,
        "Move accepted"
    );

    Ok(Transition {
        snapshot: next,
        recorded,
        outcome,
        board,
    })
}

/// Replays a sequence of moves from a fresh game through [`apply_move`].
///
/// Returns the final snapshot and log, or the first rejection.
#[instrument(skip(moves))]
pub fn replay(
    board_size: BoardSize,
    moves: impl IntoIterator<Item = Move>,
) -> Result<(Snapshot, MoveLog), MoveError> {
    let mut snapshot = Snapshot::new_game(board_size);
    let mut log = MoveLog::new();
    for proposed in moves {
        let transition = apply_move(&snapshot, &log, proposed)?;
        snapshot = transition.snapshot;
        log.push(transition.recorded);
    }
    Ok((snapshot, log))
}
