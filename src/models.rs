//! Persisted game records and the request types that change them.

use chrono::NaiveDateTime;
use gridtoe_rules::{
    BoardSize, GameStatus, MoveLog, Player, RecordedMove, Snapshot, Winner,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::ServiceError;

/// Row id of a game.
pub type GameId = i32;

/// Most games returned by a listing.
pub const MAX_LISTED_GAMES: i64 = 100;

/// Current UTC time as stored in the database.
pub(crate) fn now() -> NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

/// A game and its snapshot fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    /// Row id.
    pub id: GameId,
    /// Side length of the board.
    pub board_size: BoardSize,
    /// Lifecycle status.
    pub status: GameStatus,
    /// Recorded result, if any.
    pub winner: Option<Winner>,
    /// Player who holds the turn.
    pub current_player: Player,
    /// Creation time (UTC).
    pub created_at: NaiveDateTime,
    /// Last modification time (UTC).
    pub updated_at: NaiveDateTime,
}

impl Game {
    /// Snapshot fields consumed by the move state machine.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board_size: self.board_size,
            status: self.status,
            current_player: self.current_player,
            winner: self.winner,
        }
    }

    /// Copies a snapshot produced by an accepted move back onto the game.
    pub(crate) fn apply_snapshot(&mut self, snapshot: &Snapshot, at: NaiveDateTime) {
        self.status = snapshot.status;
        self.winner = snapshot.winner;
        self.current_player = snapshot.current_player;
        self.updated_at = at;
    }

    /// Applies an explicit status/winner update.
    pub(crate) fn apply_update(&mut self, update: &GameUpdate, at: NaiveDateTime) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(winner) = update.winner {
            self.winner = winner;
        }
        self.updated_at = at;
    }
}

/// One accepted move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMove {
    /// Row id.
    pub id: i32,
    /// Owning game.
    pub game_id: GameId,
    /// 1-based sequence number within the game.
    pub move_number: i32,
    /// Row-major cell index.
    pub position: i32,
    /// Player who moved.
    pub player: Player,
    /// Creation time (UTC).
    pub created_at: NaiveDateTime,
}

impl GameMove {
    /// Rules-level view of this move.
    pub fn to_recorded(&self) -> Result<RecordedMove, ServiceError> {
        let move_number = u32::try_from(self.move_number).map_err(|_| {
            ServiceError::Internal(format!(
                "Stored move {} has invalid move number {}",
                self.id, self.move_number
            ))
        })?;
        let position = usize::try_from(self.position).map_err(|_| {
            ServiceError::Internal(format!(
                "Stored move {} has invalid position {}",
                self.id, self.position
            ))
        })?;
        Ok(RecordedMove::new(move_number, position, self.player))
    }
}

/// Converts a newly accepted move into its stored column values.
pub(crate) fn stored_columns(recorded: &RecordedMove) -> Result<(i32, i32), ServiceError> {
    let move_number = i32::try_from(recorded.move_number)
        .map_err(|_| ServiceError::Internal("Move number overflow".into()))?;
    let position = i32::try_from(recorded.position)
        .map_err(|_| ServiceError::Internal("Position overflow".into()))?;
    Ok((move_number, position))
}

/// Rebuilds the rules-level log from stored moves, which must be in move order.
#[instrument(skip(moves), fields(moves = moves.len()))]
pub fn move_log(moves: &[GameMove]) -> Result<MoveLog, ServiceError> {
    moves.iter().map(GameMove::to_recorded).collect()
}

/// A game with its full move log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameWithMoves {
    /// The game.
    #[serde(flatten)]
    pub game: Game,
    /// Moves ordered by move number.
    pub moves: Vec<GameMove>,
    /// Cells of the completed line when the board holds one.
    pub winning_line: Option<Vec<usize>>,
}

/// A game in a listing, annotated with its move count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameListItem {
    /// The game.
    #[serde(flatten)]
    pub game: Game,
    /// Number of moves made.
    pub move_count: i64,
}

/// An accepted move and the game state it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResult {
    /// The appended move.
    #[serde(flatten)]
    pub game_move: GameMove,
    /// The game after the move.
    pub game: Game,
}

/// Partial update of a game's status and winner.
///
/// `winner: Some(None)` clears the winner. No cross-field checks are made:
/// a winner may be set on a game that is not completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameUpdate {
    /// New status.
    pub status: Option<GameStatus>,
    /// New winner, or `Some(None)` to clear it.
    pub winner: Option<Option<Winner>>,
}

impl GameUpdate {
    /// True when neither field is present.
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.winner.is_none()
    }
}

/// Listing filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameFilters {
    /// Only games with this status.
    pub status: Option<GameStatus>,
}
