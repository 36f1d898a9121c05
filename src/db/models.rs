//! Diesel row types and their conversions into domain records.

use std::str::FromStr;

use chrono::NaiveDateTime;
use derive_new::new;
use diesel::prelude::*;
use gridtoe_rules::{BoardSize, GameStatus, Player, Snapshot, Winner};
use tracing::instrument;

use crate::db::{DbError, schema};
use crate::models::{Game, GameMove, GameUpdate};

/// Stored game row.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = schema::games)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct GameRow {
    id: i32,
    board_size: i32,
    status: String,
    winner: Option<String>,
    current_player: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl GameRow {
    /// Row id.
    pub(crate) fn id(&self) -> i32 {
        self.id
    }
}

/// Insertable row for a fresh game.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::games)]
pub(crate) struct NewGameRow {
    board_size: i32,
    status: String,
    current_player: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl NewGameRow {
    /// Row for an in-progress game with X to move.
    pub(crate) fn fresh(board_size: BoardSize, at: NaiveDateTime) -> Result<Self, DbError> {
        let size = i32::try_from(board_size.get())
            .map_err(|_| DbError::new(format!("Board size {} out of range", board_size)))?;
        Ok(Self::new(
            size,
            GameStatus::InProgress.to_string(),
            Player::X.to_string(),
            at,
            at,
        ))
    }
}

/// Stored move row.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable)]
#[diesel(table_name = schema::game_moves)]
#[diesel(belongs_to(GameRow, foreign_key = game_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct MoveRow {
    id: i32,
    game_id: i32,
    move_number: i32,
    position: i32,
    player: String,
    created_at: NaiveDateTime,
}

/// Insertable row for an accepted move.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::game_moves)]
pub(crate) struct NewMoveRow {
    game_id: i32,
    move_number: i32,
    position: i32,
    player: String,
    created_at: NaiveDateTime,
}

/// Column changes for a game. `None` leaves a column untouched;
/// `winner: Some(None)` writes NULL.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = schema::games)]
pub(crate) struct GameChanges {
    status: Option<String>,
    winner: Option<Option<String>>,
    current_player: Option<String>,
    updated_at: NaiveDateTime,
}

impl GameChanges {
    /// Changes written after an accepted move.
    pub(crate) fn from_snapshot(snapshot: &Snapshot, at: NaiveDateTime) -> Self {
        Self {
            status: Some(snapshot.status.to_string()),
            winner: Some(snapshot.winner.map(|w| w.to_string())),
            current_player: Some(snapshot.current_player.to_string()),
            updated_at: at,
        }
    }

    /// Changes written by an explicit status/winner update.
    pub(crate) fn from_update(update: &GameUpdate, at: NaiveDateTime) -> Self {
        Self {
            status: update.status.map(|s| s.to_string()),
            winner: update.winner.map(|w| w.map(|w| w.to_string())),
            current_player: None,
            updated_at: at,
        }
    }
}

#[instrument(level = "trace")]
fn parse_column<T: FromStr>(column: &'static str, raw: &str) -> Result<T, DbError> {
    raw.parse()
        .map_err(|_| DbError::new(format!("Invalid {} value: '{}'", column, raw)))
}

impl TryFrom<GameRow> for Game {
    type Error = DbError;

    fn try_from(row: GameRow) -> Result<Self, Self::Error> {
        let board_size = usize::try_from(row.board_size)
            .ok()
            .and_then(|n| BoardSize::new(n).ok())
            .ok_or_else(|| DbError::new(format!("Invalid board_size value: {}", row.board_size)))?;
        let winner = row
            .winner
            .as_deref()
            .map(|raw| parse_column::<Winner>("winner", raw))
            .transpose()?;
        Ok(Game {
            id: row.id,
            board_size,
            status: parse_column::<GameStatus>("status", &row.status)?,
            winner,
            current_player: parse_column::<Player>("current_player", &row.current_player)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<MoveRow> for GameMove {
    type Error = DbError;

    fn try_from(row: MoveRow) -> Result<Self, Self::Error> {
        Ok(GameMove {
            id: row.id,
            game_id: row.game_id,
            move_number: row.move_number,
            position: row.position,
            player: parse_column::<Player>("player", &row.player)?,
            created_at: row.created_at,
        })
    }
}
