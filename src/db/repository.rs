//! SQLite-backed [`GameStore`].

use std::collections::HashMap;
use std::path::Path;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use gridtoe_rules::{BoardSize, Move, apply_move};
use tracing::{debug, info, instrument};

use crate::db::models::{GameChanges, GameRow, MoveRow, NewGameRow, NewMoveRow};
use crate::db::{DbError, schema};
use crate::error::ServiceError;
use crate::models::{
    Game, GameFilters, GameId, GameListItem, GameMove, GameUpdate, MAX_LISTED_GAMES, MoveResult,
    move_log, now, stored_columns,
};
use crate::store::GameStore;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Milliseconds a writer waits for the database lock before failing.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Game store on a SQLite file. Each call opens its own connection.
#[derive(Debug, Clone)]
pub struct SqliteGameStore {
    db_path: String,
}

impl SqliteGameStore {
    /// Opens the database at `db_path`, creating parent directories and
    /// applying pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the directory, connection or migrations fail.
    #[instrument]
    pub fn open(db_path: &str) -> Result<Self, DbError> {
        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    DbError::new(format!(
                        "Failed to create directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let store = Self {
            db_path: db_path.to_string(),
        };
        let mut conn = store.connection()?;
        conn.batch_execute("PRAGMA journal_mode = WAL;")?;
        let applied = store.run_migrations()?;
        info!(path = %store.db_path, applied, "Opened game database");
        Ok(store)
    }

    /// Applies pending migrations and returns how many ran.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<usize, DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migrations failed: {}", e)))?;
        for version in &applied {
            debug!(%version, "Applied migration");
        }
        Ok(applied.len())
    }

    /// Path this store was opened on.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))?;
        conn.batch_execute(&format!(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {};",
            BUSY_TIMEOUT_MS
        ))?;
        Ok(conn)
    }
}

fn fetch_game(conn: &mut SqliteConnection, id: GameId) -> Result<Option<Game>, ServiceError> {
    let row = schema::games::table
        .find(id)
        .select(GameRow::as_select())
        .first(conn)
        .optional()?;
    Ok(row.map(Game::try_from).transpose()?)
}

fn fetch_moves(conn: &mut SqliteConnection, id: GameId) -> Result<Vec<GameMove>, ServiceError> {
    let rows = schema::game_moves::table
        .filter(schema::game_moves::game_id.eq(id))
        .order(schema::game_moves::move_number.asc())
        .select(MoveRow::as_select())
        .load(conn)?;
    rows.into_iter()
        .map(|row| GameMove::try_from(row).map_err(ServiceError::from))
        .collect()
}

impl GameStore for SqliteGameStore {
    #[instrument(skip(self))]
    fn create_game(&self, board_size: BoardSize) -> Result<Game, ServiceError> {
        let mut conn = self.connection()?;
        let new_game = NewGameRow::fresh(board_size, now())?;

        let row = diesel::insert_into(schema::games::table)
            .values(&new_game)
            .returning(GameRow::as_returning())
            .get_result(&mut conn)?;
        let game = Game::try_from(row)?;

        info!(game_id = game.id, board_size = %board_size, "Game created");
        Ok(game)
    }

    #[instrument(skip(self))]
    fn find_game(&self, id: GameId) -> Result<Option<Game>, ServiceError> {
        let mut conn = self.connection()?;
        fetch_game(&mut conn, id)
    }

    #[instrument(skip(self))]
    fn list_games(&self, filters: &GameFilters) -> Result<Vec<GameListItem>, ServiceError> {
        let mut conn = self.connection()?;

        let mut query = schema::games::table
            .select(GameRow::as_select())
            .into_boxed();
        if let Some(status) = filters.status {
            query = query.filter(schema::games::status.eq(status.to_string()));
        }
        let rows = query
            .order((schema::games::created_at.desc(), schema::games::id.desc()))
            .limit(MAX_LISTED_GAMES)
            .load(&mut conn)?;

        let ids: Vec<GameId> = rows.iter().map(GameRow::id).collect();
        let counts: HashMap<GameId, i64> = if ids.is_empty() {
            HashMap::new()
        } else {
            schema::game_moves::table
                .filter(schema::game_moves::game_id.eq_any(&ids))
                .group_by(schema::game_moves::game_id)
                .select((
                    schema::game_moves::game_id,
                    diesel::dsl::count(schema::game_moves::id),
                ))
                .load::<(GameId, i64)>(&mut conn)?
                .into_iter()
                .collect()
        };

        let items = rows
            .into_iter()
            .map(|row| {
                let game = Game::try_from(row)?;
                let move_count = counts.get(&game.id).copied().unwrap_or(0);
                Ok(GameListItem { game, move_count })
            })
            .collect::<Result<Vec<_>, ServiceError>>()?;

        debug!(count = items.len(), "Games listed");
        Ok(items)
    }

    #[instrument(skip(self))]
    fn moves(&self, id: GameId) -> Result<Vec<GameMove>, ServiceError> {
        let mut conn = self.connection()?;
        fetch_moves(&mut conn, id)
    }

    #[instrument(skip(self))]
    fn update_game(&self, id: GameId, update: &GameUpdate) -> Result<Option<Game>, ServiceError> {
        let mut conn = self.connection()?;
        let changes = GameChanges::from_update(update, now());

        conn.immediate_transaction(|conn| {
            let updated = diesel::update(schema::games::table.find(id))
                .set(&changes)
                .execute(conn)?;
            if updated == 0 {
                debug!(game_id = id, "No game to update");
                return Ok(None);
            }
            let game = fetch_game(conn, id)?;
            info!(game_id = id, "Game updated");
            Ok(game)
        })
    }

    #[instrument(skip(self))]
    fn delete_game(&self, id: GameId) -> Result<bool, ServiceError> {
        let mut conn = self.connection()?;

        conn.immediate_transaction(|conn| {
            let moves = diesel::delete(
                schema::game_moves::table.filter(schema::game_moves::game_id.eq(id)),
            )
            .execute(conn)?;
            let games = diesel::delete(schema::games::table.find(id)).execute(conn)?;
            info!(game_id = id, moves, removed = games > 0, "Game deleted");
            Ok(games > 0)
        })
    }

    #[instrument(skip(self), fields(player = %proposed.player, position = proposed.position))]
    fn append_move(&self, id: GameId, proposed: Move) -> Result<MoveResult, ServiceError> {
        let mut conn = self.connection()?;

        conn.immediate_transaction(|conn| {
            let game = fetch_game(conn, id)?.ok_or(ServiceError::NotFound(id))?;
            let log = move_log(&fetch_moves(conn, id)?)?;

            let transition = apply_move(&game.snapshot(), &log, proposed)?;
            let (move_number, position) = stored_columns(&transition.recorded)?;
            let at = now();

            let new_move = NewMoveRow::new(
                id,
                move_number,
                position,
                transition.recorded.player.to_string(),
                at,
            );
            let row = diesel::insert_into(schema::game_moves::table)
                .values(&new_move)
                .returning(MoveRow::as_returning())
                .get_result(conn)?;

            diesel::update(schema::games::table.find(id))
                .set(&GameChanges::from_snapshot(&transition.snapshot, at))
                .execute(conn)?;
            let game = fetch_game(conn, id)?.ok_or(ServiceError::NotFound(id))?;

            info!(
                game_id = id,
                move_number,
                outcome = %transition.outcome,
                "Move accepted"
            );
            Ok(MoveResult {
                game_move: GameMove::try_from(row)?,
                game,
            })
        })
    }
}
