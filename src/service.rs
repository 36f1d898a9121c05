//! Async game operations over a [`GameStore`].

use std::sync::Arc;

use gridtoe_rules::rules::winning_line;
use gridtoe_rules::{BoardSize, Move};
use tracing::{debug, instrument};

use crate::error::ServiceError;
use crate::models::{
    Game, GameFilters, GameId, GameListItem, GameMove, GameUpdate, GameWithMoves, MoveResult,
    move_log,
};
use crate::store::{GameStore, MemoryGameStore};

/// Game operations shared by every request handler.
///
/// Cloning is cheap; clones share the same store.
#[derive(Debug, Clone)]
pub struct GameService {
    store: Arc<dyn GameStore>,
}

impl GameService {
    /// Wraps a store.
    pub fn new(store: Arc<dyn GameStore>) -> Self {
        Self { store }
    }

    /// Service over a fresh [`MemoryGameStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryGameStore::new()))
    }

    /// Runs a blocking store call on the blocking pool.
    async fn run<T, F>(&self, op: F) -> Result<T, ServiceError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn GameStore) -> Result<T, ServiceError> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || op(store.as_ref()))
            .await
            .map_err(|e| ServiceError::Internal(format!("Store task failed: {}", e)))?
    }

    /// Creates a game of the given size.
    #[instrument(skip(self))]
    pub async fn create_game(&self, board_size: BoardSize) -> Result<Game, ServiceError> {
        self.run(move |store| store.create_game(board_size)).await
    }

    /// Loads a game.
    ///
    /// # Errors
    ///
    /// [`ServiceError::NotFound`] if the game does not exist.
    #[instrument(skip(self))]
    pub async fn get_game(&self, id: GameId) -> Result<Game, ServiceError> {
        self.run(move |store| store.find_game(id)?.ok_or(ServiceError::NotFound(id)))
            .await
    }

    /// Loads a game with its moves and, when one exists, its winning line.
    #[instrument(skip(self))]
    pub async fn get_game_with_moves(&self, id: GameId) -> Result<GameWithMoves, ServiceError> {
        self.run(move |store| {
            let game = store.find_game(id)?.ok_or(ServiceError::NotFound(id))?;
            let moves = store.moves(id)?;
            let board = move_log(&moves)?.board(game.board_size).map_err(|e| {
                ServiceError::Internal(format!("Stored log of game {} is corrupt: {}", id, e))
            })?;
            let winning_line = winning_line(&board).map(|line| line.cells);
            debug!(game_id = id, moves = moves.len(), "Loaded game with moves");
            Ok(GameWithMoves {
                game,
                moves,
                winning_line,
            })
        })
        .await
    }

    /// Lists games newest first.
    #[instrument(skip(self))]
    pub async fn list_games(&self, filters: GameFilters) -> Result<Vec<GameListItem>, ServiceError> {
        self.run(move |store| store.list_games(&filters)).await
    }

    /// Updates status and/or winner.
    ///
    /// # Errors
    ///
    /// [`ServiceError::NoValidFields`] when the update is empty, then
    /// [`ServiceError::NotFound`] if the game does not exist.
    #[instrument(skip(self))]
    pub async fn update_game(&self, id: GameId, update: GameUpdate) -> Result<Game, ServiceError> {
        if update.is_empty() {
            return Err(ServiceError::NoValidFields);
        }
        self.run(move |store| store.update_game(id, &update)?.ok_or(ServiceError::NotFound(id)))
            .await
    }

    /// Deletes a game and its moves.
    #[instrument(skip(self))]
    pub async fn delete_game(&self, id: GameId) -> Result<(), ServiceError> {
        self.run(move |store| {
            if store.delete_game(id)? {
                Ok(())
            } else {
                Err(ServiceError::NotFound(id))
            }
        })
        .await
    }

    /// Validates and records a move.
    #[instrument(skip(self))]
    pub async fn add_move(&self, id: GameId, proposed: Move) -> Result<MoveResult, ServiceError> {
        self.run(move |store| store.append_move(id, proposed)).await
    }

    /// Moves of a game ordered by move number.
    ///
    /// # Errors
    ///
    /// [`ServiceError::NotFound`] if the game does not exist.
    #[instrument(skip(self))]
    pub async fn get_moves(&self, id: GameId) -> Result<Vec<GameMove>, ServiceError> {
        self.run(move |store| {
            if store.find_game(id)?.is_none() {
                return Err(ServiceError::NotFound(id));
            }
            store.moves(id)
        })
        .await
    }
}
