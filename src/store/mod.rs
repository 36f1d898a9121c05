//! Game persistence behind a single trait.
//!
//! Implementations serialize [`GameStore::append_move`] per game: the move log
//! is read, the move state machine runs, and the new move plus the resulting
//! snapshot are written as one unit. Concurrent appends to the same game are
//! therefore decided one after another against the latest log.

mod memory;

pub use memory::MemoryGameStore;

use gridtoe_rules::{BoardSize, Move};

use crate::error::ServiceError;
use crate::models::{Game, GameFilters, GameId, GameListItem, GameMove, GameUpdate, MoveResult};

/// Durable games and their ordered move logs.
///
/// Methods are blocking; async callers go through
/// [`GameService`](crate::GameService), which moves them onto the blocking pool.
pub trait GameStore: Send + Sync + std::fmt::Debug {
    /// Inserts an in-progress game with X to move.
    fn create_game(&self, board_size: BoardSize) -> Result<Game, ServiceError>;

    /// Loads a game, `None` if it does not exist.
    fn find_game(&self, id: GameId) -> Result<Option<Game>, ServiceError>;

    /// Lists games newest first, at most [`MAX_LISTED_GAMES`](crate::MAX_LISTED_GAMES).
    fn list_games(&self, filters: &GameFilters) -> Result<Vec<GameListItem>, ServiceError>;

    /// Moves of a game ordered by move number. Empty for unknown games.
    fn moves(&self, id: GameId) -> Result<Vec<GameMove>, ServiceError>;

    /// Applies a status/winner update, `None` if the game does not exist.
    fn update_game(&self, id: GameId, update: &GameUpdate) -> Result<Option<Game>, ServiceError>;

    /// Deletes a game and its moves. Returns whether a game was removed.
    fn delete_game(&self, id: GameId) -> Result<bool, ServiceError>;

    /// Validates and appends a move, finalizing the game if it ends.
    ///
    /// # Errors
    ///
    /// [`ServiceError::NotFound`] for unknown games and
    /// [`ServiceError::Rejected`] when the state machine refuses the move.
    fn append_move(&self, id: GameId, proposed: Move) -> Result<MoveResult, ServiceError>;
}
