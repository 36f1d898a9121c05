//! Gridtoe - N×N tic-tac-toe over HTTP.
//!
//! Games are persisted as an append-only move log plus a few snapshot fields.
//! Every proposed move is checked by the state machine in [`gridtoe_rules`]
//! against the stored log, and the move and its consequences are written in a
//! single step.
//!
//! # Architecture
//!
//! - **Store**: [`GameStore`] with SQLite ([`SqliteGameStore`]) and in-memory
//!   ([`MemoryGameStore`]) implementations
//! - **Service**: [`GameService`], async operations over a shared store
//! - **HTTP**: [`build_router`], JSON envelopes under `/api/games`
//! - **Config**: [`ServerConfig`], TOML file then environment then flags
//!
//! # Example
//!
//! ```
//! use gridtoe::{GameService, ServiceError};
//! use gridtoe_rules::{BoardSize, GameStatus, Move, Player, Winner};
//!
//! # async fn example() -> Result<(), ServiceError> {
//! let service = GameService::in_memory();
//! let game = service.create_game(BoardSize::DEFAULT).await?;
//! for (player, position) in [(Player::X, 0), (Player::O, 3), (Player::X, 1), (Player::O, 4)] {
//!     service.add_move(game.id, Move::new(player, position)).await?;
//! }
//! let result = service.add_move(game.id, Move::new(Player::X, 2)).await?;
//! assert_eq!(result.game.status, GameStatus::Completed);
//! assert_eq!(result.game.winner, Some(Winner::X));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod db;
mod error;
mod http;
mod models;
mod service;
mod store;

pub use config::{ConfigError, ServerConfig};
pub use db::{DbError, SqliteGameStore};
pub use error::{ApiErrorDetails, ApiErrorResponse, ErrorKind, ServiceError};
pub use http::{
    ApiSuccess, AppState, CreateGameRequest, GameListQuery, MakeMoveRequest, UpdateGameRequest,
    build_router, parse_game_id, validate_create, validate_move, validate_update,
};
pub use models::{
    Game, GameFilters, GameId, GameListItem, GameMove, GameUpdate, GameWithMoves,
    MAX_LISTED_GAMES, MoveResult, move_log,
};
pub use service::GameService;
pub use store::{GameStore, MemoryGameStore};
