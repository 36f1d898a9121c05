//! SQLite persistence for games and their move logs.

mod error;
mod models;
mod repository;
mod schema;

pub use error::DbError;
pub use repository::SqliteGameStore;
