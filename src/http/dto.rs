//! Request bodies and query strings.

use gridtoe_rules::{GameStatus, Player, Winner};
use serde::{Deserialize, Deserializer, Serialize};

/// `POST /api/games` body. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGameRequest {
    /// Side length, 3 through 10. Defaults to 3.
    #[serde(default)]
    pub board_size: Option<i64>,
}

/// `POST /api/games/{id}/moves` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MakeMoveRequest {
    /// Row-major cell index.
    pub position: i64,
    /// Player making the move.
    pub player: Player,
}

/// `PATCH /api/games/{id}` body. Fields other than these are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateGameRequest {
    /// New status.
    #[serde(default)]
    pub status: Option<GameStatus>,
    /// New winner. An explicit `null` clears it; an absent field leaves it alone.
    #[serde(default, deserialize_with = "present")]
    pub winner: Option<Option<Winner>>,
}

/// `GET /api/games` query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameListQuery {
    /// Only games with this status.
    pub status: Option<GameStatus>,
}

/// Wraps whatever was present, including `null`, so absence stays distinguishable.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
