//! Turns raw request input into domain values.

use gridtoe_rules::{BoardSize, Move};
use tracing::instrument;

use crate::error::ServiceError;
use crate::http::dto::{CreateGameRequest, MakeMoveRequest, UpdateGameRequest};
use crate::models::{GameId, GameUpdate};

/// Parses a path segment as a game id.
#[instrument(level = "debug")]
pub fn parse_game_id(raw: &str) -> Result<GameId, ServiceError> {
    let id: i64 = raw.trim().parse().map_err(|_| {
        ServiceError::Validation(format!(
            "Invalid game ID '{}'! Expected a non-negative integer.",
            raw
        ))
    })?;
    if id < 0 {
        return Err(ServiceError::Validation(format!(
            "Invalid game ID {}! Expected a non-negative integer.",
            id
        )));
    }
    GameId::try_from(id)
        .map_err(|_| ServiceError::Validation(format!("Invalid game ID {}! Out of range.", id)))
}

/// Board size from a create request, defaulting to 3×3.
#[instrument(level = "debug")]
pub fn validate_create(request: &CreateGameRequest) -> Result<BoardSize, ServiceError> {
    let Some(raw) = request.board_size else {
        return Ok(BoardSize::DEFAULT);
    };
    usize::try_from(raw)
        .ok()
        .and_then(|size| BoardSize::new(size).ok())
        .ok_or_else(|| {
            ServiceError::Validation(format!(
                "Invalid board_size {}! Expected a number between 3 and 10.",
                raw
            ))
        })
}

/// Move from a move request. Upper bounds are checked by the state machine.
#[instrument(level = "debug")]
pub fn validate_move(request: &MakeMoveRequest) -> Result<Move, ServiceError> {
    let position = usize::try_from(request.position).map_err(|_| {
        ServiceError::Validation(format!(
            "Invalid position {}! Expected a non-negative integer.",
            request.position
        ))
    })?;
    Ok(Move::new(request.player, position))
}

/// Update from a patch request. Emptiness is checked by the service.
pub fn validate_update(request: &UpdateGameRequest) -> GameUpdate {
    GameUpdate {
        status: request.status,
        winner: request.winner,
    }
}
