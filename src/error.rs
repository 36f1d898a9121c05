//! Service errors and their HTTP representation.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use derive_more::{Display, From};
use gridtoe_rules::MoveError;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::db::DbError;
use crate::models::GameId;

/// Error category reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// The game does not exist.
    NotFound,
    /// The input was malformed or out of range.
    ValidationError,
    /// The input was well formed but the game refuses it.
    InvalidState,
    /// Storage or other internal failure.
    Internal,
}

impl ErrorKind {
    /// HTTP status for this category.
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::ValidationError | ErrorKind::InvalidState => StatusCode::BAD_REQUEST,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Everything a game operation can fail with.
#[derive(Debug, Clone, Display, From)]
pub enum ServiceError {
    /// No game with this id.
    #[display("Game with ID {_0} not found")]
    NotFound(GameId),

    /// Bad input.
    #[display("{_0}")]
    Validation(String),

    /// The move state machine refused the move.
    #[display("{_0}")]
    #[from]
    Rejected(MoveError),

    /// An update carried neither status nor winner.
    #[display("No valid fields to update")]
    NoValidFields,

    /// Storage failure.
    #[display("{_0}")]
    #[from]
    Database(DbError),

    /// Anything else that should not happen.
    #[display("Internal error: {_0}")]
    Internal(String),
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::Rejected(err) => Some(err),
            ServiceError::Database(err) => Some(err),
            _ => None,
        }
    }
}

impl ServiceError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::NotFound(_) => ErrorKind::NotFound,
            ServiceError::Validation(_) => ErrorKind::ValidationError,
            ServiceError::NoValidFields => ErrorKind::InvalidState,
            ServiceError::Rejected(MoveError::InvariantViolation(_)) => ErrorKind::Internal,
            ServiceError::Rejected(_) => ErrorKind::InvalidState,
            ServiceError::Database(_) | ServiceError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        self.kind().status_code()
    }
}

impl From<diesel::result::Error> for ServiceError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        ServiceError::Database(DbError::from(err))
    }
}

impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        ServiceError::Validation(format!("Invalid request body! {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ServiceError {
    fn from(rejection: QueryRejection) -> Self {
        ServiceError::Validation(format!("Invalid query string! {}", rejection.body_text()))
    }
}

/// Error body inside the failure envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorDetails {
    /// Human-readable message.
    pub message: String,
    /// Error category.
    pub kind: ErrorKind,
    /// HTTP status code.
    pub status_code: u16,
}

/// Failure envelope: `{"success": false, "error": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Always false.
    pub success: bool,
    /// What went wrong.
    pub error: ApiErrorDetails,
}

impl ApiErrorResponse {
    /// Builds the envelope for a message and category.
    pub fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            success: false,
            error: ApiErrorDetails {
                message: message.into(),
                kind,
                status_code: kind.status_code().as_u16(),
            },
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        match kind {
            ErrorKind::Internal => error!(error = %self, "Request failed"),
            _ => warn!(error = %self, kind = %kind, "Request rejected"),
        }
        let body = ApiErrorResponse::new(self.to_string(), kind);
        (kind.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridtoe_rules::{GameStatus, Player};

    #[test]
    fn test_status_mapping() {
        assert_eq!(ServiceError::NotFound(9).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ServiceError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ServiceError::NoValidFields.kind(), ErrorKind::InvalidState);
        assert_eq!(ServiceError::NoValidFields.status_code(), StatusCode::BAD_REQUEST);
        let rejected = ServiceError::from(MoveError::NotInProgress(GameStatus::Completed));
        assert_eq!(rejected.kind(), ErrorKind::InvalidState);
        assert_eq!(rejected.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ServiceError::Database(DbError::new("down")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let violated = ServiceError::from(MoveError::InvariantViolation("gap".into()));
        assert_eq!(violated.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_rejected_message_passes_through() {
        let err = ServiceError::from(MoveError::WrongTurn {
            expected: Player::X,
            attempted: Player::O,
        });
        assert_eq!(err.to_string(), "It's X's turn, not O's");
        assert_eq!(ServiceError::NotFound(42).to_string(), "Game with ID 42 not found");
    }

    #[test]
    fn test_error_envelope_shape() {
        let body = ApiErrorResponse::new("Game with ID 1 not found", ErrorKind::NotFound);
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["error"]["message"], "Game with ID 1 not found");
        assert_eq!(value["error"]["kind"], "not_found");
        assert_eq!(value["error"]["statusCode"], 404);
    }
}
