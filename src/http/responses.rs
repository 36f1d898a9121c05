//! Success envelope.

use serde::{Deserialize, Serialize};

/// `{"success": true, "data": ..., "message": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSuccess<T> {
    /// Always true.
    pub success: bool,
    /// Payload.
    pub data: T,
    /// Optional note for the client.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
}

impl<T> ApiSuccess<T> {
    /// Envelope without a message.
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    /// Envelope with a message.
    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
        }
    }
}
