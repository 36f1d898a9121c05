//! HTTP surface: JSON envelopes over [`GameService`].

mod dto;
mod games;
mod health;
mod responses;
mod validators;

pub use dto::{CreateGameRequest, GameListQuery, MakeMoveRequest, UpdateGameRequest};
pub use responses::ApiSuccess;
pub use validators::{parse_game_id, validate_create, validate_move, validate_update};

use axum::Json;
use axum::http::{HeaderValue, Method, StatusCode, Uri, header};
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::{ApiErrorResponse, ErrorKind};
use crate::service::GameService;

/// State shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Game operations.
    pub games: GameService,
}

impl AppState {
    /// Wraps a service.
    pub fn new(games: GameService) -> Self {
        Self { games }
    }
}

/// Builds the application router with CORS for `cors_origin` and request tracing.
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .merge(games::routes())
        .fallback(not_found)
        .layer(cors_layer(cors_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE]);
    match HeaderValue::from_str(origin) {
        Ok(value) => {
            info!(origin, "CORS origin allowed");
            layer.allow_origin(value)
        }
        Err(e) => {
            warn!(origin, error = %e, "Ignoring unparseable CORS origin");
            layer
        }
    }
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ApiErrorResponse>) {
    let body = ApiErrorResponse::new(format!("Route {} not found", uri.path()), ErrorKind::NotFound);
    (StatusCode::NOT_FOUND, Json(body))
}
