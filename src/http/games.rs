//! `/api/games` routes.

use axum::body::Bytes;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::{debug, instrument};

use crate::error::ServiceError;
use crate::http::dto::{CreateGameRequest, GameListQuery, MakeMoveRequest, UpdateGameRequest};
use crate::http::responses::ApiSuccess;
use crate::http::validators::{parse_game_id, validate_create, validate_move, validate_update};
use crate::http::AppState;
use crate::models::{Game, GameFilters, GameListItem, GameMove, GameWithMoves, MoveResult};

type ApiResult<T> = Result<Json<ApiSuccess<T>>, ServiceError>;

/// Game and move routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/games", get(list_games).post(create_game))
        .route(
            "/api/games/{id}",
            get(get_game).patch(update_game).delete(delete_game),
        )
        .route("/api/games/{id}/full", get(get_game_with_moves))
        .route("/api/games/{id}/moves", get(get_moves).post(add_move))
}

/// An empty body means "all defaults".
#[instrument(skip(state, body), fields(body_len = body.len()))]
async fn create_game(State(state): State<AppState>, body: Bytes) -> ApiResult<Game> {
    let request: CreateGameRequest = if body.iter().all(u8::is_ascii_whitespace) {
        CreateGameRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ServiceError::Validation(format!("Invalid request body! {}", e)))?
    };
    let board_size = validate_create(&request)?;
    let game = state.games.create_game(board_size).await?;
    Ok(Json(ApiSuccess::with_message(game, "Game created")))
}

#[instrument(skip(state, query))]
async fn list_games(
    State(state): State<AppState>,
    query: Result<Query<GameListQuery>, QueryRejection>,
) -> ApiResult<Vec<GameListItem>> {
    let Query(query) = query?;
    let games = state
        .games
        .list_games(GameFilters {
            status: query.status,
        })
        .await?;
    debug!(count = games.len(), "Listing games");
    Ok(Json(ApiSuccess::new(games)))
}

#[instrument(skip(state))]
async fn get_game(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Game> {
    let id = parse_game_id(&id)?;
    let game = state.games.get_game(id).await?;
    Ok(Json(ApiSuccess::new(game)))
}

#[instrument(skip(state))]
async fn get_game_with_moves(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<GameWithMoves> {
    let id = parse_game_id(&id)?;
    let game = state.games.get_game_with_moves(id).await?;
    Ok(Json(ApiSuccess::new(game)))
}

#[instrument(skip(state, payload))]
async fn update_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateGameRequest>, JsonRejection>,
) -> ApiResult<Game> {
    let id = parse_game_id(&id)?;
    let Json(request) = payload?;
    let game = state.games.update_game(id, validate_update(&request)).await?;
    Ok(Json(ApiSuccess::with_message(game, "Game updated")))
}

#[instrument(skip(state))]
async fn delete_game(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let id = parse_game_id(&id)?;
    state.games.delete_game(id).await?;
    Ok(Json(ApiSuccess::with_message((), "Game deleted")))
}

#[instrument(skip(state))]
async fn get_moves(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Vec<GameMove>> {
    let id = parse_game_id(&id)?;
    let moves = state.games.get_moves(id).await?;
    Ok(Json(ApiSuccess::new(moves)))
}

#[instrument(skip(state, payload))]
async fn add_move(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<MakeMoveRequest>, JsonRejection>,
) -> ApiResult<MoveResult> {
    let id = parse_game_id(&id)?;
    let Json(request) = payload?;
    let proposed = validate_move(&request)?;
    let result = state.games.add_move(id, proposed).await?;
    Ok(Json(ApiSuccess::with_message(result, "Move recorded")))
}
