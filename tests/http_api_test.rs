//! Tests for the HTTP API, driven through the router without a socket.

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use gridtoe::{AppState, GameService, build_router};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

fn app() -> Router {
    build_router(
        AppState::new(GameService::in_memory()),
        "http://localhost:5173",
    )
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create(app: &Router, body: Option<Value>) -> i64 {
    let (status, body) = send(app, Method::POST, "/api/games", body).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"]["id"].as_i64().unwrap()
}

async fn make_move(app: &Router, id: i64, player: &str, position: i64) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        &format!("/api/games/{id}/moves"),
        Some(json!({ "position": position, "player": player })),
    )
    .await
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(&app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_create_with_empty_body_uses_defaults() {
    let app = app();
    let (status, body) = send(&app, Method::POST, "/api/games", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["board_size"], 3);
    assert_eq!(body["data"]["status"], "in_progress");
    assert_eq!(body["data"]["current_player"], "X");
    assert_eq!(body["data"]["winner"], Value::Null);
}

#[tokio::test]
async fn test_create_with_board_size() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/games",
        Some(json!({ "board_size": 7 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["board_size"], 7);
}

#[tokio::test]
async fn test_create_rejects_bad_board_size() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/games",
        Some(json!({ "board_size": 11 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["kind"], "validation_error");
    assert_eq!(body["error"]["statusCode"], 400);
    assert_eq!(
        body["error"]["message"],
        "Invalid board_size 11! Expected a number between 3 and 10."
    );
}

#[tokio::test]
async fn test_unknown_and_malformed_ids() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/games/404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Game with ID 404 not found");
    assert_eq!(body["error"]["kind"], "not_found");

    let (status, body) = send(&app, Method::GET, "/api/games/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "validation_error");

    let (status, _) = send(&app, Method::GET, "/api/games/-4/moves", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_play_to_a_win() {
    let app = app();
    let id = create(&app, None).await;

    for (player, position) in [("X", 0), ("O", 3), ("X", 1), ("O", 4)] {
        let (status, body) = make_move(&app, id, player, position).await;
        assert_eq!(status, StatusCode::OK, "{body}");
    }
    let (status, body) = make_move(&app, id, "X", 2).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["move_number"], 5);
    assert_eq!(body["data"]["position"], 2);
    assert_eq!(body["data"]["player"], "X");
    assert_eq!(body["data"]["game"]["status"], "completed");
    assert_eq!(body["data"]["game"]["winner"], "X");
    assert_eq!(body["data"]["game"]["current_player"], "O");

    let (status, body) = send(&app, Method::GET, &format!("/api/games/{id}/full"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["moves"].as_array().unwrap().len(), 5);
    assert_eq!(body["data"]["winning_line"], json!([0, 1, 2]));

    let (status, body) = make_move(&app, id, "O", 5).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "invalid_state");
    assert_eq!(
        body["error"]["message"],
        "Cannot add a move to a game that is completed"
    );
}

#[tokio::test]
async fn test_move_rejections() {
    let app = app();
    let id = create(&app, None).await;

    let (status, body) = make_move(&app, id, "O", 0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "It's X's turn, not O's");

    make_move(&app, id, "X", 4).await;
    let (status, body) = make_move(&app, id, "O", 4).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Position 4 is already taken");

    let (status, body) = make_move(&app, id, "O", 9).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "invalid_state");

    let (status, body) = make_move(&app, id, "O", -1).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "validation_error");

    let (status, body) = make_move(&app, id, "Q", 1).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "validation_error");

    let (status, body) = send(&app, Method::GET, &format!("/api/games/{id}/moves"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_move_on_missing_game() {
    let (status, _) = make_move(&app(), 9, "X", 0).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_patch_game() {
    let app = app();
    let id = create(&app, None).await;
    let uri = format!("/api/games/{id}");

    let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "No valid fields to update");

    let (status, body) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({ "status": "completed", "winner": "draw", "current_player": "O" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "completed");
    assert_eq!(body["data"]["winner"], "draw");
    assert_eq!(body["data"]["current_player"], "X");

    let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({ "winner": null }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["winner"], Value::Null);
    assert_eq!(body["data"]["status"], "completed");

    let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({ "status": "paused" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "validation_error");
}

#[tokio::test]
async fn test_list_and_filter() {
    let app = app();
    let first = create(&app, None).await;
    let second = create(&app, Some(json!({ "board_size": 4 }))).await;
    make_move(&app, second, "X", 0).await;
    send(
        &app,
        Method::PATCH,
        &format!("/api/games/{first}"),
        Some(json!({ "status": "abandoned" })),
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/api/games", None).await;
    assert_eq!(status, StatusCode::OK);
    let games = body["data"].as_array().unwrap();
    assert_eq!(games.len(), 2);
    assert_eq!(games[0]["id"], second);
    assert_eq!(games[0]["move_count"], 1);

    let (_, body) = send(&app, Method::GET, "/api/games?status=abandoned", None).await;
    let games = body["data"].as_array().unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0]["id"], first);

    let (status, body) = send(&app, Method::GET, "/api/games?status=bogus", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "validation_error");
}

#[tokio::test]
async fn test_delete_game() {
    let app = app();
    let id = create(&app, None).await;
    let uri = format!("/api/games/{id}");

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], Value::Null);

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_route_uses_error_envelope() {
    let (status, body) = send(&app(), Method::GET, "/api/nothing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["statusCode"], 404);
}
