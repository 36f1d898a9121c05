//! Tests for game operations over the in-memory store.

use gridtoe::{GameFilters, GameService, GameUpdate, MAX_LISTED_GAMES, ServiceError};
use gridtoe_rules::{BoardSize, GameStatus, Move, MoveError, Player, Winner};

async fn play(service: &GameService, id: i32, moves: &[(Player, usize)]) {
    for &(player, position) in moves {
        service
            .add_move(id, Move::new(player, position))
            .await
            .expect("Move rejected");
    }
}

#[tokio::test]
async fn test_get_missing_game() {
    let service = GameService::in_memory();
    let err = service.get_game(12).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(12)));
    assert_eq!(err.to_string(), "Game with ID 12 not found");
}

#[tokio::test]
async fn test_moves_of_missing_game_is_not_found() {
    let service = GameService::in_memory();
    assert!(matches!(
        service.get_moves(3).await,
        Err(ServiceError::NotFound(3))
    ));
    assert!(matches!(
        service.get_game_with_moves(3).await,
        Err(ServiceError::NotFound(3))
    ));
}

#[tokio::test]
async fn test_full_game_reports_winning_line() {
    let service = GameService::in_memory();
    let game = service.create_game(BoardSize::DEFAULT).await.unwrap();
    play(
        &service,
        game.id,
        &[
            (Player::X, 0),
            (Player::O, 3),
            (Player::X, 1),
            (Player::O, 4),
            (Player::X, 2),
        ],
    )
    .await;

    let full = service.get_game_with_moves(game.id).await.unwrap();
    assert_eq!(full.game.status, GameStatus::Completed);
    assert_eq!(full.game.winner, Some(Winner::X));
    assert_eq!(full.moves.len(), 5);
    let numbers: Vec<i32> = full.moves.iter().map(|m| m.move_number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    assert_eq!(full.winning_line, Some(vec![0, 1, 2]));
}

#[tokio::test]
async fn test_unfinished_game_has_no_winning_line() {
    let service = GameService::in_memory();
    let game = service.create_game(BoardSize::new(5).unwrap()).await.unwrap();
    play(&service, game.id, &[(Player::X, 12), (Player::O, 0)]).await;

    let full = service.get_game_with_moves(game.id).await.unwrap();
    assert_eq!(full.winning_line, None);
    assert_eq!(full.game.current_player, Player::X);
}

#[tokio::test]
async fn test_four_by_four_needs_four() {
    let service = GameService::in_memory();
    let game = service.create_game(BoardSize::new(4).unwrap()).await.unwrap();
    play(
        &service,
        game.id,
        &[
            (Player::X, 0),
            (Player::O, 1),
            (Player::X, 5),
            (Player::O, 2),
            (Player::X, 10),
        ],
    )
    .await;
    let game_now = service.get_game(game.id).await.unwrap();
    assert_eq!(game_now.status, GameStatus::InProgress);

    play(&service, game.id, &[(Player::O, 3)]).await;
    let result = service
        .add_move(game.id, Move::new(Player::X, 15))
        .await
        .unwrap();
    assert_eq!(result.game.winner, Some(Winner::X));
    assert_eq!(result.game.status, GameStatus::Completed);
}

#[tokio::test]
async fn test_abandoned_game_rejects_moves() {
    let service = GameService::in_memory();
    let game = service.create_game(BoardSize::DEFAULT).await.unwrap();
    service
        .update_game(
            game.id,
            GameUpdate {
                status: Some(GameStatus::Abandoned),
                winner: None,
            },
        )
        .await
        .unwrap();

    let err = service
        .add_move(game.id, Move::new(Player::X, 0))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Rejected(MoveError::NotInProgress(GameStatus::Abandoned))
    ));
}

#[tokio::test]
async fn test_empty_update_is_rejected_before_lookup() {
    let service = GameService::in_memory();
    let err = service
        .update_game(77, GameUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NoValidFields));
}

#[tokio::test]
async fn test_winner_without_completion_is_accepted() {
    let service = GameService::in_memory();
    let game = service.create_game(BoardSize::DEFAULT).await.unwrap();
    let updated = service
        .update_game(
            game.id,
            GameUpdate {
                status: None,
                winner: Some(Some(Winner::O)),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, GameStatus::InProgress);
    assert_eq!(updated.winner, Some(Winner::O));
}

#[tokio::test]
async fn test_delete_then_get() {
    let service = GameService::in_memory();
    let game = service.create_game(BoardSize::DEFAULT).await.unwrap();
    service.delete_game(game.id).await.unwrap();
    assert!(matches!(
        service.get_game(game.id).await,
        Err(ServiceError::NotFound(_))
    ));
    assert!(matches!(
        service.delete_game(game.id).await,
        Err(ServiceError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_list_is_capped() {
    let service = GameService::in_memory();
    let total = MAX_LISTED_GAMES as usize + 5;
    for _ in 0..total {
        service.create_game(BoardSize::DEFAULT).await.unwrap();
    }

    let games = service.list_games(GameFilters::default()).await.unwrap();
    assert_eq!(games.len(), MAX_LISTED_GAMES as usize);
    assert_eq!(games[0].game.id, total as i32);
    assert!(games.windows(2).all(|pair| pair[0].game.id > pair[1].game.id));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_for_one_cell() {
    let service = GameService::in_memory();
    let game = service.create_game(BoardSize::DEFAULT).await.unwrap();
    play(&service, game.id, &[(Player::X, 0)]).await;

    let racers: Vec<_> = (0..6)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.add_move(game.id, Move::new(Player::O, 4)).await })
        })
        .collect();

    let mut accepted = 0;
    for racer in racers {
        if racer.await.expect("Task panicked").is_ok() {
            accepted += 1;
        }
    }
    assert_eq!(accepted, 1);
    assert_eq!(service.get_moves(game.id).await.unwrap().len(), 2);
}
