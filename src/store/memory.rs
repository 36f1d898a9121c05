//! In-process store used by tests and by `serve --memory`.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use gridtoe_rules::{BoardSize, GameStatus, Move, Player, apply_move};
use tracing::{debug, info, instrument};

use crate::error::ServiceError;
use crate::models::{
    Game, GameFilters, GameId, GameListItem, GameMove, GameUpdate, MAX_LISTED_GAMES, MoveResult,
    move_log, now, stored_columns,
};
use crate::store::GameStore;

#[derive(Debug, Default)]
struct MemoryState {
    last_game_id: GameId,
    last_move_id: i32,
    games: BTreeMap<GameId, Game>,
    moves: BTreeMap<GameId, Vec<GameMove>>,
}

/// Games held in a mutex-guarded map. One lock covers every operation.
#[derive(Debug, Default)]
pub struct MemoryGameStore {
    state: Mutex<MemoryState>,
}

impl MemoryGameStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, ServiceError> {
        self.state
            .lock()
            .map_err(|_| ServiceError::Internal("Game store lock poisoned".into()))
    }
}

impl GameStore for MemoryGameStore {
    #[instrument(skip(self))]
    fn create_game(&self, board_size: BoardSize) -> Result<Game, ServiceError> {
        let mut state = self.lock()?;
        state.last_game_id += 1;
        let at = now();
        let game = Game {
            id: state.last_game_id,
            board_size,
            status: GameStatus::InProgress,
            winner: None,
            current_player: Player::X,
            created_at: at,
            updated_at: at,
        };
        state.games.insert(game.id, game.clone());
        info!(game_id = game.id, board_size = %board_size, "Game created");
        Ok(game)
    }

    #[instrument(skip(self))]
    fn find_game(&self, id: GameId) -> Result<Option<Game>, ServiceError> {
        Ok(self.lock()?.games.get(&id).cloned())
    }

    #[instrument(skip(self))]
    fn list_games(&self, filters: &GameFilters) -> Result<Vec<GameListItem>, ServiceError> {
        let state = self.lock()?;
        let mut games: Vec<&Game> = state
            .games
            .values()
            .filter(|game| filters.status.is_none_or(|status| game.status == status))
            .collect();
        games.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let items: Vec<GameListItem> = games
            .into_iter()
            .take(MAX_LISTED_GAMES as usize)
            .map(|game| GameListItem {
                game: game.clone(),
                move_count: state.moves.get(&game.id).map_or(0, |m| m.len() as i64),
            })
            .collect();
        debug!(count = items.len(), "Games listed");
        Ok(items)
    }

    #[instrument(skip(self))]
    fn moves(&self, id: GameId) -> Result<Vec<GameMove>, ServiceError> {
        Ok(self.lock()?.moves.get(&id).cloned().unwrap_or_default())
    }

    #[instrument(skip(self))]
    fn update_game(&self, id: GameId, update: &GameUpdate) -> Result<Option<Game>, ServiceError> {
        let mut state = self.lock()?;
        let Some(game) = state.games.get_mut(&id) else {
            return Ok(None);
        };
        game.apply_update(update, now());
        info!(game_id = id, status = %game.status, "Game updated");
        Ok(Some(game.clone()))
    }

    #[instrument(skip(self))]
    fn delete_game(&self, id: GameId) -> Result<bool, ServiceError> {
        let mut state = self.lock()?;
        state.moves.remove(&id);
        let removed = state.games.remove(&id).is_some();
        info!(game_id = id, removed, "Game deleted");
        Ok(removed)
    }

    #[instrument(skip(self), fields(player = %proposed.player, position = proposed.position))]
    fn append_move(&self, id: GameId, proposed: Move) -> Result<MoveResult, ServiceError> {
        let mut state = self.lock()?;
        let snapshot = state
            .games
            .get(&id)
            .map(Game::snapshot)
            .ok_or(ServiceError::NotFound(id))?;
        let log = move_log(state.moves.get(&id).map(Vec::as_slice).unwrap_or_default())?;

        let transition = apply_move(&snapshot, &log, proposed)?;
        let (move_number, position) = stored_columns(&transition.recorded)?;
        let at = now();

        state.last_move_id += 1;
        let game_move = GameMove {
            id: state.last_move_id,
            game_id: id,
            move_number,
            position,
            player: transition.recorded.player,
            created_at: at,
        };
        state.moves.entry(id).or_default().push(game_move.clone());

        let game = state
            .games
            .get_mut(&id)
            .ok_or(ServiceError::NotFound(id))?;
        game.apply_snapshot(&transition.snapshot, at);

        info!(
            game_id = id,
            move_number,
            outcome = %transition.outcome,
            "Move accepted"
        );
        Ok(MoveResult {
            game_move,
            game: game.clone(),
        })
    }
}
