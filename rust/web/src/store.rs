use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use kongelek_engine::engine::{apply_event, GameEvent, Rejection};
use kongelek_engine::errors::EngineError;
use kongelek_engine::game::{Game, GameId};
use kongelek_engine::log::Signal;
use kongelek_engine::player::PlayerId;

use crate::view::GameView;

/// In-memory game store. The outer `RwLock` only guards the map; each
/// game sits behind its own `Mutex`, and holding that mutex is the one
/// critical section per event: read, validate, mutate and log happen
/// under it, so two events against the same game can never interleave.
/// Different games never contend.
#[derive(Debug, Default)]
pub struct GameStore {
    games: RwLock<HashMap<GameId, Arc<Mutex<Game>>>>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("game not found: {0}")]
    GameNotFound(GameId),
    #[error("game storage poisoned")]
    StorePoisoned,
    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[derive(Debug, Clone, Serialize)]
pub struct StartGameResult {
    pub new_player_id: PlayerId,
    pub game: GameView,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddPlayerResult {
    pub new_player_id: PlayerId,
    pub game: GameView,
}

/// Outcome of one applied event, scoped to the acting player. A rejected
/// event is not an error: the narration has been appended to the game
/// log and `accepted` is false.
#[derive(Debug, Clone, Serialize)]
pub struct EventResult {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<Rejection>,
    pub game: GameView,
}

impl GameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a game with a fresh shuffled deck; the initiator joins as
    /// the first player and becomes dealer. Pass a seed for a
    /// reproducible deck order.
    pub fn start_game(
        &self,
        player_name: &str,
        seed: Option<u64>,
    ) -> Result<StartGameResult, StoreError> {
        let game_id: GameId = Uuid::new_v4().to_string();
        let player_id: PlayerId = Uuid::new_v4().to_string();

        let mut game = Game::new(game_id.clone(), seed);
        game.log_mut().push(
            player_name,
            format!("{player_name} started the game"),
            Signal::None,
        );
        game.add_player(player_id.clone(), player_name);
        game.set_dealer(player_id.clone());

        tracing::info!(game_id = %game_id, player = player_name, "started new game");

        let view = GameView::project(&game, &player_id);
        let mut guard = self.games.write().map_err(|_| StoreError::StorePoisoned)?;
        guard.insert(game_id, Arc::new(Mutex::new(game)));

        Ok(StartGameResult {
            new_player_id: player_id,
            game: view,
        })
    }

    /// Adds a player to an existing game. The join runs under the game's
    /// mutex, so a concurrent deal either sees the new player or runs
    /// entirely before them, never halfway.
    pub fn add_player(
        &self,
        game_id: &str,
        player_name: &str,
    ) -> Result<AddPlayerResult, StoreError> {
        let game = self.get(game_id)?;
        let mut game = game.lock().map_err(|_| StoreError::StorePoisoned)?;

        let player_id: PlayerId = Uuid::new_v4().to_string();
        game.add_player(player_id.clone(), player_name);
        tracing::debug!(game_id = %game_id, player = player_name, "player joined");

        let view = GameView::project(&game, &player_id);
        Ok(AddPlayerResult {
            new_player_id: player_id,
            game: view,
        })
    }

    /// Applies one event under the game's critical section and returns
    /// the acting player's view of the result.
    pub fn handle_event(
        &self,
        game_id: &str,
        player_id: &str,
        event: GameEvent,
    ) -> Result<EventResult, StoreError> {
        let game = self.get(game_id)?;
        let mut game = game.lock().map_err(|_| StoreError::StorePoisoned)?;

        let outcome = apply_event(&mut game, player_id, event)?;
        if !outcome.accepted {
            tracing::debug!(
                game_id = %game_id,
                player_id = %player_id,
                rejection = ?outcome.rejection,
                "event narrated away"
            );
        }

        Ok(EventResult {
            accepted: outcome.accepted,
            rejection: outcome.rejection,
            game: GameView::project(&game, player_id),
        })
    }

    /// Snapshot of a game as seen by one player.
    pub fn game_view(&self, game_id: &str, for_player: &str) -> Result<GameView, StoreError> {
        let game = self.get(game_id)?;
        let game = game.lock().map_err(|_| StoreError::StorePoisoned)?;
        Ok(GameView::project(&game, for_player))
    }

    pub fn active_games(&self) -> Vec<GameId> {
        match self.games.read() {
            Ok(guard) => guard.keys().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    fn get(&self, game_id: &str) -> Result<Arc<Mutex<Game>>, StoreError> {
        let guard = self.games.read().map_err(|_| StoreError::StorePoisoned)?;
        guard
            .get(game_id)
            .cloned()
            .ok_or_else(|| StoreError::GameNotFound(game_id.to_string()))
    }
}

impl crate::errors::IntoErrorResponse for StoreError {
    fn status_code(&self) -> warp::http::StatusCode {
        use warp::http::StatusCode;
        match self {
            StoreError::GameNotFound(_) => StatusCode::NOT_FOUND,
            StoreError::Engine(EngineError::UnknownPlayer(_)) => StatusCode::BAD_REQUEST,
            StoreError::StorePoisoned => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            StoreError::GameNotFound(_) => "game_not_found",
            StoreError::Engine(EngineError::UnknownPlayer(_)) => "unknown_player",
            StoreError::StorePoisoned => "game_storage_error",
        }
    }

    fn error_message(&self) -> String {
        self.to_string()
    }

    fn error_details(&self) -> Option<serde_json::Value> {
        match self {
            StoreError::GameNotFound(id) => Some(serde_json::json!({ "game_id": id })),
            StoreError::Engine(EngineError::UnknownPlayer(id)) => {
                Some(serde_json::json!({ "player_id": id }))
            }
            _ => None,
        }
    }

    fn severity(&self) -> crate::errors::ErrorSeverity {
        use crate::errors::ErrorSeverity;
        match self {
            StoreError::StorePoisoned => ErrorSeverity::Critical,
            _ => ErrorSeverity::Client,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn start_game_makes_the_initiator_dealer() {
        let store = GameStore::new();
        let started = store.start_game("Kari", Some(42)).expect("start game");

        assert_eq!(started.game.players.len(), 1);
        assert!(started.game.players[0].is_dealer);
        assert_eq!(started.game.players[0].id, started.new_player_id);
        assert_eq!(started.game.deck_size, 13);

        let messages: Vec<&str> = started
            .game
            .actions
            .iter()
            .map(|a| a.message.as_str())
            .collect();
        assert_eq!(messages, ["Kari started the game", "Kari joined the game"]);
    }

    #[test]
    fn add_player_appends_in_join_order() {
        let store = GameStore::new();
        let started = store.start_game("Kari", Some(42)).expect("start game");
        let joined = store
            .add_player(&started.game.id, "Ola")
            .expect("add player");

        assert_eq!(joined.game.players.len(), 2);
        assert_eq!(joined.game.players[1].name, "Ola");
        assert!(!joined.game.players[1].is_dealer);
    }

    #[test]
    fn unknown_game_is_reported_not_found() {
        let store = GameStore::new();
        match store.add_player("missing", "Ola") {
            Err(StoreError::GameNotFound(id)) => assert_eq!(id, "missing"),
            other => panic!("expected not found, got {:?}", other),
        }
    }

    #[test]
    fn unknown_player_is_a_typed_error_not_a_narration() {
        let store = GameStore::new();
        let started = store.start_game("Kari", Some(42)).expect("start game");

        match store.handle_event(&started.game.id, "ghost", GameEvent::Deal) {
            Err(StoreError::Engine(EngineError::UnknownPlayer(id))) => assert_eq!(id, "ghost"),
            other => panic!("expected unknown player, got {:?}", other),
        }

        let view = store
            .game_view(&started.game.id, &started.new_player_id)
            .expect("view");
        assert_eq!(view.actions.len(), 2, "nothing was narrated for the ghost");
    }

    #[test]
    fn rejected_events_carry_the_reason_and_the_narration() {
        let store = GameStore::new();
        let started = store.start_game("Kari", Some(42)).expect("start game");
        let joined = store
            .add_player(&started.game.id, "Ola")
            .expect("add player");

        let result = store
            .handle_event(&started.game.id, &joined.new_player_id, GameEvent::Deal)
            .expect("apply event");
        assert!(!result.accepted);
        assert_eq!(result.rejection, Some(Rejection::NotDealer));
        let last = result.game.actions.last().expect("log entry");
        assert_eq!(
            last.message,
            "Ola tried dealing, but is not the current dealer"
        );
    }

    #[test]
    fn concurrent_deals_against_one_game_deal_exactly_once() {
        let store = Arc::new(GameStore::new());
        let started = store.start_game("Kari", Some(42)).expect("start game");
        store
            .add_player(&started.game.id, "Ola")
            .expect("add player");

        let game_id = started.game.id.clone();
        let dealer_id = started.new_player_id.clone();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = Arc::clone(&store);
            let game_id = game_id.clone();
            let dealer_id = dealer_id.clone();
            handles.push(thread::spawn(move || {
                store
                    .handle_event(&game_id, &dealer_id, GameEvent::Deal)
                    .expect("apply event")
                    .accepted
            }));
        }

        let mut accepted_count = 0;
        for handle in handles {
            if handle.join().expect("join thread") {
                accepted_count += 1;
            }
        }

        assert_eq!(accepted_count, 1, "only the first deal may land");
        let view = store.game_view(&game_id, &dealer_id).expect("view");
        assert_eq!(view.deck_size, 11, "exactly one round was dealt");
    }

    #[test]
    fn concurrent_game_creation_is_safe() {
        let store = Arc::new(GameStore::new());
        let mut handles = Vec::new();
        for _ in 0..4 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                (0..16)
                    .map(|_| store.start_game("Kari", None).expect("start game").game.id)
                    .collect::<Vec<_>>()
            }));
        }

        let mut unique = std::collections::HashSet::new();
        for handle in handles {
            for id in handle.join().expect("join thread") {
                assert!(unique.insert(id));
            }
        }
        assert_eq!(store.active_games().len(), unique.len());
    }
}
