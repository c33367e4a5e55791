use crate::errors::IntoErrorResponse;
use crate::store::{GameStore, StoreError};
use kongelek_engine::engine::GameEvent;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::http::StatusCode;
use warp::reply::{self, Response};
use warp::Reply;

#[derive(Debug, Deserialize)]
pub struct StartGameRequest {
    pub player_name: String,
    /// Fixed deck seed for reproducible games; omitted in normal play
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct JoinGameRequest {
    pub player_name: String,
}

#[derive(Debug, Deserialize)]
pub struct GameEventRequest {
    pub player_id: String,
    pub event: GameEvent,
}

#[derive(Debug, Deserialize)]
pub struct ViewQuery {
    pub player_id: String,
}

/// POST `/api/games` — starts a new game; the initiator becomes the
/// first player and the dealer. Responds 201 with the id of the new
/// player and their view of the game.
pub async fn start_game(store: Arc<GameStore>, request: StartGameRequest) -> Response {
    match store.start_game(&request.player_name, request.seed) {
        Ok(result) => success_response(StatusCode::CREATED, result),
        Err(err) => store_error(err),
    }
}

/// POST `/api/games/{game_id}/players` — joins an existing game.
/// Responds 201 with the fresh player id, or 404 for an unknown game.
pub async fn join_game(store: Arc<GameStore>, game_id: String, request: JoinGameRequest) -> Response {
    match store.add_player(&game_id, &request.player_name) {
        Ok(result) => success_response(StatusCode::CREATED, result),
        Err(err) => store_error(err),
    }
}

/// POST `/api/games/{game_id}/events` — applies one game event for the
/// named player. Responds 202 whether the event was applied or narrated
/// away; the body's `accepted`/`rejection` fields tell them apart.
/// Unknown games and players are typed errors (404/400).
pub async fn submit_event(
    store: Arc<GameStore>,
    game_id: String,
    request: GameEventRequest,
) -> Response {
    match store.handle_event(&game_id, &request.player_id, request.event) {
        Ok(result) => success_response(StatusCode::ACCEPTED, result),
        Err(err) => store_error(err),
    }
}

/// GET `/api/games/{game_id}?player_id=` — the game as one player sees
/// it; other players' unturned card ranks are withheld.
pub async fn get_game(store: Arc<GameStore>, game_id: String, query: ViewQuery) -> Response {
    match store.game_view(&game_id, &query.player_id) {
        Ok(view) => success_response(StatusCode::OK, view),
        Err(err) => store_error(err),
    }
}

fn success_response<T>(status: StatusCode, body: T) -> Response
where
    T: Serialize,
{
    reply::with_status(reply::json(&body), status).into_response()
}

fn store_error(err: StoreError) -> Response {
    err.into_http_response()
}
