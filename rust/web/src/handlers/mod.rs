pub mod game;

pub use game::{
    get_game, join_game, start_game, submit_event, GameEventRequest, JoinGameRequest,
    StartGameRequest, ViewQuery,
};
