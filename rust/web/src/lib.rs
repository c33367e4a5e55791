//! HTTP surface and game store for the kongelek drinking card game.
//!
//! The engine crate owns the rules; this crate owns everything around
//! them: the in-memory [`store::GameStore`] with one exclusive critical
//! section per game, the player-scoped [`view::GameView`] projection,
//! warp routes, and the logging bootstrap.

pub mod errors;
pub mod handlers;
pub mod logging;
pub mod server;
pub mod store;
pub mod view;

pub use errors::{ErrorResponse, ErrorSeverity, IntoErrorResponse};
pub use logging::{init_logging, init_test_logging, LogEntry, TestLogSubscriber};
pub use server::{AppContext, ServerConfig, ServerError, ServerHandle, WebServer};
pub use store::{AddPlayerResult, EventResult, GameStore, StartGameResult, StoreError};
pub use view::{CardView, GameView, PlayerView};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_provides_a_shared_store() {
        let ctx = AppContext::new_for_tests();
        assert!(ctx.store().active_games().is_empty());
        assert_eq!(ctx.config().port(), 0);
    }
}
