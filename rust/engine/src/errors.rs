use thiserror::Error;

/// Protocol-tier failures: these indicate a client or integration bug,
/// not a game-rule violation, and surface as errors instead of log
/// narration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("no player with id {0} in this game")]
    UnknownPlayer(String),
}
