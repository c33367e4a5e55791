//! # kongelek-engine: Drinking card game round engine
//!
//! In-memory rules core for a turn-based multiplayer drinking card game:
//! every player is dealt one hidden card, reveals it when ready, and the
//! round resolves with fixed card-value rules that hand out drinking
//! obligations. All validation feedback for bad timing or wrong actors is
//! narrated into the game's action log instead of raised as errors; only
//! protocol mistakes (an unknown player id) error out.
//!
//! ## Core Modules
//!
//! - [`cards`] - Rank, card identity and the 13-card suitless deck set
//! - [`deck`] - Deterministic shuffling and front-of-pile draws
//! - [`player`] - Per-player hand, history, flags and last contact
//! - [`log`] - Append-only narrated action log with client signals
//! - [`game`] - The game session aggregate (players, deck, dealer, log)
//! - [`engine`] - Event dispatch, deal/turn validation, round resolution
//! - [`errors`] - Protocol-tier error types
//!
//! ## Quick Start
//!
//! ```rust
//! use kongelek_engine::engine::{apply_event, GameEvent};
//! use kongelek_engine::game::Game;
//!
//! let mut game = Game::new("demo", Some(42));
//! game.add_player("p1", "Kari");
//! game.add_player("p2", "Ola");
//! game.set_dealer("p1");
//!
//! let outcome = apply_event(&mut game, "p1", GameEvent::Deal).expect("known player");
//! assert!(outcome.accepted);
//! assert!(game.players().iter().all(|p| p.current_card().is_some()));
//! ```

pub mod cards;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod game;
pub mod log;
pub mod player;
