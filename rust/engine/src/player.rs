use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cards::Card;

/// Opaque player identifier, generated when the player joins a game.
pub type PlayerId = String;

/// Drinking obligation produced by round resolution. A player can carry
/// several flags after one round (lowest card and a king, for instance);
/// flags reset when the next round is dealt.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerFlag {
    /// Must drink from the personal drink
    Drink,
    /// Got a king, owes the "king's drink"
    King,
}

/// Per-player state for the current game: the hidden card in play, the
/// cards already played, and the obligations from the last resolution.
#[derive(Debug, Clone)]
pub struct Player {
    id: PlayerId,
    name: String,
    current_card: Option<Card>,
    previous_cards: Vec<Card>,
    flags: Vec<PlayerFlag>,
    last_contact: DateTime<Utc>,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            current_card: None,
            previous_cards: Vec::new(),
            flags: Vec::new(),
            last_contact: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.current_card.as_ref()
    }

    pub fn current_card_mut(&mut self) -> Option<&mut Card> {
        self.current_card.as_mut()
    }

    /// History of cards this player has held in earlier rounds, oldest first.
    pub fn previous_cards(&self) -> &[Card] {
        &self.previous_cards
    }

    /// Hands the player a new card. A card still in front of the player
    /// moves to the history first.
    pub fn give_card(&mut self, card: Card) {
        self.retire_current_card();
        self.current_card = Some(card);
    }

    /// Moves the current card, if any, into the played history.
    pub fn retire_current_card(&mut self) {
        if let Some(card) = self.current_card.take() {
            self.previous_cards.push(card);
        }
    }

    pub fn flags(&self) -> &[PlayerFlag] {
        &self.flags
    }

    pub fn has_flag(&self, flag: PlayerFlag) -> bool {
        self.flags.contains(&flag)
    }

    /// Adds a flag unless already present; flags are a set, not a tally.
    pub fn add_flag(&mut self, flag: PlayerFlag) {
        if !self.flags.contains(&flag) {
            self.flags.push(flag);
        }
    }

    pub fn clear_flags(&mut self) {
        self.flags.clear();
    }

    pub fn last_contact(&self) -> DateTime<Utc> {
        self.last_contact
    }

    /// Refreshes the last-contact timestamp; called for every event the
    /// player sends.
    pub fn touch(&mut self) {
        self.last_contact = Utc::now();
    }
}
