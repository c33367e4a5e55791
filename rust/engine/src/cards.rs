use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents the rank of a card from Ace through King.
/// The round loser is whoever holds the lowest rank, so the numeric
/// ordering (Ace = 1 .. King = 13) is the comparison order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Rank {
    /// Rank 1
    Ace = 1,
    /// Rank 2
    Two,
    /// Rank 3
    Three,
    /// Rank 4
    Four,
    /// Rank 5
    Five,
    /// Rank 6
    Six,
    /// Rank 7
    Seven,
    /// Rank 8
    Eight,
    /// Rank 9
    Nine,
    /// Rank 10
    Ten,
    /// Jack (11)
    Jack,
    /// Queen (12)
    Queen,
    /// King (13)
    King,
}

impl Rank {
    /// Jack, Queen and King are picture cards; the queen rule targets them.
    pub fn is_picture(self) -> bool {
        matches!(self, Rank::Jack | Rank::Queen | Rank::King)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rank::Ace => "Ace",
            Rank::Two => "Two",
            Rank::Three => "Three",
            Rank::Four => "Four",
            Rank::Five => "Five",
            Rank::Six => "Six",
            Rank::Seven => "Seven",
            Rank::Eight => "Eight",
            Rank::Nine => "Nine",
            Rank::Ten => "Ten",
            Rank::Jack => "Jack",
            Rank::Queen => "Queen",
            Rank::King => "King",
        };
        write!(f, "{name}")
    }
}

/// Stable identity of a card, assigned when the deck is built.
/// Turn events name the card they want revealed by this id.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct CardId(pub u8);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single card in play. Identity and rank never change after creation;
/// only the face-up flag is mutable.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Stable identifier, unique within one deck
    pub id: CardId,
    /// Rank used by the resolution rules
    pub rank: Rank,
    /// Whether the card has been revealed this round
    pub turned: bool,
}

impl Card {
    pub fn new(id: CardId, rank: Rank) -> Self {
        Self {
            id,
            rank,
            turned: false,
        }
    }
}

pub fn all_ranks() -> [Rank; 13] {
    [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ]
}

/// One card per rank; the game does not model suits.
pub fn full_deck() -> Vec<Card> {
    all_ranks()
        .iter()
        .enumerate()
        .map(|(i, &rank)| Card::new(CardId(i as u8), rank))
        .collect()
}
