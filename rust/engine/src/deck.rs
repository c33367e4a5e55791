use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, Card};

/// Ordered draw pile. Cards leave from the front in deal order, so the
/// permutation after a shuffle fully determines who gets which card.
#[derive(Debug)]
pub struct Deck {
    cards: Vec<Card>,
    rng: ChaCha20Rng,
}

impl Deck {
    /// Fresh full deck with an OS-seeded RNG.
    pub fn new() -> Self {
        Self {
            cards: full_deck(),
            rng: ChaCha20Rng::from_os_rng(),
        }
    }

    /// Fresh full deck with a fixed seed, for reproducible games and tests.
    pub fn new_with_seed(seed: u64) -> Self {
        // Keep build order until shuffle is called explicitly
        Self {
            cards: full_deck(),
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Uniformly permutes whatever cards remain. Size is unchanged;
    /// already-dealt cards do not return to the pile.
    pub fn shuffle(&mut self) {
        self.cards.shuffle(&mut self.rng);
    }

    /// Removes and returns the front card, or `None` when the pile is empty.
    /// Callers dealing to several players check [`Deck::len`] first.
    pub fn draw_front(&mut self) -> Option<Card> {
        if self.cards.is_empty() {
            None
        } else {
            Some(self.cards.remove(0))
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_front_empties_the_deck_in_order() {
        let mut deck = Deck::new_with_seed(7);
        let mut seen = Vec::new();
        while let Some(card) = deck.draw_front() {
            seen.push(card.id);
        }
        assert_eq!(seen.len(), 13);
        assert!(deck.is_empty());
        assert!(deck.draw_front().is_none());
    }

    #[test]
    fn shuffle_keeps_size_and_membership() {
        let mut deck = Deck::new_with_seed(42);
        deck.shuffle();
        assert_eq!(deck.len(), 13);
        let mut ids: Vec<u8> = (0..13)
            .map(|_| deck.draw_front().expect("card").id.0)
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, (0u8..13).collect::<Vec<_>>());
    }
}
