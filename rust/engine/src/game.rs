use crate::deck::Deck;
use crate::log::{ActionLog, Signal};
use crate::player::{Player, PlayerId};

/// Opaque game identifier, generated when the game is created.
pub type GameId = String;

/// One in-progress game: the draw pile, the players in join order, the
/// dealer pointer and the narrated action log. Everything an event
/// mutates lives here, so exclusive access to a `Game` is exclusive
/// access to the whole round state.
#[derive(Debug)]
pub struct Game {
    id: GameId,
    players: Vec<Player>,
    deck: Deck,
    dealer: Option<PlayerId>,
    log: ActionLog,
}

impl Game {
    /// New game with a freshly shuffled deck and no players yet.
    /// Pass a seed for a reproducible shuffle; `None` draws one from the OS.
    pub fn new(id: impl Into<GameId>, seed: Option<u64>) -> Self {
        let mut deck = match seed {
            Some(seed) => Deck::new_with_seed(seed),
            None => Deck::new(),
        };
        deck.shuffle();
        Self {
            id: id.into(),
            players: Vec::new(),
            deck,
            dealer: None,
            log: ActionLog::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Adds a player with an empty hand, history and flag set, and narrates
    /// the join. Join order is preserved; there is no player cap and no
    /// duplicate-name rejection.
    pub fn add_player(&mut self, id: impl Into<PlayerId>, name: &str) {
        self.players.push(Player::new(id, name));
        self.log
            .push(name, format!("{name} joined the game"), Signal::None);
    }

    /// Players in join order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id() == id)
    }

    pub fn player_mut(&mut self, id: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id() == id)
    }

    pub fn dealer(&self) -> Option<&str> {
        self.dealer.as_deref()
    }

    pub fn set_dealer(&mut self, id: impl Into<PlayerId>) {
        self.dealer = Some(id.into());
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn deck_mut(&mut self) -> &mut Deck {
        &mut self.deck
    }

    pub fn log(&self) -> &ActionLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut ActionLog {
        &mut self.log
    }

    /// Deals the front card of the deck to each player in join order,
    /// clearing that player's flags first. Callers verify the deck holds
    /// enough cards; players past the end of a short pile keep no card.
    pub(crate) fn deal_to_all(&mut self) {
        for player in &mut self.players {
            player.clear_flags();
            if let Some(card) = self.deck.draw_front() {
                player.give_card(card);
            }
        }
    }
}
