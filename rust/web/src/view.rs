use serde::{Deserialize, Serialize};

use kongelek_engine::cards::{CardId, Rank};
use kongelek_engine::game::{Game, GameId};
use kongelek_engine::log::GameAction;
use kongelek_engine::player::{PlayerFlag, PlayerId};

/// A card as one particular player is allowed to see it. The id is always
/// visible (it is what turn events name); the rank of another player's
/// unturned card is not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub id: CardId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<Rank>,
    pub turned: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_card: Option<CardView>,
    pub flags: Vec<PlayerFlag>,
    pub is_dealer: bool,
}

/// Player-scoped snapshot of a game. Names, flags, the dealer and the
/// full narrated log are public; only card ranks are filtered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    pub id: GameId,
    pub players: Vec<PlayerView>,
    pub deck_size: usize,
    pub actions: Vec<GameAction>,
}

impl GameView {
    /// Projects a fully mutated, consistent game into what `perspective`
    /// may see. Callers hold the game's lock for the duration.
    pub fn project(game: &Game, perspective: &str) -> Self {
        let players = game
            .players()
            .iter()
            .map(|p| {
                let current_card = p.current_card().map(|c| {
                    let visible = c.turned || p.id() == perspective;
                    CardView {
                        id: c.id,
                        rank: visible.then_some(c.rank),
                        turned: c.turned,
                    }
                });
                PlayerView {
                    id: p.id().to_string(),
                    name: p.name().to_string(),
                    current_card,
                    flags: p.flags().to_vec(),
                    is_dealer: game.dealer() == Some(p.id()),
                }
            })
            .collect();

        Self {
            id: game.id().to_string(),
            players,
            deck_size: game.deck().len(),
            actions: game.log().entries().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kongelek_engine::cards::Card;
    use kongelek_engine::engine::{apply_event, GameEvent};

    fn game_with_hands() -> Game {
        let mut game = Game::new("g1", Some(17));
        game.add_player("p1", "Kari");
        game.add_player("p2", "Ola");
        game.set_dealer("p1");
        game.player_mut("p1")
            .expect("p1")
            .give_card(Card::new(CardId(3), Rank::Four));
        game.player_mut("p2")
            .expect("p2")
            .give_card(Card::new(CardId(9), Rank::Ten));
        game
    }

    #[test]
    fn own_unturned_card_is_visible_others_are_hidden() {
        let game = game_with_hands();
        let view = GameView::project(&game, "p1");

        let own = view.players[0].current_card.as_ref().expect("card");
        assert_eq!(own.rank, Some(Rank::Four));
        assert!(!own.turned);

        let other = view.players[1].current_card.as_ref().expect("card");
        assert_eq!(other.rank, None, "unturned foreign rank is hidden");
        assert_eq!(other.id, CardId(9), "identity stays addressable");
    }

    #[test]
    fn turned_cards_are_visible_to_everyone() {
        let mut game = game_with_hands();
        apply_event(&mut game, "p2", GameEvent::TurnCard { card: CardId(9) })
            .expect("known player");

        let view = GameView::project(&game, "p1");
        let other = view.players[1].current_card.as_ref().expect("card");
        assert_eq!(other.rank, Some(Rank::Ten));
        assert!(other.turned);
    }

    #[test]
    fn dealer_log_and_deck_size_are_public() {
        let game = game_with_hands();
        let view = GameView::project(&game, "p2");

        assert!(view.players[0].is_dealer);
        assert!(!view.players[1].is_dealer);
        assert_eq!(view.deck_size, 13);
        assert_eq!(view.actions.len(), 2, "both join entries are visible");
    }
}
