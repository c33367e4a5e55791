use serde::{Deserialize, Serialize};

use crate::cards::{CardId, Rank};
use crate::errors::EngineError;
use crate::game::Game;
use crate::log::Signal;
use crate::player::PlayerFlag;

/// Everything a player can send against a running game. A closed set:
/// an unrecognized event type is a deserialization failure at the edge,
/// never a runtime case inside the engine.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// Keep-alive; refreshes last contact and nothing else
    Nothing,
    /// Accepted for compatibility; joining happens through the store
    Join,
    ShuffleDeck,
    Deal,
    TurnCard { card: CardId },
}

/// Why an event was narrated away instead of applied. The log entry is
/// the player-facing message; this is the machine-readable side of it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    /// Someone still holds an unturned card
    RoundNotFinished,
    /// Only the current dealer may deal
    NotDealer,
    /// Fewer cards left than players at the table
    DeckExhausted,
    /// The actor holds no card to turn
    CardGone,
    /// The named card is not the actor's own
    NotOwnCard,
}

/// Result of applying one event. Rejected events have already appended
/// their narration to the game log; callers see `accepted == false` plus
/// the reason rather than an error, because bad timing is part of the
/// game, not a failure.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct EventOutcome {
    pub accepted: bool,
    pub rejection: Option<Rejection>,
}

impl EventOutcome {
    pub fn accepted() -> Self {
        Self {
            accepted: true,
            rejection: None,
        }
    }

    pub fn rejected(rejection: Rejection) -> Self {
        Self {
            accepted: false,
            rejection: Some(rejection),
        }
    }
}

/// Validates and applies a single event against the game.
///
/// The acting player must exist in the game; an unknown id is a protocol
/// error ([`EngineError::UnknownPlayer`]), not a narrated rejection.
/// Everything else an event can do wrong no-ops with a log entry and a
/// rejected outcome. Callers hold exclusive access to the `Game` for the
/// whole call, so one event is one atomic mutation.
pub fn apply_event(
    game: &mut Game,
    player_id: &str,
    event: GameEvent,
) -> Result<EventOutcome, EngineError> {
    let actor = game
        .player_mut(player_id)
        .ok_or_else(|| EngineError::UnknownPlayer(player_id.to_string()))?;
    actor.touch();
    let actor_id = actor.id().to_string();
    let actor_name = actor.name().to_string();

    match event {
        GameEvent::Nothing | GameEvent::Join => Ok(EventOutcome::accepted()),
        GameEvent::ShuffleDeck => {
            for player in game.players_mut() {
                player.retire_current_card();
            }
            game.deck_mut().shuffle();
            game.log_mut().push(
                &actor_name,
                format!("{actor_name} shuffled the deck"),
                Signal::None,
            );
            Ok(EventOutcome::accepted())
        }
        GameEvent::Deal => Ok(handle_deal(game, &actor_id, &actor_name)),
        GameEvent::TurnCard { card } => Ok(handle_turn(game, &actor_id, &actor_name, card)),
    }
}

fn handle_deal(game: &mut Game, actor_id: &str, actor_name: &str) -> EventOutcome {
    let round_open = game
        .players()
        .iter()
        .any(|p| p.current_card().is_some_and(|c| !c.turned));
    if round_open {
        game.log_mut().push(
            actor_name,
            format!("{actor_name} tried dealing, but the round is not finished yet"),
            Signal::None,
        );
        return EventOutcome::rejected(Rejection::RoundNotFinished);
    }

    if game.dealer() != Some(actor_id) {
        game.log_mut().push(
            actor_name,
            format!("{actor_name} tried dealing, but is not the current dealer"),
            Signal::None,
        );
        return EventOutcome::rejected(Rejection::NotDealer);
    }

    if game.deck().len() < game.players().len() {
        game.log_mut().push(
            actor_name,
            format!("{actor_name} tried dealing, but the deck is running out of cards"),
            Signal::None,
        );
        return EventOutcome::rejected(Rejection::DeckExhausted);
    }

    game.deal_to_all();
    game.log_mut()
        .push(actor_name, format!("{actor_name} dealt cards"), Signal::None);
    EventOutcome::accepted()
}

fn handle_turn(game: &mut Game, actor_id: &str, actor_name: &str, target: CardId) -> EventOutcome {
    let own_card = game
        .player(actor_id)
        .and_then(|p| p.current_card())
        .map(|c| (c.id, c.turned));

    let Some((own_id, already_turned)) = own_card else {
        game.log_mut().push(
            actor_name,
            format!("{actor_name} tried turning his card, but it is no longer there"),
            Signal::None,
        );
        return EventOutcome::rejected(Rejection::CardGone);
    };

    if own_id != target {
        // A player may only reveal their own card; name the owner if any.
        let owner = game
            .players()
            .iter()
            .find(|p| p.current_card().is_some_and(|c| c.id == target))
            .map(|p| p.name().to_string());
        if let Some(owner) = owner {
            game.log_mut().push(
                actor_name,
                format!("{actor_name} tried turning the card belonging to {owner}"),
                Signal::None,
            );
        }
        return EventOutcome::rejected(Rejection::NotOwnCard);
    }

    // Idempotent reveal: a second turn of the same card must not narrate
    // again or re-run the resolution.
    if already_turned {
        return EventOutcome::accepted();
    }

    if let Some(card) = game.player_mut(actor_id).and_then(|p| p.current_card_mut()) {
        card.turned = true;
    }
    game.log_mut().push(
        actor_name,
        format!("{actor_name} turned his card"),
        Signal::None,
    );

    let round_complete = !game.players().is_empty()
        && game
            .players()
            .iter()
            .all(|p| p.current_card().is_some_and(|c| c.turned));
    if round_complete {
        resolve_round(game);
    }

    EventOutcome::accepted()
}

/// Runs once, when the last card of the round is turned. The four rules
/// fire in a fixed order and independently of each other; one player can
/// collect several flags from a single resolution. Current cards stay in
/// front of the players until the next deal or shuffle.
fn resolve_round(game: &mut Game) {
    let hands: Vec<Option<Rank>> = game
        .players()
        .iter()
        .map(|p| p.current_card().map(|c| c.rank))
        .collect();
    let names: Vec<String> = game
        .players()
        .iter()
        .map(|p| p.name().to_string())
        .collect();

    // Lowest card: all holders of the minimum rank lose together.
    let Some(lowest) = hands.iter().flatten().copied().min() else {
        return;
    };
    for i in 0..hands.len() {
        if hands[i] == Some(lowest) {
            game.players_mut()[i].add_flag(PlayerFlag::Drink);
            let name = &names[i];
            game.log_mut().push(
                name.clone(),
                format!("Lowest card is {lowest}. Loser this round is {name}. DRINK!"),
                Signal::Drink,
            );
        }
    }

    // Kings owe the king's drink.
    for i in 0..hands.len() {
        if hands[i] == Some(Rank::King) {
            game.players_mut()[i].add_flag(PlayerFlag::King);
            let name = &names[i];
            game.log_mut().push(
                name.clone(),
                format!("{name} got a king! ***DRINK!***"),
                Signal::DrinkKing,
            );
        }
    }

    // Queens: every other picture-card holder drinks.
    for i in 0..hands.len() {
        if hands[i] != Some(Rank::Queen) {
            continue;
        }
        let hit: Vec<usize> = (0..hands.len())
            .filter(|&j| j != i && hands[j].is_some_and(|r| r.is_picture()))
            .collect();
        if hit.is_empty() {
            continue;
        }
        for &j in &hit {
            game.players_mut()[j].add_flag(PlayerFlag::Drink);
        }
        let listed = hit
            .iter()
            .map(|&j| names[j].as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let name = &names[i];
        game.log_mut().push(
            name.clone(),
            format!("{name} got a queen! {listed} must DRINK!"),
            Signal::None,
        );
    }

    // Jacks: everyone else drinks, no card required.
    for i in 0..hands.len() {
        if hands[i] != Some(Rank::Jack) {
            continue;
        }
        let others: Vec<usize> = (0..hands.len()).filter(|&j| j != i).collect();
        for &j in &others {
            game.players_mut()[j].add_flag(PlayerFlag::Drink);
        }
        let listed = others
            .iter()
            .map(|&j| names[j].as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let name = &names[i];
        game.log_mut().push(
            name.clone(),
            format!("{name} got a jack! {listed} must DRINK!"),
            Signal::DrinkJack,
        );
    }
}
