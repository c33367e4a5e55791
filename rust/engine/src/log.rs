use serde::{Deserialize, Serialize};

/// Client-visible consequence of a logged action. The presentation layer
/// uses this to pick the effect to render; the message carries the story.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    /// Narration only, nothing to act on
    None,
    /// Lowest-card loser must drink
    Drink,
    /// King holder owes the king's drink
    DrinkKing,
    /// Everyone but the jack holder drinks
    DrinkJack,
}

/// One narrated event. Immutable once appended.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameAction {
    /// Name of the player the entry is about
    pub actor: String,
    /// Human-readable narration shown to every player
    pub message: String,
    pub signal: Signal,
}

/// Append-only, causally ordered record of everything that happened in a
/// game. This log doubles as the feedback channel for rejected actions:
/// bad timing or a wrong actor is narrated here instead of erroring.
#[derive(Debug, Default)]
pub struct ActionLog {
    entries: Vec<GameAction>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, actor: impl Into<String>, message: impl Into<String>, signal: Signal) {
        self.entries.push(GameAction {
            actor: actor.into(),
            message: message.into(),
            signal,
        });
    }

    pub fn entries(&self) -> &[GameAction] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_keep_insertion_order() {
        let mut log = ActionLog::new();
        log.push("Kari", "Kari started the game", Signal::None);
        log.push("Kari", "Kari joined the game", Signal::None);
        log.push("Ola", "Ola joined the game", Signal::None);

        let messages: Vec<&str> = log.entries().iter().map(|a| a.message.as_str()).collect();
        assert_eq!(
            messages,
            [
                "Kari started the game",
                "Kari joined the game",
                "Ola joined the game"
            ]
        );
        assert_eq!(log.len(), 3);
    }
}
