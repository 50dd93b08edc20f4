//! Player records.

use serde::{Deserialize, Serialize};

/// Stable 0-based player identifier, assigned at character selection.
pub type PlayerId = u8;

/// Number of selectable character sprites.
pub const CHARACTER_COUNT: u8 = 4;

/// Minimum number of players in a match.
pub const MIN_PLAYERS: usize = 2;

/// Maximum number of players in a match.
pub const MAX_PLAYERS: usize = 4;

/// State for a single player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Unique identifier; also the player's seat in turn order.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Sprite index in `0..CHARACTER_COUNT`.
    pub character: u8,
    /// Whether the player's next turn is forwarded without a roll.
    pub skip_next_turn: bool,
}

impl Player {
    /// Create a new player with the default name for `id`.
    #[must_use]
    pub fn new(id: PlayerId, character: u8) -> Self {
        Self {
            id,
            name: default_name(id),
            character,
            skip_next_turn: false,
        }
    }

    /// Copy of this player with the skip flag set.
    #[must_use]
    pub fn with_skip(&self, skip_next_turn: bool) -> Self {
        Self {
            skip_next_turn,
            ..self.clone()
        }
    }
}

/// Default display name for a seat ("Player 1" for id 0).
#[must_use]
pub fn default_name(id: PlayerId) -> String {
    format!("Player {}", u16::from(id) + 1)
}
