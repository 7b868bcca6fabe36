use serde::{Deserialize, Serialize};

/// Player-visible state of a single grid position.
///
/// `Exploded` and `Mine` only appear after a loss: the first marks the mine
/// that ended the game, the second every other mine turned face-up for
/// display.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Hidden,
    /// Revealed safe cell carrying its adjacent-mine count (0-8).
    Revealed(u8),
    Flagged,
    Exploded,
    Mine,
}

impl Cell {
    /// Whether the cell still hides its content from the player.
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }

    pub const fn is_flag(self) -> bool {
        matches!(self, Self::Flagged)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::Hidden
    }
}
