use crate::*;
pub use random::*;

mod random;

/// Strategy for laying out mines for a given configuration.
pub trait MinefieldGenerator {
    fn generate(self, config: GameConfig) -> Minefield;
}

/// How much protection the starting cell gets during placement.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FirstReveal {
    /// No exclusion, the starting cell may hold a mine.
    Anywhere,
    /// The starting cell is never a mine.
    Safe,
    /// The starting cell and its neighbors are mine-free, so the first
    /// reveal always opens a zero region.
    SafeZone,
}
