use std::ops::{BitOr, Index};

use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod generator;
mod types;

/// Board dimensions and mine count for a game.
///
/// Fields are public for construction in consumers; [`GameConfig::new`] and
/// the engine validate before use.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Size,
    pub mines: usize,
}

impl GameConfig {
    /// Validated constructor: both dimensions must be at least 1 and the
    /// mine count strictly between 0 and the cell total.
    pub fn new(size: Size, mines: usize) -> Result<Self> {
        let config = Self { size, mines };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let (width, height) = self.size;
        if width == 0 || height == 0 {
            return Err(GameError::InvalidConfig);
        }
        if self.mines == 0 || self.mines >= width * height {
            return Err(GameError::InvalidConfig);
        }
        Ok(())
    }

    pub const fn total_cells(&self) -> usize {
        self.size.0 * self.size.1
    }

    pub const fn beginner() -> Self {
        Self { size: (9, 9), mines: 10 }
    }

    pub const fn intermediate() -> Self {
        Self { size: (16, 16), mines: 40 }
    }

    pub const fn expert() -> Self {
        Self { size: (30, 16), mines: 99 }
    }
}

/// Immutable mine layout. Built once per game, either by a
/// [`MinefieldGenerator`] on the first reveal or from explicit coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Minefield {
    mines: Array2<bool>,
    count: usize,
}

impl Minefield {
    pub fn from_mask(mines: Array2<bool>) -> Self {
        let count = mines.iter().filter(|&&mine| mine).count();
        Self { mines, count }
    }

    pub fn from_mine_coords(size: Size, mine_coords: &[Coords]) -> Result<Self> {
        let mut mines: Array2<bool> = Array2::default(size);
        for &pos in mine_coords {
            if pos.0 >= size.0 || pos.1 >= size.1 {
                return Err(GameError::OutOfBounds);
            }
            mines[pos] = true;
        }
        Ok(Self::from_mask(mines))
    }

    pub fn config(&self) -> GameConfig {
        GameConfig {
            size: self.size(),
            mines: self.count,
        }
    }

    pub fn size(&self) -> Size {
        self.mines.dim()
    }

    pub fn mine_count(&self) -> usize {
        self.count
    }

    pub fn total_cells(&self) -> usize {
        self.mines.len()
    }

    /// Number of mine-free cells, the reveal target for a win.
    pub fn safe_count(&self) -> usize {
        self.total_cells() - self.count
    }

    /// Count of mine-bearing neighbors, 0-8.
    pub fn adjacent_mines(&self, coords: Coords) -> u8 {
        self.mines
            .iter_neighbors(coords)
            .filter(|&pos| self[pos])
            .count() as u8
    }
}

impl Index<Coords> for Minefield {
    type Output = bool;

    fn index(&self, index: Coords) -> &Self::Output {
        &self.mines[index]
    }
}

/// Outcome of a flag toggle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    NoChange,
    Toggled,
}

impl FlagOutcome {
    /// Whether this outcome could have caused an update to the game.
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Toggled)
    }
}

/// Outcome of revealing one or more cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OpenOutcome {
    NoChange,
    Safe,
    Win,
    Explode,
}

impl OpenOutcome {
    /// Whether this outcome could have caused an update to the game.
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    const fn severity(self) -> u8 {
        match self {
            Self::NoChange => 0,
            Self::Safe => 1,
            Self::Win => 2,
            Self::Explode => 3,
        }
    }
}

/// Merges outcomes when a chord reveal opens several cells: an explosion
/// dominates a win, which dominates a plain safe reveal.
impl BitOr for OpenOutcome {
    type Output = OpenOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        if self.severity() >= rhs.severity() {
            self
        } else {
            rhs
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_rejects_zero_dimensions() {
        assert_eq!(GameConfig::new((0, 5), 1), Err(GameError::InvalidConfig));
        assert_eq!(GameConfig::new((5, 0), 1), Err(GameError::InvalidConfig));
    }

    #[test]
    fn config_rejects_mine_count_outside_open_interval() {
        assert_eq!(GameConfig::new((3, 3), 0), Err(GameError::InvalidConfig));
        assert_eq!(GameConfig::new((3, 3), 9), Err(GameError::InvalidConfig));
        assert!(GameConfig::new((3, 3), 8).is_ok());
        assert!(GameConfig::new((1, 2), 1).is_ok());
    }

    #[test]
    fn presets_are_valid() {
        for preset in [
            GameConfig::beginner(),
            GameConfig::intermediate(),
            GameConfig::expert(),
        ] {
            assert!(preset.validate().is_ok());
        }
    }

    #[test]
    fn minefield_from_coords_counts_and_checks_bounds() {
        let field = Minefield::from_mine_coords((3, 3), &[(0, 0), (2, 1)]).unwrap();
        assert_eq!(field.mine_count(), 2);
        assert_eq!(field.safe_count(), 7);
        assert!(field[(0, 0)]);
        assert!(!field[(1, 1)]);

        assert_eq!(
            Minefield::from_mine_coords((3, 3), &[(3, 0)]),
            Err(GameError::OutOfBounds)
        );
    }

    #[test]
    fn adjacent_mines_counts_eight_directions() {
        let field = Minefield::from_mine_coords((3, 3), &[(0, 0), (2, 2), (1, 0)]).unwrap();
        assert_eq!(field.adjacent_mines((1, 1)), 3);
        assert_eq!(field.adjacent_mines((0, 2)), 1);
        assert_eq!(field.adjacent_mines((2, 0)), 1);
    }

    #[test]
    fn open_outcome_merge_keeps_most_severe() {
        use OpenOutcome::*;
        assert_eq!(Explode | Win, Explode);
        assert_eq!(Safe | Win, Win);
        assert_eq!(NoChange | Safe, Safe);
        assert_eq!(NoChange | NoChange, NoChange);
    }
}
