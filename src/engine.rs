use std::collections::VecDeque;
use std::ops::BitOr;

use chrono::prelude::*;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - NotStarted -> InProgress
/// - NotStarted -> Won
/// - NotStarted -> Lost
/// - InProgress -> Won
/// - InProgress -> Lost
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// Created but nothing revealed yet; mines are not placed.
    NotStarted,
    InProgress,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_initial(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    /// The game has ended and no moves are accepted anymore.
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::NotStarted
    }
}

/// A game from construction to win or loss.
///
/// The minefield stays empty until the first reveal, which places mines away
/// from the revealed cell so an opening click never loses. All operations
/// after the game ends are silent no-ops; only out-of-range coordinates are
/// reported as errors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    config: GameConfig,
    minefield: Option<Minefield>,
    grid: Array2<Cell>,
    revealed_count: usize,
    state: GameState,
    triggered_mine: Option<Coords>,
    seed: Option<u64>,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, None, None))
    }

    /// Like [`Game::new`] but the eventual mine placement is reproducible.
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, None, Some(seed)))
    }

    /// Play over a pre-placed minefield, skipping lazy placement.
    pub fn from_minefield(minefield: Minefield) -> Self {
        Self::build(minefield.config(), Some(minefield), None)
    }

    fn build(config: GameConfig, minefield: Option<Minefield>, seed: Option<u64>) -> Self {
        Self {
            config,
            minefield,
            grid: Array2::default(config.size),
            revealed_count: 0,
            state: Default::default(),
            triggered_mine: None,
            seed,
            started_at: None,
            ended_at: None,
        }
    }

    /// Fresh game with the same configuration. The mine layout is not
    /// reused; it is re-randomized on the next first reveal.
    pub fn reset(&self) -> Self {
        Self::build(self.config, None, None)
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_final()
    }

    pub fn size(&self) -> Size {
        self.config.size
    }

    pub fn total_mines(&self) -> usize {
        self.config.mines
    }

    pub fn cell_at(&self, coords: Coords) -> Cell {
        self.grid[coords]
    }

    /// The mine that ended a lost game, if any.
    pub fn triggered_mine(&self) -> Option<Coords> {
        self.triggered_mine
    }

    pub fn flags_placed(&self) -> usize {
        self.grid.iter().filter(|cell| cell.is_flag()).count()
    }

    /// Remaining-mine counter for display. Computed on read from the grid,
    /// and negative when the player has over-flagged.
    pub fn mines_left(&self) -> isize {
        self.config.mines as isize - self.flags_placed() as isize
    }

    /// Whole seconds since the first reveal, frozen once the game ends.
    pub fn elapsed_secs(&self) -> u32 {
        match self.started_at {
            Some(started) => {
                let end = self.ended_at.unwrap_or_else(Utc::now);
                (end - started).num_seconds().max(0) as u32
            }
            None => 0,
        }
    }

    /// Reveal a hidden cell.
    ///
    /// The first reveal of the game places the mines, keeping the target and
    /// its neighbors clear when the board has room for it (the target cell
    /// alone otherwise). Revealing a zero-count cell cascades through the
    /// connected zero region and its numbered boundary.
    pub fn reveal(&mut self, coords: Coords) -> Result<OpenOutcome> {
        let coords = self.validate_coords(coords)?;

        if self.is_finished() || !matches!(self.grid[coords], Cell::Hidden) {
            return Ok(OpenOutcome::NoChange);
        }

        self.ensure_minefield(coords);
        self.mark_started();
        Ok(self.reveal_cell(coords))
    }

    /// Reveal every hidden neighbor of a revealed cell once its count is
    /// matched by adjacent flags.
    pub fn chord_reveal(&mut self, coords: Coords) -> Result<OpenOutcome> {
        let coords = self.validate_coords(coords)?;

        if self.is_finished() {
            return Ok(OpenOutcome::NoChange);
        }

        let Cell::Revealed(count) = self.grid[coords] else {
            return Ok(OpenOutcome::NoChange);
        };
        if count == 0 || usize::from(count) != self.count_flagged_neighbors(coords) {
            return Ok(OpenOutcome::NoChange);
        }

        let bounds = self.config.size;
        Ok(neighbors(coords, bounds)
            .map(|pos| self.reveal_cell(pos))
            .reduce(BitOr::bitor)
            .unwrap_or(OpenOutcome::NoChange))
    }

    /// Toggle a flag on a hidden cell. Flagged cells are immune to
    /// [`Game::reveal`] until unflagged.
    pub fn toggle_flag(&mut self, coords: Coords) -> Result<FlagOutcome> {
        use FlagOutcome::*;

        let coords = self.validate_coords(coords)?;

        if self.is_finished() {
            return Ok(NoChange);
        }

        Ok(match self.grid[coords] {
            Cell::Hidden => {
                self.grid[coords] = Cell::Flagged;
                Toggled
            }
            Cell::Flagged => {
                self.grid[coords] = Cell::Hidden;
                Toggled
            }
            _ => NoChange,
        })
    }

    fn validate_coords(&self, coords: Coords) -> Result<Coords> {
        let (width, height) = self.config.size;
        if coords.0 < width && coords.1 < height {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds)
        }
    }

    /// One-time mine placement, keyed on the first reveal.
    fn ensure_minefield(&mut self, start: Coords) {
        if self.minefield.is_some() {
            return;
        }
        let seed = self.seed.unwrap_or_else(rand::random);
        log::debug!("Placing mines on first reveal at {:?}, seed {}", start, seed);
        let generator = RandomGenerator::new(seed, start, FirstReveal::SafeZone);
        self.minefield = Some(generator.generate(self.config));
    }

    fn reveal_cell(&mut self, coords: Coords) -> OpenOutcome {
        use OpenOutcome::*;

        // A mine hit mid-chord ends the game; later cells stay untouched.
        if self.is_finished() || !matches!(self.grid[coords], Cell::Hidden) {
            return NoChange;
        }

        if self.mine_at(coords) {
            self.grid[coords] = Cell::Exploded;
            self.triggered_mine = Some(coords);
            self.end_game(false);
            return Explode;
        }

        let count = self.adjacent_mines(coords);
        self.grid[coords] = Cell::Revealed(count);
        self.revealed_count += 1;
        log::debug!("Revealed {:?}, {} adjacent mines", coords, count);

        if count == 0 {
            self.flood_reveal(coords);
        }

        if self.revealed_count == self.safe_count() {
            self.end_game(true);
            Win
        } else {
            Safe
        }
    }

    /// Breadth-first cascade from a zero-count cell. Revealing marks cells
    /// as visited, so each cell is processed at most once and flagged cells
    /// are skipped.
    fn flood_reveal(&mut self, start: Coords) {
        let bounds = self.config.size;
        let mut queue: VecDeque<Coords> = neighbors(start, bounds).collect();
        log::trace!("Cascade from {:?}", start);

        while let Some(coords) = queue.pop_front() {
            if !matches!(self.grid[coords], Cell::Hidden) {
                continue;
            }

            let count = self.adjacent_mines(coords);
            self.grid[coords] = Cell::Revealed(count);
            self.revealed_count += 1;
            log::trace!("Cascade revealed {:?}, {} adjacent mines", coords, count);

            if count == 0 {
                queue.extend(neighbors(coords, bounds));
            }
        }
    }

    fn count_flagged_neighbors(&self, coords: Coords) -> usize {
        neighbors(coords, self.config.size)
            .filter(|&pos| self.grid[pos].is_flag())
            .count()
    }

    fn mine_at(&self, coords: Coords) -> bool {
        self.minefield.as_ref().is_some_and(|field| field[coords])
    }

    fn adjacent_mines(&self, coords: Coords) -> u8 {
        self.minefield
            .as_ref()
            .map_or(0, |field| field.adjacent_mines(coords))
    }

    fn safe_count(&self) -> usize {
        self.minefield
            .as_ref()
            .map_or(self.config.total_cells(), Minefield::safe_count)
    }

    fn mark_started(&mut self) {
        if self.state.is_initial() {
            self.state = GameState::InProgress;
            self.started_at = Some(Utc::now());
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.state.is_final() {
            return;
        }
        self.state = if won { GameState::Won } else { GameState::Lost };
        self.ended_at = Some(Utc::now());
        if !won {
            self.show_mines();
        }
    }

    /// Turn every untriggered mine face-up after a loss. Flags stay put.
    fn show_mines(&mut self) {
        let Some(field) = self.minefield.as_ref() else {
            return;
        };
        let (width, height) = field.size();
        for x in 0..width {
            for y in 0..height {
                if field[(x, y)] && matches!(self.grid[(x, y)], Cell::Hidden) {
                    self.grid[(x, y)] = Cell::Mine;
                }
            }
        }
    }
}
