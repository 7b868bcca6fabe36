use ndarray::Array2;

use super::*;

/// Uniformly random placement over the cells left after carving out the
/// first-reveal exclusion zone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RandomGenerator {
    seed: u64,
    start: Coords,
    first_reveal: FirstReveal,
}

impl RandomGenerator {
    pub fn new(seed: u64, start: Coords, first_reveal: FirstReveal) -> Self {
        Self {
            seed,
            start,
            first_reveal,
        }
    }
}

impl MinefieldGenerator for RandomGenerator {
    fn generate(self, config: GameConfig) -> Minefield {
        use rand::prelude::*;
        use FirstReveal::*;

        let total = config.total_cells();

        // Demote the exclusion policy when the board cannot afford it. A
        // validated config always leaves room for a safe start cell.
        let policy = match self.first_reveal {
            Safe | SafeZone if config.mines + 1 > total => {
                log::warn!("No room for a safe start cell, placing mines anywhere");
                Anywhere
            }
            SafeZone if config.mines + 9 > total => {
                log::warn!("No room for a clear opening zone, only the start cell is kept safe");
                Safe
            }
            policy => policy,
        };

        let mut excluded: Vec<Coords> = Vec::new();
        match policy {
            Anywhere => {}
            Safe => excluded.push(self.start),
            SafeZone => {
                excluded.push(self.start);
                excluded.extend(neighbors(self.start, config.size));
            }
        }

        let candidates: Vec<Coords> = (0..config.size.0)
            .flat_map(|x| (0..config.size.1).map(move |y| (x, y)))
            .filter(|pos| !excluded.contains(pos))
            .collect();

        let mut mines: Array2<bool> = Array2::default(config.size);
        let mut rng = SmallRng::seed_from_u64(self.seed);
        for &pos in candidates.choose_multiple(&mut rng, config.mines) {
            mines[pos] = true;
        }

        let field = Minefield::from_mask(mines);
        if field.mine_count() != config.mines {
            log::warn!(
                "Placed {} mines but {} were requested",
                field.mine_count(),
                config.mines
            );
        }
        field
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(config: GameConfig, seed: u64, start: Coords, policy: FirstReveal) -> Minefield {
        RandomGenerator::new(seed, start, policy).generate(config)
    }

    #[test]
    fn places_exactly_the_requested_mines() {
        for seed in 0..20 {
            let field = generate(
                GameConfig::beginner(),
                seed,
                (4, 4),
                FirstReveal::SafeZone,
            );
            assert_eq!(field.mine_count(), 10);
        }
    }

    #[test]
    fn safe_zone_keeps_start_and_neighbors_clear() {
        let config = GameConfig::new((9, 9), 70).unwrap();
        for seed in 0..20 {
            let field = generate(config, seed, (4, 4), FirstReveal::SafeZone);
            assert!(!field[(4, 4)]);
            assert_eq!(field.adjacent_mines((4, 4)), 0);
        }
    }

    #[test]
    fn safe_zone_falls_back_to_safe_start_on_tight_boards() {
        // 3x3 with any mines cannot spare a full 9-cell zone around the
        // center, but the start cell itself must stay clear.
        let config = GameConfig::new((3, 3), 8).unwrap();
        for seed in 0..20 {
            let field = generate(config, seed, (1, 1), FirstReveal::SafeZone);
            assert_eq!(field.mine_count(), 8);
            assert!(!field[(1, 1)]);
        }
    }

    #[test]
    fn same_seed_reproduces_the_layout() {
        let config = GameConfig::intermediate();
        let a = generate(config, 99, (8, 8), FirstReveal::SafeZone);
        let b = generate(config, 99, (8, 8), FirstReveal::SafeZone);
        assert_eq!(a, b);
    }
}
