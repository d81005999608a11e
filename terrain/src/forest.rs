use rand::Rng;

use crate::config::{FOREST_ITERATIONS, ForestConfig, seed_count};
use crate::error::Result;
use crate::grid::{Seed, TerrainGrid};
use crate::tile::Terrain;

// Grows the configured forest kinds competitively over the remaining grass
pub struct ForestStage {
    config: ForestConfig,
}

impl ForestStage {
    pub fn new(config: ForestConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    // Rejection-sample grass cells for every kind, in configured order.
    // All seeds are drawn against the grid as passed in; a seed that
    // misses grass `max_seed_attempts` times is dropped.
    pub fn seeds<R: Rng + ?Sized>(&self, grid: &TerrainGrid, rng: &mut R) -> Vec<Seed> {
        let (width, height) = (grid.width(), grid.height());
        let count = seed_count(width, height, self.config.seed_percent);
        if count == 0 || grid.count(Terrain::Grass) == 0 {
            return Vec::new();
        }

        let mut seeds = Vec::with_capacity(count * self.config.kinds.len());
        let mut dropped = 0;
        for kind in &self.config.kinds {
            for _ in 0..count {
                let found = (0..self.config.max_seed_attempts)
                    .map(|_| (rng.gen_range(0..width), rng.gen_range(0..height)))
                    .find(|&(x, y)| grid.get(x, y) == Some(Terrain::Grass));
                match found {
                    Some((x, y)) => seeds.push(Seed {
                        x,
                        y,
                        terrain: kind.terrain,
                    }),
                    None => dropped += 1,
                }
            }
        }
        if dropped > 0 {
            log::warn!("forest: dropped {} seeds, not enough grass", dropped);
        }
        seeds
    }

    // One growth pass. Seeds only claim cells that are still grass; growth
    // reads neighbor counts from a snapshot and the first kind in priority
    // order that qualifies takes the cell.
    pub fn grow<R: Rng + ?Sized>(&self, grid: &mut TerrainGrid, seeds: &[Seed], rng: &mut R) {
        for seed in seeds {
            if grid.get(seed.x, seed.y) == Some(Terrain::Grass) {
                grid.set(seed.x, seed.y, seed.terrain);
            }
        }

        let snapshot = grid.clone();
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                if snapshot.get(x, y) != Some(Terrain::Grass)
                    || !rng.gen_bool(self.config.growth_chance)
                {
                    continue;
                }
                let winner = self.config.kinds.iter().find(|kind| {
                    snapshot.count_neighbors_of_type(x, y, kind.terrain) > self.config.min_neighbors
                });
                if let Some(kind) = winner {
                    grid.set(x, y, kind.terrain);
                }
            }
        }
    }

    pub fn apply<R: Rng + ?Sized>(&self, grid: &mut TerrainGrid, rng: &mut R) {
        let seeds = self.seeds(grid, rng);
        for _ in 0..FOREST_ITERATIONS {
            self.grow(grid, &seeds, rng);
        }
        log::debug!(
            "forest: {} seeds, {}",
            seeds.len(),
            self.config
                .kinds
                .iter()
                .map(|k| format!("{:?}={}", k.terrain, grid.count(k.terrain)))
                .collect::<Vec<_>>()
                .join(" ")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::ForestStage;
    use crate::config::{ForestConfig, ForestKind};
    use crate::error::TerrainError;
    use crate::grid::TerrainGrid;
    use crate::tile::Terrain;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    // (2,2) gets three Forest neighbors above and three DenseForest below
    fn contested() -> TerrainGrid {
        let mut g = TerrainGrid::new(5, 5).unwrap();
        for x in 1..4 {
            g.set(x, 1, Terrain::Forest);
            g.set(x, 3, Terrain::DenseForest);
        }
        g
    }

    fn config_with(order: [Terrain; 2]) -> ForestConfig {
        ForestConfig {
            kinds: order
                .into_iter()
                .map(|terrain| ForestKind {
                    terrain,
                    decoration_count: 1,
                })
                .collect(),
            ..ForestConfig::default()
        }
    }

    #[test]
    fn tie_goes_to_first_kind() {
        let mut rng = ChaCha8Rng::seed_from_u64(10);

        let mut g = contested();
        ForestStage::new(config_with([Terrain::Forest, Terrain::DenseForest]))
            .unwrap()
            .grow(&mut g, &[], &mut rng);
        assert_eq!(g.get(2, 2), Some(Terrain::Forest));

        let mut g = contested();
        ForestStage::new(config_with([Terrain::DenseForest, Terrain::Forest]))
            .unwrap()
            .grow(&mut g, &[], &mut rng);
        assert_eq!(g.get(2, 2), Some(Terrain::DenseForest));
    }

    #[test]
    fn seeds_land_on_grass() {
        let mut g = TerrainGrid::new(20, 20).unwrap();
        for y in 0..20 {
            for x in 0..10 {
                g.set(x, y, Terrain::Water);
            }
        }
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let seeds = ForestStage::new(ForestConfig::default()).unwrap().seeds(&g, &mut rng);
        // floor(400 * 0.02) = 8 per kind; half the map is grass so none run out
        assert_eq!(seeds.len(), 16);
        assert!(seeds.iter().all(|s| s.x >= 10));
        assert_eq!(
            seeds.iter().filter(|s| s.terrain == Terrain::Forest).count(),
            8
        );
    }

    #[test]
    fn no_grass_does_not_hang() {
        let mut g = TerrainGrid::new(20, 20).unwrap();
        for y in 0..20 {
            for x in 0..20 {
                g.set(x, y, Terrain::Water);
            }
        }
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        ForestStage::new(ForestConfig::default()).unwrap().apply(&mut g, &mut rng);
        assert_eq!(g.count(Terrain::Water), 400);
    }

    #[test]
    fn scarce_grass_drops_seeds() {
        // one grass cell in 400: most seeds exhaust their attempts
        let mut g = TerrainGrid::new(20, 20).unwrap();
        for y in 0..20 {
            for x in 0..20 {
                g.set(x, y, Terrain::Sand);
            }
        }
        g.set(7, 7, Terrain::Grass);
        let config = ForestConfig {
            max_seed_attempts: 5,
            ..ForestConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let seeds = ForestStage::new(config).unwrap().seeds(&g, &mut rng);
        assert!(seeds.len() < 16);
        assert!(seeds.iter().all(|s| (s.x, s.y) == (7, 7)));
    }

    #[test]
    fn seeds_do_not_overwrite_claimed_cells() {
        let mut g = TerrainGrid::new(5, 5).unwrap();
        g.set(1, 1, Terrain::DenseForest);
        let seed = crate::grid::Seed {
            x: 1,
            y: 1,
            terrain: Terrain::Forest,
        };
        let config = ForestConfig {
            growth_chance: 0.0,
            ..ForestConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(14);
        ForestStage::new(config).unwrap().grow(&mut g, &[seed], &mut rng);
        assert_eq!(g.get(1, 1), Some(Terrain::DenseForest));
    }

    #[test]
    fn forest_only_replaces_grass() {
        let mut g = TerrainGrid::new(30, 30).unwrap();
        for y in 0..30 {
            g.set(15, y, Terrain::Water);
            g.set(16, y, Terrain::Sand);
        }
        let before = g.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(15);
        ForestStage::new(ForestConfig::default()).unwrap().apply(&mut g, &mut rng);
        for (x, y, t) in g.cells() {
            let old = before.get(x, y).unwrap();
            if t != old {
                assert_eq!(old, Terrain::Grass);
                assert!(t.is_forest());
            }
        }
        assert!(g.count(Terrain::Forest) + g.count(Terrain::DenseForest) > 0);
    }

    #[test]
    fn bad_config_is_rejected_before_sampling() {
        let config = ForestConfig {
            growth_chance: 2.0,
            ..ForestConfig::default()
        };
        assert!(matches!(
            ForestStage::new(config),
            Err(TerrainError::InvalidConfig(_))
        ));

        let config = ForestConfig {
            kinds: vec![ForestKind {
                terrain: Terrain::Sand,
                decoration_count: 1,
            }],
            ..ForestConfig::default()
        };
        assert!(ForestStage::new(config).is_err());
    }
}
