use rand::Rng;

use crate::config::{WaterConfig, seed_count};
use crate::error::Result;
use crate::grid::{Seed, TerrainGrid};
use crate::tile::Terrain;

pub struct WaterStage {
    config: WaterConfig,
}

impl WaterStage {
    // Out-of-range chances are rejected here, before any sampling
    pub fn new(config: WaterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    // Uniform coordinates, duplicates allowed
    pub fn seeds<R: Rng + ?Sized>(&self, width: usize, height: usize, rng: &mut R) -> Vec<Seed> {
        let count = seed_count(width, height, self.config.seed_percent);
        (0..count)
            .map(|_| Seed {
                x: rng.gen_range(0..width),
                y: rng.gen_range(0..height),
                terrain: Terrain::Water,
            })
            .collect()
    }

    // One growth pass: stamp seeds, then grow from a snapshot so that
    // cells converted in this pass don't feed each other.
    pub fn grow<R: Rng + ?Sized>(&self, grid: &mut TerrainGrid, seeds: &[Seed], rng: &mut R) {
        for seed in seeds {
            grid.set(seed.x, seed.y, Terrain::Water);
        }

        let snapshot = grid.clone();
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                if snapshot.get(x, y) != Some(Terrain::Grass)
                    || !rng.gen_bool(self.config.growth_chance)
                {
                    continue;
                }
                if snapshot.count_neighbors_of_type(x, y, Terrain::Water) > self.config.min_neighbors
                {
                    grid.set(x, y, Terrain::Water);
                }
            }
        }
    }

    // In-place: seed, grow `iterations` times, then clear isolated water
    pub fn apply<R: Rng + ?Sized>(&self, grid: &mut TerrainGrid, rng: &mut R) {
        let seeds = self.seeds(grid.width(), grid.height(), rng);
        for _ in 0..self.config.iterations {
            self.grow(grid, &seeds, rng);
        }
        let reverted = grid.smooth(Terrain::Water, self.config.smooth_neighbors);
        log::debug!(
            "water: {} seeds, {} cells after smoothing ({} reverted)",
            seeds.len(),
            grid.count(Terrain::Water),
            reverted
        );
    }
}
