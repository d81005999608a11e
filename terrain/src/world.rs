// A finished world: terrain plus the tree decorations drawn on top of it

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::{ForestConfig, GenerationConfig};
use crate::decoration::{DecorationMap, LocalOffset};
use crate::error::{Result, TerrainError};
use crate::generator::TerrainGenerator;
use crate::grid::TerrainGrid;
use crate::tile::Terrain;

#[derive(Debug, Clone, PartialEq)]
pub struct World {
    terrain: TerrainGrid,
    decorations: DecorationMap,
}

impl World {
    // Run the full pipeline, then decorate the forests.
    pub fn generate<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        config: &GenerationConfig,
        rng: &mut R,
    ) -> Result<Self> {
        let generator = TerrainGenerator::new(width, height, config.clone())?;
        let terrain = generator.generate_map(rng)?;
        let decorations = DecorationMap::derive(&terrain, &config.forest, rng);
        log::info!(
            "generated {}x{} world: {} water, {} sand, {} forest tiles",
            width,
            height,
            terrain.count(Terrain::Water),
            terrain.count(Terrain::Sand),
            terrain.count(Terrain::Forest) + terrain.count(Terrain::DenseForest)
        );
        Ok(Self {
            terrain,
            decorations,
        })
    }

    // Same as `generate` with a ChaCha8 stream seeded from `seed`.
    pub fn from_seed(
        width: usize,
        height: usize,
        config: &GenerationConfig,
        seed: u64,
    ) -> Result<Self> {
        Self::generate(width, height, config, &mut ChaCha8Rng::seed_from_u64(seed))
    }

    // Reassemble a world from stored terrain and decorations.
    pub fn from_parts(terrain: TerrainGrid, decorations: DecorationMap) -> Result<Self> {
        if !decorations.fits(&terrain) {
            return Err(TerrainError::MalformedGrid(format!(
                "decorations are {}x{}, terrain is {}x{}",
                decorations.width(),
                decorations.height(),
                terrain.width(),
                terrain.height()
            )));
        }
        // Trees only ever stand on forest tiles
        let stray = terrain
            .cells()
            .find(|&(x, y, t)| !t.is_forest() && !decorations.at(x, y).is_empty());
        if let Some((x, y, t)) = stray {
            return Err(TerrainError::MalformedGrid(format!(
                "decorations on {:?} tile at ({}, {})",
                t, x, y
            )));
        }
        Ok(Self {
            terrain,
            decorations,
        })
    }

    // Stored terrain without decorations: redraw them from `seed` so the
    // same save always looks the same.
    pub fn redecorate(terrain: TerrainGrid, forest: &ForestConfig, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let decorations = DecorationMap::derive(&terrain, forest, &mut rng);
        Self {
            terrain,
            decorations,
        }
    }

    pub fn width(&self) -> usize {
        self.terrain.width()
    }

    pub fn height(&self) -> usize {
        self.terrain.height()
    }

    pub fn terrain(&self) -> &TerrainGrid {
        &self.terrain
    }

    pub fn decorations(&self) -> &DecorationMap {
        &self.decorations
    }

    pub fn cell_at(&self, x: usize, y: usize) -> Option<Terrain> {
        self.terrain.get(x, y)
    }

    pub fn decorations_at(&self, x: usize, y: usize) -> &[LocalOffset] {
        self.decorations.at(x, y)
    }

    pub fn is_passable(&self, x: isize, y: isize) -> bool {
        self.terrain.is_passable(x, y)
    }

    pub fn into_parts(self) -> (TerrainGrid, DecorationMap) {
        (self.terrain, self.decorations)
    }
}
