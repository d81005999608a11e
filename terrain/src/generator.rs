use rand::Rng;

use crate::config::GenerationConfig;
use crate::error::{Result, TerrainError};
use crate::forest::ForestStage;
use crate::grid::TerrainGrid;
use crate::sand::SandStage;
use crate::water::WaterStage;

// Runs water -> sand -> forest over a fresh all-grass grid
pub struct TerrainGenerator {
    width: usize,
    height: usize,
    config: GenerationConfig,
}

impl TerrainGenerator {
    // Dimensions and config are checked here so that generation itself
    // cannot fail halfway.
    pub fn new(width: usize, height: usize, config: GenerationConfig) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(TerrainError::InvalidDimensions { width, height });
        }
        config.validate()?;
        Ok(Self {
            width,
            height,
            config,
        })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn generate_map<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<TerrainGrid> {
        let mut grid = TerrainGrid::new(self.width, self.height)?;
        WaterStage::new(self.config.water.clone())?.apply(&mut grid, rng);
        SandStage::new(self.config.sand.clone()).apply(&mut grid);
        ForestStage::new(self.config.forest.clone())?.apply(&mut grid, rng);
        Ok(grid)
    }
}
