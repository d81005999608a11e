// Generation parameters for every stage; missing TOML fields fall back to the defaults

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};
use crate::tile::Terrain;

// Number of forest growth passes. Not configurable.
pub const FOREST_ITERATIONS: usize = 3;

// Upper bound on decorations per tile.
pub const MAX_DECORATIONS: usize = 16;

// Water body seeding, growth and cleanup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterConfig {
    // Fraction of all cells used as water seeds.
    pub seed_percent: f64,
    // Growth passes.
    pub iterations: usize,
    // Chance a grass cell is considered in a growth pass.
    pub growth_chance: f64,
    // A cell turns to water when it has strictly more water neighbors than this.
    pub min_neighbors: usize,
    // Water with strictly fewer water neighbors than this reverts to grass.
    pub smooth_neighbors: usize,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            seed_percent: 0.005,
            iterations: 6,
            growth_chance: 0.8,
            min_neighbors: 1,
            smooth_neighbors: 3,
        }
    }
}

impl WaterConfig {
    pub fn validate(&self) -> Result<()> {
        check_fraction("water.seed_percent", self.seed_percent)?;
        check_fraction("water.growth_chance", self.growth_chance)
    }
}

// Shoreline cleanup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandConfig {
    // Sand with strictly fewer sand neighbors than this reverts to grass.
    pub smooth_neighbors: usize,
}

impl Default for SandConfig {
    fn default() -> Self {
        Self { smooth_neighbors: 2 }
    }
}

// One forest density and how many trees each of its tiles shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestKind {
    pub terrain: Terrain,
    pub decoration_count: usize,
}

// Forest seeding and competitive growth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    // Fraction of all cells used as seeds, per kind.
    pub seed_percent: f64,
    pub growth_chance: f64,
    // A cell joins a kind when it has strictly more neighbors of that kind than this.
    pub min_neighbors: usize,
    // Random draws allowed per seed before it is dropped.
    pub max_seed_attempts: usize,
    // Kinds in priority order. Earlier kinds win ties.
    pub kinds: Vec<ForestKind>,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            seed_percent: 0.02,
            growth_chance: 1.0,
            min_neighbors: 2,
            max_seed_attempts: 100,
            kinds: vec![
                ForestKind {
                    terrain: Terrain::Forest,
                    decoration_count: 2,
                },
                ForestKind {
                    terrain: Terrain::DenseForest,
                    decoration_count: 4,
                },
            ],
        }
    }
}

impl ForestConfig {
    // Decorations per tile for a forest terrain; zero for unconfigured kinds.
    pub fn decoration_count(&self, terrain: Terrain) -> usize {
        self.kinds
            .iter()
            .find(|k| k.terrain == terrain)
            .map_or(0, |k| k.decoration_count)
    }

    pub fn validate(&self) -> Result<()> {
        check_fraction("forest.seed_percent", self.seed_percent)?;
        check_fraction("forest.growth_chance", self.growth_chance)?;

        if self.max_seed_attempts == 0 {
            return Err(invalid("forest.max_seed_attempts must be positive"));
        }
        if self.kinds.is_empty() {
            return Err(invalid("forest.kinds must not be empty"));
        }
        for (i, kind) in self.kinds.iter().enumerate() {
            if !kind.terrain.is_forest() {
                return Err(invalid(&format!(
                    "forest.kinds[{}]: {:?} is not a forest terrain",
                    i, kind.terrain
                )));
            }
            if kind.decoration_count > MAX_DECORATIONS {
                return Err(invalid(&format!(
                    "forest.kinds[{}]: decoration_count {} exceeds {}",
                    i, kind.decoration_count, MAX_DECORATIONS
                )));
            }
            if self.kinds[..i].iter().any(|k| k.terrain == kind.terrain) {
                return Err(invalid(&format!(
                    "forest.kinds: {:?} listed twice",
                    kind.terrain
                )));
            }
        }
        Ok(())
    }
}

// Full pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub water: WaterConfig,
    pub sand: SandConfig,
    pub forest: ForestConfig,
}

impl GenerationConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        self.water.validate()?;
        self.forest.validate()
    }
}

// floor(width * height * percent)
pub fn seed_count(width: usize, height: usize, percent: f64) -> usize {
    ((width * height) as f64 * percent).floor() as usize
}

fn check_fraction(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(&format!("{} must be within [0, 1], got {}", name, value)))
    }
}

fn invalid(msg: &str) -> TerrainError {
    TerrainError::InvalidConfig(msg.to_string())
}
