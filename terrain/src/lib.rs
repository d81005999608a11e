// terrain holds the world grid and the cellular-automaton generation stages
pub mod config;
pub mod decoration;
pub mod error;
pub mod forest;
pub mod generator;
pub mod grid;
pub mod sand;
pub mod tile;
pub mod utils;
pub mod water;
pub mod world;

pub use config::{ForestConfig, ForestKind, GenerationConfig, SandConfig, WaterConfig};
pub use decoration::{DecorationMap, LocalOffset};
pub use error::{Result, TerrainError};
pub use forest::ForestStage;
pub use generator::TerrainGenerator;
pub use grid::{Seed, TerrainGrid};
pub use sand::SandStage;
pub use tile::Terrain;
pub use water::WaterStage;
pub use world::World;
