use bson::DateTime;
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use terrain::{DecorationMap, GenerationConfig, TerrainGrid, World};

use crate::error::{Result, StorageError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    pub id: Option<ObjectId>,
    pub name: String,
    pub seed: i64,
    pub saved_at: DateTime,
    pub width: u32,
    pub height: u32,
    pub params: GenerationConfig,
    // Row-major terrain codes: `height` rows of `width`
    pub terrain: Vec<Vec<u8>>,
    // Absent in older saves; redrawn from `seed` on load
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub decorations: Option<DecorationMap>,
}

// Just enough to list saves without pulling whole maps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveSummary {
    pub name: String,
    pub saved_at: DateTime,
}

impl SaveDoc {
    pub fn from_world(name: &str, seed: u64, params: &GenerationConfig, world: &World) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            // bit-preserving, read back with `as u64`
            seed: seed as i64,
            saved_at: DateTime::now(),
            width: world.width() as u32,
            height: world.height() as u32,
            params: params.clone(),
            terrain: world.terrain().to_codes(),
            decorations: Some(world.decorations().clone()),
        }
    }

    pub fn to_world(&self) -> Result<World> {
        let terrain = TerrainGrid::from_codes(&self.terrain)?;
        if terrain.width() != self.width as usize || terrain.height() != self.height as usize {
            return Err(StorageError::DimensionMismatch {
                declared_w: self.width,
                declared_h: self.height,
                actual_w: terrain.width(),
                actual_h: terrain.height(),
            });
        }
        let world = match &self.decorations {
            Some(decorations) => World::from_parts(terrain, decorations.clone())?,
            None => World::redecorate(terrain, &self.params.forest, self.seed as u64),
        };
        Ok(world)
    }
}
