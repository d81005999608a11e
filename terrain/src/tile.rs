use serde::{Deserialize, Serialize};

use crate::error::TerrainError;

// One cell of the world. The discriminants are the persisted codes,
// so never reorder these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Terrain {
    #[default]
    Grass = 0,
    Water = 1,
    Sand = 2,
    Forest = 3,
    DenseForest = 4,
}

impl Terrain {
    pub const ALL: [Terrain; 5] = [
        Terrain::Grass,
        Terrain::Water,
        Terrain::Sand,
        Terrain::Forest,
        Terrain::DenseForest,
    ];

    // Water is the only tile agents cannot walk on
    pub fn is_passable(self) -> bool {
        match self {
            Terrain::Water => false,
            Terrain::Grass | Terrain::Sand | Terrain::Forest | Terrain::DenseForest => true,
        }
    }

    // Forest tiles carry tree decorations
    pub fn is_forest(self) -> bool {
        matches!(self, Terrain::Forest | Terrain::DenseForest)
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Terrain {
    type Error = TerrainError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Terrain::ALL
            .into_iter()
            .find(|t| t.code() == code)
            .ok_or(TerrainError::UnknownTerrainCode(code))
    }
}

#[cfg(test)]
mod tests {
    use super::Terrain;

    #[test]
    fn codes_match_persisted_layout() {
        assert_eq!(Terrain::Grass.code(), 0);
        assert_eq!(Terrain::Water.code(), 1);
        assert_eq!(Terrain::Sand.code(), 2);
        assert_eq!(Terrain::Forest.code(), 3);
        assert_eq!(Terrain::DenseForest.code(), 4);
        for t in Terrain::ALL {
            assert_eq!(Terrain::try_from(t.code()).unwrap(), t);
        }
    }

    #[test]
    fn unknown_code_rejected() {
        assert!(Terrain::try_from(5).is_err());
        assert!(Terrain::try_from(255).is_err());
    }

    #[test]
    fn only_water_blocks_movement() {
        for t in Terrain::ALL {
            assert_eq!(t.is_passable(), t != Terrain::Water, "{:?}", t);
        }
        assert!(Terrain::Forest.is_forest());
        assert!(Terrain::DenseForest.is_forest());
        assert!(!Terrain::Sand.is_forest());
    }
}
