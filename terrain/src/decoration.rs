use std::ops::Range;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::ForestConfig;
use crate::grid::TerrainGrid;

// Trees are placed in the central half of a tile
const PLACEMENT: Range<f32> = 0.25..0.75;

// Position inside a tile, as a fraction of the tile size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalOffset {
    pub x: f32,
    pub y: f32,
}

// Per-cell tree placements, same coordinate space as the terrain grid.
// Non-forest cells hold an empty list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DecorationMap {
    rows: Vec<Vec<Vec<LocalOffset>>>,
}

impl DecorationMap {
    pub fn derive<R: Rng + ?Sized>(grid: &TerrainGrid, forest: &ForestConfig, rng: &mut R) -> Self {
        let rows = grid
            .rows()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&t| {
                        if !t.is_forest() {
                            return Vec::new();
                        }
                        (0..forest.decoration_count(t))
                            .map(|_| LocalOffset {
                                x: rng.gen_range(PLACEMENT),
                                y: rng.gen_range(PLACEMENT),
                            })
                            .collect()
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    // Empty for bare tiles and anything off the map
    pub fn at(&self, x: usize, y: usize) -> &[LocalOffset] {
        self.rows
            .get(y)
            .and_then(|row| row.get(x))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    // Whether this map lines up cell for cell with `grid`
    pub fn fits(&self, grid: &TerrainGrid) -> bool {
        self.rows.len() == grid.height() && self.rows.iter().all(|r| r.len() == grid.width())
    }

    pub fn total(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.iter())
            .map(Vec::len)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::DecorationMap;
    use crate::config::ForestConfig;
    use crate::grid::TerrainGrid;
    use crate::tile::Terrain;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn counts_follow_kind() {
        let mut g = TerrainGrid::new(4, 3).unwrap();
        g.set(0, 0, Terrain::Forest);
        g.set(3, 2, Terrain::DenseForest);
        g.set(1, 1, Terrain::Water);
        let mut rng = ChaCha8Rng::seed_from_u64(20);
        let d = DecorationMap::derive(&g, &ForestConfig::default(), &mut rng);

        assert!(d.fits(&g));
        assert_eq!(d.at(0, 0).len(), 2);
        assert_eq!(d.at(3, 2).len(), 4);
        assert!(d.at(1, 1).is_empty());
        assert!(d.at(2, 0).is_empty());
        assert!(d.at(9, 9).is_empty());
        assert_eq!(d.total(), 6);
    }

    #[test]
    fn offsets_stay_inside_tile_center() {
        let mut g = TerrainGrid::new(10, 10).unwrap();
        for y in 0..10 {
            for x in 0..10 {
                g.set(x, y, Terrain::DenseForest);
            }
        }
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let d = DecorationMap::derive(&g, &ForestConfig::default(), &mut rng);
        for y in 0..10 {
            for x in 0..10 {
                for o in d.at(x, y) {
                    assert!((0.25..0.75).contains(&o.x));
                    assert!((0.25..0.75).contains(&o.y));
                }
            }
        }
    }

    #[test]
    fn mismatched_map_does_not_fit() {
        let g = TerrainGrid::new(3, 3).unwrap();
        let other = TerrainGrid::new(3, 4).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(22);
        let d = DecorationMap::derive(&g, &ForestConfig::default(), &mut rng);
        assert!(d.fits(&g));
        assert!(!d.fits(&other));
        assert_eq!((d.width(), d.height()), (3, 3));
    }
}
