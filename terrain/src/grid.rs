use crate::error::{Result, TerrainError};
use crate::tile::Terrain;

// Moore neighborhood, row by row
const MOORE: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const ORTHOGONAL: [(isize, isize); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

// A coordinate forced to a terrain type at the start of every growth pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seed {
    pub x: usize,
    pub y: usize,
    pub terrain: Terrain,
}

// Rectangular terrain map: `height` rows of `width` cells,
// access as `rows[y][x]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerrainGrid {
    width: usize,
    height: usize,
    rows: Vec<Vec<Terrain>>,
}

impl TerrainGrid {
    // All-grass grid. Zero dimensions are rejected before allocating.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(TerrainError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            rows: vec![vec![Terrain::Grass; width]; height],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rows(&self) -> &[Vec<Terrain>] {
        &self.rows
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Terrain> {
        self.rows.get(y).and_then(|row| row.get(x)).copied()
    }

    // Out-of-bounds writes are ignored
    pub fn set(&mut self, x: usize, y: usize, terrain: Terrain) {
        if let Some(cell) = self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            *cell = terrain;
        }
    }

    // False for water and for anything off the map
    pub fn is_passable(&self, x: isize, y: isize) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        self.get(x as usize, y as usize)
            .is_some_and(Terrain::is_passable)
    }

    pub fn count(&self, terrain: Terrain) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&t| t == terrain)
            .count()
    }

    // Iterate (x, y, terrain) in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Terrain)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(y, row)| row.iter().enumerate().map(move |(x, &t)| (x, y, t)))
    }

    fn offset(&self, x: usize, y: usize, dx: isize, dy: isize) -> Option<(usize, usize)> {
        let nx = x as isize + dx;
        let ny = y as isize + dy;
        if nx >= 0 && nx < self.width as isize && ny >= 0 && ny < self.height as isize {
            Some((nx as usize, ny as usize))
        } else {
            None
        }
    }

    // Moore-neighborhood matches; off-grid offsets don't count
    pub fn count_neighbors_of_type(&self, x: usize, y: usize, terrain: Terrain) -> usize {
        MOORE
            .iter()
            .filter_map(|&(dx, dy)| self.offset(x, y, dx, dy))
            .filter(|&(nx, ny)| self.rows[ny][nx] == terrain)
            .count()
    }

    pub fn has_orthogonal_neighbor_of_type(&self, x: usize, y: usize, terrain: Terrain) -> bool {
        ORTHOGONAL
            .iter()
            .filter_map(|&(dx, dy)| self.offset(x, y, dx, dy))
            .any(|(nx, ny)| self.rows[ny][nx] == terrain)
    }

    // Revert `terrain` cells with fewer than `min_neighbors` same-type
    // neighbors back to grass. Counts come from a snapshot so the pass is
    // order-independent. Returns how many cells were reverted.
    pub fn smooth(&mut self, terrain: Terrain, min_neighbors: usize) -> usize {
        let snapshot = self.clone();
        let mut reverted = 0;
        for y in 0..self.height {
            for x in 0..self.width {
                if self.rows[y][x] == terrain
                    && snapshot.count_neighbors_of_type(x, y, terrain) < min_neighbors
                {
                    self.rows[y][x] = Terrain::Grass;
                    reverted += 1;
                }
            }
        }
        reverted
    }

    // Row-major small-integer codes for persistence
    pub fn to_codes(&self) -> Vec<Vec<u8>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|t| t.code()).collect())
            .collect()
    }

    pub fn from_codes(codes: &[Vec<u8>]) -> Result<Self> {
        let height = codes.len();
        let width = codes.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(TerrainError::MalformedGrid("no cells".into()));
        }
        let mut rows = Vec::with_capacity(height);
        for (y, row) in codes.iter().enumerate() {
            if row.len() != width {
                return Err(TerrainError::MalformedGrid(format!(
                    "row {} has {} cells, expected {}",
                    y,
                    row.len(),
                    width
                )));
            }
            let decoded = row
                .iter()
                .map(|&c| Terrain::try_from(c))
                .collect::<Result<Vec<_>>>()?;
            rows.push(decoded);
        }
        Ok(Self {
            width,
            height,
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::TerrainGrid;
    use crate::error::TerrainError;
    use crate::tile::Terrain;

    #[test]
    fn new_grid_is_all_grass() {
        let g = TerrainGrid::new(7, 3).unwrap();
        assert_eq!(g.width(), 7);
        assert_eq!(g.height(), 3);
        assert_eq!(g.rows().len(), 3);
        assert!(g.rows().iter().all(|r| r.len() == 7));
        assert_eq!(g.count(Terrain::Grass), 21);
    }

    #[test]
    fn zero_dimension_rejected() {
        assert!(matches!(
            TerrainGrid::new(0, 5),
            Err(TerrainError::InvalidDimensions { width: 0, height: 5 })
        ));
        assert!(TerrainGrid::new(5, 0).is_err());
    }

    #[test]
    fn corner_has_at_most_three_neighbors() {
        let mut g = TerrainGrid::new(4, 4).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                g.set(x, y, Terrain::Water);
            }
        }
        assert_eq!(g.count_neighbors_of_type(0, 0, Terrain::Water), 3);
        assert_eq!(g.count_neighbors_of_type(3, 3, Terrain::Water), 3);
        assert_eq!(g.count_neighbors_of_type(0, 2, Terrain::Water), 5);
        assert_eq!(g.count_neighbors_of_type(1, 1, Terrain::Water), 8);
    }

    #[test]
    fn tiny_grids_never_index_out_of_bounds() {
        let one = TerrainGrid::new(1, 1).unwrap();
        assert_eq!(one.count_neighbors_of_type(0, 0, Terrain::Grass), 0);
        assert!(!one.has_orthogonal_neighbor_of_type(0, 0, Terrain::Grass));

        let two = TerrainGrid::new(2, 2).unwrap();
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(two.count_neighbors_of_type(x, y, Terrain::Grass), 3);
            }
        }
    }

    #[test]
    fn orthogonal_ignores_diagonals() {
        let mut g = TerrainGrid::new(3, 3).unwrap();
        g.set(0, 0, Terrain::Water);
        assert!(!g.has_orthogonal_neighbor_of_type(1, 1, Terrain::Water));
        assert_eq!(g.count_neighbors_of_type(1, 1, Terrain::Water), 1);
        g.set(1, 0, Terrain::Water);
        assert!(g.has_orthogonal_neighbor_of_type(1, 1, Terrain::Water));
    }

    #[test]
    fn passability() {
        let mut g = TerrainGrid::new(3, 2).unwrap();
        g.set(1, 1, Terrain::Water);
        g.set(2, 0, Terrain::DenseForest);
        assert!(g.is_passable(0, 0));
        assert!(g.is_passable(2, 0));
        assert!(!g.is_passable(1, 1));
        assert!(!g.is_passable(-1, 0));
        assert!(!g.is_passable(0, -1));
        assert!(!g.is_passable(3, 0));
        assert!(!g.is_passable(0, 2));
    }

    #[test]
    fn smoothing_removes_specks_keeps_blocks() {
        let mut g = TerrainGrid::new(8, 8).unwrap();
        // lone speck
        g.set(6, 6, Terrain::Water);
        // 3x3 block
        for y in 0..3 {
            for x in 0..3 {
                g.set(x, y, Terrain::Water);
            }
        }
        let reverted = g.smooth(Terrain::Water, 3);
        assert_eq!(reverted, 1);
        assert_eq!(g.get(6, 6), Some(Terrain::Grass));
        assert_eq!(g.count(Terrain::Water), 9);
    }

    #[test]
    fn smoothing_threshold_is_strict() {
        // middle of a 3-long line has exactly 2 neighbors
        let mut g = TerrainGrid::new(5, 3).unwrap();
        for x in 1..4 {
            g.set(x, 1, Terrain::Sand);
        }
        g.smooth(Terrain::Sand, 2);
        assert_eq!(g.get(2, 1), Some(Terrain::Sand));
        assert_eq!(g.get(1, 1), Some(Terrain::Grass));
        assert_eq!(g.get(3, 1), Some(Terrain::Grass));
    }

    #[test]
    fn codes_rejects_ragged_and_unknown() {
        assert!(TerrainGrid::from_codes(&[]).is_err());
        assert!(TerrainGrid::from_codes(&[vec![0, 1], vec![2]]).is_err());
        assert!(matches!(
            TerrainGrid::from_codes(&[vec![0, 9]]),
            Err(TerrainError::UnknownTerrainCode(9))
        ));

        let mut g = TerrainGrid::new(3, 2).unwrap();
        g.set(0, 1, Terrain::Water);
        g.set(2, 0, Terrain::DenseForest);
        let codes = g.to_codes();
        assert_eq!(codes, vec![vec![0, 0, 4], vec![1, 0, 0]]);
        assert_eq!(TerrainGrid::from_codes(&codes).unwrap(), g);
    }
}
