use crate::config::SandConfig;
use crate::grid::TerrainGrid;
use crate::tile::Terrain;

pub struct SandStage {
    config: SandConfig,
}

impl SandStage {
    pub fn new(config: SandConfig) -> Self {
        Self { config }
    }

    // Grass with water directly N/S/E/W becomes sand. Eligibility is read
    // from a snapshot so new sand never spreads within the pass.
    // Returns the number of cells converted.
    pub fn shoreline(&self, grid: &mut TerrainGrid) -> usize {
        let snapshot = grid.clone();
        let mut converted = 0;
        for (x, y, t) in snapshot.cells() {
            if t == Terrain::Grass && snapshot.has_orthogonal_neighbor_of_type(x, y, Terrain::Water)
            {
                grid.set(x, y, Terrain::Sand);
                converted += 1;
            }
        }
        converted
    }

    pub fn apply(&self, grid: &mut TerrainGrid) {
        let converted = self.shoreline(grid);
        let reverted = grid.smooth(Terrain::Sand, self.config.smooth_neighbors);
        log::debug!("sand: {} shoreline cells, {} reverted", converted, reverted);
    }
}
