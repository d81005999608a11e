use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    // Stored cells could not be decoded back into terrain.
    #[error("corrupt save: {0}")]
    Terrain(#[from] terrain::TerrainError),

    // Header dimensions disagree with the stored rows.
    #[error("save declares {declared_w}x{declared_h} but holds {actual_w}x{actual_h}")]
    DimensionMismatch {
        declared_w: u32,
        declared_h: u32,
        actual_w: usize,
        actual_h: usize,
    },
}

pub type Result<T> = std::result::Result<T, StorageError>;
