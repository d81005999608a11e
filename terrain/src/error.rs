use thiserror::Error;

// Errors raised while configuring, generating or decoding terrain.
#[derive(Error, Debug)]
pub enum TerrainError {
    // Width or height was zero.
    #[error("invalid dimensions {width}x{height}: both must be positive")]
    InvalidDimensions { width: usize, height: usize },

    // A generation parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // A persisted cell held a value outside the terrain enumeration.
    #[error("unknown terrain code {0}")]
    UnknownTerrainCode(u8),

    // Persisted rows were empty or not rectangular.
    #[error("malformed grid: {0}")]
    MalformedGrid(String),

    #[error(transparent)]
    ConfigParse(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, TerrainError>;
