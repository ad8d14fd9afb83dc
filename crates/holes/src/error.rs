use imageproc::region_labelling::Connectivity;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HoleError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("Connectivity mismatch: component counter uses {components:?}, Euler calculator uses {euler:?}")]
    ConnectivityMismatch {
        components: Connectivity,
        euler: Connectivity,
    },

    #[error("Euler pattern difference {difference} is not a multiple of 4")]
    NonIntegralEuler { difference: i64 },

    #[error("Failed to load image: {0}")]
    ImageLoad(#[from] image::ImageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HoleError>;
