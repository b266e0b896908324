use thiserror::Error;

#[derive(Debug, Error)]
pub enum DistributionError {
    #[error("a grid needs at least 2 points, got {0}")]
    TooFewPoints(usize),
    #[error("grid has {grid} points but density has {density}")]
    LengthMismatch { grid: usize, density: usize },
    #[error("grid value at index {0} is not finite")]
    NonFiniteGrid(usize),
    #[error("grid is not sorted at index {0}")]
    UnsortedGrid(usize),
    #[error("grid spans zero width")]
    ZeroSpan,
    #[error("density value {value} at index {index} is negative or not finite")]
    InvalidDensity { index: usize, value: f64 },
    #[error("density carries no probability mass")]
    ZeroMass,
    #[error("failed to deserialize distribution state: {0}")]
    Deserialization(#[source] serde_json::Error),
    #[error("failed to serialize distribution state: {0}")]
    Serialization(#[source] serde_json::Error),
}
