use serde::{
    Deserialize,
    Serialize
};

use crate::distribution::griddistribution::GridDistribution;

/// Persisted form of a [`GridDistribution`]: the grid and the stored density,
/// nothing else. The cumulative table is rebuilt on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DistributionState {
    #[serde(rename = "x")]
    grid: Vec<f64>,
    #[serde(rename = "f_x")]
    density: Vec<f64>,
}

impl DistributionState {
    pub fn new(grid: Vec<f64>, density: Vec<f64>) -> DistributionState {
        DistributionState { grid, density }
    }

    pub fn grid(&self) -> &Vec<f64> {
        &self.grid
    }

    pub fn density(&self) -> &Vec<f64> {
        &self.density
    }

    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.grid, self.density)
    }
}

impl From<&GridDistribution> for DistributionState {
    fn from(distribution: &GridDistribution) -> Self {
        DistributionState::new(
            distribution.grid().to_vec(),
            distribution.density().to_vec()
        )
    }
}
