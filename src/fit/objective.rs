use serde::{
    Deserialize,
    Serialize
};

use crate::distribution::griddistribution::GridDistribution;
use crate::math::finitedifference::forward_difference;
use crate::math::grid::mean;

/// Reward maximized by the smoothing fitter.
pub trait Objective {
    fn value(&self, distribution: &GridDistribution) -> f64;
}

impl<F> Objective for F where
    F: Fn(&GridDistribution) -> f64 {
    fn value(&self, distribution: &GridDistribution) -> f64 {
        self(distribution)
    }
}

/// Shannon entropy of the density values; the default objective.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EntropyObjective;

impl Objective for EntropyObjective {
    fn value(&self, distribution: &GridDistribution) -> f64 {
        distribution.entropy()
    }
}

/// Penalizes roughness: the negative weighted mean square of the `order`-th
/// finite difference of the density values, with the grid step taken as
/// `1 / N`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivativeObjective {
    order: usize,
    weight: Option<f64>,
}

impl DerivativeObjective {
    pub fn new(order: usize) -> DerivativeObjective {
        DerivativeObjective { order, weight: None }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Explicit weight, or `1e-3 / order²`.
    pub fn weight(&self) -> f64 {
        self.weight.unwrap_or(1e-3 / (self.order * self.order).max(1) as f64)
    }
}

impl Default for DerivativeObjective {
    fn default() -> Self {
        DerivativeObjective::new(1)
    }
}

impl Objective for DerivativeObjective {
    fn value(&self, distribution: &GridDistribution) -> f64 {
        let delta = 1.0 / distribution.len() as f64;
        let scale = delta.powi(self.order as i32);
        let squares: Vec<f64> = forward_difference(distribution.density(), self.order)
            .into_iter()
            .map(|d| (d / scale).powi(2))
            .collect();
        -self.weight() * mean(&squares)
    }
}
