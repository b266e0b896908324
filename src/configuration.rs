use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{
    Deserialize,
    Serialize
};
use thiserror::Error;

use crate::math::integration::gausskronrod::QuadratureOptions;

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("cannot read configuration: {0}")]
    IO(#[from] std::io::Error),
    #[error("cannot parse configuration: {0}")]
    JsonParse(#[from] serde_json::Error),
}

/// Solver settings shared by both fitters.
///
/// Every field is optional in JSON; missing ones take the defaults below.
///
/// ```json
/// {
///     "max_iters": 200,
///     "max_evaluations": 10000,
///     "lbfgs_memory": 7,
///     "tolerance_grad": 1e-8,
///     "tolerance_cost": 1e-12,
///     "finite_difference_step": 1e-6,
///     "strict": false,
///     "quadrature": { "atol": 1e-10, "rtol": 1e-10, "limit": 50 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfiguration {
    max_iters: u64,
    /// Cap on cost and gradient calls across the whole run, line searches
    /// included.
    max_evaluations: u64,
    lbfgs_memory: usize,
    tolerance_grad: f64,
    tolerance_cost: f64,
    finite_difference_step: f64,
    /// Turn a non-converged fit into an error (the distribution is still
    /// updated with the best iterate).
    strict: bool,
    quadrature: QuadratureOptions,
}

impl Default for FitConfiguration {
    fn default() -> Self {
        FitConfiguration {
            max_iters: 200,
            max_evaluations: 10_000,
            lbfgs_memory: 7,
            tolerance_grad: 1e-8,
            tolerance_cost: 1e-12,
            finite_difference_step: 1e-6,
            strict: false,
            quadrature: QuadratureOptions::default(),
        }
    }
}

impl FitConfiguration {
    pub fn new() -> FitConfiguration {
        FitConfiguration::default()
    }

    pub fn from_reader<P: AsRef<Path>>(file_path: P) -> Result<FitConfiguration, ConfigurationError> {
        let file = File::open(file_path)?;
        let reader = BufReader::new(file);
        let configuration: FitConfiguration = serde_json::from_reader(reader)?;
        Ok(configuration)
    }

    pub fn from_json(json: &str) -> Result<FitConfiguration, ConfigurationError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn max_iters(&self) -> u64 {
        self.max_iters
    }

    pub fn max_evaluations(&self) -> u64 {
        self.max_evaluations
    }

    pub fn lbfgs_memory(&self) -> usize {
        self.lbfgs_memory
    }

    pub fn tolerance_grad(&self) -> f64 {
        self.tolerance_grad
    }

    pub fn tolerance_cost(&self) -> f64 {
        self.tolerance_cost
    }

    pub fn finite_difference_step(&self) -> f64 {
        self.finite_difference_step
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    pub fn quadrature(&self) -> &QuadratureOptions {
        &self.quadrature
    }

    pub fn with_max_iters(mut self, max_iters: u64) -> Self {
        self.max_iters = max_iters;
        self
    }

    pub fn with_max_evaluations(mut self, max_evaluations: u64) -> Self {
        self.max_evaluations = max_evaluations;
        self
    }

    pub fn with_lbfgs_memory(mut self, lbfgs_memory: usize) -> Self {
        self.lbfgs_memory = lbfgs_memory;
        self
    }

    pub fn with_tolerance_grad(mut self, tolerance_grad: f64) -> Self {
        self.tolerance_grad = tolerance_grad;
        self
    }

    pub fn with_tolerance_cost(mut self, tolerance_cost: f64) -> Self {
        self.tolerance_cost = tolerance_cost;
        self
    }

    pub fn with_finite_difference_step(mut self, step: f64) -> Self {
        self.finite_difference_step = step;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_quadrature(mut self, quadrature: QuadratureOptions) -> Self {
        self.quadrature = quadrature;
        self
    }
}
