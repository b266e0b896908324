use thiserror::Error;

use crate::distribution::distributionerror::DistributionError;

#[derive(Debug, Error)]
pub enum FitError {
    #[error("invalid bounds [{lb}, {ub}]")]
    InvalidBounds { lb: f64, ub: f64 },
    #[error("a fit needs at least 2 grid points, got {0}")]
    TooFewPoints(usize),
    #[error("{functions} moment functions but {values} target values")]
    MomentCountMismatch { functions: usize, values: usize },
    #[error("optimizer failed: {0}")]
    Optimizer(String),
    #[error("optimization did not converge ({termination})")]
    OptimizationDidNotConverge { termination: String },
    #[error(transparent)]
    Distribution(#[from] DistributionError),
}

impl FitError {
    pub(crate) fn check_bounds(lb: f64, ub: f64, num: usize) -> Result<(), FitError> {
        if !(lb.is_finite() && ub.is_finite() && lb < ub) {
            return Err(FitError::InvalidBounds { lb, ub });
        }
        if num < 2 {
            return Err(FitError::TooFewPoints(num));
        }
        Ok(())
    }
}
