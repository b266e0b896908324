use argmin::core::{
    CostFunction,
    Gradient
};
use tracing::{
    debug,
    info,
    warn
};

use crate::configuration::FitConfiguration;
use crate::distribution::densityscale::DensityScale;
use crate::distribution::griddistribution::GridDistribution;
use crate::fit::constraint::Constraint;
use crate::fit::fiterror::FitError;
use crate::fit::fitreport::FitReport;
use crate::fit::objective::{
    EntropyObjective,
    Objective
};
use crate::math::finitedifference::central_gradient;
use crate::math::grid::linspace;
use crate::math::optimization::lbfgsminimizer::minimize;

/// `N · softmax(z)`: non-negative with grid mean exactly 1.
fn unit_density(z: &[f64]) -> Vec<f64> {
    let peak = z.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = z.iter().map(|v| (v - peak).exp()).collect();
    let total: f64 = exps.iter().sum();
    let n = z.len() as f64;
    exps.into_iter().map(|e| n * e / total).collect()
}

struct SmoothingProblem<'a> {
    grid: Vec<f64>,
    constraints: &'a [&'a dyn Constraint],
    objective: &'a dyn Objective,
    step: f64,
}

impl SmoothingProblem<'_> {
    fn loss(&self, z: &[f64]) -> f64 {
        let trial = GridDistribution::from_parts_unchecked(
            self.grid.clone(),
            unit_density(z),
            DensityScale::UnitSpan
        );
        let penalty: f64 = self.constraints.iter().map(|c| c.penalty(&trial)).sum();
        penalty - self.objective.value(&trial)
    }
}

impl CostFunction for SmoothingProblem<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, z: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        Ok(self.loss(z))
    }
}

impl Gradient for SmoothingProblem<'_> {
    type Param = Vec<f64>;
    type Gradient = Vec<f64>;

    fn gradient(&self, z: &Self::Param) -> Result<Self::Gradient, argmin::core::Error> {
        Ok(central_gradient(|p| self.loss(p), z, self.step))
    }
}

/// Fits a unit-span grid density by maximizing an objective minus the
/// constraint penalties.
#[derive(Debug, Clone, Default)]
pub struct SmoothingFitter {
    configuration: FitConfiguration,
}

impl SmoothingFitter {
    pub fn new(configuration: FitConfiguration) -> SmoothingFitter {
        SmoothingFitter { configuration }
    }

    pub fn configuration(&self) -> &FitConfiguration {
        &self.configuration
    }

    /// Re-grids `distribution` to `num` points on `[lb, ub]` and replaces its
    /// density with the fitted one.
    ///
    /// The distribution holds the best iterate even when the optimizer stops
    /// early; in strict mode that case is additionally returned as
    /// [`FitError::OptimizationDidNotConverge`].
    pub fn fit(&self,
               distribution: &mut GridDistribution,
               lb: f64,
               ub: f64,
               constraints: &[&dyn Constraint],
               objective: &dyn Objective,
               num: usize) -> Result<FitReport, FitError> {
        FitError::check_bounds(lb, ub, num)?;
        debug!(lb, ub, num, constraints = constraints.len(), "Starting smoothing fit");

        let problem = SmoothingProblem {
            grid: linspace(lb, ub, num),
            constraints,
            objective,
            step: self.configuration.finite_difference_step()
        };
        let grid = problem.grid.clone();
        let outcome = minimize(problem, vec![0.0; num], &self.configuration)?;

        *distribution = GridDistribution::from_parts(
            grid,
            unit_density(outcome.param()),
            DensityScale::UnitSpan
        )?;

        let report = FitReport::new(
            outcome.converged(),
            outcome.termination().to_string(),
            outcome.iterations(),
            outcome.cost(),
            Vec::new()
        );
        info!(
            termination = %report.termination(),
            iterations = report.iterations(),
            loss = report.loss(),
            "Smoothing fit finished"
        );
        if !report.converged() {
            warn!(termination = %report.termination(), "Smoothing fit did not converge");
            if self.configuration.strict() {
                return Err(FitError::OptimizationDidNotConverge {
                    termination: report.termination().to_string()
                });
            }
        }
        Ok(report)
    }

    /// [`SmoothingFitter::fit`] with [`EntropyObjective`].
    pub fn fit_entropy(&self,
                       distribution: &mut GridDistribution,
                       lb: f64,
                       ub: f64,
                       constraints: &[&dyn Constraint],
                       num: usize) -> Result<FitReport, FitError> {
        self.fit(distribution, lb, ub, constraints, &EntropyObjective, num)
    }
}
