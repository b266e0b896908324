use argmin::core::{
    CostFunction,
    Gradient
};
use nalgebra::{
    DMatrix,
    DVector
};
use tracing::{
    debug,
    info,
    warn
};

use crate::configuration::FitConfiguration;
use crate::distribution::densityscale::DensityScale;
use crate::distribution::griddistribution::GridDistribution;
use crate::fit::fiterror::FitError;
use crate::fit::fitreport::FitReport;
use crate::math::grid::{
    linspace,
    mean
};
use crate::math::integration::gausskronrod::{
    QuadratureOptions,
    integrate
};
use crate::math::optimization::lbfgsminimizer::minimize;

/// `exp` overflows just above 709.
const MAX_EXPONENT: f64 = 700.0;
/// Largest moment residual `|∫ f_i p − v_i|` still counted as a match.
const MOMENT_TOLERANCE: f64 = 1e-4;

/// Dual of the max-entropy problem; `λ[0]` multiplies the constant
/// normalization function.
#[derive(Clone)]
struct MaxEntropyProblem<'a> {
    lb: f64,
    ub: f64,
    functions: &'a [&'a dyn Fn(f64) -> f64],
    /// Normalization target first, then the moment targets.
    targets: Vec<f64>,
    quadrature: QuadratureOptions,
}

impl MaxEntropyProblem<'_> {
    fn feature(&self, i: usize, x: f64) -> f64 {
        if i == 0 { 1.0 } else { (self.functions[i - 1])(x) }
    }

    fn exponent(&self, lambda: &[f64], x: f64) -> f64 {
        lambda
            .iter()
            .enumerate()
            .map(|(i, l)| l * self.feature(i, x))
            .sum()
    }

    /// Unnormalized exponential-family density `exp(Σ λ_i f_i(x))`, with the
    /// exponent capped at `MAX_EXPONENT`.
    fn density(&self, lambda: &[f64], x: f64) -> f64 {
        self.exponent(lambda, x).min(MAX_EXPONENT).exp()
    }

    /// `∂/∂λ_i` of the capped density: flat where the cap is active.
    fn density_derivative(&self, lambda: &[f64], i: usize, x: f64) -> f64 {
        let exponent = self.exponent(lambda, x);
        if exponent < MAX_EXPONENT {
            self.feature(i, x) * exponent.exp()
        } else {
            0.0
        }
    }

    fn integral<F: Fn(f64) -> f64>(&self, f: F) -> f64 {
        integrate(f, self.lb, self.ub, &self.quadrature).value()
    }
}

impl CostFunction for MaxEntropyProblem<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, lambda: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        let partition = self.integral(|x| self.density(lambda, x));
        let linear: f64 = lambda.iter().zip(self.targets.iter()).map(|(l, v)| l * v).sum();
        Ok(partition - linear)
    }
}

impl Gradient for MaxEntropyProblem<'_> {
    type Param = Vec<f64>;
    type Gradient = Vec<f64>;

    fn gradient(&self, lambda: &Self::Param) -> Result<Self::Gradient, argmin::core::Error> {
        Ok(self.targets
            .iter()
            .enumerate()
            .map(|(i, v)| self.integral(|x| self.density_derivative(lambda, i, x)) - v)
            .collect())
    }
}

/// Grid-mean-1 density values proportional to `exp(exponents)`.
fn density_from_exponents(exponents: &[f64]) -> Vec<f64> {
    // 先減去最大指數再取 exp，避免溢位；常數因子 span · exp(peak) 在正規化時消去
    let peak = exponents.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let sampled: Vec<f64> = exponents.iter().map(|e| (e - peak).exp()).collect();
    let level = mean(&sampled);
    sampled.into_iter().map(|f| f / level).collect()
}

/// Fits the maximum-entropy density on `[lb, ub]` that matches prescribed
/// expectations `E[f_i(X)] = v_i`.
#[derive(Debug, Clone, Default)]
pub struct MaxEntropyFitter {
    configuration: FitConfiguration,
}

impl MaxEntropyFitter {
    pub fn new(configuration: FitConfiguration) -> MaxEntropyFitter {
        MaxEntropyFitter { configuration }
    }

    pub fn configuration(&self) -> &FitConfiguration {
        &self.configuration
    }

    /// Solves the Lagrangian dual from `λ = 0` and writes the sampled
    /// density onto `num` points of `[lb, ub]` (unit-span, grid mean 1).
    ///
    /// The report carries the multipliers, normalization first.
    pub fn fit(&self,
               distribution: &mut GridDistribution,
               lb: f64,
               ub: f64,
               moment_funcs: &[&dyn Fn(f64) -> f64],
               values: &[f64],
               num: usize) -> Result<FitReport, FitError> {
        if moment_funcs.len() != values.len() {
            return Err(FitError::MomentCountMismatch {
                functions: moment_funcs.len(),
                values: values.len()
            });
        }
        FitError::check_bounds(lb, ub, num)?;
        debug!(lb, ub, num, moments = values.len(), "Starting max-entropy fit");

        let mut targets = Vec::with_capacity(values.len() + 1);
        targets.push(1.0);
        targets.extend_from_slice(values);
        let problem = MaxEntropyProblem {
            lb,
            ub,
            functions: moment_funcs,
            targets,
            quadrature: *self.configuration.quadrature()
        };
        let outcome = minimize(problem.clone(), vec![0.0; values.len() + 1], &self.configuration)?;

        let grid = linspace(lb, ub, num);
        // 設計矩陣：第 0 欄為常數 1，其餘為各動差函數在格點上的值
        let features = DMatrix::from_fn(num, values.len() + 1, |row, col| {
            if col == 0 { 1.0 } else { (moment_funcs[col - 1])(grid[row]) }
        });
        let lambda = DVector::from_column_slice(outcome.param());
        let exponents = features * lambda;
        let density = density_from_exponents(exponents.as_slice());
        *distribution = GridDistribution::from_parts(grid, density, DensityScale::UnitSpan)?;

        let residual = problem
            .gradient(&outcome.param().to_vec())
            .map_err(|e| FitError::Optimizer(e.to_string()))?
            .iter()
            .fold(0.0f64, |worst, r| worst.max(r.abs()));
        let (converged, termination) = if outcome.converged() && (residual.is_nan() || residual > MOMENT_TOLERANCE) {
            (false, String::from("MomentTargetsMissed"))
        } else {
            (outcome.converged(), outcome.termination().to_string())
        };
        let report = FitReport::new(
            converged,
            termination,
            outcome.iterations(),
            outcome.cost(),
            outcome.into_param()
        );
        info!(
            termination = %report.termination(),
            iterations = report.iterations(),
            loss = report.loss(),
            multipliers = ?report.multipliers(),
            residual,
            "Max-entropy fit finished"
        );
        if !report.converged() {
            warn!(termination = %report.termination(), "Max-entropy fit did not converge");
            if self.configuration.strict() {
                return Err(FitError::OptimizationDidNotConverge {
                    termination: report.termination().to_string()
                });
            }
        }
        Ok(report)
    }
}
