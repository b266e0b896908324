use serde::{
    Deserialize,
    Serialize
};

use crate::distribution::griddistribution::GridDistribution;
use crate::distribution::momentkind::MomentKind;

/// Penalty added to the smoothing loss; zero when satisfied.
pub trait Constraint {
    fn penalty(&self, distribution: &GridDistribution) -> f64;
}

impl<F> Constraint for F where
    F: Fn(&GridDistribution) -> f64 {
    fn penalty(&self, distribution: &GridDistribution) -> f64 {
        self(distribution)
    }
}

/// Requires `mass` of the probability to lie in `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassConstraint {
    lower: f64,
    upper: f64,
    mass: f64,
    weight: Option<f64>,
}

impl MassConstraint {
    pub fn new(lower: f64, upper: f64, mass: f64) -> MassConstraint {
        MassConstraint { lower, upper, mass, weight: None }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Explicit weight, or 500.
    pub fn weight(&self) -> f64 {
        self.weight.unwrap_or(5e2)
    }

    /// Mass the distribution currently puts in `[lower, upper]`.
    pub fn current_mass(&self, distribution: &GridDistribution) -> f64 {
        distribution.cdf(self.upper) - distribution.cdf(self.lower)
    }
}

impl Constraint for MassConstraint {
    fn penalty(&self, distribution: &GridDistribution) -> f64 {
        self.weight() * (self.current_mass(distribution) - self.mass).powi(2)
    }
}

/// Requires `moment(degree, kind, normalize)` to equal `value`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MomentConstraint {
    value: f64,
    degree: u32,
    kind: MomentKind,
    normalize: bool,
    weight: Option<f64>,
}

impl MomentConstraint {
    pub fn new(value: f64, degree: u32) -> MomentConstraint {
        MomentConstraint {
            value,
            degree,
            kind: MomentKind::Raw,
            normalize: false,
            weight: None
        }
    }

    pub fn with_kind(mut self, kind: MomentKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn degree(&self) -> u32 {
        self.degree
    }

    pub fn kind(&self) -> MomentKind {
        self.kind
    }

    pub fn normalize(&self) -> bool {
        self.normalize
    }

    /// Explicit weight, or `500 / span²` of the distribution it is applied to.
    pub fn weight_for(&self, distribution: &GridDistribution) -> f64 {
        self.weight.unwrap_or_else(|| 5e2 / distribution.span().powi(2))
    }
}

impl Constraint for MomentConstraint {
    fn penalty(&self, distribution: &GridDistribution) -> f64 {
        let moment = distribution.moment(self.degree, self.kind, self.normalize);
        self.weight_for(distribution) * (moment - self.value).powi(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn mass_constraint_penalty() {
        let dist = GridDistribution::uniform(0.0, 1.0, 101).unwrap();
        let satisfied = MassConstraint::new(0.0, 1.0, 1.0);
        assert_eq!(satisfied.penalty(&dist), 0.0);

        let violated = MassConstraint::new(0.0, 1.0, 0.5);
        assert_abs_diff_eq!(violated.penalty(&dist), 500.0 * 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(violated.with_weight(4.0).penalty(&dist), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn mass_constraint_measures_sub_interval() {
        let dist = GridDistribution::uniform(0.0, 1.0, 101).unwrap();
        let constraint = MassConstraint::new(0.25, 0.75, 0.5);
        assert_abs_diff_eq!(constraint.current_mass(&dist), 0.5, epsilon = 2e-2);
    }

    #[test]
    fn moment_constraint_weight_depends_on_span() {
        let dist = GridDistribution::uniform(-5.0, 5.0, 51).unwrap();
        let constraint = MomentConstraint::new(1.0, 1);
        assert_abs_diff_eq!(constraint.weight_for(&dist), 5.0, epsilon = 1e-12);
        // mean is 0, target 1
        assert_abs_diff_eq!(constraint.penalty(&dist), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn moment_constraint_uses_kind_and_norm() {
        let dist = GridDistribution::uniform(0.0, 1.0, 101).unwrap();
        let std_target = MomentConstraint::new(dist.std(), 2)
            .with_kind(MomentKind::Central)
            .with_normalize(true)
            .with_weight(1.0);
        assert_abs_diff_eq!(std_target.penalty(&dist), 0.0, epsilon = 1e-18);
        let raw = MomentConstraint::new(0.0, 2).with_weight(1.0);
        assert_abs_diff_eq!(raw.penalty(&dist), dist.moment(2, MomentKind::Raw, false).powi(2), epsilon = 1e-12);
    }

    #[test]
    fn closures_are_constraints() {
        let dist = GridDistribution::default();
        let constraint = |d: &GridDistribution| (d.median() - 0.5).abs();
        assert!(constraint.penalty(&dist) < 1e-3);
    }
}
