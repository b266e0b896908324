use rand::Rng;
use tracing::trace;

use crate::distribution::densityscale::DensityScale;
use crate::distribution::distributionerror::DistributionError;
use crate::distribution::distributionstate::DistributionState;
use crate::distribution::momentkind::MomentKind;
use crate::math::grid::{
    linspace,
    mean
};

/// `ppf` stops once `|cdf(x) - q|` falls below this.
pub const PPF_TOLERANCE: f64 = 1e-4;
/// `ppf` gives up after this many halving steps.
pub const PPF_MAX_ITER: u32 = 100;

pub const DEFAULT_GRID_SIZE: usize = 50;

/// Piecewise-linear probability density over an ordered grid.
///
/// The density integrates to 1 over the grid. Fitters keep that invariant as
/// a hard constraint and every query assumes it.
#[derive(Debug, Clone, PartialEq)]
pub struct GridDistribution {
    grid: Vec<f64>,
    density: Vec<f64>,
    /// Derived from `density`; rebuilt on every change, never persisted.
    cumulative: Vec<f64>,
    scale: DensityScale,
}

fn validate(grid: &[f64], density: &[f64]) -> Result<(), DistributionError> {
    if grid.len() < 2 {
        return Err(DistributionError::TooFewPoints(grid.len()));
    }
    if grid.len() != density.len() {
        return Err(DistributionError::LengthMismatch {
            grid: grid.len(),
            density: density.len()
        });
    }
    if let Some(i) = grid.iter().position(|x| !x.is_finite()) {
        return Err(DistributionError::NonFiniteGrid(i));
    }
    // 允許相鄰格點重合（退化格點），只拒絕遞減
    if let Some(i) = grid.windows(2).position(|w| w[1] < w[0]) {
        return Err(DistributionError::UnsortedGrid(i + 1));
    }
    if grid[grid.len() - 1] - grid[0] <= 0.0 {
        return Err(DistributionError::ZeroSpan);
    }
    if let Some((index, &value)) = density
        .iter()
        .enumerate()
        .find(|(_, f)| !f.is_finite() || **f < 0.0) {
        return Err(DistributionError::InvalidDensity { index, value });
    }
    if density.iter().sum::<f64>() <= 0.0 {
        return Err(DistributionError::ZeroMass);
    }
    Ok(())
}

impl GridDistribution {
    /// Plain density over `grid`, normalized so that `Σ f_i · span / N = 1`.
    pub fn new(grid: Vec<f64>, density: Vec<f64>) -> Result<GridDistribution, DistributionError> {
        validate(&grid, &density)?;
        let density = Self::normalize(&grid, density);
        Ok(Self::from_parts_unchecked(grid, density, DensityScale::Normalized))
    }

    /// Uniform unit-span density on `num` evenly spaced points over `[lb, ub]`.
    pub fn uniform(lb: f64, ub: f64, num: usize) -> Result<GridDistribution, DistributionError> {
        Self::from_parts(linspace(lb, ub, num), vec![1.0; num], DensityScale::UnitSpan)
    }

    /// Takes `grid` and `density` as they are; nothing is re-normalized.
    pub fn from_parts(grid: Vec<f64>,
                      density: Vec<f64>,
                      scale: DensityScale) -> Result<GridDistribution, DistributionError> {
        validate(&grid, &density)?;
        Ok(Self::from_parts_unchecked(grid, density, scale))
    }

    pub(crate) fn from_parts_unchecked(grid: Vec<f64>,
                                       density: Vec<f64>,
                                       scale: DensityScale) -> GridDistribution {
        let cumulative = scale.cumulative(&density);
        GridDistribution { grid, density, cumulative, scale }
    }

    fn normalize(grid: &[f64], density: Vec<f64>) -> Vec<f64> {
        let span = grid[grid.len() - 1] - grid[0];
        let mass = density.iter().sum::<f64>() * span / grid.len() as f64;
        density.into_iter().map(|f| f / mass).collect()
    }

    /// Replaces the density values, keeping the grid.
    ///
    /// Values are normalized again for the `Normalized` scale and taken
    /// verbatim for `UnitSpan`.
    pub fn set_density(&mut self, density: Vec<f64>) -> Result<(), DistributionError> {
        validate(&self.grid, &density)?;
        self.density = match self.scale {
            DensityScale::Normalized => Self::normalize(&self.grid, density),
            DensityScale::UnitSpan => density,
        };
        self.cumulative = self.scale.cumulative(&self.density);
        Ok(())
    }

    pub fn grid(&self) -> &[f64] {
        &self.grid
    }

    pub fn density(&self) -> &[f64] {
        &self.density
    }

    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    pub fn scale(&self) -> DensityScale {
        self.scale
    }

    pub fn len(&self) -> usize {
        self.grid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    pub fn lower_bound(&self) -> f64 {
        self.grid[0]
    }

    pub fn upper_bound(&self) -> f64 {
        self.grid[self.grid.len() - 1]
    }

    pub fn span(&self) -> f64 {
        self.upper_bound() - self.lower_bound()
    }

    /// Stored values rescaled to grid-mean 1, whatever the scale.
    pub fn unit_density(&self) -> Vec<f64> {
        let factor = self.scale.unit_factor(self.span());
        self.density.iter().map(|f| f * factor).collect()
    }

    /// `Σ f_i · span / N` in density units; 1 for a well-formed distribution.
    pub fn total_mass(&self) -> f64 {
        mean(&self.density) * self.scale.unit_factor(self.span())
    }

    // ─────────────────────────────────────────────
    // Interpolation
    // ─────────────────────────────────────────────

    /// Neighbouring grid indices of `x` with their linear weights:
    /// `(lo, w_lo, hi, w_hi)`.
    ///
    /// `lo` is the last index with `grid[lo] <= x`, `hi` the first with
    /// `grid[hi] >= x`; they coincide when `x` is a grid point. Coincident
    /// neighbours get 0.5 / 0.5. `x` is clamped to the grid.
    pub fn weights(&self, x: f64) -> (usize, f64, usize, f64) {
        let x = x.clamp(self.lower_bound(), self.upper_bound());
        let lo = self.grid.partition_point(|g| *g <= x).max(1) - 1;
        let hi = self.grid.partition_point(|g| *g < x).min(self.grid.len() - 1);
        let delta = self.grid[hi] - self.grid[lo];
        if delta == 0.0 {
            (lo, 0.5, hi, 0.5)
        } else {
            (
                lo,
                1.0 - (x - self.grid[lo]) / delta,
                hi,
                1.0 - (self.grid[hi] - x) / delta
            )
        }
    }

    /// Probability density at `x`; 0 outside the grid.
    pub fn pdf(&self, x: f64) -> f64 {
        if x.is_nan() {
            return f64::NAN;
        }
        if x < self.lower_bound() || self.upper_bound() < x {
            return 0.0;
        }
        let (lo, w_lo, hi, w_hi) = self.weights(x);
        (w_lo * self.density[lo] + w_hi * self.density[hi]) * self.scale.pdf_factor(self.span())
    }

    /// Cumulative probability at `x`, saturating to 0 / 1 outside the grid.
    pub fn cdf(&self, x: f64) -> f64 {
        if x.is_nan() {
            return f64::NAN;
        }
        if x <= self.lower_bound() {
            return 0.0;
        }
        if self.upper_bound() <= x {
            return 1.0;
        }
        let (lo, w_lo, hi, w_hi) = self.weights(x);
        let lo = self.scale.cdf_lower_index(lo);
        w_lo * self.cumulative[lo] + w_hi * self.cumulative[hi]
    }

    /// Survival function, `1 - cdf(x)`.
    pub fn sf(&self, x: f64) -> f64 {
        1.0 - self.cdf(x)
    }

    /// Percent point function (inverse of `cdf`).
    ///
    /// Starts at the grid midpoint and moves by `span / 2^(i+1)` on step `i`
    /// towards `q`, until `|cdf(x) - q| < PPF_TOLERANCE` or more than
    /// `PPF_MAX_ITER` steps were taken. `q` is not range-checked: for values
    /// outside `[0, 1]` every step goes the same way and the search ends
    /// about `span / 2` beyond the nearest end of the grid.
    pub fn ppf(&self, q: f64) -> f64 {
        if q == 0.0 {
            return self.lower_bound();
        }
        if q == 1.0 {
            return self.upper_bound();
        }
        let span = self.span();
        let mut x = 0.5 * (self.lower_bound() + self.upper_bound());
        let mut iteration: u32 = 0;
        loop {
            let delta = self.cdf(x) - q;
            if delta.abs() < PPF_TOLERANCE {
                return x;
            }
            if iteration > PPF_MAX_ITER {
                trace!(q, x, delta, "ppf reached the iteration cap");
                return x;
            }
            let step = span / 2f64.powi(iteration as i32 + 1);
            if delta < 0.0 {
                x += step;
            } else {
                x -= step;
            }
            iteration += 1;
        }
    }

    /// Inverse survival function, `ppf(1 - q)`.
    pub fn isf(&self, q: f64) -> f64 {
        self.ppf(1.0 - q)
    }

    pub fn pdf_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.pdf(x)).collect()
    }

    pub fn cdf_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.cdf(x)).collect()
    }

    pub fn sf_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.sf(x)).collect()
    }

    pub fn ppf_many(&self, qs: &[f64]) -> Vec<f64> {
        qs.iter().map(|&q| self.ppf(q)).collect()
    }

    pub fn isf_many(&self, qs: &[f64]) -> Vec<f64> {
        qs.iter().map(|&q| self.isf(q)).collect()
    }

    // ─────────────────────────────────────────────
    // Moments
    // ─────────────────────────────────────────────

    /// Grid average of `t(x)^degree` weighted by the unit-span density, where
    /// `t` is the shift/scale selected by `kind`.
    ///
    /// With `normalize`, returns `moment^(1/degree)` instead.
    ///
    /// A `Normalized` distribution is first rescaled to grid-mean 1, so its
    /// moments are `span` times the grid average of the stored values, not
    /// that average itself.
    pub fn moment(&self, degree: u32, kind: MomentKind, normalize: bool) -> f64 {
        let (shift, scale) = match kind {
            MomentKind::Raw => (0.0, 1.0),
            MomentKind::Central => (self.mean(), 1.0),
            MomentKind::Standardized => (self.mean(), self.std()),
        };
        let factor = self.scale.unit_factor(self.span());
        let terms: Vec<f64> = self.grid
            .iter()
            .zip(self.density.iter())
            .map(|(x, f)| ((x - shift) / scale).powi(degree as i32) * f * factor)
            .collect();
        let value = mean(&terms);
        if normalize {
            value.powf(1.0 / degree as f64)
        } else {
            value
        }
    }

    pub fn mean(&self) -> f64 {
        self.moment(1, MomentKind::Raw, false)
    }

    pub fn var(&self) -> f64 {
        self.moment(2, MomentKind::Central, false)
    }

    pub fn std(&self) -> f64 {
        self.moment(2, MomentKind::Central, true)
    }

    pub fn median(&self) -> f64 {
        self.ppf(0.5)
    }

    /// Shannon entropy (natural log) of the stored density values, taken as
    /// unnormalized weights.
    pub fn entropy(&self) -> f64 {
        let total: f64 = self.density.iter().sum();
        if total <= 0.0 {
            return 0.0;
        }
        -self.density
            .iter()
            .filter(|f| **f > 0.0)
            .map(|f| {
                let p = f / total;
                p * p.ln()
            })
            .sum::<f64>()
    }

    // ─────────────────────────────────────────────
    // Sampling
    // ─────────────────────────────────────────────

    /// One draw by inverse-transform sampling.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.ppf(rng.random::<f64>())
    }

    pub fn rvs<R: Rng + ?Sized>(&self, size: usize, rng: &mut R) -> Vec<f64> {
        (0..size).map(|_| self.sample(rng)).collect()
    }

    // ─────────────────────────────────────────────
    // Persistence
    // ─────────────────────────────────────────────

    /// JSON object with the grid under `"x"` and the density under `"f_x"`.
    pub fn dump(&self) -> Result<String, DistributionError> {
        serde_json::to_string(&DistributionState::from(self))
            .map_err(DistributionError::Serialization)
    }

    /// Inverse of [`GridDistribution::dump`]; the values are restored exactly.
    pub fn load(state: &str, scale: DensityScale) -> Result<GridDistribution, DistributionError> {
        let state: DistributionState = serde_json::from_str(state)
            .map_err(DistributionError::Deserialization)?;
        let (grid, density) = state.into_parts();
        Self::from_parts(grid, density, scale)
    }
}

impl Default for GridDistribution {
    fn default() -> Self {
        GridDistribution::from_parts_unchecked(
            linspace(0.0, 1.0, DEFAULT_GRID_SIZE),
            vec![1.0; DEFAULT_GRID_SIZE],
            DensityScale::UnitSpan
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn triangle() -> GridDistribution {
        // f(x) = 2x on [0, 1]
        let grid = linspace(0.0, 1.0, 101);
        let density = grid.iter().map(|x| 2.0 * x).collect();
        GridDistribution::new(grid, density).unwrap()
    }

    #[test]
    fn default_is_uniform_unit_interval() {
        let dist = GridDistribution::default();
        assert_eq!(dist.len(), DEFAULT_GRID_SIZE);
        assert_eq!(dist.scale(), DensityScale::UnitSpan);
        assert_eq!(dist.lower_bound(), 0.0);
        assert_eq!(dist.upper_bound(), 1.0);
        assert_abs_diff_eq!(dist.pdf(0.3), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(dist.total_mass(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn unit_span_pdf_rescales_by_span() {
        let dist = GridDistribution::uniform(-2.0, 2.0, 11).unwrap();
        assert_abs_diff_eq!(dist.pdf(0.5), 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(dist.pdf(-2.0), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn pdf_is_zero_outside_grid() {
        let dist = triangle();
        assert_eq!(dist.pdf(-0.1), 0.0);
        assert_eq!(dist.pdf(1.1), 0.0);
    }

    #[test]
    fn normalized_constructor_rescales_density() {
        let dist = GridDistribution::new(vec![0.0, 1.0, 2.0, 3.0], vec![3.0; 4]).unwrap();
        // s = Σ f · span / N = 12 · 3 / 4
        assert_abs_diff_eq!(dist.density()[0], 3.0 / 9.0, epsilon = 1e-12);
        assert_abs_diff_eq!(dist.total_mass(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(dist.unit_density()[2], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn pdf_interpolates_linearly() {
        let dist = GridDistribution::new(vec![0.0, 1.0, 2.0], vec![1.0, 2.0, 3.0]).unwrap();
        let d = dist.density();
        assert_abs_diff_eq!(dist.pdf(0.25), 0.75 * d[0] + 0.25 * d[1], epsilon = 1e-12);
        assert_abs_diff_eq!(dist.pdf(1.0), d[1], epsilon = 1e-12);
    }

    #[test]
    fn weights_on_grid_point() {
        let dist = GridDistribution::default();
        let x = dist.grid()[7];
        let (lo, w_lo, hi, w_hi) = dist.weights(x);
        assert_eq!((lo, hi), (7, 7));
        assert_eq!((w_lo, w_hi), (0.5, 0.5));
    }

    #[test]
    fn cdf_boundaries() {
        let dist = triangle();
        assert_eq!(dist.cdf(0.0), 0.0);
        assert_eq!(dist.cdf(-5.0), 0.0);
        assert_eq!(dist.cdf(1.0), 1.0);
        assert_eq!(dist.cdf(7.0), 1.0);
        assert_abs_diff_eq!(dist.sf(0.0), 1.0);
    }

    #[test]
    fn normalized_cdf_tracks_exact_integral() {
        let dist = triangle();
        for &x in &[0.1, 0.25, 0.5, 0.8] {
            assert_abs_diff_eq!(dist.cdf(x), x * x, epsilon = 1e-3);
        }
    }

    #[test]
    fn unit_span_cdf_applies_lower_index_adjustment() {
        let dist = GridDistribution::from_parts(
            vec![0.0, 1.0, 2.0, 3.0],
            vec![1.0, 1.0, 1.0, 1.0],
            DensityScale::UnitSpan
        ).unwrap();
        // between grid[1] and grid[2] the lower index is pulled back to 0
        let c = dist.cumulative();
        assert_abs_diff_eq!(dist.cdf(1.5), 0.5 * c[0] + 0.5 * c[2], epsilon = 1e-12);
    }

    #[test]
    fn ppf_inverts_cdf() {
        for dist in [triangle(), GridDistribution::default()] {
            for &q in &[0.1, 0.3, 0.5, 0.7, 0.9] {
                assert_abs_diff_eq!(dist.cdf(dist.ppf(q)), q, epsilon = 1e-3);
            }
        }
    }

    #[test]
    fn ppf_boundaries_and_isf() {
        let dist = triangle();
        assert_eq!(dist.ppf(0.0), 0.0);
        assert_eq!(dist.ppf(1.0), 1.0);
        assert_abs_diff_eq!(dist.isf(0.75), dist.ppf(0.25), epsilon = 1e-12);
        assert_abs_diff_eq!(dist.median(), 0.5f64.sqrt(), epsilon = 1e-3);
    }

    #[test]
    fn ppf_out_of_range_extrapolates_deterministically() {
        // every step moves the same way, so the search ends near mid ± span
        let dist = triangle();
        let above = dist.ppf(1.5);
        let below = dist.ppf(-0.5);
        assert_abs_diff_eq!(above, 1.5, epsilon = 1e-6);
        assert_abs_diff_eq!(below, -0.5, epsilon = 1e-6);
        assert_eq!(above, dist.ppf(1.5));
    }

    #[test]
    fn bulk_queries_preserve_order_and_length() {
        let dist = triangle();
        let xs = [0.9, -1.0, 0.2, 0.5];
        let pdfs = dist.pdf_many(&xs);
        let cdfs = dist.cdf_many(&xs);
        let sfs = dist.sf_many(&xs);
        assert_eq!(pdfs.len(), xs.len());
        for (i, &x) in xs.iter().enumerate() {
            assert_eq!(pdfs[i], dist.pdf(x));
            assert_eq!(cdfs[i], dist.cdf(x));
            assert_eq!(sfs[i], dist.sf(x));
        }
        let qs = [0.2, 0.6];
        assert_eq!(dist.ppf_many(&qs), vec![dist.ppf(0.2), dist.ppf(0.6)]);
        assert_eq!(dist.isf_many(&qs), vec![dist.isf(0.2), dist.isf(0.6)]);
    }

    #[test]
    fn moments_of_uniform() {
        let dist = GridDistribution::uniform(0.0, 1.0, 201).unwrap();
        assert_abs_diff_eq!(dist.mean(), 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(dist.var(), 1.0 / 12.0, epsilon = 1e-2);
        assert_abs_diff_eq!(dist.std(), dist.var().sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(dist.moment(3, MomentKind::Central, false), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(dist.moment(2, MomentKind::Standardized, false), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn moments_use_unit_density_for_both_scales() {
        let grid = linspace(0.0, 2.0, 21);
        let plain = GridDistribution::new(grid.clone(), vec![5.0; 21]).unwrap();
        let unit = GridDistribution::from_parts(grid, vec![1.0; 21], DensityScale::UnitSpan).unwrap();
        assert_abs_diff_eq!(plain.mean(), unit.mean(), epsilon = 1e-12);
        assert_abs_diff_eq!(plain.var(), unit.var(), epsilon = 1e-12);
        // stored values average 0.5 on a span of 2; moments see them times span
        assert_abs_diff_eq!(mean(plain.density()), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(plain.moment(0, MomentKind::Raw, false), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn entropy_of_uniform_weights() {
        let dist = GridDistribution::default();
        assert_abs_diff_eq!(dist.entropy(), (DEFAULT_GRID_SIZE as f64).ln(), epsilon = 1e-12);
        let peaked = GridDistribution::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 0.0]).unwrap();
        assert_abs_diff_eq!(peaked.entropy(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_grid_uses_equal_weights() {
        let dist = GridDistribution::new(
            vec![0.0, 0.5, 0.5, 1.0],
            vec![1.0, 2.0, 4.0, 1.0]
        ).unwrap();
        let (lo, w_lo, hi, w_hi) = dist.weights(0.5);
        assert_eq!((w_lo, w_hi), (0.5, 0.5));
        assert_eq!(dist.grid()[lo], dist.grid()[hi]);
        let d = dist.density();
        assert_abs_diff_eq!(dist.pdf(0.5), 0.5 * d[lo] + 0.5 * d[hi], epsilon = 1e-12);
        assert!(dist.cdf(0.5).is_finite());

        let smoother = GridDistribution::from_parts(
            vec![0.0, 0.5, 0.5, 1.0],
            vec![1.0, 1.0, 1.0, 1.0],
            DensityScale::UnitSpan
        ).unwrap();
        assert!(smoother.pdf(0.5).is_finite());
        assert!(smoother.cdf(0.5).is_finite());
    }

    #[test]
    fn constructor_rejects_bad_input() {
        assert!(matches!(
            GridDistribution::new(vec![0.0], vec![1.0]),
            Err(DistributionError::TooFewPoints(1))
        ));
        assert!(matches!(
            GridDistribution::new(vec![0.0, 1.0], vec![1.0]),
            Err(DistributionError::LengthMismatch { grid: 2, density: 1 })
        ));
        assert!(matches!(
            GridDistribution::new(vec![0.0, 2.0, 1.0], vec![1.0; 3]),
            Err(DistributionError::UnsortedGrid(2))
        ));
        assert!(matches!(
            GridDistribution::new(vec![1.0, 1.0], vec![1.0; 2]),
            Err(DistributionError::ZeroSpan)
        ));
        assert!(matches!(
            GridDistribution::new(vec![0.0, 1.0], vec![1.0, -1.0]),
            Err(DistributionError::InvalidDensity { index: 1, .. })
        ));
        assert!(matches!(
            GridDistribution::new(vec![0.0, 1.0], vec![0.0, 0.0]),
            Err(DistributionError::ZeroMass)
        ));
        assert!(matches!(
            GridDistribution::new(vec![0.0, f64::INFINITY], vec![1.0, 1.0]),
            Err(DistributionError::NonFiniteGrid(1))
        ));
    }

    #[test]
    fn set_density_recomputes_cumulative() {
        let mut dist = GridDistribution::uniform(0.0, 1.0, 5).unwrap();
        dist.set_density(vec![0.0, 0.0, 5.0, 0.0, 0.0]).unwrap();
        assert_eq!(dist.cumulative()[1], 0.0);
        assert_eq!(dist.cumulative()[2], 1.0);
        assert!(dist.set_density(vec![1.0; 3]).is_err());
    }

    #[test]
    fn dump_and_load_round_trip() {
        let dist = triangle();
        let text = dist.dump().unwrap();
        assert!(text.contains("\"x\""));
        assert!(text.contains("\"f_x\""));
        let restored = GridDistribution::load(&text, DensityScale::Normalized).unwrap();
        assert_eq!(restored.grid(), dist.grid());
        assert_eq!(restored.density(), dist.density());
        assert_eq!(restored, dist);
    }

    #[test]
    fn load_rejects_malformed_state() {
        assert!(matches!(
            GridDistribution::load("{\"x\": [0.0, 1.0]}", DensityScale::UnitSpan),
            Err(DistributionError::Deserialization(_))
        ));
        assert!(matches!(
            GridDistribution::load("{\"x\": [0.0, 1.0], \"f_x\": \"oops\"}", DensityScale::UnitSpan),
            Err(DistributionError::Deserialization(_))
        ));
        assert!(matches!(
            GridDistribution::load("{\"x\": [0.0, 1.0], \"f_x\": [1.0]}", DensityScale::UnitSpan),
            Err(DistributionError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn sampling_stays_on_grid_and_is_reproducible() {
        let dist = triangle();
        let mut rng = StdRng::seed_from_u64(7);
        let draws = dist.rvs(500, &mut rng);
        assert_eq!(draws.len(), 500);
        assert!(draws.iter().all(|x| (0.0..=1.0).contains(x)));
        let sample_mean = draws.iter().sum::<f64>() / draws.len() as f64;
        assert_abs_diff_eq!(sample_mean, 2.0 / 3.0, epsilon = 0.05);

        let mut again = StdRng::seed_from_u64(7);
        assert_eq!(dist.rvs(500, &mut again), draws);
    }
}
