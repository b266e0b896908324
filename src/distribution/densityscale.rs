use serde::{
    Deserialize,
    Serialize
};

/// The two flavours of grid density.
///
/// Both share the same interpolation engine and differ only in how the stored
/// values relate to a probability density and how the cumulative table is
/// built from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DensityScale {
    /// Stored values have grid-mean 1; `pdf` divides by the grid span.
    /// This is what the fitters produce.
    #[default]
    UnitSpan,
    /// Stored values are the density itself, normalized on assignment so
    /// that `Σ f_i · span / N = 1`.
    Normalized,
}

impl DensityScale {
    /// Factor applied to interpolated stored values in `pdf`.
    pub fn pdf_factor(&self, span: f64) -> f64 {
        match self {
            DensityScale::UnitSpan => 1.0 / span,
            DensityScale::Normalized => 1.0,
        }
    }

    /// Factor turning stored values into unit-span values (grid-mean 1).
    pub fn unit_factor(&self, span: f64) -> f64 {
        match self {
            DensityScale::UnitSpan => 1.0,
            DensityScale::Normalized => span,
        }
    }

    /// Lower cumulative index used by `cdf`.
    ///
    /// The running-sum table of the unit-span variant leads the interpolated
    /// density by one cell, so its lower index is pulled back by one.
    pub fn cdf_lower_index(&self, lo: usize) -> usize {
        match self {
            DensityScale::UnitSpan => lo.saturating_sub(1),
            DensityScale::Normalized => lo,
        }
    }

    /// Cumulative table, normalized so that its last entry is 1.
    ///
    /// UnitSpan: running sum of the stored values.
    /// Normalized: running sum of `f[i-1] + f[i]` starting from 0, i.e. the
    /// trapezoid rule with the common `h / 2` factor dropped.
    pub fn cumulative(&self, density: &[f64]) -> Vec<f64> {
        let increments: Vec<f64> = match self {
            DensityScale::UnitSpan => density.to_vec(),
            DensityScale::Normalized => std::iter::once(0.0)
                .chain(density.windows(2).map(|w| w[0] + w[1]))
                .collect(),
        };
        let mut total = 0.0;
        let mut running: Vec<f64> = increments
            .iter()
            .map(|inc| {
                total += inc;
                total
            })
            .collect();
        if total > 0.0 {
            running.iter_mut().for_each(|c| *c /= total);
        }
        running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn unit_span_cumulative_is_running_sum() {
        let cumulative = DensityScale::UnitSpan.cumulative(&[1.0, 1.0, 2.0]);
        assert_abs_diff_eq!(cumulative[0], 0.25);
        assert_abs_diff_eq!(cumulative[1], 0.5);
        assert_abs_diff_eq!(cumulative[2], 1.0);
    }

    #[test]
    fn normalized_cumulative_is_trapezoid() {
        let cumulative = DensityScale::Normalized.cumulative(&[1.0, 1.0, 2.0]);
        assert_eq!(cumulative[0], 0.0);
        assert_abs_diff_eq!(cumulative[1], 0.4);
        assert_abs_diff_eq!(cumulative[2], 1.0);
    }

    #[test]
    fn lower_index_adjustment() {
        assert_eq!(DensityScale::UnitSpan.cdf_lower_index(0), 0);
        assert_eq!(DensityScale::UnitSpan.cdf_lower_index(4), 3);
        assert_eq!(DensityScale::Normalized.cdf_lower_index(4), 4);
    }
}
