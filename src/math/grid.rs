/// `num` evenly spaced points over `[start, stop]`, both ends included.
///
/// The last point is pinned to `stop` so accumulated rounding never moves the
/// upper bound of a grid.
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            let mut points: Vec<f64> = (0..num)
                .map(|i| f64::mul_add(i as f64, step, start))
                .collect();
            points[num - 1] = stop;
            points
        }
    }
}

/// Arithmetic mean; `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn linspace_includes_both_ends() {
        let points = linspace(-3.0, 3.0, 7);
        assert_eq!(points.len(), 7);
        assert_eq!(points[0], -3.0);
        assert_eq!(points[6], 3.0);
        for (i, x) in points.iter().enumerate() {
            assert_abs_diff_eq!(*x, -3.0 + i as f64, epsilon = 1e-12);
        }
    }

    #[test]
    fn linspace_degenerate_sizes() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(2.0, 5.0, 1), vec![2.0]);
    }

    #[test]
    fn mean_of_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_abs_diff_eq!(mean(&[1.0, 2.0, 6.0]), 3.0);
    }
}
