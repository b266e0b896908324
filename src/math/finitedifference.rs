// ─────────────────────────────────────────────
// 有限差分
// ─────────────────────────────────────────────

/// n 階前向差分（等同重複 `order` 次 `diff`）。
///
/// `order >= values.len()` 時回傳空向量。
pub fn forward_difference(values: &[f64], order: usize) -> Vec<f64> {
    let mut diff = values.to_vec();
    for _ in 0..order {
        if diff.len() < 2 {
            return Vec::new();
        }
        diff = diff.windows(2).map(|w| w[1] - w[0]).collect();
    }
    diff
}

/// 以中央差分近似黑箱純量函數的梯度。
///
/// 每個座標的步長為 `step * max(1, |x_i|)`，避免大數值座標的相對誤差過小。
pub fn central_gradient<F>(f: F, x: &[f64], step: f64) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let mut point = x.to_vec();
    (0..x.len())
        .map(|i| {
            let h = step * x[i].abs().max(1.0);
            point[i] = x[i] + h;
            let upper = f(&point);
            point[i] = x[i] - h;
            let lower = f(&point);
            point[i] = x[i];
            (upper - lower) / (2.0 * h)
        })
        .collect()
}
