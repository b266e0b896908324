use serde::{
    Deserialize,
    Serialize
};
use tracing::warn;

// ─────────────────────────────────────────────────────────────────────────────
// Adaptive Gauss-Kronrod (G7-K15)
// ─────────────────────────────────────────────────────────────────────────────
//
// 每個區間以 15 點 Kronrod 規則求值，嵌入的 7 點 Gauss 規則與之相減作為誤差估計：
//
//   K15 = h · Σ wgk_j · f(c ± h·xgk_j)
//   G7  = h · Σ wg_j  · f(c ± h·xgk_{2j+1})
//   err = |K15 - G7|
//
// 自適應策略：總誤差未達 max(atol, rtol·|I|) 時，二分誤差最大的區間，
// 直到區間數達到 limit。

/// Kronrod abscissae on [-1, 1], descending; the last entry is the centre.
const XGK: [f64; 8] = [
    0.991_455_371_120_812_639_206_854_697_526_329,
    0.949_107_912_342_758_524_526_189_684_047_851,
    0.864_864_423_359_769_072_789_712_788_640_926,
    0.741_531_185_599_394_439_863_864_773_280_788,
    0.586_087_235_467_691_130_294_144_845_693_013,
    0.405_845_151_377_397_166_906_606_412_076_961,
    0.207_784_955_007_898_467_600_689_403_773_245,
    0.0,
];

const WGK: [f64; 8] = [
    0.022_935_322_010_529_224_963_732_008_058_970,
    0.063_092_092_629_978_553_290_700_663_189_204,
    0.104_790_010_322_250_183_839_876_322_541_518,
    0.140_653_259_715_525_918_745_189_590_510_238,
    0.169_004_726_639_267_902_826_583_426_598_550,
    0.190_350_578_064_785_409_913_256_402_421_014,
    0.204_432_940_075_298_892_414_161_999_234_649,
    0.209_482_141_084_727_828_012_999_174_891_714,
];

/// Gauss weights for the abscissae `XGK[1]`, `XGK[3]`, `XGK[5]`, `XGK[7]`.
const WG: [f64; 4] = [
    0.129_484_966_168_869_693_270_611_432_679_082,
    0.279_705_391_489_276_667_901_467_771_423_780,
    0.381_830_050_505_118_944_950_369_775_488_975,
    0.417_959_183_673_469_387_755_102_040_816_327,
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadratureOptions {
    atol: f64,
    rtol: f64,
    /// Maximum number of subintervals.
    limit: usize,
}

impl QuadratureOptions {
    pub fn new(atol: f64, rtol: f64, limit: usize) -> QuadratureOptions {
        QuadratureOptions { atol, rtol, limit: limit.max(1) }
    }

    pub fn atol(&self) -> f64 {
        self.atol
    }

    pub fn rtol(&self) -> f64 {
        self.rtol
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for QuadratureOptions {
    fn default() -> Self {
        QuadratureOptions { atol: 1e-10, rtol: 1e-10, limit: 50 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadratureResult {
    value: f64,
    error: f64,
    evaluations: usize,
    converged: bool,
}

impl QuadratureResult {
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Estimated absolute error.
    pub fn error(&self) -> f64 {
        self.error
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    pub fn converged(&self) -> bool {
        self.converged
    }
}

#[derive(Clone, Copy)]
struct Segment {
    lhs: f64,
    rhs: f64,
    value: f64,
    error: f64,
}

fn kronrod_segment<F>(f: &F, lhs: f64, rhs: f64) -> Segment
where
    F: Fn(f64) -> f64,
{
    let centre = 0.5 * (lhs + rhs);
    let half = 0.5 * (rhs - lhs);
    let f_centre = f(centre);
    let mut kronrod = WGK[7] * f_centre;
    let mut gauss = WG[3] * f_centre;
    for j in 0..7 {
        let dx = half * XGK[j];
        let pair = f(centre - dx) + f(centre + dx);
        kronrod += WGK[j] * pair;
        if j % 2 == 1 {
            gauss += WG[j / 2] * pair;
        }
    }
    Segment {
        lhs,
        rhs,
        value: kronrod * half,
        error: ((kronrod - gauss) * half).abs(),
    }
}

/// Integrates `f` over `[a, b]`.
///
/// `b < a` gives the negated integral. A result that ran out of subintervals
/// before reaching tolerance is still returned, with `converged() == false`.
pub fn integrate<F>(f: F, a: f64, b: f64, options: &QuadratureOptions) -> QuadratureResult
where
    F: Fn(f64) -> f64,
{
    if a == b {
        return QuadratureResult { value: 0.0, error: 0.0, evaluations: 0, converged: true };
    }
    if b < a {
        let flipped = integrate(f, b, a, options);
        return QuadratureResult { value: -flipped.value, ..flipped };
    }

    let mut segments = vec![kronrod_segment(&f, a, b)];
    let mut evaluations = 15;

    loop {
        let value: f64 = segments.iter().map(|s| s.value).sum();
        let error: f64 = segments.iter().map(|s| s.error).sum();
        let tolerance = options.atol.max(options.rtol * value.abs());
        let converged = error <= tolerance;
        if converged || segments.len() >= options.limit || !error.is_finite() {
            if !converged {
                warn!(
                    lhs = a,
                    rhs = b,
                    value,
                    error,
                    tolerance,
                    "Quadrature stopped before reaching tolerance"
                );
            }
            return QuadratureResult { value, error, evaluations, converged };
        }

        let worst = segments
            .iter()
            .enumerate()
            .max_by(|(_, lhs), (_, rhs)| lhs.error.total_cmp(&rhs.error))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let segment = segments.swap_remove(worst);
        let mid = 0.5 * (segment.lhs + segment.rhs);
        segments.push(kronrod_segment(&f, segment.lhs, mid));
        segments.push(kronrod_segment(&f, mid, segment.rhs));
        evaluations += 30;
    }
}
