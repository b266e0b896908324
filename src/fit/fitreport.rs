/// What the optimizer reported at the end of a fit.
///
/// The fitted distribution always holds the best iterate, whether or not
/// `converged()` is true.
#[derive(Debug, Clone, PartialEq)]
pub struct FitReport {
    converged: bool,
    termination: String,
    iterations: u64,
    loss: f64,
    multipliers: Vec<f64>,
}

impl FitReport {
    pub fn new(converged: bool,
               termination: String,
               iterations: u64,
               loss: f64,
               multipliers: Vec<f64>) -> FitReport {
        FitReport { converged, termination, iterations, loss, multipliers }
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    pub fn termination(&self) -> &str {
        &self.termination
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Final value of the minimized loss.
    pub fn loss(&self) -> f64 {
        self.loss
    }

    /// Lagrange multipliers of a max-entropy fit, normalization first;
    /// empty for smoothing fits.
    pub fn multipliers(&self) -> &[f64] {
        &self.multipliers
    }
}
