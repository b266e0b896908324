use std::cell::{
    Cell,
    RefCell
};

use argmin::core::{
    CostFunction,
    Executor,
    Gradient,
    State,
    TerminationReason,
    TerminationStatus
};
use argmin::solver::linesearch::MoreThuenteLineSearch;
use argmin::solver::quasinewton::LBFGS;
use tracing::warn;

use crate::configuration::FitConfiguration;
use crate::fit::fiterror::FitError;

const BUDGET_EXHAUSTED: &str = "EvaluationBudgetExhausted";

/// Counts cost and gradient calls against a budget and keeps the cheapest
/// finite point evaluated so far.
///
/// More–Thuente has no step cap of its own, so the budget is what bounds a
/// run whose line search never accepts a step.
struct Tracker {
    budget: u64,
    evaluations: Cell<u64>,
    gradients: Cell<u64>,
    best: RefCell<Option<(f64, Vec<f64>)>>,
}

impl Tracker {
    fn new(budget: u64) -> Tracker {
        Tracker {
            budget,
            evaluations: Cell::new(0),
            gradients: Cell::new(0),
            best: RefCell::new(None)
        }
    }

    fn spend(&self) -> Result<(), argmin::core::Error> {
        let used = self.evaluations.get() + 1;
        self.evaluations.set(used);
        if used > self.budget {
            return Err(argmin::core::Error::msg(BUDGET_EXHAUSTED));
        }
        Ok(())
    }

    fn exhausted(&self) -> bool {
        self.evaluations.get() > self.budget
    }

    fn record(&self, param: &[f64], cost: f64) {
        if !cost.is_finite() {
            return;
        }
        let mut best = self.best.borrow_mut();
        if best.as_ref().is_none_or(|(lowest, _)| cost < *lowest) {
            *best = Some((cost, param.to_vec()));
        }
    }
}

struct Tracked<'a, P> {
    problem: P,
    tracker: &'a Tracker,
}

impl<P> CostFunction for Tracked<'_, P>
where
    P: CostFunction<Param = Vec<f64>, Output = f64>,
{
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, p: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        self.tracker.spend()?;
        let cost = self.problem.cost(p)?;
        self.tracker.record(p, cost);
        Ok(cost)
    }
}

impl<P> Gradient for Tracked<'_, P>
where
    P: Gradient<Param = Vec<f64>, Gradient = Vec<f64>>,
{
    type Param = Vec<f64>;
    type Gradient = Vec<f64>;

    fn gradient(&self, p: &Self::Param) -> Result<Self::Gradient, argmin::core::Error> {
        self.tracker.spend()?;
        self.tracker.gradients.set(self.tracker.gradients.get() + 1);
        self.problem.gradient(p)
    }
}

/// Best iterate of an L-BFGS run and how the run ended.
#[derive(Debug, Clone, PartialEq)]
pub struct LbfgsOutcome {
    param: Vec<f64>,
    cost: f64,
    iterations: u64,
    termination: String,
    converged: bool,
}

impl LbfgsOutcome {
    pub fn param(&self) -> &[f64] {
        &self.param
    }

    pub fn into_param(self) -> Vec<f64> {
        self.param
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn termination(&self) -> &str {
        &self.termination
    }

    pub fn converged(&self) -> bool {
        self.converged
    }
}

fn optimizer_error(context: &str, error: argmin::core::Error) -> FitError {
    FitError::Optimizer(format!("{}: {}", context, error))
}

/// Minimizes `problem` from `init` with L-BFGS and a More–Thuente line
/// search, using the memory, iteration cap, evaluation budget and tolerances
/// in `configuration`.
///
/// Stopping on the iteration cap is not an error; the outcome then has
/// `converged() == false`. Neither is a solver failure or an exhausted
/// evaluation budget once at least one point has been evaluated: the cheapest
/// point seen is returned, and `iterations()` is counted from gradient calls.
pub fn minimize<P>(problem: P,
                   init: Vec<f64>,
                   configuration: &FitConfiguration) -> Result<LbfgsOutcome, FitError>
where
    P: CostFunction<Param = Vec<f64>, Output = f64>
        + Gradient<Param = Vec<f64>, Gradient = Vec<f64>>,
{
    let linesearch: MoreThuenteLineSearch<Vec<f64>, Vec<f64>, f64> = MoreThuenteLineSearch::new();
    let solver: LBFGS<_, Vec<f64>, Vec<f64>, f64> = LBFGS::new(linesearch, configuration.lbfgs_memory())
        .with_tolerance_grad(configuration.tolerance_grad())
        .map_err(|e| optimizer_error("tolerance_grad", e))?
        .with_tolerance_cost(configuration.tolerance_cost())
        .map_err(|e| optimizer_error("tolerance_cost", e))?;

    let tracker = Tracker::new(configuration.max_evaluations());
    let fallback = init.clone();
    let run = Executor::new(Tracked { problem, tracker: &tracker }, solver)
        .configure(|state| state.param(init).max_iters(configuration.max_iters()))
        .run();

    let result = match run {
        Ok(result) => result,
        Err(error) => {
            let Some((cost, param)) = tracker.best.take() else {
                return Err(optimizer_error("lbfgs", error));
            };
            let termination = if tracker.exhausted() {
                String::from(BUDGET_EXHAUSTED)
            } else {
                String::from("SolverFailed")
            };
            warn!(
                error = %error,
                termination = %termination,
                cost,
                "L-BFGS stopped early, keeping the best point seen"
            );
            return Ok(LbfgsOutcome {
                param,
                cost,
                iterations: tracker.gradients.get().saturating_sub(1),
                termination,
                converged: false
            });
        }
    };

    let state = result.state();
    let param = state
        .get_best_param()
        .or_else(|| state.get_param())
        .cloned()
        .unwrap_or(fallback);
    let converged = matches!(
        state.get_termination_status(),
        TerminationStatus::Terminated(TerminationReason::SolverConverged)
            | TerminationStatus::Terminated(TerminationReason::TargetCostReached)
    );
    let termination = match state.get_termination_reason() {
        Some(reason) => format!("{:?}", reason),
        None => String::from("NotTerminated"),
    };

    Ok(LbfgsOutcome {
        param,
        cost: state.get_best_cost(),
        iterations: state.get_iter(),
        termination,
        converged
    })
}
