//! Exponentiated gradient (entropic mirror descent) solver for topic coefficients on the simplex
//!
//! For a target row `Y` (length V) and a basis `X` (K×V) the solver minimizes the squared
//! reconstruction error
//!
//! ```text
//! f(α) = αᵗ(X·Xᵗ)α − 2·α·(X·Y) + Y·Y
//! ```
//!
//! over the probability simplex. Each step moves `log(α)` against the gradient
//! `2·((X·Xᵗ)α − X·Y)` and renormalizes in log space, so every iterate stays on the simplex
//! without a projection. The step size is adapted with a sufficient-decrease test (halving) and a
//! curvature test (doubling). The solver stops once the optimality gap `⟨α, g − min(g)⟩` drops
//! below `epsilon`.

use ndarray::{Array1, ArrayBase, Data, Ix1};
use serde_derive::{Deserialize, Serialize};

use crate::error::{AnchorError, Result};
use crate::routines::basis::Basis;
use crate::routines::math::{logsumexp, ArrayCheck};
use crate::structs::alpha::Alpha;

/// Tuning constants of the exponentiated gradient solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    /// Convergence threshold on the optimality gap
    pub epsilon: f64,
    /// Sufficient-decrease constant of the step size test
    pub c1: f64,
    /// Curvature constant of the step size test
    pub c2: f64,
    pub initial_stepsize: f64,
    /// Upper bound on loop iterations, counting rejected steps
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            epsilon: 1e-7,
            c1: 1e-4,
            c2: 0.75,
            initial_stepsize: 1.0,
            max_iterations: 100_000,
        }
    }
}

impl SolverConfig {
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.epsilon) || !positive(self.initial_stepsize) {
            return Err(AnchorError::MalformedInput(format!(
                "solver epsilon and initial stepsize must be positive, got {} and {}",
                self.epsilon, self.initial_stepsize
            )));
        }
        if !(0.0 < self.c1 && self.c1 < self.c2 && self.c2 < 1.0) {
            return Err(AnchorError::MalformedInput(format!(
                "solver constants must satisfy 0 < c1 < c2 < 1, got c1 = {} and c2 = {}",
                self.c1, self.c2
            )));
        }
        Ok(())
    }
}

/// Why the solver loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    /// The optimality gap dropped below epsilon
    Converged,
    /// The objective reached exactly zero
    ZeroObjective,
    /// Repeated halving drove the step size to zero
    ZeroStepsize,
    /// The iterate or its gradient stopped being finite
    NonFinite,
    /// The iteration cap was reached
    IterationLimit,
}

/// Result of a single solve
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub alpha: Alpha,
    pub objective: f64,
    pub gap: f64,
    pub iterations: usize,
    pub status: SolveStatus,
}

impl Solution {
    pub fn is_converged(&self) -> bool {
        self.status == SolveStatus::Converged
    }

    /// The coefficients, or [AnchorError::SolverNonConvergence] if the loop stopped early
    pub fn converged(self) -> Result<Alpha> {
        match self.status {
            SolveStatus::Converged => Ok(self.alpha),
            status => Err(AnchorError::SolverNonConvergence {
                status,
                iterations: self.iterations,
            }),
        }
    }
}

/// The iterate the loop commits to. Candidates are built beside it and only replace it once
/// both step size tests pass.
struct SolverState {
    alpha: Array1<f64>,
    log_alpha: Array1<f64>,
    gradient: Array1<f64>,
    objective: f64,
    stepsize: f64,
    decreased: bool,
}

/// Find the simplex coefficients `α` whose combination of basis rows best reconstructs `y`.
///
/// This is a pure function of its arguments, so it can be called concurrently for many words
/// sharing one [Basis].
pub fn solve_alpha<S>(y: &ArrayBase<S, Ix1>, basis: &Basis, config: &SolverConfig) -> Result<Solution>
where
    S: Data<Elem = f64>,
{
    let k = basis.ntopics();
    if y.len() != basis.nwords() {
        return Err(AnchorError::MalformedInput(format!(
            "target row has length {} but the basis spans {} words",
            y.len(),
            basis.nwords()
        )));
    }

    let x = basis.x();
    let xx = basis.xx();
    let xy = x.dot(y);
    let yy = y.dot(y);

    // Returns α·XX, which the gradient reuses, and the objective at α
    let evaluate = |alpha: &Array1<f64>| {
        let axx = alpha.dot(&xx);
        let objective = axx.dot(alpha) - 2.0 * alpha.dot(&xy) + yy;
        (axx, objective)
    };

    let alpha = Array1::from_elem(k, 1.0 / k as f64);
    let (axx, objective) = evaluate(&alpha);
    let mut state = SolverState {
        log_alpha: alpha.mapv(f64::ln),
        gradient: 2.0 * (axx - &xy),
        alpha,
        objective,
        stepsize: config.initial_stepsize,
        decreased: false,
    };

    let mut gap = f64::INFINITY;
    let mut iterations = 0;
    let status = loop {
        if gap.is_nan() {
            break SolveStatus::NonFinite;
        }
        if gap < config.epsilon {
            break SolveStatus::Converged;
        }
        if state.objective == 0.0 {
            break SolveStatus::ZeroObjective;
        }
        if state.stepsize == 0.0 {
            break SolveStatus::ZeroStepsize;
        }
        if iterations >= config.max_iterations {
            break SolveStatus::IterationLimit;
        }
        iterations += 1;

        // Multiplicative update, renormalized in log space
        let mut log_alpha = &state.log_alpha - &(state.stepsize * &state.gradient);
        let normalizer = logsumexp(&log_alpha);
        log_alpha -= normalizer;
        let alpha = log_alpha.mapv(f64::exp);
        let (axx, objective) = evaluate(&alpha);
        let step = &alpha - &state.alpha;

        // Not enough decrease: retry from the committed iterate with half the step
        if objective > state.objective + config.c1 * state.stepsize * state.gradient.dot(&step) {
            state.stepsize /= 2.0;
            state.decreased = true;
            continue;
        }

        // Still steep along the step: retry with twice the step, unless it would overflow
        let gradient = 2.0 * (axx - &xy);
        let doubled = state.stepsize * 2.0;
        if !state.decreased
            && doubled.is_finite()
            && gradient.dot(&step) < config.c2 * state.gradient.dot(&step)
        {
            state.stepsize = doubled;
            continue;
        }

        gap = match gradient.min_value() {
            Some(min) => alpha.dot(&(&gradient - min)),
            None => f64::NAN,
        };
        state = SolverState {
            alpha,
            log_alpha,
            gradient,
            objective,
            stepsize: state.stepsize,
            decreased: false,
        };
    };

    tracing::trace!(
        "Solver stopped with {:?} after {} iterations (gap {:e}, objective {:e})",
        status,
        iterations,
        gap,
        state.objective
    );

    Ok(Solution {
        alpha: Alpha::new(state.alpha),
        objective: state.objective,
        gap,
        iterations,
        status,
    })
}
