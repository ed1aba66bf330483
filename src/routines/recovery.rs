use ndarray::{Array1, Array2, ArrayBase, ArrayView2, Axis, Data, Ix2};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::error::{AnchorError, Result};
use crate::routines::basis::{build_basis, Basis};
use crate::routines::math::{col_normalize, row_sums};
use crate::routines::solver::{solve_alpha, Solution, SolveStatus, SolverConfig};
use crate::structs::alpha::Alpha;
use crate::structs::anchors::AnchorSet;
use crate::structs::topics::TopicMatrix;
use crate::structs::vocabulary::Vocabulary;

/// Marginal assigned to words whose cooccurrence row has no mass
pub const MARGINAL_FLOOR: f64 = 1e-16;

/// How the coefficients of a single word were obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordOutcome {
    /// The solver converged
    Solved,
    /// The solver stopped early but its coefficients were usable
    Stopped(SolveStatus),
    /// The solver produced NaN and the uniform distribution was used instead
    Fallback(SolveStatus),
    /// The word has no cooccurrence mass, so the uniform distribution was used without solving
    Degenerate,
}

/// Counters describing a recovery run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecoveryStats {
    pub solved: usize,
    pub stopped: usize,
    pub fallbacks: usize,
    pub degenerate: usize,
    pub iterations: usize,
}

impl RecoveryStats {
    fn record(&mut self, outcome: WordOutcome, iterations: usize) {
        match outcome {
            WordOutcome::Solved => self.solved += 1,
            WordOutcome::Stopped(_) => self.stopped += 1,
            WordOutcome::Fallback(_) => self.fallbacks += 1,
            WordOutcome::Degenerate => self.degenerate += 1,
        }
        self.iterations += iterations;
    }
}

/// Output of [TopicRecovery::run]
#[derive(Debug, Clone)]
pub struct Recovery {
    /// Column-normalized topic-word distributions (V×K)
    pub topics: TopicMatrix,
    /// Raw per-word coefficients before marginal reweighting (V×K)
    pub alphas: Array2<f64>,
    /// Word marginals after flooring (length V)
    pub marginals: Array1<f64>,
    pub stats: RecoveryStats,
}

/// Per-word topic recovery over a cooccurrence matrix.
///
/// Every word's normalized cooccurrence row is projected onto the simplex spanned by the anchor
/// vectors. The coefficients are then weighted by the word marginals and each topic is normalized
/// into a distribution over the vocabulary. Caller data is only borrowed; all working buffers are
/// owned by the run.
pub struct TopicRecovery<'a> {
    coocc: ArrayView2<'a, f64>,
    anchors: &'a AnchorSet,
    vocab: &'a Vocabulary,
    solver: SolverConfig,
    parallel: bool,
    cancel: Option<&'a AtomicBool>,
}

impl<'a> TopicRecovery<'a> {
    pub fn new<S>(
        coocc: &'a ArrayBase<S, Ix2>,
        anchors: &'a AnchorSet,
        vocab: &'a Vocabulary,
    ) -> Self
    where
        S: Data<Elem = f64>,
    {
        Self {
            coocc: coocc.view(),
            anchors,
            vocab,
            solver: SolverConfig::default(),
            parallel: true,
            cancel: None,
        }
    }

    pub fn solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Solve words on the rayon thread pool (the default) or one after another
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Abort with [AnchorError::Cancelled] once `flag` is set. The flag is checked before each word.
    pub fn cancel_on(mut self, flag: &'a AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn run(&self) -> Result<Recovery> {
        let now = Instant::now();
        self.solver.validate()?;
        let basis = build_basis(&self.coocc, self.anchors, self.vocab)?;
        let (nwords, ntopics) = (self.vocab.len(), basis.ntopics());

        // Word marginals, floored so degenerate words keep a tiny positive weight
        let raw_marginals = row_sums(&self.coocc);
        let marginals = raw_marginals.mapv(|p| {
            if p.is_nan() || p == 0.0 {
                MARGINAL_FLOOR
            } else {
                p
            }
        });

        tracing::info!("Recovering {} topics over {} words", ntopics, nwords);

        let solve = |i: usize| -> Result<(Alpha, WordOutcome, usize)> {
            if let Some(flag) = self.cancel {
                if flag.load(Ordering::Relaxed) {
                    return Err(AnchorError::Cancelled);
                }
            }
            self.solve_word(i, raw_marginals[i], &basis)
        };

        let solved: Vec<(Alpha, WordOutcome, usize)> = if self.parallel {
            (0..nwords)
                .into_par_iter()
                .map(solve)
                .collect::<Result<Vec<_>>>()?
        } else {
            (0..nwords).map(solve).collect::<Result<Vec<_>>>()?
        };

        let mut stats = RecoveryStats::default();
        let mut alphas = Array2::<f64>::zeros((nwords, ntopics));
        for (mut row, (alpha, outcome, iterations)) in alphas.axis_iter_mut(Axis(0)).zip(solved)
        {
            row.assign(&alpha.values());
            stats.record(outcome, iterations);
        }
        if stats.degenerate > 0 {
            tracing::warn!(
                "{} words have no cooccurrence mass and were given uniform topic weights",
                stats.degenerate
            );
        }

        // Reweight each word by its marginal, then normalize every topic over the vocabulary
        let mut topics = &alphas * &marginals.view().insert_axis(Axis(1));
        col_normalize(&mut topics)?;

        tracing::info!(
            "Recovered {} topics in {:.2?}: {} solved, {} stopped early, {} NaN fallbacks, {} empty words, {} solver iterations",
            ntopics,
            now.elapsed(),
            stats.solved,
            stats.stopped,
            stats.fallbacks,
            stats.degenerate,
            stats.iterations
        );

        Ok(Recovery {
            topics: TopicMatrix::from_matrix(topics)?,
            alphas,
            marginals,
            stats,
        })
    }

    fn solve_word(
        &self,
        i: usize,
        mass: f64,
        basis: &Basis,
    ) -> Result<(Alpha, WordOutcome, usize)> {
        let k = basis.ntopics();
        if mass == 0.0 || mass.is_nan() {
            tracing::debug!(
                "Word {:?} has no cooccurrence mass, using uniform topics",
                &self.vocab[i]
            );
            return Ok((Alpha::uniform(k), WordOutcome::Degenerate, 0));
        }

        let y = self.coocc.row(i).mapv(|q| q / mass);
        let solution = solve_alpha(&y, basis, &self.solver)?;
        Ok(settle(&self.vocab[i], solution, k))
    }
}

/// Decide which coefficients a word keeps once its solve has stopped.
///
/// NaN coefficients are replaced by the uniform distribution. Coefficients from a solve that
/// stopped before converging are kept as they are.
fn settle(word: &str, solution: Solution, k: usize) -> (Alpha, WordOutcome, usize) {
    let iterations = solution.iterations;
    if solution.alpha.has_nan() {
        tracing::debug!(
            "Solver produced NaN for word {:?} ({:?}), using uniform topics",
            word,
            solution.status
        );
        return (
            Alpha::uniform(k),
            WordOutcome::Fallback(solution.status),
            iterations,
        );
    }
    if solution.is_converged() {
        return (solution.alpha, WordOutcome::Solved, iterations);
    }
    tracing::debug!(
        "Word {:?}: {}",
        word,
        AnchorError::SolverNonConvergence {
            status: solution.status,
            iterations,
        }
    );
    (solution.alpha, WordOutcome::Stopped(solution.status), iterations)
}

/// Recover the topic matrix for `anchors` with the default solver settings
pub fn recover_topics<S>(
    coocc: &ArrayBase<S, Ix2>,
    anchors: &AnchorSet,
    vocab: &Vocabulary,
) -> Result<TopicMatrix>
where
    S: Data<Elem = f64>,
{
    TopicRecovery::new(coocc, anchors, vocab)
        .run()
        .map(|recovery| recovery.topics)
}
