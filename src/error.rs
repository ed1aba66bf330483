use thiserror::Error;

use crate::routines::solver::SolveStatus;

/// Errors raised while building a basis, solving for topic weights or recovering topics.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnchorError {
    #[error("anchor {anchor} contains the word {word:?}, which is not in the vocabulary")]
    UnknownAnchorWord { word: String, anchor: usize },

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("row {0} sums to zero and cannot be normalized")]
    DegenerateRow(usize),

    #[error("column {0} sums to zero and cannot be normalized")]
    DegenerateColumn(usize),

    #[error("anchor {anchor} has no cooccurrence mass")]
    DegenerateAnchor { anchor: usize },

    #[error("anchor {anchor} has {words} words, but only single-word anchors are allowed")]
    MultiWordAnchor { anchor: usize, words: usize },

    #[error("solver stopped after {iterations} iterations without converging ({status:?})")]
    SolverNonConvergence {
        status: SolveStatus,
        iterations: usize,
    },

    #[error("topic recovery was cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, AnchorError>;
