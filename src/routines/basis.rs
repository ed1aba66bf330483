use ndarray::{Array1, Array2, ArrayBase, ArrayView2, Axis, Data, Ix2};

use crate::error::{AnchorError, Result};
use crate::routines::math::row_normalize;
use crate::structs::anchors::AnchorSet;
use crate::structs::vocabulary::Vocabulary;

/// The row-normalized anchor vectors `X` (K×V) and their Gram matrix `X·Xᵗ` (K×K).
///
/// The Gram matrix is computed once here and shared by every per-word solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Basis {
    x: Array2<f64>,
    xx: Array2<f64>,
}

impl Basis {
    /// Row-normalize a raw K×V basis and precompute its Gram matrix.
    ///
    /// A row without mass has no direction to project onto and is reported as
    /// [AnchorError::DegenerateAnchor].
    pub fn from_matrix(mut x: Array2<f64>) -> Result<Self> {
        if x.nrows() == 0 || x.ncols() == 0 {
            return Err(AnchorError::MalformedInput(format!(
                "a basis needs at least one row and one column, got {}x{}",
                x.nrows(),
                x.ncols()
            )));
        }
        row_normalize(&mut x).map_err(|err| match err {
            AnchorError::DegenerateRow(anchor) => AnchorError::DegenerateAnchor { anchor },
            other => other,
        })?;
        let xx = x.dot(&x.t());
        Ok(Self { x, xx })
    }

    pub fn x(&self) -> ArrayView2<'_, f64> {
        self.x.view()
    }

    pub fn xx(&self) -> ArrayView2<'_, f64> {
        self.xx.view()
    }

    /// Number of anchors (K)
    pub fn ntopics(&self) -> usize {
        self.x.nrows()
    }

    /// Length of each anchor vector (V)
    pub fn nwords(&self) -> usize {
        self.x.ncols()
    }
}

/// Check that a cooccurrence matrix is a finite, non-negative V×V matrix matching the vocabulary
pub fn check_cooccurrences<S>(coocc: &ArrayBase<S, Ix2>, vocab: &Vocabulary) -> Result<()>
where
    S: Data<Elem = f64>,
{
    let (nrows, ncols) = coocc.dim();
    if nrows != ncols {
        return Err(AnchorError::MalformedInput(format!(
            "the cooccurrence matrix must be square, got {}x{}",
            nrows, ncols
        )));
    }
    if nrows != vocab.len() {
        return Err(AnchorError::MalformedInput(format!(
            "the cooccurrence matrix has {} rows but the vocabulary has {} words",
            nrows,
            vocab.len()
        )));
    }
    if let Some(((i, j), value)) = coocc
        .indexed_iter()
        .find(|(_, v)| !v.is_finite() || **v < 0.0)
    {
        return Err(AnchorError::MalformedInput(format!(
            "cooccurrence entry ({}, {}) is {}, expected a finite non-negative value",
            i, j, value
        )));
    }
    Ok(())
}

/// Average the cooccurrence rows of each anchor's words.
///
/// Row `k` of the result is the mean of `coocc[a]` over the resolved word ids `a` of anchor `k`,
/// so anchor vectors live in word space.
pub fn anchor_vectors<S>(coocc: &ArrayBase<S, Ix2>, resolved: &[Vec<usize>]) -> Array2<f64>
where
    S: Data<Elem = f64>,
{
    let mut basis = Array2::<f64>::zeros((resolved.len(), coocc.ncols()));
    for (mut row, ids) in basis.axis_iter_mut(Axis(0)).zip(resolved) {
        let mut sum = Array1::<f64>::zeros(coocc.ncols());
        for &id in ids {
            sum += &coocc.row(id);
        }
        row.assign(&(sum / ids.len() as f64));
    }
    basis
}

/// Build the basis `X` and Gram matrix `X·Xᵗ` for a set of anchors.
///
/// Fails with [AnchorError::UnknownAnchorWord] naming the first anchor word missing from the
/// vocabulary, and with [AnchorError::MalformedInput] on empty or mismatched inputs.
pub fn build_basis<S>(
    coocc: &ArrayBase<S, Ix2>,
    anchors: &AnchorSet,
    vocab: &Vocabulary,
) -> Result<Basis>
where
    S: Data<Elem = f64>,
{
    check_cooccurrences(coocc, vocab)?;
    let resolved = anchors.resolve(vocab)?;
    tracing::debug!(
        "Building basis for {} anchors over {} words",
        resolved.len(),
        vocab.len()
    );
    Basis::from_matrix(anchor_vectors(coocc, &resolved))
}
