use ndarray::prelude::*;
use ndarray::Data;

use std::cmp::Ordering;

/// A reordering of the indices `0..n` of a vector
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Permutation {
    pub indices: Vec<usize>,
}

impl Permutation {
    pub fn identity(n: usize) -> Self {
        Permutation {
            indices: (0..n).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The same permutation, traversed back to front
    pub fn reversed(mut self) -> Self {
        self.indices.reverse();
        self
    }

    /// The first `n` indices of the permutation (all of them if `n` exceeds its length)
    pub fn take(&self, n: usize) -> Vec<usize> {
        self.indices.iter().take(n).copied().collect()
    }
}

/// Index sorting for one dimensional arrays.
///
/// All sorts are stable: indices whose values compare equal keep their original relative order.
pub trait ArgSort {
    fn argsort_by<F>(&self, less_than: F) -> Permutation
    where
        F: FnMut(usize, usize) -> bool;

    /// Indices ordered by ascending value
    fn argsort_stable(&self) -> Permutation;

    /// Indices ordered by descending value, ties still in ascending index order
    fn argsort_stable_desc(&self) -> Permutation;
}

impl<S> ArgSort for ArrayBase<S, Ix1>
where
    S: Data<Elem = f64>,
{
    fn argsort_by<F>(&self, mut less_than: F) -> Permutation
    where
        F: FnMut(usize, usize) -> bool,
    {
        let mut perm = Permutation::identity(self.len());
        perm.indices.sort_by(move |&a, &b| {
            if less_than(a, b) {
                Ordering::Less
            } else if less_than(b, a) {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        });
        perm
    }

    fn argsort_stable(&self) -> Permutation {
        self.argsort_by(|a, b| self[a].total_cmp(&self[b]) == Ordering::Less)
    }

    fn argsort_stable_desc(&self) -> Permutation {
        self.argsort_by(|a, b| self[a].total_cmp(&self[b]) == Ordering::Greater)
    }
}
