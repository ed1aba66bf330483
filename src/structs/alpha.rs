use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};
use std::ops::Index;

use crate::routines::math::ArrayCheck;

/// The topic coefficients of a single word.
///
/// A thin wrapper around [ndarray::Array1<f64>] holding one entry per anchor. Solver output lies on
/// the probability simplex: all entries are non-negative and sum to one, up to floating error.
#[derive(Debug, Clone, PartialEq)]
pub struct Alpha {
    values: Array1<f64>,
}

impl Alpha {
    pub fn new(values: Array1<f64>) -> Self {
        Self { values }
    }

    /// The uniform distribution over `k` topics
    pub fn uniform(k: usize) -> Self {
        Self {
            values: Array1::from_elem(k, 1.0 / k as f64),
        }
    }

    /// Create a new [Alpha] instance from a vector of coefficients.
    pub fn from_vec(values: Vec<f64>) -> Self {
        Self {
            values: Array1::from_vec(values),
        }
    }

    pub fn values(&self) -> ArrayView1<'_, f64> {
        self.values.view()
    }

    pub fn into_inner(self) -> Array1<f64> {
        self.values
    }

    /// Get the number of coefficients.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn has_nan(&self) -> bool {
        self.values.has_nan()
    }

    pub fn sum(&self) -> f64 {
        self.values.sum()
    }

    /// True if the entries sum to one within `tol` and none is below `-tol`
    pub fn is_on_simplex(&self, tol: f64) -> bool {
        !self.has_nan()
            && (self.sum() - 1.0).abs() <= tol
            && self.values.iter().all(|&a| a >= -tol)
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.values.to_vec()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().cloned()
    }
}

impl Serialize for Alpha {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_vec().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Alpha {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let values = Vec::<f64>::deserialize(deserializer)?;
        Ok(Self::from_vec(values))
    }
}

impl From<Vec<f64>> for Alpha {
    fn from(values: Vec<f64>) -> Self {
        Self::from_vec(values)
    }
}

impl From<Array1<f64>> for Alpha {
    fn from(values: Array1<f64>) -> Self {
        Self { values }
    }
}

impl Index<usize> for Alpha {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.values[index]
    }
}
