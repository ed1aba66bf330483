use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use serde_derive::{Deserialize, Serialize};

use crate::error::{AnchorError, Result};
use crate::routines::math::{col_sums, ArrayCheck};
use crate::structs::anchors::AnchorSet;

/// Tolerance used when checking that each topic sums to one
pub const COLUMN_SUM_TOLERANCE: f64 = 1e-6;

/// The recovered topic-word distributions.
///
/// A V×K matrix where entry `(i, k)` is the probability that topic `k` generates word `i`.
/// Every column is a distribution over the vocabulary: non-negative and summing to one.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicMatrix {
    matrix: Array2<f64>,
}

impl TopicMatrix {
    /// Wrap a V×K matrix after checking that every column is a probability distribution
    pub fn from_matrix(matrix: Array2<f64>) -> Result<Self> {
        if matrix.has_nan() {
            return Err(AnchorError::MalformedInput(
                "topic matrix contains NaN".to_string(),
            ));
        }
        if let Some(min) = matrix.min_value() {
            if min < 0.0 {
                return Err(AnchorError::MalformedInput(format!(
                    "topic matrix contains a negative entry ({})",
                    min
                )));
            }
        }
        let sums = col_sums(&matrix);
        if let Some((k, sum)) = sums
            .iter()
            .enumerate()
            .find(|(_, s)| (**s - 1.0).abs() > COLUMN_SUM_TOLERANCE)
        {
            return Err(AnchorError::MalformedInput(format!(
                "topic {} sums to {} instead of 1",
                k, sum
            )));
        }
        Ok(Self { matrix })
    }

    pub fn matrix(&self) -> ArrayView2<'_, f64> {
        self.matrix.view()
    }

    pub fn into_inner(self) -> Array2<f64> {
        self.matrix
    }

    /// Number of vocabulary words (V)
    pub fn nwords(&self) -> usize {
        self.matrix.nrows()
    }

    /// Number of topics (K)
    pub fn ntopics(&self) -> usize {
        self.matrix.ncols()
    }

    /// The word distribution of topic `k`
    pub fn topic(&self, k: usize) -> ArrayView1<'_, f64> {
        self.matrix.index_axis(Axis(1), k)
    }

    /// The weight of word `i` in every topic
    pub fn word(&self, i: usize) -> ArrayView1<'_, f64> {
        self.matrix.index_axis(Axis(0), i)
    }
}

/// The highest-weight words of each topic, in descending order of weight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicSummary {
    topics: Vec<Vec<String>>,
}

/// An anchor paired with the summary words of the topic it produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorTopic {
    pub anchors: Vec<String>,
    pub topic: Vec<String>,
}

impl TopicSummary {
    pub fn new(topics: Vec<Vec<String>>) -> Self {
        Self { topics }
    }

    pub fn topics(&self) -> &[Vec<String>] {
        &self.topics
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Pair each anchor with the summary of its topic, in anchor order
    pub fn pair_with(&self, anchors: &AnchorSet) -> Result<Vec<AnchorTopic>> {
        if anchors.len() != self.topics.len() {
            return Err(AnchorError::MalformedInput(format!(
                "{} anchors cannot be paired with {} topics",
                anchors.len(),
                self.topics.len()
            )));
        }
        Ok(anchors
            .iter()
            .zip(&self.topics)
            .map(|(anchor, topic)| AnchorTopic {
                anchors: anchor.words().to_vec(),
                topic: topic.clone(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn accepts_column_stochastic_matrices() {
        let topics = TopicMatrix::from_matrix(array![[0.2, 0.5], [0.8, 0.5]]).unwrap();
        assert_eq!(topics.nwords(), 2);
        assert_eq!(topics.ntopics(), 2);
        assert_eq!(topics.topic(0), array![0.2, 0.8]);
        assert_eq!(topics.word(1), array![0.8, 0.5]);
    }

    #[test]
    fn rejects_invalid_matrices() {
        assert!(TopicMatrix::from_matrix(array![[0.2, 0.5], [0.7, 0.5]]).is_err());
        assert!(TopicMatrix::from_matrix(array![[1.2, 0.5], [-0.2, 0.5]]).is_err());
        assert!(TopicMatrix::from_matrix(array![[f64::NAN, 0.5], [1.0, 0.5]]).is_err());
    }

    #[test]
    fn pairs_anchors_with_topics() {
        let summary = TopicSummary::new(vec![
            vec!["cat".to_string(), "dog".to_string()],
            vec!["car".to_string(), "road".to_string()],
        ]);
        let anchors = AnchorSet::from(&[&["cat"][..], &["car"][..]][..]);
        let pairs = summary.pair_with(&anchors).unwrap();
        assert_eq!(pairs[1].anchors, vec!["car".to_string()]);
        assert_eq!(pairs[1].topic, vec!["car".to_string(), "road".to_string()]);

        let json = serde_json::to_string(&pairs[0]).unwrap();
        assert_eq!(json, r#"{"anchors":["cat"],"topic":["cat","dog"]}"#);

        let one = AnchorSet::from(&[&["cat"][..]][..]);
        assert!(summary.pair_with(&one).is_err());
    }
}
