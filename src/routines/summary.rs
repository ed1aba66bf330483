use crate::error::{AnchorError, Result};
use crate::routines::sort::ArgSort;
use crate::structs::topics::{TopicMatrix, TopicSummary};
use crate::structs::vocabulary::Vocabulary;

/// Indices of the `n` highest-weight words of each topic.
///
/// Indices come in descending order of weight; equal weights keep ascending index order. `n` is
/// clamped to the vocabulary size.
pub fn topic_summary_indices(topics: &TopicMatrix, n: usize) -> Vec<Vec<usize>> {
    (0..topics.ntopics())
        .map(|k| topics.topic(k).argsort_stable_desc().take(n))
        .collect()
}

/// The `n` highest-weight words of each topic, looked up in the vocabulary
pub fn topic_summary_tokens(
    topics: &TopicMatrix,
    vocab: &Vocabulary,
    n: usize,
) -> Result<TopicSummary> {
    if topics.nwords() != vocab.len() {
        return Err(AnchorError::MalformedInput(format!(
            "topic matrix has {} words but the vocabulary has {}",
            topics.nwords(),
            vocab.len()
        )));
    }
    let summary = topic_summary_indices(topics, n)
        .into_iter()
        .map(|ids| ids.into_iter().map(|i| vocab[i].to_string()).collect())
        .collect();
    Ok(TopicSummary::new(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn vocab() -> Vocabulary {
        Vocabulary::try_from(&["a", "b", "c", "d"][..]).unwrap()
    }

    #[test]
    fn top_words_by_descending_weight() {
        let topics = TopicMatrix::from_matrix(array![[0.1], [0.4], [0.2], [0.3]]).unwrap();
        let summary = topic_summary_tokens(&topics, &vocab(), 2).unwrap();
        assert_eq!(summary.topics(), &[vec!["b".to_string(), "d".to_string()]]);
        assert_eq!(topic_summary_indices(&topics, 2), vec![vec![1, 3]]);
    }

    #[test]
    fn ties_are_broken_by_index() {
        let topics = TopicMatrix::from_matrix(array![
            [0.25, 0.1],
            [0.25, 0.6],
            [0.25, 0.1],
            [0.25, 0.2]
        ])
        .unwrap();
        assert_eq!(
            topic_summary_indices(&topics, 3),
            vec![vec![0, 1, 2], vec![1, 3, 0]]
        );
    }

    #[test]
    fn n_is_clamped_to_vocabulary() {
        let topics = TopicMatrix::from_matrix(array![[0.1], [0.4], [0.2], [0.3]]).unwrap();
        assert_eq!(topic_summary_indices(&topics, 10), vec![vec![1, 3, 2, 0]]);
        assert_eq!(topic_summary_indices(&topics, 0), vec![Vec::<usize>::new()]);
    }

    #[test]
    fn vocabulary_must_match() {
        let topics = TopicMatrix::from_matrix(array![[0.5], [0.5]]).unwrap();
        assert!(matches!(
            topic_summary_tokens(&topics, &vocab(), 1),
            Err(AnchorError::MalformedInput(_))
        ));
    }
}
