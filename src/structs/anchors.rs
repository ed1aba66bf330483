use serde_derive::{Deserialize, Serialize};

use crate::error::{AnchorError, Result};
use crate::structs::vocabulary::Vocabulary;

/// The words that jointly represent a single topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Anchor {
    words: Vec<String>,
}

impl Anchor {
    /// Create an anchor from its words, dropping repeated words but keeping their first position
    pub fn new<I, W>(words: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for word in words.into_iter().map(Into::into) {
            if !unique.contains(&word) {
                unique.push(word);
            }
        }
        Self { words: unique }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// An ordered set of `K` anchors, one per topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnchorSet {
    anchors: Vec<Anchor>,
}

impl AnchorSet {
    pub fn new(anchors: Vec<Anchor>) -> Self {
        Self { anchors }
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    /// Number of anchors, which is the number of topics to recover
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Anchor> + '_ {
        self.anchors.iter()
    }

    /// A copy of the anchor set where words missing from the vocabulary are replaced by their
    /// lower-cased form, if the vocabulary knows that one.
    ///
    /// Words found verbatim are kept, and words unknown in both forms are left as supplied so a
    /// later [AnchorSet::resolve] reports them as the user wrote them.
    pub fn fold_case(&self, vocab: &Vocabulary) -> Self {
        let fold = |word: &String| {
            if vocab.contains(word) {
                return word.clone();
            }
            let lower = word.to_lowercase();
            if vocab.contains(&lower) {
                lower
            } else {
                word.clone()
            }
        };
        Self {
            anchors: self
                .anchors
                .iter()
                .map(|anchor| Anchor::new(anchor.words.iter().map(&fold)))
                .collect(),
        }
    }

    /// Check that the set is non-empty and that no anchor is empty
    pub fn validate(&self) -> Result<()> {
        if self.anchors.is_empty() {
            return Err(AnchorError::MalformedInput(
                "at least one anchor is required".to_string(),
            ));
        }
        if let Some(k) = self.anchors.iter().position(Anchor::is_empty) {
            return Err(AnchorError::MalformedInput(format!(
                "anchor {} has no words",
                k
            )));
        }
        Ok(())
    }

    /// Reject anchors made of more than one word
    pub fn require_single_words(&self) -> Result<()> {
        match self.anchors.iter().position(|anchor| anchor.len() > 1) {
            Some(k) => Err(AnchorError::MultiWordAnchor {
                anchor: k,
                words: self.anchors[k].len(),
            }),
            None => Ok(()),
        }
    }

    /// Resolve every anchor word to its vocabulary position.
    ///
    /// Fails on the first word that is not part of the vocabulary, naming the word and its anchor.
    pub fn resolve(&self, vocab: &Vocabulary) -> Result<Vec<Vec<usize>>> {
        self.validate()?;
        if self.anchors.len() > vocab.len() {
            return Err(AnchorError::MalformedInput(format!(
                "{} anchors were given for a vocabulary of {} words",
                self.anchors.len(),
                vocab.len()
            )));
        }
        self.anchors
            .iter()
            .enumerate()
            .map(|(k, anchor)| {
                anchor
                    .words
                    .iter()
                    .map(|word| {
                        vocab.id(word).ok_or_else(|| AnchorError::UnknownAnchorWord {
                            word: word.clone(),
                            anchor: k,
                        })
                    })
                    .collect()
            })
            .collect()
    }
}

impl From<Vec<String>> for Anchor {
    fn from(words: Vec<String>) -> Self {
        Self::new(words)
    }
}

impl From<Anchor> for Vec<String> {
    fn from(anchor: Anchor) -> Self {
        anchor.words
    }
}

impl From<Vec<Vec<String>>> for AnchorSet {
    fn from(anchors: Vec<Vec<String>>) -> Self {
        Self::new(anchors.into_iter().map(Anchor::new).collect())
    }
}

impl From<&[&[&str]]> for AnchorSet {
    fn from(anchors: &[&[&str]]) -> Self {
        Self::new(
            anchors
                .iter()
                .map(|words| Anchor::new(words.iter().copied()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> Vocabulary {
        Vocabulary::try_from(&["cat", "dog", "car"][..]).unwrap()
    }

    #[test]
    fn resolves_words_to_ids() {
        let anchors = AnchorSet::from(&[&["cat", "dog"][..], &["car"][..]][..]);
        assert_eq!(anchors.resolve(&vocab()).unwrap(), vec![vec![0, 1], vec![2]]);
    }

    #[test]
    fn unknown_word_is_reported() {
        let anchors = AnchorSet::from(&[&["cat"][..], &["car", "boat"][..]][..]);
        assert_eq!(
            anchors.resolve(&vocab()),
            Err(AnchorError::UnknownAnchorWord {
                word: "boat".to_string(),
                anchor: 1
            })
        );
    }

    #[test]
    fn empty_inputs_are_malformed() {
        let none = AnchorSet::new(vec![]);
        assert!(matches!(none.resolve(&vocab()), Err(AnchorError::MalformedInput(_))));

        let hollow = AnchorSet::from(vec![vec!["cat".to_string()], vec![]]);
        assert!(matches!(hollow.validate(), Err(AnchorError::MalformedInput(_))));
    }

    #[test]
    fn too_many_anchors() {
        let anchors = AnchorSet::from(&[&["cat"][..], &["dog"][..], &["car"][..], &["cat"][..]][..]);
        assert!(matches!(anchors.resolve(&vocab()), Err(AnchorError::MalformedInput(_))));
    }

    #[test]
    fn fold_case_prefers_exact_words() {
        let vocab = Vocabulary::try_from(&["Paris", "france", "cat"][..]).unwrap();
        let anchors = AnchorSet::from(&[&["Paris", "France", "FRANCE"][..], &["Cat", "Bus"][..]][..])
            .fold_case(&vocab);
        assert_eq!(
            anchors.anchors()[0].words(),
            &["Paris".to_string(), "france".to_string()]
        );
        assert_eq!(anchors.anchors()[1].words(), &["cat".to_string(), "Bus".to_string()]);
        assert_eq!(
            anchors.resolve(&vocab),
            Err(AnchorError::UnknownAnchorWord {
                word: "Bus".to_string(),
                anchor: 1
            })
        );
    }

    #[test]
    fn single_word_mode() {
        let ok = AnchorSet::from(&[&["cat"][..], &["car"][..]][..]);
        assert!(ok.require_single_words().is_ok());

        let multi = AnchorSet::from(&[&["cat"][..], &["car", "dog"][..]][..]);
        assert_eq!(
            multi.require_single_words(),
            Err(AnchorError::MultiWordAnchor { anchor: 1, words: 2 })
        );
    }

    #[test]
    fn json_shape_is_nested_lists() {
        let anchors: AnchorSet =
            serde_json::from_str(r#"[["cat","dog","cat"],["car"]]"#).unwrap();
        assert_eq!(anchors.len(), 2);
        assert_eq!(anchors.anchors()[0].len(), 2);
        assert_eq!(anchors.anchors()[1].words(), &["car".to_string()]);
    }
}
