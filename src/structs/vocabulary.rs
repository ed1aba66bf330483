use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::Index;

use crate::error::{AnchorError, Result};

/// The ordered list of unique words known to the model.
///
/// The position of a word is its canonical id: row and column `i` of the cooccurrence matrix,
/// and row `i` of the recovered topic matrix, belong to `words()[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Vocabulary {
    words: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Create a vocabulary, rejecting empty input and duplicated words
    pub fn new(words: Vec<String>) -> Result<Self> {
        if words.is_empty() {
            return Err(AnchorError::MalformedInput(
                "the vocabulary is empty".to_string(),
            ));
        }
        let mut index = HashMap::with_capacity(words.len());
        for (i, word) in words.iter().enumerate() {
            if let Some(first) = index.insert(word.clone(), i) {
                return Err(AnchorError::MalformedInput(format!(
                    "the word {:?} appears twice in the vocabulary (positions {} and {})",
                    word, first, i
                )));
            }
        }
        Ok(Self { words, index })
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Position of `word`, if present
    pub fn id(&self, word: &str) -> Option<usize> {
        self.index.get(word).copied()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    pub fn word(&self, id: usize) -> Option<&str> {
        self.words.get(id).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.words.iter().map(String::as_str)
    }
}

impl TryFrom<Vec<String>> for Vocabulary {
    type Error = AnchorError;

    fn try_from(words: Vec<String>) -> Result<Self> {
        Self::new(words)
    }
}

impl TryFrom<&[&str]> for Vocabulary {
    type Error = AnchorError;

    fn try_from(words: &[&str]) -> Result<Self> {
        Self::new(words.iter().map(|w| w.to_string()).collect())
    }
}

impl Index<usize> for Vocabulary {
    type Output = str;

    fn index(&self, index: usize) -> &Self::Output {
        &self.words[index]
    }
}

impl Serialize for Vocabulary {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.words.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Vocabulary {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let words = Vec::<String>::deserialize(deserializer)?;
        Self::new(words).map_err(serde::de::Error::custom)
    }
}
