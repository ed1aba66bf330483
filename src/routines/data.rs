use csv::ReaderBuilder;
use eyre::{Result, WrapErr};
use ndarray::Array2;
use ndarray_csv::Array2Reader;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::routines::basis::check_cooccurrences;
use crate::routines::settings::Settings;
use crate::structs::anchors::AnchorSet;
use crate::structs::vocabulary::Vocabulary;

/// Everything a recovery run reads from disk
#[derive(Debug, Clone)]
pub struct Inputs {
    pub cooccurrences: Array2<f64>,
    pub vocabulary: Vocabulary,
    pub anchors: AnchorSet,
}

impl Inputs {
    /// Read the three input files named in the settings and check that they agree in size
    pub fn read(settings: &Settings) -> Result<Self> {
        let vocabulary = read_vocabulary(&settings.paths.vocabulary)?;
        let cooccurrences = read_cooccurrences(&settings.paths.cooccurrences)?;
        let anchors = read_anchors(&settings.paths.anchors)?;
        check_cooccurrences(&cooccurrences, &vocabulary)
            .wrap_err("The cooccurrence matrix does not match the vocabulary")?;
        Ok(Self {
            cooccurrences,
            vocabulary,
            anchors,
        })
    }
}

/// Read a V×V cooccurrence matrix from a comma separated file without header
pub fn read_cooccurrences(path: impl AsRef<Path>) -> Result<Array2<f64>> {
    let path = path.as_ref();
    let file = File::open(path)
        .wrap_err_with(|| format!("Unable to open cooccurrence file {}", path.display()))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(file);
    let coocc: Array2<f64> = reader
        .deserialize_array2_dynamic()
        .wrap_err_with(|| format!("Unable to parse cooccurrence file {}", path.display()))?;
    Ok(coocc)
}

/// Read a vocabulary with one word per line. Surrounding whitespace and blank lines are ignored.
pub fn read_vocabulary(path: impl AsRef<Path>) -> Result<Vocabulary> {
    let path = path.as_ref();
    let file = File::open(path)
        .wrap_err_with(|| format!("Unable to open vocabulary file {}", path.display()))?;
    let mut words = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        let word = line.trim();
        if !word.is_empty() {
            words.push(word.to_string());
        }
    }
    let vocab = Vocabulary::new(words)
        .wrap_err_with(|| format!("Invalid vocabulary in {}", path.display()))?;
    Ok(vocab)
}

/// Read anchors from a JSON file holding a list of word lists, e.g. `[["cat"], ["car", "road"]]`
pub fn read_anchors(path: impl AsRef<Path>) -> Result<AnchorSet> {
    let path = path.as_ref();
    let file = File::open(path)
        .wrap_err_with(|| format!("Unable to open anchor file {}", path.display()))?;
    let anchors: AnchorSet = serde_json::from_reader(BufReader::new(file))
        .wrap_err_with(|| format!("Unable to parse anchor file {}", path.display()))?;
    anchors
        .validate()
        .wrap_err_with(|| format!("Invalid anchors in {}", path.display()))?;
    Ok(anchors)
}
