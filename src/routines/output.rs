use csv::WriterBuilder;
use eyre::{Result, WrapErr};
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::routines::recovery::{Recovery, RecoveryStats};
use crate::structs::anchors::AnchorSet;
use crate::structs::topics::{AnchorTopic, TopicSummary};
use crate::structs::vocabulary::Vocabulary;

/// Defines the result objects from a recovery run
///
/// A [RecoveryResult] holds the recovered topics together with their summaries, and knows how to
/// write them to an output folder.
#[derive(Debug, Clone)]
pub struct RecoveryResult {
    pub recovery: Recovery,
    pub vocabulary: Vocabulary,
    pub anchors: AnchorSet,
    pub summary: TopicSummary,
    pub pairs: Vec<AnchorTopic>,
}

impl RecoveryResult {
    pub fn new(
        recovery: Recovery,
        vocabulary: Vocabulary,
        anchors: AnchorSet,
        summary: TopicSummary,
    ) -> Result<Self> {
        let pairs = summary.pair_with(&anchors)?;
        Ok(Self {
            recovery,
            vocabulary,
            anchors,
            summary,
            pairs,
        })
    }

    pub fn stats(&self) -> RecoveryStats {
        self.recovery.stats
    }

    /// Write every output file into `folder`, creating it if needed
    pub fn write_outputs(&self, folder: &Path) -> Result<()> {
        std::fs::create_dir_all(folder)
            .wrap_err_with(|| format!("Unable to create output folder {}", folder.display()))?;
        self.write_topics(folder.join("topics.csv"))?;
        self.write_summary(folder.join("summary.json"))?;
        self.write_pairs(folder.join("anchors.json"))?;
        tracing::info!("Output written to {}", folder.display());
        Ok(())
    }

    /// Writes the topic matrix, one row per word with the word in the first column and one column per topic
    pub fn write_topics(&self, path: PathBuf) -> Result<()> {
        let file = File::create(&path)
            .wrap_err_with(|| format!("Unable to create {}", path.display()))?;
        let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

        // Create the headers
        writer.write_field("word")?;
        for k in 0..self.recovery.topics.ntopics() {
            writer.write_field(format!("topic_{}", k))?;
        }
        writer.write_record(None::<&[u8]>)?;

        // Write contents
        for (word, row) in self
            .vocabulary
            .iter()
            .zip(self.recovery.topics.matrix().rows())
        {
            writer.write_field(word)?;
            for value in row {
                writer.write_field(format!("{}", value))?;
            }
            writer.write_record(None::<&[u8]>)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Writes the top words of each topic as a JSON list of lists
    pub fn write_summary(&self, path: PathBuf) -> Result<()> {
        write_json(&self.summary, &path)
    }

    /// Writes each anchor next to the top words of its topic
    pub fn write_pairs(&self, path: PathBuf) -> Result<()> {
        write_json(&self.pairs, &path)
    }
}

fn write_json<T: serde::Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let file =
        File::create(path).wrap_err_with(|| format!("Unable to create {}", path.display()))?;
    serde_json::to_writer_pretty(file, value)
        .wrap_err_with(|| format!("Unable to write {}", path.display()))?;
    Ok(())
}
