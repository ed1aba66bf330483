use config::Config as eConfig;
use serde_derive::{Deserialize, Serialize};
use std::path::Path;

use crate::routines::solver::SolverConfig;

/// Settings for a topic recovery run
///
/// The user can specify the desired settings in a TOML configuration file. Every value can be
/// overridden through environment variables prefixed with `ANCHORCORE`, using `__` between
/// nested keys, e.g. `ANCHORCORE_CONFIG__TOP_N=20`.
#[derive(Debug, Deserialize, Clone, Serialize, PartialEq)]
pub struct Settings {
    pub paths: Paths,
    #[serde(default)]
    pub config: Config,
    #[serde(default)]
    pub solver: SolverConfig,
}

#[derive(Debug, Deserialize, Clone, Serialize, PartialEq)]
pub struct Paths {
    /// CSV file without header holding the V×V cooccurrence matrix
    pub cooccurrences: String,
    /// Text file with one vocabulary word per line
    pub vocabulary: String,
    /// JSON file with a list of anchors, each a list of words
    pub anchors: String,
    /// Folder for the topic matrix, the summaries and a copy of the settings
    pub output: Option<String>,
    pub log: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Serialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_true")]
    pub parallel: bool,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_false")]
    pub single_anchors: bool,
    /// Match anchor words missing from the vocabulary by their lower-cased form
    #[serde(default = "default_true")]
    pub lowercase_anchors: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            parallel: default_true(),
            top_n: default_top_n(),
            single_anchors: default_false(),
            lowercase_anchors: default_true(),
        }
    }
}

impl Settings {
    /// Settings with default configuration for the given input files
    pub fn new(cooccurrences: &str, vocabulary: &str, anchors: &str) -> Self {
        Self {
            paths: Paths {
                cooccurrences: cooccurrences.to_string(),
                vocabulary: vocabulary.to_string(),
                anchors: anchors.to_string(),
                output: None,
                log: None,
            },
            config: Config::default(),
            solver: SolverConfig::default(),
        }
    }
}

pub fn read_settings(path: String) -> Result<Settings, config::ConfigError> {
    let settings_path = path;

    let parsed = eConfig::builder()
        .add_source(config::File::with_name(&settings_path).format(config::FileFormat::Toml))
        .add_source(
            config::Environment::with_prefix("ANCHORCORE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let settings: Settings = parsed.try_deserialize()?;
    Ok(settings)
}

/// Write the settings as pretty-printed JSON to `settings.json` inside `folder`
pub fn write_settings_to_file(settings: &Settings, folder: &Path) -> Result<(), std::io::Error> {
    let serialized = serde_json::to_string_pretty(settings)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    std::fs::create_dir_all(folder)?;
    let mut file = std::fs::File::create(folder.join("settings.json"))?;
    std::io::Write::write_all(&mut file, serialized.as_bytes())?;
    Ok(())
}

// *********************************
// Default values for deserializing
// *********************************
fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_top_n() -> usize {
    10
}
