use anchorcore::prelude::*;
use anchorcore::routines::data::{read_anchors, read_cooccurrences, read_vocabulary, Inputs};
use anchorcore::routines::settings::{read_settings, write_settings_to_file, Settings};
use eyre::Result;
use std::fs;
use std::path::PathBuf;

/// A fresh scratch folder holding the cat/dog/car inputs
fn scratch(name: &str) -> Result<PathBuf> {
    let dir = std::env::temp_dir().join(format!("anchorcore_{}_{}", name, std::process::id()));
    if dir.exists() {
        fs::remove_dir_all(&dir)?;
    }
    fs::create_dir_all(&dir)?;
    fs::write(
        dir.join("coocc.csv"),
        "2.0,8.0,0.5\n8.0,2.0,0.5\n0.5,0.5,9.0\n",
    )?;
    fs::write(dir.join("vocab.txt"), "cat\ndog\n\n  car \n")?;
    fs::write(dir.join("anchors.json"), r#"[["Cat"], ["car", "car"]]"#)?;
    Ok(dir)
}

fn settings_for(dir: &PathBuf) -> Settings {
    let path = |file: &str| dir.join(file).to_string_lossy().to_string();
    Settings::new(&path("coocc.csv"), &path("vocab.txt"), &path("anchors.json"))
}

#[test]
fn test_settings_defaults() {
    let settings = Settings::new("c.csv", "v.txt", "a.json");
    assert_eq!(settings.config.log_level, "info");
    assert!(settings.config.parallel);
    assert_eq!(settings.config.top_n, 10);
    assert!(!settings.config.single_anchors);
    assert!(settings.config.lowercase_anchors);
    assert_eq!(settings.solver, SolverConfig::default());
    assert_eq!(settings.paths.output, None);
}

#[test]
fn test_read_settings_from_toml() -> Result<()> {
    let dir = scratch("toml")?;
    let file = dir.join("config.toml");
    fs::write(
        &file,
        r#"
[paths]
cooccurrences = "coocc.csv"
vocabulary = "vocab.txt"
anchors = "anchors.json"
output = "out"

[config]
top_n = 3
parallel = false

[solver]
epsilon = 1e-8
max_iterations = 500
"#,
    )?;

    let settings = read_settings(file.to_string_lossy().to_string())?;
    assert_eq!(settings.paths.output.as_deref(), Some("out"));
    assert_eq!(settings.paths.log, None);
    assert_eq!(settings.config.top_n, 3);
    assert!(!settings.config.parallel);
    assert_eq!(settings.config.log_level, "info");
    assert_eq!(settings.solver.epsilon, 1e-8);
    assert_eq!(settings.solver.max_iterations, 500);
    assert_eq!(settings.solver.c2, 0.75);
    Ok(())
}

#[test]
fn test_settings_json_roundtrip() -> Result<()> {
    let dir = scratch("json")?;
    let settings = settings_for(&dir);
    write_settings_to_file(&settings, &dir)?;

    let json = fs::read_to_string(dir.join("settings.json"))?;
    let parsed: Settings = serde_json::from_str(&json)?;
    assert_eq!(parsed, settings);
    Ok(())
}

#[test]
fn test_read_inputs() -> Result<()> {
    let dir = scratch("inputs")?;
    let coocc = read_cooccurrences(dir.join("coocc.csv"))?;
    assert_eq!(coocc.dim(), (3, 3));
    assert_eq!(coocc[[2, 2]], 9.0);

    let vocab = read_vocabulary(dir.join("vocab.txt"))?;
    assert_eq!(vocab.words(), &["cat", "dog", "car"]);

    let anchors = read_anchors(dir.join("anchors.json"))?;
    assert_eq!(anchors.len(), 2);
    assert_eq!(anchors.anchors()[1].words(), &["car"]);

    let inputs = Inputs::read(&settings_for(&dir))?;
    assert_eq!(inputs.vocabulary.len(), 3);
    Ok(())
}

#[test]
fn test_mismatched_inputs_are_rejected() -> Result<()> {
    let dir = scratch("mismatch")?;
    fs::write(dir.join("vocab.txt"), "cat\ndog\n")?;
    assert!(Inputs::read(&settings_for(&dir)).is_err());

    fs::write(dir.join("vocab.txt"), "cat\ndog\ncat\n")?;
    assert!(read_vocabulary(dir.join("vocab.txt")).is_err());

    fs::write(dir.join("anchors.json"), "[]")?;
    assert!(read_anchors(dir.join("anchors.json")).is_err());
    Ok(())
}

#[test]
fn test_recover_writes_outputs() -> Result<()> {
    let dir = scratch("recover")?;
    let mut settings = settings_for(&dir);
    let out = dir.join("out");
    settings.paths.output = Some(out.to_string_lossy().to_string());
    settings.config.top_n = 2;

    let result = recover(settings)?;
    assert_eq!(result.summary.len(), 2);
    assert_eq!(result.pairs[0].anchors, vec!["cat".to_string()]);
    assert_eq!(result.pairs[1].topic[0], "car");

    let topics = fs::read_to_string(out.join("topics.csv"))?;
    let mut lines = topics.lines();
    assert_eq!(lines.next(), Some("word,topic_0,topic_1"));
    assert_eq!(lines.count(), 3);

    let summary: Vec<Vec<String>> =
        serde_json::from_str(&fs::read_to_string(out.join("summary.json"))?)?;
    assert_eq!(summary, result.summary.topics());

    let pairs: Vec<AnchorTopic> =
        serde_json::from_str(&fs::read_to_string(out.join("anchors.json"))?)?;
    assert_eq!(pairs, result.pairs);
    assert!(out.join("settings.json").exists());
    Ok(())
}

#[test]
fn test_single_word_anchor_mode() -> Result<()> {
    let dir = scratch("single")?;
    fs::write(dir.join("anchors.json"), r#"[["cat", "dog"], ["car"]]"#)?;
    let mut settings = settings_for(&dir);
    settings.config.single_anchors = true;
    assert!(recover(settings.clone()).is_err());

    settings.config.single_anchors = false;
    let result = recover(settings)?;
    assert_eq!(result.anchors.anchors()[0].words(), &["cat", "dog"]);
    Ok(())
}

#[test]
fn test_mixed_case_vocabulary() -> Result<()> {
    let dir = scratch("mixed_case")?;
    fs::write(dir.join("vocab.txt"), "Paris\nFrance\nlondon\n")?;
    fs::write(dir.join("anchors.json"), r#"[["Paris"], ["London"]]"#)?;
    let settings = settings_for(&dir);

    let result = recover(settings.clone())?;
    assert_eq!(result.pairs[0].anchors, vec!["Paris".to_string()]);
    assert_eq!(result.pairs[1].anchors, vec!["london".to_string()]);

    // Unknown words are reported as written
    fs::write(dir.join("anchors.json"), r#"[["Paris"], ["Berlin"]]"#)?;
    let err = recover(settings)
        .unwrap_err()
        .downcast::<AnchorError>()
        .map_err(|e| eyre::eyre!("unexpected error: {}", e))?;
    assert_eq!(
        err,
        AnchorError::UnknownAnchorWord {
            word: "Berlin".to_string(),
            anchor: 1
        }
    );
    Ok(())
}
