use crate::prelude::*;
use crate::routines::data::Inputs;
use crate::routines::output::RecoveryResult;
use crate::routines::settings::*;

use eyre::{Result, WrapErr};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::time::Instant;

/// Primary entrypoint for anchorcore
///
/// Reads the cooccurrence matrix, the vocabulary and the anchors named in the settings, recovers
/// one topic per anchor and summarizes every topic with its `top_n` words.
/// The settings for this function are usually read from a TOML configuration file, see
/// [read_settings] for details.
///
/// If `paths.output` is set, the topic matrix, the summaries, the anchor/topic pairs and the
/// settings are written to that folder.
pub fn recover(settings: Settings) -> Result<RecoveryResult> {
    run(settings, None)
}

/// Same as [recover], but aborts with [AnchorError::Cancelled] once `cancel` is set
pub fn recover_with_cancel(settings: Settings, cancel: &AtomicBool) -> Result<RecoveryResult> {
    run(settings, Some(cancel))
}

fn run(settings: Settings, cancel: Option<&AtomicBool>) -> Result<RecoveryResult> {
    let now = Instant::now();
    logger::setup_log(&settings)?;
    tracing::info!("Starting anchorcore");

    // Read input data
    let inputs = Inputs::read(&settings)?;
    tracing::info!(
        "Vocabulary contains {} words, {} anchors were provided",
        inputs.vocabulary.len(),
        inputs.anchors.len()
    );

    let mut anchors = inputs.anchors;
    if settings.config.lowercase_anchors {
        anchors = anchors.fold_case(&inputs.vocabulary);
    }
    if settings.config.single_anchors {
        anchors
            .require_single_words()
            .wrap_err("Single-word anchors were requested")?;
    }

    // Tell the user where the output files will be written
    match &settings.paths.output {
        Some(folder) => tracing::info!("Output files will be written to {}", folder),
        None => tracing::info!(
            "Output files will not be written - set `output` in the [paths] section to enable output files"
        ),
    }

    // Run the recovery
    let mut recovery = TopicRecovery::new(&inputs.cooccurrences, &anchors, &inputs.vocabulary)
        .solver(settings.solver.clone())
        .parallel(settings.config.parallel);
    if let Some(flag) = cancel {
        recovery = recovery.cancel_on(flag);
    }
    let recovery = match recovery.run() {
        Ok(recovery) => recovery,
        Err(err) => {
            tracing::error!("An error has occurred during topic recovery: {}", err);
            return Err(err.into());
        }
    };

    let summary = topic_summary_tokens(&recovery.topics, &inputs.vocabulary, settings.config.top_n)?;
    for (anchor, topic) in anchors.iter().zip(summary.topics()) {
        tracing::debug!("{:?}: {}", anchor.words(), topic.join(" "));
    }
    let result = RecoveryResult::new(recovery, inputs.vocabulary, anchors, summary)?;

    // Write output files (if configured)
    if let Some(folder) = &settings.paths.output {
        let folder = Path::new(folder);
        result.write_outputs(folder)?;
        write_settings_to_file(&settings, folder)
            .wrap_err("Unable to write settings to the output folder")?;
    }

    // Provide information about the program runtime
    tracing::info!("Program complete after {:.2?}", now.elapsed());

    Ok(result)
}
