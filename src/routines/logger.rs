use std::time::Instant;

use crate::routines::settings::Settings;
use eyre::{Result, WrapErr};
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::{self};
use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;
use tracing_subscriber::registry::Registry;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Setup logging for the library
///
/// This function sets up logging for the library. It uses the `tracing` crate, and the `tracing-subscriber` crate for formatting.
///
/// The log level is defined in the configuration file, and defaults to `INFO`.
///
/// If `log` is specified in the paths of the configuration file, a log file is created with the specified name.
/// Log messages are always written to stdout.
///
/// Only the first call installs a subscriber; later calls leave it in place.
pub fn setup_log(settings: &Settings) -> Result<()> {
    // Leave an installed subscriber and its log file alone
    if tracing::dispatcher::has_been_set() {
        tracing::debug!("A global subscriber is already installed, keeping it");
        return Ok(());
    }

    // Use the log level defined in configuration file
    let log_level = settings.config.log_level.to_lowercase();
    let env_filter = EnvFilter::try_new(&log_level)
        .wrap_err_with(|| format!("Invalid log level: {}", log_level))?;

    let timestamper = CompactTimestamp {
        start: Instant::now(),
    };

    // Define a registry with that level as an environment filter
    let subscriber = Registry::default().with(env_filter);

    // Define layer for file
    let file_layer = match &settings.paths.log {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)
                .wrap_err_with(|| format!("Failed to open log file {} - does the directory exist?", path))?;
            let layer = fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_timer(timestamper.clone());
            Some(layer)
        }
        None => None,
    };

    // Define layer for stdout
    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_target(false)
        .with_timer(timestamper.clone());

    // Combine layers with subscriber
    if subscriber
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("A global subscriber is already installed, keeping it");
        return Ok(());
    }
    tracing::debug!("Logging is configured with level: {}", log_level);

    Ok(())
}

#[derive(Clone)]
struct CompactTimestamp {
    start: Instant,
}

impl FormatTime for CompactTimestamp {
    fn format_time(
        &self,
        w: &mut tracing_subscriber::fmt::format::Writer<'_>,
    ) -> Result<(), std::fmt::Error> {
        let elapsed = self.start.elapsed();
        write!(
            w,
            "{} +{:.3}s",
            chrono::Local::now().format("%H:%M:%S"),
            elapsed.as_secs_f64()
        )
    }
}
