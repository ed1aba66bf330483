use anchorcore::routines::logger::setup_log;
use anchorcore::routines::settings::Settings;
use eyre::Result;
use std::fs;

#[test]
fn test_second_setup_keeps_existing_log_file() -> Result<()> {
    let dir = std::env::temp_dir().join(format!("anchorcore_logger_{}", std::process::id()));
    fs::create_dir_all(&dir)?;
    let log = dir.join("run.log");
    fs::write(&log, "previous run\n")?;

    let mut settings = Settings::new("c.csv", "v.txt", "a.json");
    setup_log(&settings)?;
    tracing::info!("first run");

    settings.paths.log = Some(log.to_string_lossy().to_string());
    setup_log(&settings)?;
    assert_eq!(fs::read_to_string(&log)?, "previous run\n");
    Ok(())
}

