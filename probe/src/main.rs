use anyhow::{Context, Result};
use holo_calibration_usb::{get_calibration_with, Settings};
use log::{info, warn};
use simplelog::{ColorChoice, CombinedLogger, Config, LevelFilter, TermLogger, TerminalMode};
use std::env;
use std::path::PathBuf;

// Optional JSON file overriding the default settings.
const SETTINGS_VAR: &str = "HOLO_CALIBRATION_SETTINGS";

fn main() -> Result<()> {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )])
    .context("Could not configure the logger")?;

    let settings = match env::var_os(SETTINGS_VAR) {
        Some(path) => {
            let path = PathBuf::from(path);
            info!("Loading settings from {}", path.to_string_lossy());
            Settings::read(&path)?
        }
        None => Settings::default(),
    };

    let calibration = get_calibration_with(&settings);
    if calibration.is_default() {
        warn!("No calibration could be read, the values below are the defaults");
    }

    let output =
        serde_json::to_string_pretty(&calibration).context("Could not serialise calibration")?;
    println!("{}", output);
    Ok(())
}
