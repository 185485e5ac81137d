//! File-only logging; the terminal belongs to the UI.

use std::fs::{self, File};
use std::path::Path;

use log::LevelFilter;
use simplelog::{Config, ConfigBuilder, WriteLogger};

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

/// Installs the global logger writing to `path`.
///
/// Returns false (after a stderr warning) when the log directory or file
/// cannot be created;
/// the program keeps running without logs.
pub fn initialize(path: &Path, level: LevelFilter) -> bool {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(err) = fs::create_dir_all(parent) {
                eprintln!("Warning: Could not create log directory {:?}: {}", parent, err);
                return false;
            }
        }
    }

    match File::create(path) {
        Ok(file) => WriteLogger::init(level, build_config(), file).is_ok(),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", path, err);
            false
        }
    }
}
