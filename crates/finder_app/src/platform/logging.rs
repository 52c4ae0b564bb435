//! Platform logging initialization for the job finder.
//!
//! The terminal belongs to the UI, so log lines go to a file
//! (`./job_finder.log` unless configured otherwise).

use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use simplelog::{Config, ConfigBuilder, WriteLogger};

/// Initialize the file logger. Returns false if the log file could not be
/// created; the app keeps running without logs in that case.
pub fn initialize(log_path: &Path) -> bool {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    match File::create(log_path) {
        Ok(file) => {
            let _ = WriteLogger::init(level, build_config(), file);
            true
        }
        Err(err) => {
            eprintln!(
                "Warning: Could not create log file at {:?}: {}",
                log_path, err
            );
            false
        }
    }
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        // reqwest/hyper internals are noisy at debug.
        .add_filter_ignore_str("hyper")
        .add_filter_ignore_str("rustls")
        .build()
}
