//! Logging setup and an in-memory diagnostics buffer.
//!
//! Everything logs through the `log` facade. [`setup_logging`] installs a
//! `fern` dispatcher that writes to the log file when logging is enabled (or
//! warnings to stderr otherwise) and mirrors every line into a [`Logger`] so
//! sync failures stay inspectable from inside the application.

use anyhow::{Context, Result};
use chrono::Utc;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::config::LoggingConfig;
use crate::constants::LOG_FILE_NAME;

/// Number of lines kept by the in-memory buffer.
const MEMORY_LOG_CAPACITY: usize = 500;

/// Shared logger that can be used across the application
#[derive(Clone)]
pub struct Logger {
    logs: Arc<Mutex<VecDeque<String>>>,
}

impl Logger {
    pub fn new() -> Self {
        Self {
            logs: Arc::new(Mutex::new(VecDeque::with_capacity(MEMORY_LOG_CAPACITY))),
        }
    }

    /// Add a log entry
    pub fn log(&self, message: String) {
        let timestamp = Utc::now().format("%H:%M:%S%.3f").to_string();
        let formatted_message = format!("[{}] {}", timestamp, message);

        if let Ok(mut logs) = self.logs.lock() {
            if logs.len() == MEMORY_LOG_CAPACITY {
                logs.pop_front();
            }
            logs.push_back(formatted_message);
        }
    }

    /// Get all logs sorted by date (newest first)
    pub fn get_logs(&self) -> Vec<String> {
        if let Ok(logs) = self.logs.lock() {
            logs.iter().rev().cloned().collect()
        } else {
            Vec::new()
        }
    }

    /// Clear all logs
    pub fn clear(&self) {
        if let Ok(mut logs) = self.logs.lock() {
            logs.clear();
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

/// Location of the log file: `<data_dir>/pantry/pantry.log`
pub fn get_log_file_path() -> Result<PathBuf> {
    dirs::data_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))
        .map(|dir| dir.join("pantry").join(LOG_FILE_NAME))
}

/// Install the global logger. Returns the in-memory buffer that mirrors it.
///
/// # Errors
/// Fails if the level is invalid, the log file cannot be opened, or a global
/// logger is already installed.
pub fn setup_logging(config: &LoggingConfig) -> Result<Logger> {
    let level: log::LevelFilter = config
        .level
        .parse()
        .with_context(|| format!("Invalid logging level '{}'", config.level))?;

    let memory = Logger::new();
    let sink = memory.clone();

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}: {}",
                Utc::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        // sqlx and sea-orm are noisy at debug
        .level_for("sqlx", log::LevelFilter::Warn)
        .level_for("sea_orm", log::LevelFilter::Warn)
        .chain(fern::Output::call(move |record| sink.log(record.args().to_string())));

    if config.enabled {
        let path = get_log_file_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
        }
        let file = fern::log_file(&path).with_context(|| format!("Failed to open log file: {}", path.display()))?;
        dispatch = dispatch.chain(file);
    } else {
        dispatch = dispatch.chain(fern::Dispatch::new().level(log::LevelFilter::Warn).chain(std::io::stderr()));
    }

    dispatch.apply().context("Failed to install logger")?;
    Ok(memory)
}
