use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Sends logs to `log_file`; the terminal belongs to the UI.
pub fn init(log_file: &Path) -> Result<(), String> {
    if let Some(dir) = log_file.parent() {
        fs::create_dir_all(dir)
            .map_err(|e| format!("Cannot create log dir {}: {}", dir.display(), e))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .map_err(|e| format!("Cannot open log file {}: {}", log_file.display(), e))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quizpoll=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| format!("Cannot start logging: {}", e))
}
