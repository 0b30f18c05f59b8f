use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;

use crate::cli::Cli;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

pub const POLL_CHECK_INTERVAL_MS: u64 = 3000;
pub const COUNTDOWN_TICK_MS: u64 = 1000;
pub const RESULT_FLASH_MS: u64 = 500;
/// Seconds the player gets for each quiz question.
pub const QUIZ_TIME_FOR_ANSWER: i64 = 120;
pub const QUIZ_WRONG_ANSWER_PENALIZATION: i64 = 100;

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub request_timeout: Duration,
    pub log_file: PathBuf,
    pub poll_interval: Duration,
    pub countdown_tick: Duration,
    pub result_flash: Duration,
    pub answer_seconds: i64,
    pub wrong_answer_penalty: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            log_file: default_log_file(),
            poll_interval: Duration::from_millis(POLL_CHECK_INTERVAL_MS),
            countdown_tick: Duration::from_millis(COUNTDOWN_TICK_MS),
            result_flash: Duration::from_millis(RESULT_FLASH_MS),
            answer_seconds: QUIZ_TIME_FOR_ANSWER,
            wrong_answer_penalty: QUIZ_WRONG_ANSWER_PENALIZATION,
        }
    }
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Result<Self, String> {
        if cli.mode.document_id().trim().is_empty() {
            return Err("Document ID must not be empty".to_string());
        }
        let base_url = cli.base_url.trim();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(format!("Invalid base URL: {}", cli.base_url));
        }
        if cli.timeout_secs == 0 {
            return Err("Timeout must be at least one second".to_string());
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(cli.timeout_secs),
            log_file: cli
                .log_file
                .as_ref()
                .map(PathBuf::from)
                .unwrap_or_else(default_log_file),
            ..Self::default()
        })
    }
}

pub fn default_log_file() -> PathBuf {
    ProjectDirs::from("org", "quizpoll", "quizpoll")
        .map(|dirs| dirs.data_local_dir().join("quizpoll.log"))
        .unwrap_or_else(|| std::env::temp_dir().join("quizpoll.log"))
}
