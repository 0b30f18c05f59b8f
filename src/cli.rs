use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "quizpoll", version, about = "Terminal player for live polls and quizzes")]
pub struct Cli {
    #[command(subcommand)]
    pub mode: Mode,

    /// Quiz&Poll server to talk to
    #[arg(long, env = "QUIZPOLL_BASE_URL", default_value = crate::config::DEFAULT_BASE_URL, global = true)]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "QUIZPOLL_TIMEOUT_SECS", default_value_t = 10, global = true)]
    pub timeout_secs: u64,

    /// Log file [default: <data dir>/quizpoll.log]
    #[arg(long, env = "QUIZPOLL_LOG_FILE", value_name = "path", global = true)]
    pub log_file: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Mode {
    /// Follow a live poll run by an instructor
    Poll {
        /// ID of the poll spreadsheet
        document_id: String,
    },
    /// Play a self-paced quiz
    Quiz {
        /// ID of the quiz spreadsheet
        document_id: String,
    },
}

impl Mode {
    pub fn document_id(&self) -> &str {
        match self {
            Mode::Poll { document_id } | Mode::Quiz { document_id } => document_id,
        }
    }
}
