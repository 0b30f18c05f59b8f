use std::sync::mpsc;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use quizpoll::app::{Activity, LiveRuntime};
use quizpoll::cli::Cli;
use quizpoll::config::Config;
use quizpoll::gateway::HttpTransport;
use quizpoll::{logging, tui};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli)?;

    logging::init(&config.log_file)?;
    info!(base_url = %config.base_url, mode = ?cli.mode, "starting");

    let transport = HttpTransport::new(&config.base_url, config.request_timeout)
        .map_err(|e| format!("Cannot create HTTP client: {}", e))?;

    let (timer_tx, timer_rx) = mpsc::channel();
    let (net_tx, net_rx) = mpsc::channel();
    let runtime = LiveRuntime::new(Arc::new(transport), timer_tx, net_tx);
    let activity = Activity::new(&cli.mode, &config);

    tui::run_tui(activity, runtime, timer_rx, net_rx)
}
