pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod model;
pub mod poll;
pub mod quiz;
pub mod screen;
pub mod session;
pub mod timer;
pub mod tui;
pub mod ui;
