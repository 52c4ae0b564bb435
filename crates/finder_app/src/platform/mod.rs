mod app;
mod browser;
pub mod config;
mod effects;
mod logging;
mod ui;

pub use app::run_app;
