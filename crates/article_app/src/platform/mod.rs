//! Terminal front end: argument parsing, logging, effect execution and rendering.
mod app;
mod cli;
mod effects;
mod logging;
mod render;

pub use app::run_app;
