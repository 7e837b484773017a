//! CLI, configuration, secret resolution, output rendering
//!
//! This crate provides the `famcal` command-line interface.

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod render;
pub mod secret;

pub use app::App;
pub use cli::Cli;
pub use error::{ClientError, ClientResult};
