//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod history;
pub mod preview;
pub mod run;

pub use history::{handle_history_command, HistoryArgs};
pub use preview::{handle_preview_command, PreviewArgs};
pub use run::{handle_run_command, RunArgs};
