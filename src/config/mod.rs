//! Configuration module
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - Settings persistence (clients, exclusions, fee schedule, issuer details)

pub mod paths;
pub mod settings;

pub use paths::InvoicePaths;
pub use settings::{ClientConfig, Settings};
