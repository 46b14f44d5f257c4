//! Production invoicing
//!
//! Turns a production's transaction records into a billing amount and a
//! paginated, categorized invoice document.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution and settings (clients, exclusions, fee tiers)
//! - `error`: Custom error types
//! - `models`: Records, the ordered category tree, billing types
//! - `storage`: File-backed record, tax info and invoice number stores
//! - `services`: Aggregation, billing and batch invoicing
//! - `layout`: Cursor-driven pagination and draw commands
//! - `reports`: The invoice document
//! - `render`: Canvas sinks that turn draw commands into bytes
//! - `dispatch`: Outbound delivery of finished invoices
//! - `audit`: Issued invoice log
//!
//! # Example
//!
//! ```rust,ignore
//! use production_invoice::config::{InvoicePaths, Settings};
//!
//! let paths = InvoicePaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod display;
pub mod error;
pub mod layout;
pub mod logging;
pub mod models;
pub mod render;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{InvoiceError, InvoiceResult};
