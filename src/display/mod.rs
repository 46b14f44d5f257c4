//! Display formatting for terminal and document output
//!
//! Provides amount/rate formatting shared by the rendered invoice and the
//! CLI, plus tabled summaries for terminal output.

pub mod amount;
pub mod summary;

pub use amount::{format_currency, format_grouped, format_money, format_rate};
pub use summary::{format_batch_report, format_billing_summary, format_history};
