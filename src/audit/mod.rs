//! Issued invoice log
//!
//! Every generated invoice is recorded in an append-only JSONL file so the
//! history of invoice numbers, totals and dispatches can be reviewed later.
//!
//! # Example
//!
//! ```rust,ignore
//! use production_invoice::audit::{IssuedInvoiceEntry, IssuedInvoiceLog};
//!
//! let log = IssuedInvoiceLog::new(paths.issued_log());
//! log.log(&IssuedInvoiceEntry::new(42, "Northwind", "Pilot", today, total, path))?;
//! ```

mod entry;
mod logger;

pub use entry::IssuedInvoiceEntry;
pub use logger::IssuedInvoiceLog;
