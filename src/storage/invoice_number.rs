//! Invoice number counter
//!
//! Numbers are issued once and never reused. The first number issued against
//! an empty store is 1; every later call returns one more than the last and
//! persists it before returning.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::InvoiceResult;

use super::file_io::{read_json, write_json_atomic};

/// Zero-pad an invoice number for presentation
pub fn format_invoice_number(number: u32) -> String {
    format!("{:05}", number)
}

/// Source of monotonically increasing invoice numbers
pub trait InvoiceNumberStore {
    /// Increment, persist and return the new number
    fn next(&mut self) -> InvoiceResult<u32>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CounterState {
    #[serde(default)]
    last_issued: u32,
}

/// Counter persisted in invoice_number.json
#[derive(Debug, Clone)]
pub struct JsonInvoiceNumberStore {
    path: PathBuf,
}

impl JsonInvoiceNumberStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Last number handed out, 0 if none
    pub fn last_issued(&self) -> InvoiceResult<u32> {
        let state: CounterState = read_json(&self.path)?;
        Ok(state.last_issued)
    }
}

impl InvoiceNumberStore for JsonInvoiceNumberStore {
    fn next(&mut self) -> InvoiceResult<u32> {
        let mut state: CounterState = read_json(&self.path)?;
        state.last_issued += 1;
        write_json_atomic(&self.path, &state)?;
        Ok(state.last_issued)
    }
}
