//! Storage layer
//!
//! File-backed implementations of the collaborators the invoicing core reads
//! from: transaction records, company tax info and the invoice counter.

pub mod file_io;
pub mod invoice_number;
pub mod records;
pub mod tax_info;

pub use file_io::{read_json, write_json_atomic};
pub use invoice_number::{format_invoice_number, InvoiceNumberStore, JsonInvoiceNumberStore};
pub use records::{FileRecordSource, RecordSource};
pub use tax_info::{JsonTaxInfoSource, TaxInfoSource};

use crate::audit::IssuedInvoiceLog;
use crate::config::paths::InvoicePaths;
use crate::error::InvoiceError;

/// Main storage coordinator that wires every file-backed store to its path
pub struct Storage {
    paths: InvoicePaths,
    pub records: FileRecordSource,
    pub tax_info: JsonTaxInfoSource,
    pub invoice_numbers: JsonInvoiceNumberStore,
    pub issued: IssuedInvoiceLog,
}

impl Storage {
    pub fn new(paths: InvoicePaths) -> Result<Self, InvoiceError> {
        paths.ensure_directories()?;

        Ok(Self {
            records: FileRecordSource::new(paths.records_dir()),
            tax_info: JsonTaxInfoSource::new(paths.tax_info_file()),
            invoice_numbers: JsonInvoiceNumberStore::new(paths.invoice_number_file()),
            issued: IssuedInvoiceLog::new(paths.issued_log()),
            paths,
        })
    }

    pub fn paths(&self) -> &InvoicePaths {
        &self.paths
    }
}
