//! Transaction record retrieval
//!
//! The invoicing core only sees fully resolved [`TransactionRecord`]s. This
//! module defines the retrieval seam and a file-backed implementation that
//! reads `records/<company>/<production>.json` (an array of records) or
//! `records/<company>/<production>.csv` with the header
//! `vendor,amount_cents,type,section,item`.

use std::fs::File;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::debug;

use crate::error::{InvoiceError, InvoiceResult};
use crate::models::{Money, RecordKind, TransactionRecord};

use super::file_io::{check_file_name, read_json_opt};

/// Read-only access to a production's transaction records
pub trait RecordSource {
    fn fetch(&self, production: &str, company: &str) -> InvoiceResult<Vec<TransactionRecord>>;
}

/// One row of a CSV record file; blank cells are `None`
#[derive(Debug, Deserialize)]
struct CsvRecordRow {
    vendor: Option<String>,
    amount_cents: Option<i64>,
    #[serde(rename = "type")]
    kind: Option<RecordKind>,
    section: Option<String>,
    item: Option<String>,
}

impl From<CsvRecordRow> for TransactionRecord {
    fn from(row: CsvRecordRow) -> Self {
        Self {
            vendor: row.vendor,
            amount: row.amount_cents.map(Money::from_cents),
            kind: row.kind.unwrap_or_default(),
            section: row.section,
            item: row.item,
        }
    }
}

/// Records stored as files under a root directory
#[derive(Debug, Clone)]
pub struct FileRecordSource {
    root: PathBuf,
}

impl FileRecordSource {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn record_path(&self, company: &str, production: &str, extension: &str) -> PathBuf {
        self.root
            .join(company)
            .join(format!("{}.{}", production, extension))
    }

    fn read_csv(&self, path: &PathBuf) -> InvoiceResult<Vec<TransactionRecord>> {
        let file = File::open(path)
            .map_err(|e| InvoiceError::Io(format!("Failed to open {}: {}", path.display(), e)))?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        reader
            .deserialize::<CsvRecordRow>()
            .map(|row| row.map(TransactionRecord::from).map_err(InvoiceError::from))
            .collect()
    }
}

impl RecordSource for FileRecordSource {
    fn fetch(&self, production: &str, company: &str) -> InvoiceResult<Vec<TransactionRecord>> {
        check_file_name("Company", company)?;
        check_file_name("Production", production)?;

        let json_path = self.record_path(company, production, "json");
        if let Some(records) = read_json_opt::<Vec<TransactionRecord>, _>(&json_path)? {
            debug!(path = %json_path.display(), count = records.len(), "Loaded records");
            return Ok(records);
        }

        let csv_path = self.record_path(company, production, "csv");
        if csv_path.exists() {
            let records = self.read_csv(&csv_path)?;
            debug!(path = %csv_path.display(), count = records.len(), "Loaded records");
            return Ok(records);
        }

        Err(InvoiceError::production_not_found(format!(
            "{} / {}",
            company, production
        )))
    }
}
