//! Append-only log of issued invoices
//!
//! Each entry is written as a single JSON line and flushed immediately.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use crate::error::{InvoiceError, InvoiceResult};

use super::entry::IssuedInvoiceEntry;

pub struct IssuedInvoiceLog {
    log_path: PathBuf,
}

impl IssuedInvoiceLog {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append one entry
    pub fn log(&self, entry: &IssuedInvoiceEntry) -> InvoiceResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| InvoiceError::Io(format!("Failed to open invoice log: {}", e)))?;

        let json = serde_json::to_string(entry)
            .map_err(|e| InvoiceError::Json(format!("Failed to serialize log entry: {}", e)))?;

        writeln!(file, "{}", json)
            .map_err(|e| InvoiceError::Io(format!("Failed to write log entry: {}", e)))?;

        file.flush()
            .map_err(|e| InvoiceError::Io(format!("Failed to flush invoice log: {}", e)))?;

        Ok(())
    }

    /// All entries, oldest first
    pub fn read_all(&self) -> InvoiceResult<Vec<IssuedInvoiceEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| InvoiceError::Io(format!("Failed to open invoice log: {}", e)))?;

        let mut entries = Vec::new();
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                InvoiceError::Io(format!("Failed to read log line {}: {}", line_num + 1, e))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let entry = serde_json::from_str(&line).map_err(|e| {
                InvoiceError::Json(format!(
                    "Failed to parse log entry at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;
            entries.push(entry);
        }

        Ok(entries)
    }

    /// The most recent `count` entries, oldest first
    pub fn read_recent(&self, count: usize) -> InvoiceResult<Vec<IssuedInvoiceEntry>> {
        let mut entries = self.read_all()?;
        let skip = entries.len().saturating_sub(count);
        Ok(entries.split_off(skip))
    }
}
