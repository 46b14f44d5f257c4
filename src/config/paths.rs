//! Path management for production invoicing
//!
//! ## Path Resolution Order
//!
//! 1. `INVOICE_CLI_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/production-invoice` or `~/.config/production-invoice`
//! 3. Windows: `%APPDATA%\production-invoice`

use std::path::PathBuf;

use crate::error::InvoiceError;

const APP_DIR: &str = "production-invoice";

/// Manages all paths used by the invoicing tool
#[derive(Debug, Clone)]
pub struct InvoicePaths {
    base_dir: PathBuf,
}

impl InvoicePaths {
    /// Resolve the base directory from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home/config directory can be determined.
    pub fn new() -> Result<Self, InvoiceError> {
        let base_dir = if let Ok(custom) = std::env::var("INVOICE_CLI_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create InvoicePaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Settings file (config.json)
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Persisted invoice counter
    pub fn invoice_number_file(&self) -> PathBuf {
        self.base_dir.join("invoice_number.json")
    }

    /// Append-only log of issued invoices
    pub fn issued_log(&self) -> PathBuf {
        self.base_dir.join("invoices.log")
    }

    /// Company → billing address map
    pub fn tax_info_file(&self) -> PathBuf {
        self.base_dir.join("tax_info.json")
    }

    /// Root of per-company record files
    pub fn records_dir(&self) -> PathBuf {
        self.base_dir.join("records")
    }

    /// Rendered invoice documents
    pub fn output_dir(&self) -> PathBuf {
        self.base_dir.join("invoices")
    }

    /// Dispatch payloads waiting to be sent
    pub fn outbox_dir(&self) -> PathBuf {
        self.base_dir.join("outbox")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), InvoiceError> {
        for dir in [
            self.base_dir.clone(),
            self.records_dir(),
            self.output_dir(),
            self.outbox_dir(),
        ] {
            std::fs::create_dir_all(&dir).map_err(|e| {
                InvoiceError::Io(format!(
                    "Failed to create directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Check whether settings have been written
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, InvoiceError> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg).join(APP_DIR));
    }
    let home = std::env::var("HOME")
        .map_err(|_| InvoiceError::Config("HOME environment variable not set".into()))?;
    Ok(PathBuf::from(home).join(".config").join(APP_DIR))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, InvoiceError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| InvoiceError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join(APP_DIR))
}
