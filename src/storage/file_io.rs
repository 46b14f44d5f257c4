//! JSON file helpers with atomic writes
//!
//! Everything the tool persists (settings, the invoice counter, tax info) is a
//! small JSON document. Writes go to a sibling temp file that is synced and
//! renamed over the target, so a crash never leaves a half-written counter.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::InvoiceError;

fn storage_error(action: &str, path: &Path, err: impl std::fmt::Display) -> InvoiceError {
    InvoiceError::Storage(format!("Failed to {} {}: {}", action, path.display(), err))
}

/// Read JSON from a file, or `None` if the file doesn't exist
pub fn read_json_opt<T, P>(path: P) -> Result<Option<T>, InvoiceError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(path).map_err(|e| storage_error("open", path, e))?;
    serde_json::from_reader(BufReader::new(file))
        .map(Some)
        .map_err(|e| storage_error("parse", path, e))
}

/// Read JSON from a file, returning a default value if the file doesn't exist
pub fn read_json<T, P>(path: P) -> Result<T, InvoiceError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    Ok(read_json_opt(path)?.unwrap_or_default())
}

/// Write JSON to a file atomically (write to temp, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), InvoiceError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| storage_error("create directory", parent, e))?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = path.with_extension("json.tmp");

    let file = File::create(&temp_path).map_err(|e| storage_error("create", &temp_path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| storage_error("serialize", path, e))?;
    writer
        .flush()
        .map_err(|e| storage_error("flush", &temp_path, e))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| storage_error("sync", &temp_path, e))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        storage_error("replace", path, e)
    })
}

/// Write raw bytes, creating parent directories
pub fn write_bytes<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<(), InvoiceError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| storage_error("create directory", parent, e))?;
    }
    fs::write(path, bytes).map_err(|e| storage_error("write", path, e))
}

/// Reject a name that would leave its directory once joined into a path
pub fn check_file_name(kind: &str, name: &str) -> Result<(), InvoiceError> {
    if name.trim().is_empty() || name.contains(['/', '\\']) || name.contains("..") {
        return Err(InvoiceError::Validation(format!(
            "{} name '{}' must not be empty or contain path separators or '..'",
            kind, name
        )));
    }
    Ok(())
}
