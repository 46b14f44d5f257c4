//! Company tax info lookup
//!
//! Supplies the billing address printed on an invoice. A missing entry is not
//! an error; the caller falls back to a configured address.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::InvoiceResult;
use crate::models::BillingAddress;

use super::file_io::read_json;

pub trait TaxInfoSource {
    fn fetch(&self, company: &str) -> InvoiceResult<Option<BillingAddress>>;
}

/// Company → address map stored in tax_info.json
#[derive(Debug, Clone)]
pub struct JsonTaxInfoSource {
    path: PathBuf,
}

impl JsonTaxInfoSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TaxInfoSource for JsonTaxInfoSource {
    fn fetch(&self, company: &str) -> InvoiceResult<Option<BillingAddress>> {
        let mut entries: BTreeMap<String, BillingAddress> = read_json(&self.path)?;
        Ok(entries.remove(company))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_fetch_known_and_unknown_company() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tax_info.json");
        fs::write(
            &path,
            r#"{"Northwind Pictures": {"street": "1 Main St", "city": "Austin", "state": "TX", "zip": "73301"}}"#,
        )
        .unwrap();

        let source = JsonTaxInfoSource::new(path);
        let found = source.fetch("Northwind Pictures").unwrap().unwrap();
        assert_eq!(found.city, "Austin");
        assert!(source.fetch("Unknown Co").unwrap().is_none());
    }

    #[test]
    fn test_missing_file_yields_none() {
        let temp_dir = TempDir::new().unwrap();
        let source = JsonTaxInfoSource::new(temp_dir.path().join("tax_info.json"));
        assert!(source.fetch("Anyone").unwrap().is_none());
    }
}
