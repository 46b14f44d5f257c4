//! Transaction record model
//!
//! A fully resolved financial record for one production, detached from
//! whatever store it was read from.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// Status of a transaction record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordKind {
    /// Money that was actually spent; counts toward totals
    #[default]
    Actual,
    /// Budgeted estimate; never counts toward totals
    Estimate,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Actual => write!(f, "ACTUAL"),
            Self::Estimate => write!(f, "ESTIMATE"),
        }
    }
}

/// A single transaction record for a production
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TransactionRecord {
    /// Vendor that was paid, if known
    #[serde(default)]
    pub vendor: Option<String>,

    /// Amount in minor currency units
    #[serde(default)]
    pub amount: Option<Money>,

    /// Actual or estimate
    #[serde(default, rename = "type")]
    pub kind: RecordKind,

    /// Category section label
    #[serde(default)]
    pub section: Option<String>,

    /// Category item label
    #[serde(default)]
    pub item: Option<String>,
}

impl TransactionRecord {
    /// Create an ACTUAL record with a vendor and amount and no category
    pub fn actual(vendor: impl Into<String>, cents: i64) -> Self {
        Self {
            vendor: Some(vendor.into()),
            amount: Some(Money::from_cents(cents)),
            kind: RecordKind::Actual,
            section: None,
            item: None,
        }
    }

    /// Create an ESTIMATE record with a vendor and amount
    pub fn estimate(vendor: impl Into<String>, cents: i64) -> Self {
        Self {
            kind: RecordKind::Estimate,
            ..Self::actual(vendor, cents)
        }
    }

    /// Create an ACTUAL record with no vendor
    pub fn unattributed(cents: i64) -> Self {
        Self {
            vendor: None,
            amount: Some(Money::from_cents(cents)),
            ..Self::default()
        }
    }

    /// Assign a category (builder style)
    pub fn in_category(mut self, section: Option<&str>, item: impl Into<String>) -> Self {
        self.section = section.map(str::to_string);
        self.item = Some(item.into());
        self
    }

    /// Check whether this record counts toward financial totals
    pub fn is_actual(&self) -> bool {
        self.kind == RecordKind::Actual
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&RecordKind::Estimate).unwrap();
        assert_eq!(json, "\"ESTIMATE\"");
    }

    #[test]
    fn test_deserialize_sparse_record() {
        let record: TransactionRecord =
            serde_json::from_str(r#"{"vendor": "Grip Co", "amount": 1250, "type": "ACTUAL"}"#)
                .unwrap();
        assert_eq!(record.vendor.as_deref(), Some("Grip Co"));
        assert_eq!(record.amount, Some(Money::from_cents(1250)));
        assert!(record.section.is_none());
        assert!(record.is_actual());
    }

    #[test]
    fn test_builders() {
        let record = TransactionRecord::estimate("Lights", 100).in_category(Some("G&E"), "Rental");
        assert!(!record.is_actual());
        assert_eq!(record.section.as_deref(), Some("G&E"));
        assert_eq!(record.item.as_deref(), Some("Rental"));
    }
}
