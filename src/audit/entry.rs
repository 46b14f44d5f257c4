//! Issued invoice entries

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One line of the issued-invoice log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedInvoiceEntry {
    /// When the invoice was generated (UTC)
    pub timestamp: DateTime<Utc>,

    pub invoice_number: u32,

    pub company: String,

    pub production: String,

    /// Date printed on the invoice
    pub issue_date: NaiveDate,

    pub total_due: Decimal,

    /// Rendered document location
    pub document: String,

    /// Whether a dispatch payload was produced
    #[serde(default)]
    pub dispatched: bool,
}

impl IssuedInvoiceEntry {
    pub fn new(
        invoice_number: u32,
        company: impl Into<String>,
        production: impl Into<String>,
        issue_date: NaiveDate,
        total_due: Decimal,
        document: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            invoice_number,
            company: company.into(),
            production: production.into(),
            issue_date,
            total_due,
            document: document.into(),
            dispatched: false,
        }
    }

    pub fn with_dispatched(mut self, dispatched: bool) -> Self {
        self.dispatched = dispatched;
        self
    }
}
