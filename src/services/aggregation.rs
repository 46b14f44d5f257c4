//! Aggregation of transaction records
//!
//! Turns the flat record list of a production into the ordered category tree
//! plus the uncategorized and excluded buckets shown in the appendix.
//!
//! Excluded vendors are reported twice on purpose: their amounts stay inside
//! the category tree and the grand total, and are also listed in the excluded
//! bucket so percent billing can subtract them.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::models::{CategoryTree, Money, TransactionRecord, CUSTOM_SECTION};

/// Label for uncategorized amounts that have no vendor
pub const UNKNOWN_VENDOR: &str = "Unknown";

/// Case-insensitive vendor substring that always marks a record excluded
pub const PAYROLL_MARKER: &str = "payroll";

/// Vendors whose amounts are reported separately for payroll adjustment
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    vendors: HashSet<String>,
}

impl ExclusionSet {
    pub fn new<I, S>(vendors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            vendors: vendors.into_iter().map(Into::into).collect(),
        }
    }

    /// Exact list membership, or "payroll" anywhere in the name (any case)
    pub fn matches(&self, vendor: &str) -> bool {
        self.vendors.contains(vendor) || vendor.to_lowercase().contains(PAYROLL_MARKER)
    }
}

/// A labelled amount in the uncategorized or excluded bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineAmount {
    pub label: String,
    pub amount: Money,
}

impl LineAmount {
    fn new(label: &str, amount: Money) -> Self {
        Self {
            label: label.to_string(),
            amount,
        }
    }
}

/// Result of aggregating one production's records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Aggregation {
    /// Categorized vendor lines
    pub tree: CategoryTree,
    /// Every ACTUAL amount, vendor or not
    pub grand_total: Money,
    /// ACTUAL lines outside the category tree, in input order
    pub uncategorized: Vec<LineAmount>,
    pub uncategorized_total: Money,
    /// Lines for excluded vendors, also counted in the tree or uncategorized
    pub excluded: Vec<LineAmount>,
    pub excluded_total: Money,
}

impl Aggregation {
    /// Sum of every item total in the category tree
    pub fn categorized_total(&self) -> Money {
        self.tree.total()
    }
}

/// Builds [`Aggregation`]s against a fixed exclusion set
pub struct Aggregator<'a> {
    exclusions: &'a ExclusionSet,
}

impl<'a> Aggregator<'a> {
    pub fn new(exclusions: &'a ExclusionSet) -> Self {
        Self { exclusions }
    }

    /// Aggregate records in input order
    ///
    /// ESTIMATE records and records without an amount contribute nothing.
    /// A vendor-bearing record is categorized when it has an item label, its
    /// section defaulting to "Custom"; otherwise it is uncategorized under its
    /// vendor name. Vendor-less amounts are uncategorized under "Unknown".
    pub fn aggregate(&self, records: &[TransactionRecord]) -> Aggregation {
        let mut result = Aggregation::default();

        for record in records {
            if !record.is_actual() {
                continue;
            }

            let Some(amount) = record.amount else {
                debug!(vendor = ?record.vendor, "Dropping record without an amount");
                continue;
            };

            result.grand_total += amount;

            let Some(vendor) = record.vendor.as_deref() else {
                result
                    .uncategorized
                    .push(LineAmount::new(UNKNOWN_VENDOR, amount));
                result.uncategorized_total += amount;
                continue;
            };

            if self.exclusions.matches(vendor) {
                result.excluded.push(LineAmount::new(vendor, amount));
                result.excluded_total += amount;
            }

            match record.item.as_deref() {
                Some(item) => {
                    let section = record.section.as_deref().unwrap_or(CUSTOM_SECTION);
                    result.tree.insert(section, item, vendor, amount);
                }
                None => {
                    result.uncategorized.push(LineAmount::new(vendor, amount));
                    result.uncategorized_total += amount;
                }
            }
        }

        debug!(
            sections = result.tree.sections().len(),
            grand_total = result.grand_total.cents(),
            excluded_total = result.excluded_total.cents(),
            "Aggregated production records"
        );

        result
    }
}
