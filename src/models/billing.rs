//! Billing profile and result models
//!
//! A client is billed either a flat fee chosen from a stepped tier table or a
//! percentage of the production's spend with payroll-style exclusions
//! subtracted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{InvoiceError, InvoiceResult};

/// Billing strategy for a client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BillingMode {
    /// Flat fee looked up from the tier table
    Flat,
    /// Percentage of the transaction total; `value` is in [0, 1]
    Percent { value: Decimal },
}

impl fmt::Display for BillingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flat => write!(f, "flat"),
            Self::Percent { value } => write!(f, "percent ({})", value),
        }
    }
}

/// One step of the flat fee table, in major currency units
///
/// A missing bound is unbounded on that side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatTier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Decimal>,
    #[serde(default)]
    pub min_inclusive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Decimal>,
    #[serde(default)]
    pub max_inclusive: bool,
    pub fee: Decimal,
}

impl FlatTier {
    /// Check whether a total (major units) falls inside this tier
    pub fn contains(&self, total: Decimal) -> bool {
        let above_min = match self.min {
            None => true,
            Some(min) if self.min_inclusive => total >= min,
            Some(min) => total > min,
        };
        let below_max = match self.max {
            None => true,
            Some(max) if self.max_inclusive => total <= max,
            Some(max) => total < max,
        };
        above_min && below_max
    }
}

/// Ascending table of flat fee tiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatTierTable(Vec<FlatTier>);

impl FlatTierTable {
    pub fn new(tiers: Vec<FlatTier>) -> Self {
        Self(tiers)
    }

    pub fn tiers(&self) -> &[FlatTier] {
        &self.0
    }

    /// First tier whose range contains the total
    pub fn tier_for(&self, total: Decimal) -> Option<&FlatTier> {
        self.0.iter().find(|t| t.contains(total))
    }

    /// Reject tables whose ranges overlap, run backwards, or whose fees decrease
    pub fn validate(&self) -> InvoiceResult<()> {
        if self.0.is_empty() {
            return Err(InvoiceError::Validation(
                "Flat tier table must contain at least one tier".into(),
            ));
        }

        for (idx, pair) in self.0.windows(2).enumerate() {
            let (prev, next) = (&pair[0], &pair[1]);
            let (Some(prev_max), Some(next_min)) = (prev.max, next.min) else {
                return Err(InvoiceError::Validation(format!(
                    "Flat tier {} must be bounded between its neighbours",
                    idx + 1
                )));
            };
            let overlaps =
                next_min < prev_max || (next_min == prev_max && prev.max_inclusive && next.min_inclusive);
            if overlaps {
                return Err(InvoiceError::Validation(format!(
                    "Flat tier {} overlaps the tier before it",
                    idx + 2
                )));
            }
            if next.fee < prev.fee {
                return Err(InvoiceError::Validation(format!(
                    "Flat tier {} charges less than the tier before it",
                    idx + 2
                )));
            }
        }

        Ok(())
    }
}

impl Default for FlatTierTable {
    /// The published tier schedule. 2,000,000 and 7,500,000 sit on open
    /// boundaries of both neighbouring tiers and map to no fee.
    fn default() -> Self {
        fn tier(
            min: Option<i64>,
            min_inclusive: bool,
            max: Option<i64>,
            fee: i64,
        ) -> FlatTier {
            FlatTier {
                min: min.map(Decimal::from),
                min_inclusive,
                max: max.map(Decimal::from),
                max_inclusive: false,
                fee: Decimal::new(fee * 100, 2),
            }
        }

        Self(vec![
            tier(None, false, Some(100_000), 400),
            tier(Some(100_000), true, Some(500_000), 750),
            tier(Some(500_000), true, Some(2_000_000), 2_000),
            tier(Some(2_000_000), false, Some(7_500_000), 4_000),
            tier(Some(7_500_000), false, None, 7_500),
        ])
    }
}

/// Everything the calculator needs to bill one production
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingProfile {
    pub mode: BillingMode,
    pub tax_rate: Decimal,
    pub tiers: FlatTierTable,
}

impl BillingProfile {
    pub fn flat() -> Self {
        Self {
            mode: BillingMode::Flat,
            tax_rate: Decimal::ZERO,
            tiers: FlatTierTable::default(),
        }
    }

    pub fn percent(rate: Decimal) -> Self {
        Self {
            mode: BillingMode::Percent { value: rate },
            ..Self::flat()
        }
    }

    pub fn with_tax_rate(mut self, tax_rate: Decimal) -> Self {
        self.tax_rate = tax_rate;
        self
    }
}

/// Mode-specific charge lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum BillingBreakdown {
    Flat {
        fee: Decimal,
    },
    Percent {
        rate: Decimal,
        /// rate × grand total
        amount_due: Decimal,
        /// rate × excluded total
        payroll_adjustment: Decimal,
    },
}

/// Charge for one production, every amount rounded to 2 decimal places
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BillingResult {
    pub grand_total: Decimal,
    pub excluded_total: Decimal,
    pub breakdown: BillingBreakdown,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total_due: Decimal,
}
