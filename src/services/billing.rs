//! Billing calculator
//!
//! Derives the amount due for a production from its transaction totals.
//! Totals arrive as exact minor-unit [`Money`]; all arithmetic runs on
//! unrounded decimals and only the result fields are rounded to cents.

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{InvoiceError, InvoiceResult};
use crate::models::{BillingBreakdown, BillingMode, BillingProfile, BillingResult, Money};

/// Stateless fee computation for a [`BillingProfile`]
pub struct BillingCalculator<'a> {
    profile: &'a BillingProfile,
}

impl<'a> BillingCalculator<'a> {
    pub fn new(profile: &'a BillingProfile) -> Self {
        Self { profile }
    }

    /// Compute subtotal, tax and total due
    ///
    /// Fails with [`InvoiceError::UnmappedFlatTier`] when a flat-mode total lands
    /// outside every tier, and with [`InvoiceError::InvalidRate`] when a percent
    /// rate is outside [0, 1].
    pub fn compute(&self, grand_total: Money, excluded_total: Money) -> InvoiceResult<BillingResult> {
        let total = grand_total.to_decimal();
        let excluded = excluded_total.to_decimal();

        let (breakdown, subtotal) = match self.profile.mode {
            BillingMode::Flat => {
                let tier = self
                    .profile
                    .tiers
                    .tier_for(total)
                    .ok_or(InvoiceError::UnmappedFlatTier { total })?;
                (BillingBreakdown::Flat { fee: round(tier.fee) }, tier.fee)
            }
            BillingMode::Percent { value: rate } => {
                if rate < Decimal::ZERO || rate > Decimal::ONE {
                    return Err(InvoiceError::InvalidRate { rate });
                }
                let amount_due = rate * total;
                let payroll_adjustment = rate * excluded;
                (
                    BillingBreakdown::Percent {
                        rate,
                        amount_due: round(amount_due),
                        payroll_adjustment: round(payroll_adjustment),
                    },
                    amount_due - payroll_adjustment,
                )
            }
        };

        let tax = subtotal * self.profile.tax_rate;
        let total_due = subtotal + tax;

        debug!(mode = %self.profile.mode, %subtotal, %tax, "Computed billing");

        Ok(BillingResult {
            grand_total: round(total),
            excluded_total: round(excluded),
            breakdown,
            subtotal: round(subtotal),
            tax: round(tax),
            total_due: round(total_due),
        })
    }
}

/// Banker's rounding to cents
fn round(value: Decimal) -> Decimal {
    value.round_dp(2)
}
