//! Amount and rate formatting
//!
//! Amounts print with thousands separators and exactly two decimals, e.g.
//! `$1,234,567.89`. Rounding to cents happens here, at presentation.

use rust_decimal::Decimal;

use crate::models::Money;

/// Format a decimal as `1,234.56`
pub fn format_grouped(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}.{}", sign, grouped, frac_part)
}

/// Format a decimal with a currency symbol, e.g. `$1,234.56`
pub fn format_currency(symbol: &str, value: Decimal) -> String {
    let grouped = format_grouped(value);
    match grouped.strip_prefix('-') {
        Some(abs) => format!("-{}{}", symbol, abs),
        None => format!("{}{}", symbol, grouped),
    }
}

/// Format minor-unit money with a currency symbol
pub fn format_money(symbol: &str, amount: Money) -> String {
    format_currency(symbol, amount.to_decimal())
}

/// Format a fractional rate as a percentage, e.g. 0.125 → `12.5%`
pub fn format_rate(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}
