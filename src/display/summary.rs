//! Terminal summaries
//!
//! Tables for previews, batch results and the issued-invoice history.

use std::fmt::Write as _;

use chrono::NaiveDate;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::amount::{format_currency, format_money, format_rate};
use crate::audit::IssuedInvoiceEntry;
use crate::layout::appendix::{EXCLUDED_TITLE, UNCATEGORIZED_TITLE};
use crate::models::BillingBreakdown;
use crate::reports::PAYROLL_LINE_LABEL;
use crate::services::invoicing::{BatchReport, Delivery, InvoicePreview, OutcomeStatus};
use crate::storage::format_invoice_number;

#[derive(Tabled)]
struct SectionRow {
    #[tabled(rename = "Section")]
    name: String,
    #[tabled(rename = "Lines")]
    lines: usize,
    #[tabled(rename = "Total")]
    total: String,
}

#[derive(Tabled)]
struct ChargeRow {
    #[tabled(rename = "Item")]
    label: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "Client")]
    client: String,
    #[tabled(rename = "Production")]
    production: String,
    #[tabled(rename = "Invoice")]
    invoice: String,
    #[tabled(rename = "Total Due")]
    total_due: String,
    #[tabled(rename = "Result")]
    result: String,
}

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Invoice")]
    invoice: String,
    #[tabled(rename = "Issued")]
    issued: String,
    #[tabled(rename = "Company")]
    company: String,
    #[tabled(rename = "Production")]
    production: String,
    #[tabled(rename = "Total Due")]
    total_due: String,
    #[tabled(rename = "Sent")]
    sent: &'static str,
}

/// Section totals followed by the billing lines
pub fn format_billing_summary(preview: &InvoicePreview, symbol: &str) -> String {
    let aggregation = &preview.aggregation;

    let mut sections = vec![SectionRow {
        name: UNCATEGORIZED_TITLE.to_string(),
        lines: aggregation.uncategorized.len(),
        total: format_money(symbol, aggregation.uncategorized_total),
    }];
    sections.extend(aggregation.tree.sections().iter().map(|section| SectionRow {
        name: section.name.clone(),
        lines: section.items.iter().map(|item| item.entries.len()).sum(),
        total: format_money(symbol, section.total()),
    }));
    sections.push(SectionRow {
        name: EXCLUDED_TITLE.to_string(),
        lines: aggregation.excluded.len(),
        total: format_money(symbol, aggregation.excluded_total),
    });

    let billing = &preview.billing;
    let mut charges = Vec::new();
    match &billing.breakdown {
        BillingBreakdown::Flat { fee } => charges.push(ChargeRow {
            label: "Flat fee".into(),
            rate: String::new(),
            amount: format_currency(symbol, *fee),
        }),
        BillingBreakdown::Percent {
            rate,
            amount_due,
            payroll_adjustment,
        } => {
            charges.push(ChargeRow {
                label: "Total Transactions".into(),
                rate: format_rate(*rate),
                amount: format_currency(symbol, *amount_due),
            });
            charges.push(ChargeRow {
                label: PAYROLL_LINE_LABEL.into(),
                rate: format_rate(*rate),
                amount: format!("({})", format_currency(symbol, *payroll_adjustment)),
            });
        }
    }
    for (label, amount) in [
        ("Subtotal", billing.subtotal),
        ("Tax", billing.tax),
        ("Total Due", billing.total_due),
    ] {
        charges.push(ChargeRow {
            label: label.into(),
            rate: String::new(),
            amount: format_currency(symbol, amount),
        });
    }

    format!(
        "{} / {}\nTransactions: {}\n\n{}\n\n{}",
        preview.company,
        preview.production,
        format_money(symbol, aggregation.grand_total),
        Table::new(sections).with(Style::sharp()),
        Table::new(charges).with(Style::sharp()),
    )
}

/// One row per processed production, then skipped clients
pub fn format_batch_report(report: &BatchReport, symbol: &str) -> String {
    if report.outcomes.is_empty() && report.skipped_clients.is_empty() {
        return "No clients configured.".to_string();
    }

    let rows: Vec<OutcomeRow> = report
        .outcomes
        .iter()
        .map(|outcome| match &outcome.status {
            OutcomeStatus::Issued {
                invoice_number,
                total_due,
                delivery,
                ..
            } => OutcomeRow {
                client: outcome.client.clone(),
                production: outcome.production.clone(),
                invoice: format_invoice_number(*invoice_number),
                total_due: format_currency(symbol, *total_due),
                result: match delivery {
                    Delivery::NotRequested => "issued".to_string(),
                    Delivery::Sent { .. } => "sent".to_string(),
                    Delivery::Failed { error } => format!("issued, not sent: {}", error),
                },
            },
            OutcomeStatus::Failed { error } => OutcomeRow {
                client: outcome.client.clone(),
                production: outcome.production.clone(),
                invoice: "-".into(),
                total_due: "-".into(),
                result: format!("failed: {}", error),
            },
        })
        .collect();

    let mut output = String::new();
    if !rows.is_empty() {
        output.push_str(&Table::new(rows).with(Style::sharp()).to_string());
        output.push('\n');
    }
    if !report.skipped_clients.is_empty() {
        output.push_str(&format!(
            "Skipped (no productions): {}\n",
            report.skipped_clients.join(", ")
        ));
    }
    output.push_str(&format!(
        "{} issued, {} failed",
        report.issued_count(),
        report.failed_count()
    ));
    if report.undelivered_count() > 0 {
        output.push_str(&format!(", {} not sent", report.undelivered_count()));
    }
    output
}

/// Date in the configured format, ISO if the format is unusable
fn format_date(date: NaiveDate, format: &str) -> String {
    let mut out = String::new();
    match write!(out, "{}", date.format(format)) {
        Ok(()) => out,
        Err(_) => date.to_string(),
    }
}

/// Issued invoices, oldest first
pub fn format_history(entries: &[IssuedInvoiceEntry], symbol: &str, date_format: &str) -> String {
    if entries.is_empty() {
        return "No invoices issued.".to_string();
    }

    let rows: Vec<HistoryRow> = entries
        .iter()
        .map(|entry| HistoryRow {
            invoice: format_invoice_number(entry.invoice_number),
            issued: format_date(entry.issue_date, date_format),
            company: entry.company.clone(),
            production: entry.production.clone(),
            total_due: format_currency(symbol, entry.total_due),
            sent: if entry.dispatched { "yes" } else { "no" },
        })
        .collect();

    Table::new(rows).with(Style::sharp()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BillingResult, Money};
    use crate::services::aggregation::{Aggregation, LineAmount};
    use crate::services::invoicing::ProductionOutcome;
    use rust_decimal_macros::dec;
    use std::path::PathBuf;

    fn preview() -> InvoicePreview {
        let mut aggregation = Aggregation::default();
        aggregation
            .tree
            .insert("Camera", "Lenses", "Glass Co", Money::from_cents(120_000));
        aggregation.uncategorized.push(LineAmount {
            label: "Unknown".into(),
            amount: Money::from_cents(1_000),
        });
        aggregation.uncategorized_total = Money::from_cents(1_000);
        aggregation.grand_total = Money::from_cents(121_000);

        InvoicePreview {
            company: "Northwind".into(),
            production: "Pilot".into(),
            aggregation,
            billing: BillingResult {
                grand_total: dec!(1210.00),
                excluded_total: dec!(0.00),
                breakdown: BillingBreakdown::Percent {
                    rate: dec!(0.1),
                    amount_due: dec!(121.00),
                    payroll_adjustment: dec!(0.00),
                },
                subtotal: dec!(121.00),
                tax: dec!(0.00),
                total_due: dec!(121.00),
            },
        }
    }

    #[test]
    fn test_billing_summary() {
        let output = format_billing_summary(&preview(), "$");
        assert!(output.starts_with("Northwind / Pilot\nTransactions: $1,210.00"));
        assert!(output.contains("Camera"));
        assert!(output.contains(UNCATEGORIZED_TITLE));
        assert!(output.contains(EXCLUDED_TITLE));
        assert!(output.contains(PAYROLL_LINE_LABEL));
        assert!(output.contains("10%"));
        assert!(output.contains("$121.00"));
    }

    #[test]
    fn test_batch_report() {
        let report = BatchReport {
            outcomes: vec![
                ProductionOutcome {
                    client: "northwind".into(),
                    company: "Northwind".into(),
                    production: "Pilot".into(),
                    status: OutcomeStatus::Issued {
                        invoice_number: 7,
                        total_due: dec!(750),
                        document: PathBuf::from("invoices/Pilot Invoice.txt"),
                        delivery: Delivery::NotRequested,
                    },
                },
                ProductionOutcome {
                    client: "northwind".into(),
                    company: "Northwind".into(),
                    production: "Teaser".into(),
                    status: OutcomeStatus::Issued {
                        invoice_number: 8,
                        total_due: dec!(90),
                        document: PathBuf::from("invoices/Teaser Invoice.txt"),
                        delivery: Delivery::Failed {
                            error: "relay down".into(),
                        },
                    },
                },
                ProductionOutcome {
                    client: "northwind".into(),
                    company: "Northwind".into(),
                    production: "Finale".into(),
                    status: OutcomeStatus::Failed {
                        error: "no records".into(),
                    },
                },
            ],
            skipped_clients: vec!["idle".into()],
        };

        let output = format_batch_report(&report, "$");
        assert!(output.contains("00007"));
        assert!(output.contains("$750.00"));
        assert!(output.contains("failed: no records"));
        assert!(output.contains("Skipped (no productions): idle"));
        assert!(output.contains("issued, not sent: relay down"));
        assert!(output.ends_with("2 issued, 1 failed, 1 not sent"));
    }

    #[test]
    fn test_empty_outputs() {
        assert_eq!(
            format_batch_report(&BatchReport::default(), "$"),
            "No clients configured."
        );
        assert_eq!(format_history(&[], "$", "%m/%d/%Y"), "No invoices issued.");
    }

    #[test]
    fn test_history() {
        let entry = IssuedInvoiceEntry::new(
            12,
            "Northwind",
            "Pilot",
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            dec!(1234.5),
            "invoices/Pilot Invoice.txt",
        );
        let output = format_history(&[entry], "$", "%m/%d/%Y");
        assert!(output.contains("00012"));
        assert!(output.contains("03/02/2026"));
        assert!(output.contains("$1,234.50"));
    }
}
