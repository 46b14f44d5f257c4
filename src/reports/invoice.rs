//! Invoice document
//!
//! Builds the complete invoice for one production: front page, billing
//! breakdown, optional rate card and the transaction appendix, as an ordered
//! stream of [`CanvasOp`]s plus the summary needed to dispatch it.

use std::fmt::Write as _;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::config::Settings;
use crate::display::{format_currency, format_rate};
use crate::error::{InvoiceError, InvoiceResult};
use crate::layout::{
    layout_appendix, AppendixTotals, CanvasOp, DrawCommand, Font, LayoutConfig, PageLayoutEngine,
};
use crate::models::{
    BillingAddress, BillingBreakdown, BillingMode, BillingProfile, BillingResult, Money,
    TransactionRecord,
};
use crate::services::aggregation::{Aggregation, Aggregator, ExclusionSet};
use crate::services::billing::BillingCalculator;
use crate::storage::invoice_number::{format_invoice_number, InvoiceNumberStore};

const PAGE_LEFT: i32 = 60;
const PAGE_RIGHT: i32 = 545;
const HEADER_RULE_Y: i32 = 740;

const COL_ITEM: i32 = 63;
const COL_VALUE: i32 = 315;
const COL_RATE: i32 = 420;
const COL_AMOUNT: i32 = 485;

pub const PAYROLL_LINE_LABEL: &str = "(less) Payroll Invoices";

/// Issuer-wide presentation settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentStyle {
    pub issuer_name: String,
    pub currency_symbol: String,
    pub date_format: String,
    pub payment_terms_days: i64,
    pub logo_image: Option<String>,
    pub rate_card_image: Option<String>,
    pub layout: LayoutConfig,
}

impl DocumentStyle {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            issuer_name: settings.issuer_name.clone(),
            currency_symbol: settings.currency_symbol.clone(),
            date_format: settings.date_format.clone(),
            payment_terms_days: settings.payment_terms_days,
            logo_image: settings.logo_image.clone(),
            rate_card_image: settings.rate_card_image.clone(),
            layout: LayoutConfig::default(),
        }
    }
}

impl Default for DocumentStyle {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Everything known about one production before it is invoiced
#[derive(Debug, Clone)]
pub struct InvoiceInput<'a> {
    pub company: &'a str,
    pub email: &'a str,
    pub production: &'a str,
    pub address: BillingAddress,
    pub issue_date: NaiveDate,
    pub profile: BillingProfile,
    pub exclusions: &'a ExclusionSet,
    pub records: &'a [TransactionRecord],
}

/// Summary handed to a dispatch sink alongside the rendered bytes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchPayload {
    pub recipient: String,
    pub name: String,
    pub amount: Decimal,
    pub description: String,
    pub number: String,
}

/// A finished invoice
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceDocument {
    pub invoice_number: u32,
    pub ops: Vec<CanvasOp>,
    pub billing: BillingResult,
    pub aggregation: Aggregation,
    pub appendix: AppendixTotals,
    pub payload: DispatchPayload,
}

impl InvoiceDocument {
    /// Zero-padded invoice number as printed
    pub fn number_label(&self) -> String {
        format_invoice_number(self.invoice_number)
    }

    /// Grand total re-derived from the appendix lines, excluded duplicates removed
    pub fn displayed_total(&self) -> Money {
        self.appendix.reconciled_total()
    }

    /// Physical pages in the document
    pub fn page_count(&self) -> usize {
        1 + self.ops.iter().filter(|op| op.is_page_break()).count()
    }
}

/// Orchestrates aggregation, billing and layout into an [`InvoiceDocument`]
pub struct ReportDocument<'a> {
    style: &'a DocumentStyle,
}

impl<'a> ReportDocument<'a> {
    pub fn new(style: &'a DocumentStyle) -> Self {
        Self { style }
    }

    /// Build the invoice, taking the next number from `numbers`
    ///
    /// Billing is computed before the counter moves, so an unbillable total
    /// never burns an invoice number.
    pub fn build(
        &self,
        input: &InvoiceInput<'_>,
        numbers: &mut dyn InvoiceNumberStore,
    ) -> InvoiceResult<InvoiceDocument> {
        let aggregation = Aggregator::new(input.exclusions).aggregate(input.records);
        let billing = BillingCalculator::new(&input.profile)
            .compute(aggregation.grand_total, aggregation.excluded_total)?;

        let issue_label = self.format_date(input.issue_date)?;
        let due_date = input
            .issue_date
            .checked_add_signed(Duration::days(self.style.payment_terms_days))
            .ok_or_else(|| {
                InvoiceError::Validation(format!(
                    "Payment terms of {} days overflow the calendar",
                    self.style.payment_terms_days
                ))
            })?;
        let due_label = self.format_date(due_date)?;

        let invoice_number = numbers.next()?;
        debug!(
            invoice = invoice_number,
            production = input.production,
            "Assigned invoice number"
        );

        let mut ops = Vec::new();
        self.front_page(&mut ops, input, invoice_number, &issue_label, &due_label);

        let mut page = 1;
        ops.push(CanvasOp::PageBreak { page_index: page });
        self.breakdown_page(&mut ops, invoice_number, &billing);

        if let (BillingMode::Flat, Some(image)) = (input.profile.mode, &self.style.rate_card_image) {
            page += 1;
            ops.push(CanvasOp::PageBreak { page_index: page });
            push(&mut ops, DrawCommand::rule(PAGE_LEFT, PAGE_RIGHT, HEADER_RULE_Y));
            push(&mut ops, DrawCommand::image(image.as_str(), 50, 525, 350, 214));
        }

        let mut engine = PageLayoutEngine::open(self.style.layout, page + 1);
        let appendix = layout_appendix(&mut engine, &aggregation, &self.style.currency_symbol);
        debug!(
            pages = engine.page_index() + 1,
            lines = appendix.lines,
            "Laid out appendix"
        );
        ops.extend(engine.into_ops());

        let payload = DispatchPayload {
            recipient: input.email.to_string(),
            name: input.company.to_string(),
            amount: billing.total_due,
            description: input.production.to_string(),
            number: format!(
                "for project {} on {}",
                input.production, self.style.issuer_name
            ),
        };

        Ok(InvoiceDocument {
            invoice_number,
            ops,
            billing,
            aggregation,
            appendix,
            payload,
        })
    }

    fn format_date(&self, date: NaiveDate) -> InvoiceResult<String> {
        let mut out = String::new();
        write!(out, "{}", date.format(&self.style.date_format)).map_err(|_| {
            InvoiceError::Config(format!("Invalid date format '{}'", self.style.date_format))
        })?;
        Ok(out)
    }

    fn money(&self, value: Decimal) -> String {
        format_currency(&self.style.currency_symbol, value)
    }

    fn front_page(
        &self,
        ops: &mut Vec<CanvasOp>,
        input: &InvoiceInput<'_>,
        invoice_number: u32,
        issue_label: &str,
        due_label: &str,
    ) {
        if let Some(logo) = &self.style.logo_image {
            push(ops, DrawCommand::image(logo.as_str(), 60, 740, 210, 75));
        }
        push(ops, DrawCommand::rule(PAGE_LEFT, PAGE_RIGHT, HEADER_RULE_Y));

        let number = format!("Invoice #{}", format_invoice_number(invoice_number));
        push(ops, DrawCommand::text(475, 775, number, Font::bold(10)));
        push(ops, DrawCommand::text(488, 762, "Issue Date", Font::bold(10)));
        push(ops, DrawCommand::text(486, 749, issue_label, Font::regular(10)));

        let issuer = &self.style.issuer_name;
        push(ops, DrawCommand::text(63, 700, issuer.as_str(), Font::regular(25)));
        push(
            ops,
            DrawCommand::text(63, 680, format!("Thank you for using {}!", issuer), Font::regular(10)),
        );

        let address = &input.address;
        info_block(
            ops,
            60,
            "BILL TO",
            &[
                input.company,
                input.email,
                address.street.as_str(),
                address.locality_line().as_str(),
            ],
        );
        info_block(ops, 240, "PRODUCTION", &[input.production]);
        info_block(ops, 420, "PAYMENT DUE", &[due_label]);
    }

    fn breakdown_page(&self, ops: &mut Vec<CanvasOp>, invoice_number: u32, billing: &BillingResult) {
        let number = format!("Invoice #{}", format_invoice_number(invoice_number));
        push(ops, DrawCommand::text(475, 775, number, Font::bold(10)));
        push(ops, DrawCommand::rule(PAGE_LEFT, PAGE_RIGHT, HEADER_RULE_Y));

        push(ops, DrawCommand::rule(PAGE_LEFT, PAGE_RIGHT, 535));
        for (x, heading) in [
            (COL_ITEM, "ITEM"),
            (345, "VALUE"),
            (COL_RATE, "RATE"),
            (COL_AMOUNT, "AMOUNT"),
        ] {
            push(ops, DrawCommand::text(x, 515, heading, Font::bold(10)));
        }
        push(ops, DrawCommand::rule(PAGE_LEFT, PAGE_RIGHT, 504));

        let grand = self.money(billing.grand_total);
        // y positions of the subtotal rule, subtotal, tax, total rule, total due
        let footer = match &billing.breakdown {
            BillingBreakdown::Flat { fee } => {
                let fee = self.money(*fee);
                self.charge_row(ops, 485, "Total Transactions", grand, fee.clone(), fee);
                [450, 420, 395, 370, 345]
            }
            BillingBreakdown::Percent {
                rate,
                amount_due,
                payroll_adjustment,
            } => {
                let rate = format_rate(*rate);
                self.charge_row(
                    ops,
                    485,
                    "Total Transactions",
                    grand,
                    rate.clone(),
                    self.money(*amount_due),
                );
                push(ops, DrawCommand::rule(PAGE_LEFT, PAGE_RIGHT, 460));
                self.charge_row(
                    ops,
                    440,
                    PAYROLL_LINE_LABEL,
                    format!("({})", self.money(billing.excluded_total)),
                    rate,
                    self.money(*payroll_adjustment),
                );
                [415, 385, 360, 335, 310]
            }
        };

        let [subtotal_rule, subtotal_y, tax_y, total_rule, total_y] = footer;
        push(ops, DrawCommand::rule(PAGE_LEFT, PAGE_RIGHT, subtotal_rule));
        self.amount_row(ops, subtotal_y, "Subtotal", billing.subtotal);
        self.amount_row(ops, tax_y, "Tax", billing.tax);
        push(ops, DrawCommand::rule(PAGE_LEFT, PAGE_RIGHT, total_rule));
        self.amount_row(ops, total_y, "Total Due", billing.total_due);
    }

    fn charge_row(
        &self,
        ops: &mut Vec<CanvasOp>,
        y: i32,
        label: &str,
        value: String,
        rate: String,
        amount: String,
    ) {
        let font = Font::regular(10);
        push(ops, DrawCommand::text(COL_ITEM, y, label, font));
        push(ops, DrawCommand::text(COL_VALUE, y, value, font));
        push(ops, DrawCommand::text(COL_RATE, y, rate, font));
        push(ops, DrawCommand::text(COL_AMOUNT, y, amount, font));
    }

    fn amount_row(&self, ops: &mut Vec<CanvasOp>, y: i32, label: &str, amount: Decimal) {
        let font = Font::regular(10);
        push(ops, DrawCommand::text(COL_ITEM, y, label, font));
        push(ops, DrawCommand::text(COL_AMOUNT, y, self.money(amount), font));
    }
}

fn push(ops: &mut Vec<CanvasOp>, command: DrawCommand) {
    ops.push(CanvasOp::Draw(command));
}

/// Ruled block with a bold heading and regular lines beneath it
fn info_block(ops: &mut Vec<CanvasOp>, left: i32, heading: &str, lines: &[&str]) {
    push(ops, DrawCommand::rule(left, left + 125, 635));
    push(ops, DrawCommand::text(left + 3, 620, heading, Font::bold(10)));
    for (n, line) in lines.iter().enumerate() {
        let y = 607 - 13 * n as i32;
        push(ops, DrawCommand::text(left + 3, y, *line, Font::regular(10)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::appendix::EXCLUDED_TITLE;
    use rust_decimal_macros::dec;

    /// In-memory counter
    struct Counter(u32);

    impl InvoiceNumberStore for Counter {
        fn next(&mut self) -> InvoiceResult<u32> {
            self.0 += 1;
            Ok(self.0)
        }
    }

    fn records() -> Vec<TransactionRecord> {
        vec![
            TransactionRecord::actual("Glass Co", 12_000_000).in_category(Some("Camera"), "Lenses"),
            TransactionRecord::actual("Crew Payroll", 3_000_000).in_category(Some("Labor"), "Crew"),
            TransactionRecord::actual("Gas Station", 425_000),
            TransactionRecord::estimate("Quote Co", 99_900_000),
            TransactionRecord::unattributed(80_000),
        ]
    }

    fn input<'a>(
        records: &'a [TransactionRecord],
        exclusions: &'a ExclusionSet,
        profile: BillingProfile,
    ) -> InvoiceInput<'a> {
        InvoiceInput {
            company: "Northwind Pictures",
            email: "ap@northwind.test",
            production: "Pilot",
            address: BillingAddress::new("3114 NE 36th Ave", "Portland", "OR", "97212"),
            issue_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            profile,
            exclusions,
            records,
        }
    }

    fn texts(doc: &InvoiceDocument) -> Vec<&str> {
        doc.ops
            .iter()
            .filter_map(|op| match op {
                CanvasOp::Draw(cmd) => cmd.as_text(),
                CanvasOp::PageBreak { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_percent_invoice() {
        let style = DocumentStyle::default();
        let records = records();
        let exclusions = ExclusionSet::default();
        let mut counter = Counter(41);

        let doc = ReportDocument::new(&style)
            .build(&input(&records, &exclusions, BillingProfile::percent(dec!(0.1))), &mut counter)
            .unwrap();

        assert_eq!(doc.invoice_number, 42);
        assert_eq!(doc.number_label(), "00042");
        assert_eq!(doc.billing.grand_total, dec!(155050.00));
        assert_eq!(doc.billing.subtotal, dec!(12505.00));

        let drawn = texts(&doc);
        assert!(drawn.contains(&"Invoice #00042"));
        assert!(drawn.contains(&"01/15/2026"));
        assert!(drawn.contains(&"02/14/2026"));
        assert!(drawn.contains(&"97212, Portland, OR"));
        assert!(drawn.contains(&PAYROLL_LINE_LABEL));
        assert!(drawn.contains(&"($30,000.00)"));
        assert!(drawn.contains(&"10%"));
        assert!(drawn.contains(&"$12,505.00"));
    }

    #[test]
    fn test_flat_invoice_has_no_payroll_line() {
        let style = DocumentStyle::default();
        let records = records();
        let exclusions = ExclusionSet::default();
        let mut counter = Counter(0);

        let doc = ReportDocument::new(&style)
            .build(&input(&records, &exclusions, BillingProfile::flat()), &mut counter)
            .unwrap();

        assert_eq!(doc.billing.total_due, dec!(750.00));
        let drawn = texts(&doc);
        assert!(!drawn.contains(&PAYROLL_LINE_LABEL));
        assert_eq!(drawn.iter().filter(|t| **t == "$750.00").count(), 4);
        // front, breakdown, appendix
        assert_eq!(doc.page_count(), 3);
    }

    #[test]
    fn test_rate_card_page_only_in_flat_mode() {
        let style = DocumentStyle {
            rate_card_image: Some("rates.jpg".into()),
            ..DocumentStyle::default()
        };
        let records = records();
        let exclusions = ExclusionSet::default();

        let flat = ReportDocument::new(&style)
            .build(&input(&records, &exclusions, BillingProfile::flat()), &mut Counter(0))
            .unwrap();
        let percent = ReportDocument::new(&style)
            .build(
                &input(&records, &exclusions, BillingProfile::percent(dec!(0.1))),
                &mut Counter(0),
            )
            .unwrap();

        let has_rate_card = |doc: &InvoiceDocument| {
            doc.ops.iter().any(|op| {
                matches!(op, CanvasOp::Draw(DrawCommand::Image { path, .. }) if path == "rates.jpg")
            })
        };
        assert!(has_rate_card(&flat));
        assert!(!has_rate_card(&percent));
        assert_eq!(flat.page_count(), 4);
        assert_eq!(percent.page_count(), 3);
    }

    #[test]
    fn test_unmapped_tier_does_not_consume_number() {
        let style = DocumentStyle::default();
        let records = vec![TransactionRecord::actual("Studio Lot", 200_000_000)
            .in_category(Some("Stage"), "Rental")];
        let exclusions = ExclusionSet::default();
        let mut counter = Counter(7);

        let err = ReportDocument::new(&style)
            .build(&input(&records, &exclusions, BillingProfile::flat()), &mut counter)
            .unwrap_err();

        assert!(matches!(err, InvoiceError::UnmappedFlatTier { .. }));
        assert_eq!(counter.0, 7);
    }

    #[test]
    fn test_displayed_total_matches_grand_total() {
        let style = DocumentStyle::default();
        let records = records();
        let exclusions = ExclusionSet::new(["Glass Co"]);

        let doc = ReportDocument::new(&style)
            .build(&input(&records, &exclusions, BillingProfile::flat()), &mut Counter(0))
            .unwrap();

        assert_eq!(doc.displayed_total(), doc.aggregation.grand_total);
        assert_eq!(doc.appendix.excluded, Money::from_cents(15_000_000));
        assert_eq!(texts(&doc).last(), Some(&"$30,000.00"));
        assert!(texts(&doc).contains(&EXCLUDED_TITLE));
    }

    #[test]
    fn test_payload() {
        let style = DocumentStyle::default();
        let records = records();
        let exclusions = ExclusionSet::default();

        let doc = ReportDocument::new(&style)
            .build(&input(&records, &exclusions, BillingProfile::flat()), &mut Counter(0))
            .unwrap();

        assert_eq!(
            doc.payload,
            DispatchPayload {
                recipient: "ap@northwind.test".into(),
                name: "Northwind Pictures".into(),
                amount: dec!(750.00),
                description: "Pilot".into(),
                number: "for project Pilot on RollCredits".into(),
            }
        );
    }

    #[test]
    fn test_invalid_date_format() {
        let style = DocumentStyle {
            date_format: "%Q".into(),
            ..DocumentStyle::default()
        };
        let records = records();
        let exclusions = ExclusionSet::default();
        let mut counter = Counter(0);

        let err = ReportDocument::new(&style)
            .build(&input(&records, &exclusions, BillingProfile::flat()), &mut counter)
            .unwrap_err();
        assert!(matches!(err, InvoiceError::Config(_)));
        assert_eq!(counter.0, 0);
    }
}
