//! `invoice run`
//!
//! Issues invoices for every pending production. Sending and clearing the
//! pending list are opt-in flags; nothing is ever sent without `--send`.

use chrono::{Local, NaiveDate};
use clap::Args;

use crate::config::Settings;
use crate::dispatch::OutboxDispatcher;
use crate::display::format_batch_report;
use crate::error::{InvoiceError, InvoiceResult};
use crate::render::OutputFormat;
use crate::services::{BatchOptions, BatchReport, InvoiceService};
use crate::storage::Storage;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Only invoice this client (key or company name)
    #[arg(short, long)]
    pub client: Option<String>,

    /// Issue date (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    pub date: Option<String>,

    /// Queue each invoice in the outbox for delivery
    #[arg(long)]
    pub send: bool,

    /// Remove issued productions from the client's pending list
    #[arg(long)]
    pub clear_productions: bool,

    /// Rendered document format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Parse a YYYY-MM-DD date, defaulting to today
pub fn parse_issue_date(date: Option<&str>) -> InvoiceResult<NaiveDate> {
    match date {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            InvoiceError::Validation(format!(
                "Invalid date: '{}'. Use the format YYYY-MM-DD",
                raw
            ))
        }),
        None => Ok(Local::now().date_naive()),
    }
}

/// Handle `invoice run`
pub fn handle_run_command(
    storage: &Storage,
    settings: &mut Settings,
    args: RunArgs,
) -> InvoiceResult<BatchReport> {
    let options = BatchOptions {
        issue_date: parse_issue_date(args.date.as_deref())?,
        client: args.client,
        send: args.send,
        clear_productions: args.clear_productions,
        format: args.format,
    };

    let mut outbox = OutboxDispatcher::new(storage.paths().outbox_dir());
    let symbol = settings.currency_symbol.clone();
    let report = InvoiceService::new(storage, settings).run_batch(&options, &mut outbox)?;

    println!("{}", format_batch_report(&report, &symbol));
    if !options.send && report.issued_count() > 0 {
        println!("Invoices were not sent. Re-run with --send to queue them for delivery.");
    }

    Ok(report)
}
