//! `invoice history`

use clap::Args;

use crate::config::Settings;
use crate::display::format_history;
use crate::error::InvoiceResult;
use crate::storage::Storage;

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Number of most recent invoices to show
    #[arg(short, long, default_value = "20")]
    pub limit: usize,
}

/// Handle `invoice history`
pub fn handle_history_command(
    storage: &Storage,
    settings: &Settings,
    args: HistoryArgs,
) -> InvoiceResult<()> {
    let entries = storage.issued.read_recent(args.limit)?;
    println!(
        "{}",
        format_history(&entries, &settings.currency_symbol, &settings.date_format)
    );
    Ok(())
}
