//! `invoice preview`
//!
//! Shows what a production would be billed without taking an invoice number.

use clap::Args;

use crate::config::Settings;
use crate::display::format_billing_summary;
use crate::error::InvoiceResult;
use crate::services::preview_production;
use crate::storage::Storage;

#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Client key or company name
    pub client: String,

    /// Production name
    pub production: String,
}

/// Handle `invoice preview`
pub fn handle_preview_command(
    storage: &Storage,
    settings: &Settings,
    args: PreviewArgs,
) -> InvoiceResult<()> {
    let preview = preview_production(storage, settings, &args.client, &args.production)?;
    println!("{}", format_billing_summary(&preview, &settings.currency_symbol));
    Ok(())
}
