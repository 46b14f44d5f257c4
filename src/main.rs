use anyhow::{bail, Result};
use clap::{ArgAction, Parser, Subcommand};

use production_invoice::cli::{
    handle_history_command, handle_preview_command, handle_run_command, HistoryArgs, PreviewArgs,
    RunArgs,
};
use production_invoice::config::{InvoicePaths, Settings};
use production_invoice::logging;
use production_invoice::storage::Storage;

#[derive(Parser)]
#[command(
    name = "invoice",
    version,
    about = "Production invoicing from transaction records",
    long_about = "Aggregates a production's transaction records into a categorized \
                  summary, bills it under the client's flat or percentage fee model \
                  and renders a paginated invoice."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write default settings and create the data directories
    Init,

    /// Show current configuration and paths
    Config,

    /// Show aggregation and billing for a production without issuing it
    Preview(PreviewArgs),

    /// Issue invoices for every pending production
    Run(RunArgs),

    /// List issued invoices
    History(HistoryArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let paths = InvoicePaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;
    let storage = Storage::new(paths.clone())?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing invoicing at: {}", paths.base_dir().display());
            if paths.is_initialized() {
                println!("Settings already exist; leaving them unchanged.");
            } else {
                settings.save(&paths)?;
                println!("Wrote {}", paths.settings_file().display());
            }
            println!();
            println!("Add clients to config.json and place records under:");
            println!("  {}/<company>/<production>.json", paths.records_dir().display());
        }
        Some(Commands::Config) => {
            println!("Invoicing Configuration");
            println!("=======================");
            println!("Data directory:   {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Records:          {}", paths.records_dir().display());
            println!("Invoices:         {}", paths.output_dir().display());
            println!("Outbox:           {}", paths.outbox_dir().display());
            println!();
            println!("Settings:");
            println!("  Issuer:         {}", settings.issuer_name);
            println!("  Tax rate:       {}", settings.tax_rate);
            println!("  Payment terms:  {} days", settings.payment_terms_days);
            println!("  Excluded:       {}", settings.exclude.join(", "));
            println!();
            if settings.clients.is_empty() {
                println!("No clients configured.");
            }
            for (key, client) in &settings.clients {
                println!(
                    "  {} ({}): {} billing, {} pending production(s)",
                    key,
                    client.company,
                    client.billing,
                    client.productions.len()
                );
            }
        }
        Some(Commands::Preview(args)) => {
            handle_preview_command(&storage, &settings, args)?;
        }
        Some(Commands::Run(args)) => {
            let report = handle_run_command(&storage, &mut settings, args)?;
            if report.failed_count() > 0 {
                bail!("{} production(s) could not be invoiced", report.failed_count());
            }
            if !report.is_success() {
                bail!(
                    "{} invoice(s) were issued but could not be sent",
                    report.undelivered_count()
                );
            }
        }
        Some(Commands::History(args)) => {
            handle_history_command(&storage, &settings, args)?;
        }
        None => {
            println!("invoice - production invoicing");
            println!();
            println!("Run 'invoice --help' for usage information.");
        }
    }

    Ok(())
}
