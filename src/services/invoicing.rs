//! Invoicing service
//!
//! Runs a batch over the configured clients: for each pending production it
//! fetches records, builds and renders the invoice, optionally dispatches it
//! and records it in the issued-invoice log. A failing production is reported
//! and the batch moves on.

use std::path::PathBuf;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use crate::audit::IssuedInvoiceEntry;
use crate::config::{ClientConfig, Settings};
use crate::dispatch::DispatchSink;
use crate::error::{InvoiceError, InvoiceResult};
use crate::models::{BillingAddress, BillingResult, TransactionRecord};
use crate::render::OutputFormat;
use crate::reports::{DocumentStyle, InvoiceInput, ReportDocument};
use crate::storage::file_io::{check_file_name, write_bytes};
use crate::storage::{RecordSource, Storage, TaxInfoSource};

use super::aggregation::{Aggregation, Aggregator};
use super::billing::BillingCalculator;

/// Caller decisions for one batch run
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub issue_date: NaiveDate,
    /// Only process this client (key or company name)
    pub client: Option<String>,
    /// Hand each rendered invoice to the dispatch sink
    pub send: bool,
    /// Drop issued productions from the client's pending list afterwards
    pub clear_productions: bool,
    pub format: OutputFormat,
}

impl BatchOptions {
    pub fn new(issue_date: NaiveDate) -> Self {
        Self {
            issue_date,
            client: None,
            send: false,
            clear_productions: false,
            format: OutputFormat::default(),
        }
    }
}

/// Delivery state of an issued invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Delivery {
    NotRequested,
    Sent { location: PathBuf },
    /// The invoice stands; only the hand-off to the dispatch sink failed
    Failed { error: String },
}

impl Delivery {
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// What happened to one production
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum OutcomeStatus {
    Issued {
        invoice_number: u32,
        total_due: Decimal,
        document: PathBuf,
        delivery: Delivery,
    },
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductionOutcome {
    pub client: String,
    pub company: String,
    pub production: String,
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

impl ProductionOutcome {
    pub fn is_issued(&self) -> bool {
        matches!(self.status, OutcomeStatus::Issued { .. })
    }

    /// Issued, but the requested send did not go through
    pub fn is_undelivered(&self) -> bool {
        matches!(&self.status, OutcomeStatus::Issued { delivery, .. } if delivery.is_failed())
    }
}

/// Per-production results of a batch run
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub outcomes: Vec<ProductionOutcome>,
    /// Clients that had nothing to invoice
    pub skipped_clients: Vec<String>,
}

impl BatchReport {
    pub fn issued_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_issued()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.issued_count()
    }

    pub fn undelivered_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_undelivered()).count()
    }

    /// Every production issued and every requested send delivered
    pub fn is_success(&self) -> bool {
        self.failed_count() == 0 && self.undelivered_count() == 0
    }
}

/// Aggregation and billing for a production, without issuing anything
#[derive(Debug, Clone, Serialize)]
pub struct InvoicePreview {
    pub company: String,
    pub production: String,
    pub aggregation: Aggregation,
    pub billing: BillingResult,
}

/// Compute what a production would be billed, without taking a number
pub fn preview_production(
    storage: &Storage,
    settings: &Settings,
    client: &str,
    production: &str,
) -> InvoiceResult<InvoicePreview> {
    let (_, config) = settings
        .find_client(client)
        .ok_or_else(|| InvoiceError::client_not_found(client))?;

    let records = fetch_records(storage, &config.company, production)?;
    let aggregation = Aggregator::new(&settings.exclusion_set()).aggregate(&records);
    let billing = BillingCalculator::new(&settings.billing_profile(config))
        .compute(aggregation.grand_total, aggregation.excluded_total)?;

    Ok(InvoicePreview {
        company: config.company.clone(),
        production: production.to_string(),
        aggregation,
        billing,
    })
}

fn fetch_records(
    storage: &Storage,
    company: &str,
    production: &str,
) -> InvoiceResult<Vec<TransactionRecord>> {
    storage
        .records
        .fetch(production, company)
        .map_err(|e| InvoiceError::RecordSource {
            production: production.to_string(),
            message: e.to_string(),
        })
}

/// Service for issuing invoices
pub struct InvoiceService<'a> {
    storage: &'a Storage,
    settings: &'a mut Settings,
}

impl<'a> InvoiceService<'a> {
    pub fn new(storage: &'a Storage, settings: &'a mut Settings) -> Self {
        Self { storage, settings }
    }

    /// Invoice every pending production
    ///
    /// Only configuration problems (unknown client filter, failing to save
    /// settings) abort the run; everything else lands in the report.
    pub fn run_batch(
        &mut self,
        options: &BatchOptions,
        dispatcher: &mut dyn DispatchSink,
    ) -> InvoiceResult<BatchReport> {
        let clients: Vec<(String, ClientConfig)> = match &options.client {
            Some(name) => {
                let (key, config) = self
                    .settings
                    .find_client(name)
                    .ok_or_else(|| InvoiceError::client_not_found(name.as_str()))?;
                vec![(key.clone(), config.clone())]
            }
            None => self
                .settings
                .clients
                .iter()
                .map(|(k, c)| (k.clone(), c.clone()))
                .collect(),
        };

        let style = DocumentStyle::from_settings(self.settings);
        let mut report = BatchReport::default();
        let mut settings_changed = false;

        for (key, client) in clients {
            if client.productions.is_empty() {
                info!(client = %key, "No productions to invoice");
                report.skipped_clients.push(key);
                continue;
            }

            let mut issued = Vec::new();
            for production in &client.productions {
                let status = match self.issue(&style, &client, production, options, dispatcher) {
                    Ok(status) => {
                        issued.push(production.clone());
                        status
                    }
                    Err(e) => {
                        warn!(client = %key, production = %production, error = %e, "Invoice failed");
                        OutcomeStatus::Failed {
                            error: e.to_string(),
                        }
                    }
                };
                report.outcomes.push(ProductionOutcome {
                    client: key.clone(),
                    company: client.company.clone(),
                    production: production.clone(),
                    status,
                });
            }

            if options.clear_productions && !issued.is_empty() {
                if let Some(stored) = self.settings.clients.get_mut(&key) {
                    stored.productions.retain(|p| !issued.contains(p));
                    settings_changed = true;
                }
            }
        }

        if settings_changed {
            self.settings.save(self.storage.paths())?;
            info!("Cleared issued productions from settings");
        }

        Ok(report)
    }

    fn resolve_address(&self, company: &str) -> BillingAddress {
        let from_tax_info = match self.storage.tax_info.fetch(company) {
            Ok(found) => found,
            Err(e) => {
                warn!(company = %company, error = %e, "Tax info unavailable, using fallback address");
                None
            }
        };
        self.settings.resolve_address(company, from_tax_info)
    }

    fn issue(
        &self,
        style: &DocumentStyle,
        client: &ClientConfig,
        production: &str,
        options: &BatchOptions,
        dispatcher: &mut dyn DispatchSink,
    ) -> InvoiceResult<OutcomeStatus> {
        check_file_name("Production", production)?;
        let records = fetch_records(self.storage, &client.company, production)?;
        let exclusions = self.settings.exclusion_set();
        let input = InvoiceInput {
            company: &client.company,
            email: &client.email,
            production,
            address: self.resolve_address(&client.company),
            issue_date: options.issue_date,
            profile: self.settings.billing_profile(client),
            exclusions: &exclusions,
            records: &records,
        };

        // The number is taken here; every later step is recorded in the log
        // before any error is returned.
        let mut numbers = self.storage.invoice_numbers.clone();
        let document = ReportDocument::new(style).build(&input, &mut numbers)?;
        let path = self.document_path(production, options.format);
        let stored = options
            .format
            .render(&document.ops)
            .and_then(|bytes| write_bytes(&path, &bytes).map(|()| bytes));

        let delivery = match (&stored, options.send) {
            (_, false) => Delivery::NotRequested,
            (Err(e), true) => Delivery::Failed {
                error: e.to_string(),
            },
            (Ok(bytes), true) => {
                let file_name = file_name(production, options.format);
                match dispatcher.send(bytes, &file_name, &document.payload) {
                    Ok(receipt) => Delivery::Sent {
                        location: receipt.location,
                    },
                    Err(e) => {
                        warn!(
                            invoice = %document.number_label(),
                            production = %production,
                            error = %e,
                            "Invoice issued but not sent"
                        );
                        Delivery::Failed {
                            error: e.to_string(),
                        }
                    }
                }
            }
        };

        let entry = IssuedInvoiceEntry::new(
            document.invoice_number,
            client.company.as_str(),
            production,
            options.issue_date,
            document.billing.total_due,
            path.display().to_string(),
        )
        .with_dispatched(delivery.is_sent());
        self.storage.issued.log(&entry)?;
        stored?;

        info!(
            invoice = %document.number_label(),
            production = %production,
            total_due = %document.billing.total_due,
            "Issued invoice"
        );

        Ok(OutcomeStatus::Issued {
            invoice_number: document.invoice_number,
            total_due: document.billing.total_due,
            document: path,
            delivery,
        })
    }

    fn document_path(&self, production: &str, format: OutputFormat) -> PathBuf {
        self.storage
            .paths()
            .output_dir()
            .join(file_name(production, format))
    }
}

/// `<production> Invoice.<ext>`
pub fn file_name(production: &str, format: OutputFormat) -> String {
    format!("{} Invoice.{}", production, format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InvoicePaths;
    use crate::dispatch::{DispatchReceipt, OutboxDispatcher};
    use crate::models::BillingMode;
    use crate::reports::DispatchPayload;
    use crate::storage::InvoiceNumberStore;
    use rust_decimal_macros::dec;
    use std::fs;
    use tempfile::TempDir;

    /// Records every send without touching disk
    #[derive(Default)]
    struct Capture(Vec<DispatchPayload>);

    impl DispatchSink for Capture {
        fn send(
            &mut self,
            _document: &[u8],
            file_name: &str,
            payload: &DispatchPayload,
        ) -> InvoiceResult<DispatchReceipt> {
            self.0.push(payload.clone());
            Ok(DispatchReceipt {
                location: PathBuf::from(file_name),
            })
        }
    }

    /// Refuses every send
    struct Unreachable;

    impl DispatchSink for Unreachable {
        fn send(
            &mut self,
            _document: &[u8],
            _file_name: &str,
            _payload: &DispatchPayload,
        ) -> InvoiceResult<DispatchReceipt> {
            Err(InvoiceError::Dispatch("mail relay unreachable".into()))
        }
    }

    fn client(company: &str, billing: BillingMode, productions: &[&str]) -> ClientConfig {
        ClientConfig {
            email: format!("ap@{}.test", company.to_lowercase().replace(' ', "")),
            company: company.to_string(),
            billing,
            productions: productions.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn setup() -> (TempDir, Storage, Settings) {
        let temp_dir = TempDir::new().unwrap();
        let paths = InvoicePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        let company_dir = temp_dir.path().join("records").join("Northwind");
        fs::create_dir_all(&company_dir).unwrap();
        fs::write(
            company_dir.join("Pilot.json"),
            r#"[
                {"vendor": "Glass Co", "amount": 12000000, "type": "ACTUAL", "section": "Camera", "item": "Lenses"},
                {"vendor": "Crew Payroll", "amount": 3000000, "type": "ACTUAL", "item": "Crew"},
                {"amount": 80000}
            ]"#,
        )
        .unwrap();
        fs::write(
            company_dir.join("Finale.csv"),
            "vendor,amount_cents,type,section,item\nStage Rental,500000,ACTUAL,Stage,Rental\n",
        )
        .unwrap();

        let mut settings = Settings::default();
        settings.clients.insert(
            "northwind".into(),
            client(
                "Northwind",
                BillingMode::Percent { value: dec!(0.1) },
                &["Pilot", "Missing", "Finale"],
            ),
        );
        settings
            .clients
            .insert("idle".into(), client("Idle Films", BillingMode::Flat, &[]));
        settings.save(storage.paths()).unwrap();

        (temp_dir, storage, settings)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    #[test]
    fn test_batch_continues_past_failed_production() {
        let (_temp_dir, storage, mut settings) = setup();
        let mut capture = Capture::default();

        let report = InvoiceService::new(&storage, &mut settings)
            .run_batch(&BatchOptions::new(date()), &mut capture)
            .unwrap();

        assert_eq!(report.skipped_clients, vec!["idle".to_string()]);
        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.issued_count(), 2);
        assert_eq!(report.failed_count(), 1);
        assert!(!report.is_success());

        let failed = &report.outcomes[1];
        assert_eq!(failed.production, "Missing");
        match &failed.status {
            OutcomeStatus::Failed { error } => assert!(error.contains("Missing")),
            other => panic!("unexpected status {:?}", other),
        }

        // numbers are only consumed by issued invoices
        match &report.outcomes[2].status {
            OutcomeStatus::Issued { invoice_number, .. } => assert_eq!(*invoice_number, 2),
            other => panic!("unexpected status {:?}", other),
        }
        assert!(capture.0.is_empty());
    }

    #[test]
    fn test_issued_invoice_is_written_and_logged() {
        let (_temp_dir, storage, mut settings) = setup();
        let mut capture = Capture::default();

        let report = InvoiceService::new(&storage, &mut settings)
            .run_batch(&BatchOptions::new(date()), &mut capture)
            .unwrap();

        match &report.outcomes[0].status {
            OutcomeStatus::Issued {
                invoice_number,
                total_due,
                document,
                delivery,
            } => {
                assert_eq!(*invoice_number, 1);
                // 10% of 150,800.00 less 10% of 30,000.00
                assert_eq!(*total_due, dec!(12080.00));
                assert!(document.ends_with("invoices/Pilot Invoice.txt"));
                assert!(fs::read_to_string(document).unwrap().contains("Invoice #00001"));
                assert_eq!(*delivery, Delivery::NotRequested);
            }
            other => panic!("unexpected status {:?}", other),
        }

        let log = storage.issued.read_all().unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].production, "Pilot");
        assert_eq!(log[1].production, "Finale");
        assert_eq!(storage.invoice_numbers.last_issued().unwrap(), 2);
    }

    #[test]
    fn test_send_dispatches_each_issued_invoice() {
        let (temp_dir, storage, mut settings) = setup();
        let mut outbox = OutboxDispatcher::new(storage.paths().outbox_dir());
        let options = BatchOptions {
            send: true,
            client: Some("Northwind".into()),
            ..BatchOptions::new(date())
        };

        let report = InvoiceService::new(&storage, &mut settings)
            .run_batch(&options, &mut outbox)
            .unwrap();

        assert_eq!(report.issued_count(), 2);
        let queued = fs::read_dir(temp_dir.path().join("outbox")).unwrap().count();
        assert_eq!(queued, 2);
        assert!(storage.issued.read_all().unwrap().iter().all(|e| e.dispatched));
    }

    #[test]
    fn test_clear_productions_keeps_failed_ones() {
        let (_temp_dir, storage, mut settings) = setup();
        let options = BatchOptions {
            clear_productions: true,
            ..BatchOptions::new(date())
        };

        InvoiceService::new(&storage, &mut settings)
            .run_batch(&options, &mut Capture::default())
            .unwrap();

        assert_eq!(settings.clients["northwind"].productions, vec!["Missing"]);
        let reloaded = Settings::load_or_create(storage.paths()).unwrap();
        assert_eq!(reloaded.clients["northwind"].productions, vec!["Missing"]);
    }

    #[test]
    fn test_unknown_client_filter() {
        let (_temp_dir, storage, mut settings) = setup();
        let options = BatchOptions {
            client: Some("nobody".into()),
            ..BatchOptions::new(date())
        };

        let err = InvoiceService::new(&storage, &mut settings)
            .run_batch(&options, &mut Capture::default())
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_preview_does_not_issue() {
        let (_temp_dir, storage, settings) = setup();

        let preview = preview_production(&storage, &settings, "northwind", "Pilot").unwrap();

        assert_eq!(preview.billing.subtotal, dec!(12080.00));
        assert_eq!(preview.aggregation.tree.section_names(), vec!["Camera", "Custom"]);
        assert_eq!(storage.invoice_numbers.last_issued().unwrap(), 0);
    }

    #[test]
    fn test_json_format() {
        let (_temp_dir, storage, mut settings) = setup();
        let options = BatchOptions {
            format: OutputFormat::Json,
            ..BatchOptions::new(date())
        };

        let report = InvoiceService::new(&storage, &mut settings)
            .run_batch(&options, &mut Capture::default())
            .unwrap();

        match &report.outcomes[2].status {
            OutcomeStatus::Issued { document, .. } => {
                assert!(document.ends_with("invoices/Finale Invoice.json"));
                let value: serde_json::Value =
                    serde_json::from_slice(&fs::read(document).unwrap()).unwrap();
                assert_eq!(value["schema_version"], 1);
            }
            other => panic!("unexpected status {:?}", other),
        }
    }

    #[test]
    fn test_counter_survives_between_runs() {
        let (_temp_dir, storage, mut settings) = setup();
        let mut numbers = storage.invoice_numbers.clone();
        assert_eq!(numbers.next().unwrap(), 1);

        let report = InvoiceService::new(&storage, &mut settings)
            .run_batch(&BatchOptions::new(date()), &mut Capture::default())
            .unwrap();
        match &report.outcomes[0].status {
            OutcomeStatus::Issued { invoice_number, .. } => assert_eq!(*invoice_number, 2),
            other => panic!("unexpected status {:?}", other),
        }
    }

    #[test]
    fn test_failed_send_still_records_the_invoice() {
        let (temp_dir, storage, mut settings) = setup();
        let options = BatchOptions {
            send: true,
            clear_productions: true,
            ..BatchOptions::new(date())
        };

        let report = InvoiceService::new(&storage, &mut settings)
            .run_batch(&options, &mut Unreachable)
            .unwrap();

        assert_eq!(report.issued_count(), 2);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.undelivered_count(), 2);
        assert!(!report.is_success());
        match &report.outcomes[0].status {
            OutcomeStatus::Issued {
                invoice_number,
                delivery,
                ..
            } => {
                assert_eq!(*invoice_number, 1);
                assert!(matches!(delivery, Delivery::Failed { error } if error.contains("unreachable")));
            }
            other => panic!("unexpected status {:?}", other),
        }

        assert!(temp_dir
            .path()
            .join("invoices")
            .join("Pilot Invoice.txt")
            .exists());
        let log = storage.issued.read_all().unwrap();
        assert_eq!(
            log.iter().map(|e| e.invoice_number).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert!(log.iter().all(|e| !e.dispatched));

        // issued invoices are not issued again on the next run
        assert_eq!(settings.clients["northwind"].productions, vec!["Missing"]);
    }

    #[test]
    fn test_clients_run_in_configured_order() {
        let (_temp_dir, storage, mut settings) = setup();
        settings.clients.clear();
        for key in ["zeta", "alpha"] {
            settings
                .clients
                .insert(key.into(), client("Northwind", BillingMode::Flat, &["Finale"]));
        }

        let report = InvoiceService::new(&storage, &mut settings)
            .run_batch(&BatchOptions::new(date()), &mut Capture::default())
            .unwrap();

        let order: Vec<&str> = report.outcomes.iter().map(|o| o.client.as_str()).collect();
        assert_eq!(order, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_production_name_cannot_escape_invoice_dir() {
        let (temp_dir, storage, mut settings) = setup();
        settings.clients["northwind"].productions = vec!["../Finale".into()];

        let report = InvoiceService::new(&storage, &mut settings)
            .run_batch(&BatchOptions::new(date()), &mut Capture::default())
            .unwrap();

        assert_eq!(report.failed_count(), 1);
        assert!(!temp_dir.path().join("Finale Invoice.txt").exists());
        assert_eq!(storage.invoice_numbers.last_issued().unwrap(), 0);
    }
}
