//! Invoicing settings
//!
//! Holds the client list, exclusion vendors, fee schedule and the issuer
//! details printed on every invoice. All fields are defaulted so a partial
//! config.json still loads.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::paths::InvoicePaths;
use crate::error::InvoiceError;
use crate::models::{BillingAddress, BillingMode, BillingProfile, FlatTierTable};
use crate::services::aggregation::ExclusionSet;
use crate::storage::file_io::write_json_atomic;

/// A billed client and the productions awaiting an invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Recipient address for dispatch
    pub email: String,

    /// Producer firm name as known to the record store
    pub company: String,

    /// `"type": "flat"` or `"type": "percent", "value": 0.1`
    #[serde(flatten)]
    pub billing: BillingMode,

    #[serde(default)]
    pub productions: Vec<String>,
}

/// Settings for the invoicing tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Name printed in the invoice header
    #[serde(default = "default_issuer_name")]
    pub issuer_name: String,

    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// strftime format for issue and due dates
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Days between issue date and payment due date
    #[serde(default = "default_payment_terms_days")]
    pub payment_terms_days: i64,

    /// Applied to the subtotal; zero until a rate is agreed
    #[serde(default)]
    pub tax_rate: Decimal,

    /// Vendors reported as excluded in addition to any "payroll" vendor
    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default)]
    pub flat_tiers: FlatTierTable,

    /// Used when no tax info or override exists for a company
    #[serde(default)]
    pub default_address: BillingAddress,

    /// Per-company addresses used when the tax info source has none
    #[serde(default)]
    pub address_overrides: BTreeMap<String, BillingAddress>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_image: Option<String>,

    /// Image for the rate card page of flat-fee invoices
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_card_image: Option<String>,

    /// Clients keyed by a short handle, processed in the order written
    #[serde(default)]
    pub clients: IndexMap<String, ClientConfig>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_issuer_name() -> String {
    "RollCredits".to_string()
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%m/%d/%Y".to_string()
}

fn default_payment_terms_days() -> i64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            issuer_name: default_issuer_name(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            payment_terms_days: default_payment_terms_days(),
            tax_rate: Decimal::ZERO,
            exclude: Vec::new(),
            flat_tiers: FlatTierTable::default(),
            default_address: BillingAddress::default(),
            address_overrides: BTreeMap::new(),
            logo_image: None,
            rate_card_image: None,
            clients: IndexMap::new(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist
    pub fn load_or_create(paths: &InvoicePaths) -> Result<Self, InvoiceError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| InvoiceError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| InvoiceError::Config(format!("Failed to parse settings file: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &InvoicePaths) -> Result<(), InvoiceError> {
        write_json_atomic(paths.settings_file(), self)
    }

    /// Reject rates outside [0, 1] and malformed tier tables
    pub fn validate(&self) -> Result<(), InvoiceError> {
        if self.tax_rate < Decimal::ZERO || self.tax_rate > Decimal::ONE {
            return Err(InvoiceError::Config(format!(
                "Tax rate {} is outside the range 0 to 1",
                self.tax_rate
            )));
        }

        self.flat_tiers
            .validate()
            .map_err(|e| InvoiceError::Config(e.to_string()))?;

        for (key, client) in &self.clients {
            if let BillingMode::Percent { value } = client.billing {
                if value < Decimal::ZERO || value > Decimal::ONE {
                    return Err(InvoiceError::Config(format!(
                        "Client '{}' has a percent rate of {}; expected 0 to 1",
                        key, value
                    )));
                }
            }
        }

        Ok(())
    }

    /// Configured exclusion vendors
    pub fn exclusion_set(&self) -> ExclusionSet {
        ExclusionSet::new(self.exclude.iter().cloned())
    }

    /// Billing profile for a client: its mode plus the shared tax rate and tiers
    pub fn billing_profile(&self, client: &ClientConfig) -> BillingProfile {
        BillingProfile {
            mode: client.billing,
            tax_rate: self.tax_rate,
            tiers: self.flat_tiers.clone(),
        }
    }

    /// Address fallback chain: tax info, then override, then default
    pub fn resolve_address(
        &self,
        company: &str,
        from_tax_info: Option<BillingAddress>,
    ) -> BillingAddress {
        from_tax_info
            .or_else(|| self.address_overrides.get(company).cloned())
            .unwrap_or_else(|| self.default_address.clone())
    }

    /// Find a client by key or by company name
    pub fn find_client(&self, name: &str) -> Option<(&String, &ClientConfig)> {
        self.clients
            .get_key_value(name)
            .or_else(|| self.clients.iter().find(|(_, c)| c.company == name))
    }
}
