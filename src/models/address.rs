//! Billing address model

use serde::{Deserialize, Serialize};

const NOT_PROVIDED: &str = "None Provided";

/// Postal address printed in the BILL TO block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl BillingAddress {
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        zip: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            city: city.into(),
            state: state.into(),
            zip: zip.into(),
        }
    }

    /// "zip, city, state" line as printed under the street
    pub fn locality_line(&self) -> String {
        format!("{}, {}, {}", self.zip, self.city, self.state)
    }
}

impl Default for BillingAddress {
    fn default() -> Self {
        Self::new(NOT_PROVIDED, NOT_PROVIDED, NOT_PROVIDED, NOT_PROVIDED)
    }
}
