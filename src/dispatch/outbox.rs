//! Outbox dispatcher
//!
//! Writes each outgoing invoice as a JSON message (summary plus base64
//! attachment) into the outbox directory, where a separate delivery process
//! can pick it up.

use std::path::PathBuf;

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{DispatchReceipt, DispatchSink};
use crate::error::{InvoiceError, InvoiceResult};
use crate::reports::DispatchPayload;
use crate::storage::file_io::write_json_atomic;

/// Message written to the outbox
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboxMessage {
    pub created_at: DateTime<Utc>,
    pub recipient: String,
    pub name: String,
    pub amount: Decimal,
    pub description: String,
    pub number: String,
    pub attachment_name: String,
    /// Base64 of the rendered document
    pub attachment: String,
}

impl OutboxMessage {
    /// Decoded attachment bytes
    pub fn decode_attachment(&self) -> InvoiceResult<Vec<u8>> {
        STANDARD
            .decode(&self.attachment)
            .map_err(|e| InvoiceError::Dispatch(format!("Invalid attachment encoding: {}", e)))
    }
}

pub struct OutboxDispatcher {
    outbox_dir: PathBuf,
}

impl OutboxDispatcher {
    pub fn new(outbox_dir: PathBuf) -> Self {
        Self { outbox_dir }
    }

    fn message_path(&self, file_name: &str) -> PathBuf {
        let stem = file_name
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(file_name);
        let stamp = Utc::now().format("%Y%m%d%H%M%S%3f");
        self.outbox_dir.join(format!("{}-{}.json", stamp, stem))
    }
}

impl DispatchSink for OutboxDispatcher {
    fn send(
        &mut self,
        document: &[u8],
        file_name: &str,
        payload: &DispatchPayload,
    ) -> InvoiceResult<DispatchReceipt> {
        if payload.recipient.trim().is_empty() {
            return Err(InvoiceError::Dispatch(format!(
                "No recipient for '{}'",
                payload.description
            )));
        }

        let message = OutboxMessage {
            created_at: Utc::now(),
            recipient: payload.recipient.clone(),
            name: payload.name.clone(),
            amount: payload.amount,
            description: payload.description.clone(),
            number: payload.number.clone(),
            attachment_name: file_name.to_string(),
            attachment: STANDARD.encode(document),
        };

        let location = self.message_path(file_name);
        write_json_atomic(&location, &message)
            .map_err(|e| InvoiceError::Dispatch(e.to_string()))?;

        info!(
            recipient = %payload.recipient,
            path = %location.display(),
            "Queued invoice for dispatch"
        );
        Ok(DispatchReceipt { location })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::file_io::read_json_opt;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn payload(recipient: &str) -> DispatchPayload {
        DispatchPayload {
            recipient: recipient.into(),
            name: "Northwind Pictures".into(),
            amount: dec!(750.00),
            description: "Pilot".into(),
            number: "for project Pilot on RollCredits".into(),
        }
    }

    #[test]
    fn test_writes_message_with_attachment() {
        let temp_dir = TempDir::new().unwrap();
        let mut outbox = OutboxDispatcher::new(temp_dir.path().join("outbox"));

        let receipt = outbox
            .send(b"invoice body", "Pilot Invoice.txt", &payload("ap@northwind.test"))
            .unwrap();

        let message: OutboxMessage = read_json_opt(&receipt.location).unwrap().unwrap();
        assert_eq!(message.recipient, "ap@northwind.test");
        assert_eq!(message.amount, dec!(750.00));
        assert_eq!(message.attachment_name, "Pilot Invoice.txt");
        assert_eq!(message.decode_attachment().unwrap(), b"invoice body");
        assert!(receipt
            .location
            .file_name()
            .unwrap()
            .to_string_lossy()
            .ends_with("-Pilot Invoice.json"));
    }

    #[test]
    fn test_rejects_missing_recipient() {
        let temp_dir = TempDir::new().unwrap();
        let mut outbox = OutboxDispatcher::new(temp_dir.path().join("outbox"));

        let err = outbox.send(b"x", "Pilot Invoice.txt", &payload(" ")).unwrap_err();
        assert!(matches!(err, InvoiceError::Dispatch(_)));
    }
}
