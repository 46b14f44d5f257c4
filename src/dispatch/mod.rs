//! Invoice dispatch
//!
//! Sending a finished invoice is always the caller's decision. The batch
//! runner only hands documents to a [`DispatchSink`] when explicitly asked to.

pub mod outbox;

pub use outbox::{OutboxDispatcher, OutboxMessage};

use std::path::PathBuf;

use crate::error::InvoiceResult;
use crate::reports::DispatchPayload;

/// Where a dispatched invoice ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReceipt {
    pub location: PathBuf,
}

/// Destination for rendered invoices
pub trait DispatchSink {
    /// Deliver `document` with its summary; `file_name` names the attachment
    fn send(
        &mut self,
        document: &[u8],
        file_name: &str,
        payload: &DispatchPayload,
    ) -> InvoiceResult<DispatchReceipt>;
}
