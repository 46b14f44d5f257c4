//! Service layer for production invoicing
//!
//! Aggregation and billing are pure computations over in-memory records;
//! the invoicing service wires them to storage, rendering and dispatch.

pub mod aggregation;
pub mod billing;
pub mod invoicing;

pub use aggregation::{Aggregation, Aggregator, ExclusionSet, LineAmount};
pub use billing::BillingCalculator;
pub use invoicing::{
    preview_production, BatchOptions, BatchReport, Delivery, InvoicePreview, InvoiceService,
    OutcomeStatus, ProductionOutcome,
};
