//! Reports module
//!
//! Builds the invoice document for a production: billing pages and the
//! paginated transaction appendix.

pub mod invoice;

pub use invoice::{
    DispatchPayload, DocumentStyle, InvoiceDocument, InvoiceInput, ReportDocument,
    PAYROLL_LINE_LABEL,
};
