//! Core data models for production invoicing
//!
//! This module contains the data structures that the invoicing core works
//! on: transaction records, the ordered category tree, billing profiles and
//! results, and billing addresses.

pub mod address;
pub mod billing;
pub mod category_tree;
pub mod money;
pub mod record;

pub use address::BillingAddress;
pub use billing::{
    BillingBreakdown, BillingMode, BillingProfile, BillingResult, FlatTier, FlatTierTable,
};
pub use category_tree::{CategoryItem, CategorySection, CategoryTree, VendorEntry, CUSTOM_SECTION};
pub use money::Money;
pub use record::{RecordKind, TransactionRecord};
