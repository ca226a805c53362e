//! Invoice and payment logic.
//!
//! This module implements the billing rules:
//! - Invoice pricing (line amounts, subtotal, discount, tax, total)
//! - Payment application planning against a locked invoice snapshot
//! - Status derivation and administrative override rules
//! - Invoice and payment number generation
//! - Fee statement aggregation
//! - Fee structure validation

pub mod error;
pub mod fee;
pub mod numbering;
pub mod service;
pub mod statement;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::BillingError;
pub use fee::{FeeFrequency, FeeStructureInput, FeeStructurePatch};
pub use numbering::DocumentNumbering;
pub use service::BillingService;
pub use statement::{FeeStatement, StatementLine, StatementStudent, StatementSummary};
pub use types::{
    CreateInvoiceInput, InvoiceAmounts, InvoiceItemInput, InvoiceSnapshot, InvoiceStatus,
    PaymentMethod, PaymentPlan, PricedInvoice, PricedItem,
};
