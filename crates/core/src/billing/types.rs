//! Billing domain types.
//!
//! Inputs arrive already shaped by the API layer; everything here is plain
//! data that the service validates and prices.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use scholaris_shared::types::StudentId;

/// Invoice status.
///
/// `Pending`, `Partial` and `Paid` follow from the paid amount. `Overdue`
/// and `Cancelled` are only ever set by an administrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    /// Nothing paid yet.
    Pending,
    /// Partly paid.
    Partial,
    /// Fully paid.
    Paid,
    /// Past its due date.
    Overdue,
    /// Withdrawn by an administrator.
    Cancelled,
}

impl InvoiceStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Partial => "PARTIAL",
            Self::Paid => "PAID",
            Self::Overdue => "OVERDUE",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "PARTIAL" => Some(Self::Partial),
            "PAID" => Some(Self::Paid),
            "OVERDUE" => Some(Self::Overdue),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Cash at the office.
    Cash,
    /// Bank transfer.
    BankTransfer,
    /// Debit or credit card.
    Card,
    /// Cheque.
    Cheque,
    /// Online payment gateway.
    Online,
}

impl PaymentMethod {
    /// Returns the string representation of the method.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::BankTransfer => "BANK_TRANSFER",
            Self::Card => "CARD",
            Self::Cheque => "CHEQUE",
            Self::Online => "ONLINE",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One requested invoice line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceItemInput {
    /// What is being charged.
    pub description: String,
    /// Number of units, at least 1.
    pub quantity: i32,
    /// Price per unit.
    pub unit_price: Decimal,
    /// Fee structure the line was taken from.
    pub fee_structure_id: Option<Uuid>,
}

impl InvoiceItemInput {
    /// Creates a single-unit line.
    #[must_use]
    pub fn new(description: impl Into<String>, unit_price: Decimal) -> Self {
        Self {
            description: description.into(),
            quantity: 1,
            unit_price,
            fee_structure_id: None,
        }
    }

    /// Sets the quantity.
    #[must_use]
    pub const fn with_quantity(mut self, quantity: i32) -> Self {
        self.quantity = quantity;
        self
    }
}

/// Input for issuing an invoice.
#[derive(Debug, Clone)]
pub struct CreateInvoiceInput {
    /// Student being billed.
    pub student_id: StudentId,
    /// Issue date; the store defaults it to the current date.
    pub issue_date: Option<NaiveDate>,
    /// Due date.
    pub due_date: NaiveDate,
    /// Lines in presentation order.
    pub items: Vec<InvoiceItemInput>,
    /// Discount subtracted from the subtotal.
    pub discount: Decimal,
    /// Tax added to the subtotal.
    pub tax: Decimal,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// A validated invoice line with its amount fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedItem {
    /// Zero-based position within the invoice.
    pub position: i32,
    /// What is being charged.
    pub description: String,
    /// Number of units.
    pub quantity: i32,
    /// Price per unit.
    pub unit_price: Decimal,
    /// `quantity * unit_price`.
    pub amount: Decimal,
    /// Fee structure the line was taken from.
    pub fee_structure_id: Option<Uuid>,
}

/// The monetary fields of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceAmounts {
    /// Sum of line amounts.
    pub subtotal: Decimal,
    /// Discount.
    pub discount: Decimal,
    /// Tax.
    pub tax: Decimal,
    /// `subtotal - discount + tax`.
    pub total_amount: Decimal,
    /// Sum of recorded payments.
    pub paid_amount: Decimal,
    /// `total_amount - paid_amount`.
    pub balance_amount: Decimal,
}

impl InvoiceAmounts {
    /// Amounts of a freshly issued invoice.
    #[must_use]
    pub fn unpaid(subtotal: Decimal, discount: Decimal, tax: Decimal) -> Self {
        let total_amount = subtotal - discount + tax;
        Self {
            subtotal,
            discount,
            tax,
            total_amount,
            paid_amount: Decimal::ZERO,
            balance_amount: total_amount,
        }
    }

    /// Returns true when both arithmetic invariants hold.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.total_amount == self.subtotal - self.discount + self.tax
            && self.balance_amount == self.total_amount - self.paid_amount
    }
}

/// A validated, priced invoice ready to persist.
#[derive(Debug, Clone)]
pub struct PricedInvoice {
    /// Lines in input order.
    pub items: Vec<PricedItem>,
    /// Monetary fields.
    pub amounts: InvoiceAmounts,
    /// Initial status, always `Pending`.
    pub status: InvoiceStatus,
}

/// The invoice state a payment is applied against, read under lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceSnapshot {
    /// Current status.
    pub status: InvoiceStatus,
    /// Monetary fields.
    pub amounts: InvoiceAmounts,
}

/// The outcome of applying a payment, computed before any write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentPlan {
    /// Amount being paid.
    pub amount: Decimal,
    /// Paid amount the invoice must still hold when the update lands.
    pub expected_paid_amount: Decimal,
    /// New paid amount.
    pub new_paid_amount: Decimal,
    /// New balance.
    pub new_balance_amount: Decimal,
    /// New status.
    pub new_status: InvoiceStatus,
}
