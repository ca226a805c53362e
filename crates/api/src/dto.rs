//! Request and response bodies.
//!
//! JSON is camelCase throughout. Money is accepted as a string or number and
//! always emitted as a two-decimal string.

use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use scholaris_core::billing::{
    CreateInvoiceInput, FeeFrequency, FeeStructureInput, FeeStructurePatch, InvoiceItemInput,
    InvoiceStatus, PaymentMethod,
};
use scholaris_db::entities::{fee_structures, invoices, payments};
use scholaris_db::{FeeStructureRef, InvoiceDetails, InvoiceLine, PaymentDetails, StudentSummary};
use scholaris_shared::types::{StudentId, money};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// ============================================================================
// Requests
// ============================================================================

fn default_quantity() -> i32 {
    1
}

/// One invoice line in a create request.
///
/// `Serialize` is required by the `length` rule on `CreateInvoiceRequest::items`.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItemRequest {
    /// What is being charged.
    #[validate(length(min = 1, max = 500, message = "Description must be 1-500 characters"))]
    pub description: String,
    /// Number of units.
    #[serde(default = "default_quantity")]
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    /// Price per unit.
    pub unit_price: Decimal,
    /// Fee structure the line was taken from.
    pub fee_structure_id: Option<Uuid>,
}

/// Body of `POST /payments/invoices`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    /// Student being billed.
    pub student_id: Uuid,
    /// Issue date; defaults to today.
    pub issue_date: Option<NaiveDate>,
    /// Due date.
    pub due_date: NaiveDate,
    /// Lines.
    #[validate(length(min = 1, message = "Invoice must have at least one item"), nested)]
    pub items: Vec<InvoiceItemRequest>,
    /// Discount.
    #[serde(default)]
    pub discount: Decimal,
    /// Tax.
    #[serde(default)]
    pub tax: Decimal,
    /// Notes.
    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

impl From<CreateInvoiceRequest> for CreateInvoiceInput {
    fn from(req: CreateInvoiceRequest) -> Self {
        Self {
            student_id: StudentId::from_uuid(req.student_id),
            issue_date: req.issue_date,
            due_date: req.due_date,
            items: req
                .items
                .into_iter()
                .map(|item| InvoiceItemInput {
                    description: item.description,
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    fee_structure_id: item.fee_structure_id,
                })
                .collect(),
            discount: req.discount,
            tax: req.tax,
            notes: req.notes,
        }
    }
}

/// Body of `PATCH /payments/invoices/{id}/status`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    /// New status.
    pub status: InvoiceStatus,
}

/// Body of `POST /payments`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    /// Invoice being paid.
    pub invoice_id: Uuid,
    /// Amount paid.
    pub amount: Decimal,
    /// How it was paid.
    pub payment_method: PaymentMethod,
    /// External reference.
    #[validate(length(max = 100, message = "Reference number must be at most 100 characters"))]
    pub reference_number: Option<String>,
    /// Notes.
    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

/// Body of `POST /fees`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeeStructureRequest {
    /// Owning school. Required for super-admins, defaults to the caller's own.
    pub school_id: Option<Uuid>,
    /// Display name.
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
    /// Description.
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
    /// Standard charge.
    pub amount: Decimal,
    /// Billing cadence; defaults to `YEARLY`.
    #[serde(default)]
    pub frequency: FeeFrequency,
    /// Whether families may opt out.
    #[serde(default)]
    pub is_optional: bool,
}

impl From<CreateFeeStructureRequest> for FeeStructureInput {
    fn from(req: CreateFeeStructureRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            amount: req.amount,
            frequency: req.frequency,
            is_optional: req.is_optional,
        }
    }
}

/// Body of `PATCH /fees/{id}`. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFeeStructureRequest {
    /// New name.
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,
    /// New description.
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New cadence.
    pub frequency: Option<FeeFrequency>,
    /// New opt-out flag.
    pub is_optional: Option<bool>,
}

impl From<UpdateFeeStructureRequest> for FeeStructurePatch {
    fn from(req: UpdateFeeStructureRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            amount: req.amount,
            frequency: req.frequency,
            is_optional: req.is_optional,
        }
    }
}

/// Query of `GET /fees`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFeeStructuresQuery {
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size (default: 20, max: 100).
    pub limit: Option<u32>,
    /// Case-insensitive name filter.
    pub search: Option<String>,
}

/// Query of `GET /payments/invoices`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListInvoicesQuery {
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size (default: 20, max: 100).
    pub limit: Option<u32>,
    /// Filter by student.
    pub student_id: Option<Uuid>,
    /// Filter by status.
    pub status: Option<InvoiceStatus>,
}

/// Query of `GET /payments`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPaymentsQuery {
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size (default: 20, max: 100).
    pub limit: Option<u32>,
    /// Filter by invoice.
    pub invoice_id: Option<Uuid>,
    /// Payment date range start (YYYY-MM-DD).
    pub from: Option<NaiveDate>,
    /// Payment date range end, inclusive (YYYY-MM-DD).
    pub to: Option<NaiveDate>,
}

// ============================================================================
// Responses
// ============================================================================

/// A fee structure.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeStructureResponse {
    /// Fee structure ID.
    pub id: Uuid,
    /// Owning school.
    pub school_id: Uuid,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Standard charge.
    #[serde(serialize_with = "money::serialize")]
    pub amount: Decimal,
    /// Billing cadence.
    pub frequency: FeeFrequency,
    /// Whether families may opt out.
    pub is_optional: bool,
    /// Created at.
    pub created_at: DateTime<FixedOffset>,
    /// Updated at.
    pub updated_at: DateTime<FixedOffset>,
}

impl From<fee_structures::Model> for FeeStructureResponse {
    fn from(fee: fee_structures::Model) -> Self {
        Self {
            id: fee.id,
            school_id: fee.school_id,
            name: fee.name,
            description: fee.description,
            amount: fee.amount,
            frequency: fee.frequency.into(),
            is_optional: fee.is_optional,
            created_at: fee.created_at,
            updated_at: fee.updated_at,
        }
    }
}

/// The fee structure an invoice line was drawn from.
#[derive(Debug, Serialize)]
pub struct FeeStructureSummary {
    /// Fee structure ID.
    pub id: Uuid,
    /// Name.
    pub name: String,
}

impl From<FeeStructureRef> for FeeStructureSummary {
    fn from(fee: FeeStructureRef) -> Self {
        Self {
            id: fee.id,
            name: fee.name,
        }
    }
}

/// An invoice line.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItemResponse {
    /// Line ID.
    pub id: Uuid,
    /// What is being charged.
    pub description: String,
    /// Number of units.
    pub quantity: i32,
    /// Price per unit.
    #[serde(serialize_with = "money::serialize")]
    pub unit_price: Decimal,
    /// `quantity * unitPrice`.
    #[serde(serialize_with = "money::serialize")]
    pub amount: Decimal,
    /// Fee structure the line was taken from.
    pub fee_structure_id: Option<Uuid>,
    /// Its ID and name.
    pub fee_structure: Option<FeeStructureSummary>,
}

impl From<InvoiceLine> for InvoiceItemResponse {
    fn from(line: InvoiceLine) -> Self {
        let item = line.item;
        Self {
            id: item.id,
            description: item.description,
            quantity: item.quantity,
            unit_price: item.unit_price,
            amount: item.amount,
            fee_structure_id: item.fee_structure_id,
            fee_structure: line.fee_structure.map(Into::into),
        }
    }
}

/// An invoice, optionally hydrated.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceResponse {
    /// Invoice ID.
    pub id: Uuid,
    /// Invoice number.
    pub invoice_number: String,
    /// Billed student.
    pub student_id: Uuid,
    /// Issue date.
    pub issue_date: NaiveDate,
    /// Due date.
    pub due_date: NaiveDate,
    /// Sum of line amounts.
    #[serde(serialize_with = "money::serialize")]
    pub subtotal: Decimal,
    /// Discount.
    #[serde(serialize_with = "money::serialize")]
    pub discount: Decimal,
    /// Tax.
    #[serde(serialize_with = "money::serialize")]
    pub tax: Decimal,
    /// Total.
    #[serde(serialize_with = "money::serialize")]
    pub total_amount: Decimal,
    /// Paid so far.
    #[serde(serialize_with = "money::serialize")]
    pub paid_amount: Decimal,
    /// Outstanding.
    #[serde(serialize_with = "money::serialize")]
    pub balance_amount: Decimal,
    /// Status.
    pub status: InvoiceStatus,
    /// Notes.
    pub notes: Option<String>,
    /// Created at.
    pub created_at: DateTime<FixedOffset>,
    /// Updated at.
    pub updated_at: DateTime<FixedOffset>,
    /// Lines, when hydrated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<InvoiceItemResponse>>,
    /// Payments newest first, when hydrated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payments: Option<Vec<PaymentResponse>>,
    /// Student, when hydrated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<StudentSummary>,
}

impl From<invoices::Model> for InvoiceResponse {
    fn from(invoice: invoices::Model) -> Self {
        Self {
            id: invoice.id,
            invoice_number: invoice.invoice_number,
            student_id: invoice.student_id,
            issue_date: invoice.issue_date,
            due_date: invoice.due_date,
            subtotal: invoice.subtotal,
            discount: invoice.discount,
            tax: invoice.tax,
            total_amount: invoice.total_amount,
            paid_amount: invoice.paid_amount,
            balance_amount: invoice.balance_amount,
            status: invoice.status.into(),
            notes: invoice.notes,
            created_at: invoice.created_at,
            updated_at: invoice.updated_at,
            items: None,
            payments: None,
            student: None,
        }
    }
}

impl From<InvoiceDetails> for InvoiceResponse {
    fn from(details: InvoiceDetails) -> Self {
        Self {
            items: Some(details.items.into_iter().map(Into::into).collect()),
            payments: Some(details.payments.into_iter().map(Into::into).collect()),
            student: Some(details.student),
            ..details.invoice.into()
        }
    }
}

/// A payment, optionally with the invoice it was applied to.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    /// Payment ID.
    pub id: Uuid,
    /// Payment number.
    pub payment_number: String,
    /// Invoice paid.
    pub invoice_id: Uuid,
    /// Amount.
    #[serde(serialize_with = "money::serialize")]
    pub amount: Decimal,
    /// Method.
    pub payment_method: PaymentMethod,
    /// External reference.
    pub reference_number: Option<String>,
    /// Notes.
    pub notes: Option<String>,
    /// When the payment was taken.
    pub payment_date: DateTime<FixedOffset>,
    /// Staff member who recorded it.
    pub received_by: Uuid,
    /// Created at.
    pub created_at: DateTime<FixedOffset>,
    /// Invoice after the payment, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice: Option<Box<InvoiceResponse>>,
}

impl From<payments::Model> for PaymentResponse {
    fn from(payment: payments::Model) -> Self {
        Self {
            id: payment.id,
            payment_number: payment.payment_number,
            invoice_id: payment.invoice_id,
            amount: payment.amount,
            payment_method: payment.payment_method.into(),
            reference_number: payment.reference_number,
            notes: payment.notes,
            payment_date: payment.payment_date,
            received_by: payment.received_by,
            created_at: payment.created_at,
            invoice: None,
        }
    }
}

impl From<PaymentDetails> for PaymentResponse {
    fn from(details: PaymentDetails) -> Self {
        Self {
            invoice: Some(Box::new(details.invoice.into())),
            ..details.payment.into()
        }
    }
}

/// Body of a plain acknowledgement.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable outcome.
    pub message: &'static str,
}
