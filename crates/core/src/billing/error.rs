//! Billing error types.

use rust_decimal::Decimal;
use scholaris_shared::AppError;
use thiserror::Error;

use super::types::InvoiceStatus;

/// Errors that can occur during billing operations.
#[derive(Debug, Error)]
pub enum BillingError {
    // ========== Invoice Validation Errors ==========
    /// Invoice has no lines.
    #[error("Invoice must have at least one item")]
    EmptyItems,

    /// Line quantity below one.
    #[error("Item {position}: quantity must be at least 1")]
    InvalidQuantity {
        /// One-based line number.
        position: usize,
    },

    /// Line unit price below zero.
    #[error("Item {position}: unit price cannot be negative")]
    NegativeUnitPrice {
        /// One-based line number.
        position: usize,
    },

    /// Line description blank.
    #[error("Item {position}: description is required")]
    BlankDescription {
        /// One-based line number.
        position: usize,
    },

    /// Discount below zero.
    #[error("Discount cannot be negative")]
    NegativeDiscount,

    /// Tax below zero.
    #[error("Tax cannot be negative")]
    NegativeTax,

    /// Discount larger than subtotal plus tax.
    #[error("Invoice total cannot be negative: {0:.2}")]
    NegativeTotal(Decimal),

    /// More than two decimal places.
    #[error("{0} must have at most 2 decimal places")]
    TooPrecise(&'static str),

    /// Does not fit `NUMERIC(12,2)`.
    #[error("{0} is too large")]
    AmountTooLarge(&'static str),

    // ========== Payment Errors ==========
    /// Payment amount zero or negative.
    #[error("Payment amount must be greater than zero")]
    NonPositiveAmount,

    /// Payment larger than the outstanding balance.
    #[error("Payment amount exceeds balance. Maximum: {balance:.2}")]
    ExceedsBalance {
        /// Outstanding balance at the time of the check.
        balance: Decimal,
    },

    /// Payments are not accepted on cancelled invoices.
    #[error("Cannot record a payment against a cancelled invoice")]
    InvoiceCancelled,

    /// The authenticated caller has no live user account to record under.
    #[error("Caller has no active user account")]
    UnknownRecorder,

    // ========== Fee Structure Errors ==========
    /// Fee structure name blank.
    #[error("Fee structure name is required")]
    BlankFeeName,

    /// Fee structure amount below zero.
    #[error("Fee amount cannot be negative")]
    NegativeFeeAmount,

    /// Fee structure absent, deleted or outside the caller's scope.
    #[error("Fee structure not found")]
    FeeStructureNotFound,

    /// Invoice line references a fee structure the student's school does not offer.
    #[error("Item {position}: fee structure not found")]
    UnknownFeeStructure {
        /// One-based line number.
        position: usize,
    },

    /// Unscoped caller did not say which school owns a new record.
    #[error("schoolId is required")]
    SchoolRequired,

    /// School absent, deleted or outside the caller's scope.
    #[error("School not found")]
    SchoolNotFound,

    // ========== Status Errors ==========
    /// Status override contradicts the invoice's amounts.
    #[error("Cannot set status {status}: {reason}")]
    StatusContradictsAmounts {
        /// Requested status.
        status: InvoiceStatus,
        /// Which amount rule is violated.
        reason: &'static str,
    },

    // ========== Lifecycle Errors ==========
    /// Invoice has payments and cannot be deleted.
    #[error("Cannot delete invoice with existing payments")]
    HasPayments,

    /// Invoice absent, deleted or outside the caller's scope.
    #[error("Invoice not found")]
    InvoiceNotFound,

    /// Student absent, deleted or outside the caller's scope.
    #[error("Student not found")]
    StudentNotFound,

    /// Payment absent or outside the caller's scope.
    #[error("Payment not found")]
    PaymentNotFound,

    // ========== Concurrency Errors ==========
    /// Invoice changed between read and write.
    #[error("Invoice was modified concurrently, please retry")]
    ConcurrentModification,

    /// Generated document number already exists.
    #[error("Document number already exists: {0}")]
    DuplicateNumber(String),

    // ========== Database Errors ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BillingError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyItems => "EMPTY_ITEMS",
            Self::InvalidQuantity { .. } => "INVALID_QUANTITY",
            Self::NegativeUnitPrice { .. } => "NEGATIVE_UNIT_PRICE",
            Self::BlankDescription { .. } => "BLANK_DESCRIPTION",
            Self::NegativeDiscount => "NEGATIVE_DISCOUNT",
            Self::NegativeTax => "NEGATIVE_TAX",
            Self::NegativeTotal(_) => "NEGATIVE_TOTAL",
            Self::TooPrecise(_) => "TOO_PRECISE",
            Self::AmountTooLarge(_) => "AMOUNT_TOO_LARGE",
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::ExceedsBalance { .. } => "EXCEEDS_BALANCE",
            Self::InvoiceCancelled => "INVOICE_CANCELLED",
            Self::UnknownRecorder => "UNKNOWN_RECORDER",
            Self::BlankFeeName => "BLANK_FEE_NAME",
            Self::NegativeFeeAmount => "NEGATIVE_FEE_AMOUNT",
            Self::FeeStructureNotFound => "FEE_STRUCTURE_NOT_FOUND",
            Self::UnknownFeeStructure { .. } => "UNKNOWN_FEE_STRUCTURE",
            Self::SchoolRequired => "SCHOOL_REQUIRED",
            Self::SchoolNotFound => "SCHOOL_NOT_FOUND",
            Self::StatusContradictsAmounts { .. } => "STATUS_CONTRADICTS_AMOUNTS",
            Self::HasPayments => "INVOICE_HAS_PAYMENTS",
            Self::InvoiceNotFound => "INVOICE_NOT_FOUND",
            Self::StudentNotFound => "STUDENT_NOT_FOUND",
            Self::PaymentNotFound => "PAYMENT_NOT_FOUND",
            Self::ConcurrentModification => "CONCURRENT_MODIFICATION",
            Self::DuplicateNumber(_) => "DUPLICATE_NUMBER",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::EmptyItems
            | Self::InvalidQuantity { .. }
            | Self::NegativeUnitPrice { .. }
            | Self::BlankDescription { .. }
            | Self::NegativeDiscount
            | Self::NegativeTax
            | Self::NegativeTotal(_)
            | Self::TooPrecise(_)
            | Self::AmountTooLarge(_)
            | Self::NonPositiveAmount
            | Self::ExceedsBalance { .. }
            | Self::InvoiceCancelled
            | Self::StatusContradictsAmounts { .. }
            | Self::BlankFeeName
            | Self::NegativeFeeAmount
            | Self::SchoolRequired => 400,

            // 403 Forbidden
            Self::UnknownRecorder => 403,

            // 404 Not Found
            Self::InvoiceNotFound
            | Self::StudentNotFound
            | Self::PaymentNotFound
            | Self::FeeStructureNotFound
            | Self::UnknownFeeStructure { .. }
            | Self::SchoolNotFound => 404,

            // 409 Conflict
            Self::HasPayments | Self::ConcurrentModification | Self::DuplicateNumber(_) => 409,

            // 500 Internal Server Error
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConcurrentModification | Self::DuplicateNumber(_)
        )
    }
}

impl From<BillingError> for AppError {
    fn from(err: BillingError) -> Self {
        let message = err.to_string();
        match err.http_status_code() {
            400 => Self::Validation(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            _ => match err {
                BillingError::Database(detail) => Self::Database(detail),
                _ => Self::Internal(message),
            },
        }
    }
}
