//! Role gates for billing actions.

use scholaris_shared::{AppError, Role};
use thiserror::Error;

/// A billing action a caller may attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingAction {
    /// Issue a new invoice.
    CreateInvoice,
    /// List invoices.
    ListInvoices,
    /// Read one invoice.
    ViewInvoice,
    /// Override an invoice's status.
    UpdateInvoiceStatus,
    /// Soft-delete an invoice.
    DeleteInvoice,
    /// Record a payment.
    RecordPayment,
    /// List payments.
    ListPayments,
    /// Read one payment.
    ViewPayment,
    /// Read a student's fee statement.
    ViewStatement,
    /// Create, read, update or delete fee structures.
    ManageFeeStructures,
}

const STAFF: &[Role] = &[Role::SuperAdmin, Role::SchoolAdmin];
const STAFF_AND_FAMILY: &[Role] = &[
    Role::SuperAdmin,
    Role::SchoolAdmin,
    Role::Student,
    Role::Parent,
];

impl BillingAction {
    /// Roles that may attempt this action.
    #[must_use]
    pub const fn allowed_roles(self) -> &'static [Role] {
        match self {
            Self::ViewInvoice | Self::ViewPayment | Self::ViewStatement => STAFF_AND_FAMILY,
            Self::CreateInvoice
            | Self::ListInvoices
            | Self::UpdateInvoiceStatus
            | Self::DeleteInvoice
            | Self::RecordPayment
            | Self::ListPayments
            | Self::ManageFeeStructures => STAFF,
        }
    }

    /// Human-readable name used in error messages.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::CreateInvoice => "create invoices",
            Self::ListInvoices => "list invoices",
            Self::ViewInvoice => "view invoices",
            Self::UpdateInvoiceStatus => "update invoice status",
            Self::DeleteInvoice => "delete invoices",
            Self::RecordPayment => "record payments",
            Self::ListPayments => "list payments",
            Self::ViewPayment => "view payments",
            Self::ViewStatement => "view fee statements",
            Self::ManageFeeStructures => "manage fee structures",
        }
    }

    /// Checks the role gate.
    ///
    /// # Errors
    ///
    /// Returns `AccessDenied` when the role may never perform this action.
    pub fn ensure_allowed(self, role: Role) -> Result<(), AccessDenied> {
        if self.allowed_roles().contains(&role) {
            Ok(())
        } else {
            Err(AccessDenied { role, action: self })
        }
    }
}

/// The caller's role is categorically excluded from an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Role {role} may not {}", .action.describe())]
pub struct AccessDenied {
    /// Role of the caller.
    pub role: Role,
    /// Action that was attempted.
    pub action: BillingAction,
}

impl From<AccessDenied> for AppError {
    fn from(err: AccessDenied) -> Self {
        Self::Forbidden(err.to_string())
    }
}
