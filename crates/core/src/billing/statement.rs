//! Student fee statements.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use scholaris_shared::types::money;
use serde::Serialize;
use uuid::Uuid;

use super::types::InvoiceStatus;

/// The student a statement is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementStudent {
    /// Student ID.
    pub id: Uuid,
    /// School-issued student code.
    pub student_code: String,
    /// Full name.
    pub name: String,
    /// Login email.
    pub email: String,
}

/// One invoice on a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementLine {
    /// Invoice number.
    pub invoice_number: String,
    /// Issue date.
    pub issue_date: NaiveDate,
    /// Due date.
    pub due_date: NaiveDate,
    /// Invoice total.
    #[serde(serialize_with = "money::serialize")]
    pub total_amount: Decimal,
    /// Paid so far.
    #[serde(serialize_with = "money::serialize")]
    pub paid_amount: Decimal,
    /// Outstanding balance.
    #[serde(serialize_with = "money::serialize")]
    pub balance: Decimal,
    /// Current status.
    pub status: InvoiceStatus,
}

/// Statement totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementSummary {
    /// Sum of invoice totals.
    #[serde(serialize_with = "money::serialize")]
    pub total_due: Decimal,
    /// Sum of paid amounts.
    #[serde(serialize_with = "money::serialize")]
    pub total_paid: Decimal,
    /// `total_due - total_paid`.
    #[serde(serialize_with = "money::serialize")]
    pub current_balance: Decimal,
}

/// A student's fee statement: every live invoice plus totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeStatement {
    /// Student.
    pub student: StatementStudent,
    /// Invoices, newest first.
    pub invoices: Vec<StatementLine>,
    /// Totals.
    pub summary: StatementSummary,
}

impl FeeStatement {
    /// Builds a statement from a student's live invoices.
    ///
    /// Lines are kept in the order given.
    #[must_use]
    pub fn from_invoices(student: StatementStudent, invoices: Vec<StatementLine>) -> Self {
        let summary = summarize(&invoices);
        Self {
            student,
            invoices,
            summary,
        }
    }
}

/// Totals a set of statement lines.
#[must_use]
pub fn summarize(lines: &[StatementLine]) -> StatementSummary {
    let total_due: Decimal = lines.iter().map(|line| line.total_amount).sum();
    let total_paid: Decimal = lines.iter().map(|line| line.paid_amount).sum();
    StatementSummary {
        total_due,
        total_paid,
        current_balance: total_due - total_paid,
    }
}
