//! Payment repository: atomic payment application and scoped reads.
//!
//! Applying a payment is a read-modify-write on the invoice. It runs in one
//! transaction that locks the invoice row (`SELECT ... FOR UPDATE`), plans
//! the payment against the locked snapshot, then updates the invoice only if
//! `paid_amount` still holds the locked value. A competing payment on the
//! same invoice waits on the lock and re-validates against the new balance.

use chrono::{Days, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use scholaris_core::billing::{
    BillingError, BillingService, DocumentNumbering, InvoiceStatus, PaymentMethod,
};
use scholaris_core::tenancy::TenantScope;
use scholaris_shared::types::{InvoiceId, PageRequest, PageResponse, PaymentId, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::error::RepositoryError;
use super::invoice::snapshot_of;
use crate::entities::{invoices, payments, users};
use crate::scope::{SoftDelete, invoice_scope, payment_scope};

/// Input for recording a payment.
#[derive(Debug, Clone)]
pub struct RecordPaymentInput {
    /// Invoice being paid.
    pub invoice_id: InvoiceId,
    /// Amount paid.
    pub amount: Decimal,
    /// How it was paid.
    pub method: PaymentMethod,
    /// External reference (bank reference, cheque number, ...).
    pub reference_number: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Staff member recording the payment.
    pub received_by: UserId,
}

/// A payment together with the invoice it was applied to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentDetails {
    /// Payment row.
    pub payment: payments::Model,
    /// Invoice row as of the read.
    pub invoice: invoices::Model,
}

/// Filter options for listing payments.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentFilter {
    /// Only payments against this invoice.
    pub invoice_id: Option<InvoiceId>,
    /// Payment date on or after this day (UTC).
    pub from: Option<NaiveDate>,
    /// Payment date on or before this day (UTC).
    pub to: Option<NaiveDate>,
}

/// Payment repository.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DatabaseConnection,
    numbering: DocumentNumbering,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, numbering: DocumentNumbering) -> Self {
        Self { db, numbering }
    }

    /// Applies a payment to an invoice visible within `scope`.
    ///
    /// # Errors
    ///
    /// - `UnknownRecorder` if `received_by` has no live user account
    /// - `InvoiceNotFound` if the invoice is absent, deleted or out of scope
    /// - `NonPositiveAmount`, `TooPrecise`, `InvoiceCancelled` or
    ///   `ExceedsBalance` from payment planning
    /// - `ConcurrentModification` if the invoice moved under the lock
    /// - `DuplicateNumber` if the generated number collides
    pub async fn record(
        &self,
        input: RecordPaymentInput,
        scope: &TenantScope,
    ) -> Result<PaymentDetails, RepositoryError> {
        users::Entity::find_live()
            .filter(users::Column::Id.eq(input.received_by.into_inner()))
            .one(&self.db)
            .await?
            .ok_or(BillingError::UnknownRecorder)?;

        let txn = self.db.begin().await?;

        let locked = invoices::Entity::find_live()
            .filter(invoices::Column::Id.eq(input.invoice_id.into_inner()))
            .filter(invoice_scope(scope))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(BillingError::InvoiceNotFound)?;

        let plan = BillingService::plan_payment(&snapshot_of(&locked), input.amount)?;
        let now = Utc::now().into();

        let invoice = invoices::Entity::update(invoices::ActiveModel {
            id: Set(locked.id),
            paid_amount: Set(plan.new_paid_amount),
            balance_amount: Set(plan.new_balance_amount),
            status: Set(plan.new_status.into()),
            updated_at: Set(now),
            ..Default::default()
        })
        .filter(invoices::Column::PaidAmount.eq(plan.expected_paid_amount))
        .filter(invoices::Column::DeletedAt.is_null())
        .exec(&txn)
        .await
        .map_err(|e| match e {
            DbErr::RecordNotUpdated => {
                RepositoryError::Billing(BillingError::ConcurrentModification)
            }
            other => RepositoryError::Database(other),
        })?;

        let payment_number = self.numbering.next_payment_number();
        let payment = payments::ActiveModel {
            id: Set(PaymentId::new().into_inner()),
            payment_number: Set(payment_number.clone()),
            invoice_id: Set(invoice.id),
            amount: Set(plan.amount),
            payment_method: Set(input.method.into()),
            reference_number: Set(input.reference_number),
            notes: Set(input.notes),
            payment_date: Set(now),
            received_by: Set(input.received_by.into_inner()),
            created_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| RepositoryError::on_insert(e, &payment_number))?;

        txn.commit().await?;

        tracing::info!(
            payment_id = %payment.id,
            payment_number = %payment.payment_number,
            invoice_id = %invoice.id,
            amount = %payment.amount,
            balance = %invoice.balance_amount,
            status = %InvoiceStatus::from(invoice.status),
            "Payment recorded"
        );

        Ok(PaymentDetails { payment, invoice })
    }

    /// Gets a payment visible within `scope`.
    ///
    /// # Errors
    ///
    /// Returns `PaymentNotFound` if the payment is absent or out of scope.
    pub async fn find(
        &self,
        id: PaymentId,
        scope: &TenantScope,
    ) -> Result<PaymentDetails, RepositoryError> {
        let (payment, invoice) = payments::Entity::find()
            .filter(payments::Column::Id.eq(id.into_inner()))
            .filter(payment_scope(scope))
            .find_also_related(invoices::Entity)
            .one(&self.db)
            .await?
            .ok_or(BillingError::PaymentNotFound)?;

        let invoice = invoice.ok_or(BillingError::InvoiceNotFound)?;
        Ok(PaymentDetails { payment, invoice })
    }

    /// Lists payments visible within `scope`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        scope: &TenantScope,
        filter: PaymentFilter,
        page: PageRequest,
    ) -> Result<PageResponse<payments::Model>, RepositoryError> {
        let mut query = payments::Entity::find().filter(payment_scope(scope));

        if let Some(invoice_id) = filter.invoice_id {
            query = query.filter(payments::Column::InvoiceId.eq(invoice_id.into_inner()));
        }
        if let Some(from) = filter.from {
            query = query.filter(payments::Column::PaymentDate.gte(start_of_day(from)));
        }
        if let Some(end) = filter.to.and_then(|to| to.checked_add_days(Days::new(1))) {
            query = query.filter(payments::Column::PaymentDate.lt(start_of_day(end)));
        }

        let total = query.clone().count(&self.db).await?;

        let data = query
            .order_by_desc(payments::Column::PaymentDate)
            .order_by_desc(payments::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(data, page, total))
    }
}

fn start_of_day(date: NaiveDate) -> chrono::DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_of_day_is_utc_midnight() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        assert_eq!(start_of_day(date).to_rfc3339(), "2026-03-14T00:00:00+00:00");
    }

    #[test]
    fn test_default_filter_is_empty() {
        let filter = PaymentFilter::default();
        assert!(filter.invoice_id.is_none());
        assert!(filter.from.is_none());
        assert!(filter.to.is_none());
    }
}
