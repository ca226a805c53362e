//! Invoice repository: issue, read, list, status override, soft delete and
//! fee statements.

use chrono::Utc;
use scholaris_core::billing::{
    BillingError, BillingService, CreateInvoiceInput, DocumentNumbering, FeeStatement,
    InvoiceAmounts, InvoiceSnapshot, InvoiceStatus, StatementLine,
};
use scholaris_core::tenancy::TenantScope;
use scholaris_shared::types::{InvoiceId, InvoiceItemId, PageRequest, PageResponse, StudentId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::error::RepositoryError;
use super::fee_structure;
use super::student::{self, StudentSummary};
use crate::entities::{
    fee_structures, invoice_items, invoices, payments,
    sea_orm_active_enums::InvoiceStatus as DbInvoiceStatus,
};
use crate::scope::{SoftDelete, invoice_scope};

/// The fee structure an invoice line was drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeStructureRef {
    /// Fee structure ID.
    pub id: Uuid,
    /// Name at read time.
    pub name: String,
}

/// An invoice line with its fee structure, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceLine {
    /// Line row.
    pub item: invoice_items::Model,
    /// Referenced fee structure.
    pub fee_structure: Option<FeeStructureRef>,
}

/// An invoice with its lines, payments and student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDetails {
    /// Invoice row.
    pub invoice: invoices::Model,
    /// Lines in input order.
    pub items: Vec<InvoiceLine>,
    /// Payments, newest first.
    pub payments: Vec<payments::Model>,
    /// Billed student.
    pub student: StudentSummary,
}

/// Filter options for listing invoices.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvoiceFilter {
    /// Only invoices for this student.
    pub student_id: Option<StudentId>,
    /// Only invoices in this status.
    pub status: Option<InvoiceStatus>,
}

/// Reads the monetary fields of an invoice row.
#[must_use]
pub fn amounts_of(invoice: &invoices::Model) -> InvoiceAmounts {
    InvoiceAmounts {
        subtotal: invoice.subtotal,
        discount: invoice.discount,
        tax: invoice.tax,
        total_amount: invoice.total_amount,
        paid_amount: invoice.paid_amount,
        balance_amount: invoice.balance_amount,
    }
}

/// Reads the state a payment is applied against.
#[must_use]
pub fn snapshot_of(invoice: &invoices::Model) -> InvoiceSnapshot {
    InvoiceSnapshot {
        status: invoice.status.into(),
        amounts: amounts_of(invoice),
    }
}

/// Invoice repository.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
    numbering: DocumentNumbering,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, numbering: DocumentNumbering) -> Self {
        Self { db, numbering }
    }

    /// Issues an invoice for a student visible within `scope`.
    ///
    /// The invoice and its lines are written in one transaction.
    ///
    /// # Errors
    ///
    /// - `Billing` validation errors from pricing
    /// - `StudentNotFound` if the student is absent, deleted or out of scope
    /// - `UnknownFeeStructure` if a line references a fee structure the
    ///   student's school does not offer
    /// - `DuplicateNumber` if the generated number collides
    pub async fn create(
        &self,
        input: CreateInvoiceInput,
        scope: &TenantScope,
    ) -> Result<InvoiceDetails, RepositoryError> {
        let priced = BillingService::price_invoice(&input)?;

        let student = student::find_scoped(&self.db, input.student_id, scope)
            .await?
            .ok_or(BillingError::StudentNotFound)?;

        let referenced = BillingService::referenced_fee_structures(&input.items);
        let offered = fee_structure::offered_by(&self.db, student.school_id, &referenced).await?;
        let offered_ids: Vec<Uuid> = offered.iter().map(|(id, _)| *id).collect();
        BillingService::ensure_fee_structures_offered(&input.items, &offered_ids)?;

        let invoice_id = InvoiceId::new().into_inner();
        let invoice_number = self.numbering.next_invoice_number();
        let now = Utc::now().into();
        let amounts = priced.amounts;

        let txn = self.db.begin().await?;

        let invoice = invoices::ActiveModel {
            id: Set(invoice_id),
            invoice_number: Set(invoice_number.clone()),
            student_id: Set(student.id),
            issue_date: Set(input.issue_date.unwrap_or_else(|| Utc::now().date_naive())),
            due_date: Set(input.due_date),
            subtotal: Set(amounts.subtotal),
            discount: Set(amounts.discount),
            tax: Set(amounts.tax),
            total_amount: Set(amounts.total_amount),
            paid_amount: Set(amounts.paid_amount),
            balance_amount: Set(amounts.balance_amount),
            status: Set(priced.status.into()),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(&txn)
        .await
        .map_err(|e| RepositoryError::on_insert(e, &invoice_number))?;

        let mut items = Vec::with_capacity(priced.items.len());
        for item in priced.items {
            let inserted = invoice_items::ActiveModel {
                id: Set(InvoiceItemId::new().into_inner()),
                invoice_id: Set(invoice_id),
                description: Set(item.description),
                quantity: Set(item.quantity),
                unit_price: Set(item.unit_price),
                amount: Set(item.amount),
                fee_structure_id: Set(item.fee_structure_id),
                position: Set(item.position),
                created_at: Set(now),
            }
            .insert(&txn)
            .await?;
            let fee_structure = inserted.fee_structure_id.and_then(|id| {
                offered
                    .iter()
                    .find(|(offered_id, _)| *offered_id == id)
                    .map(|(id, name)| FeeStructureRef {
                        id: *id,
                        name: name.clone(),
                    })
            });
            items.push(InvoiceLine {
                item: inserted,
                fee_structure,
            });
        }

        txn.commit().await?;

        tracing::info!(
            invoice_id = %invoice.id,
            invoice_number = %invoice.invoice_number,
            student_id = %student.id,
            total = %invoice.total_amount,
            "Invoice created"
        );

        Ok(InvoiceDetails {
            invoice,
            items,
            payments: Vec::new(),
            student,
        })
    }

    /// Gets a live invoice visible within `scope`, fully hydrated.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceNotFound` if the invoice is absent, deleted or out of
    /// scope.
    pub async fn find(
        &self,
        id: InvoiceId,
        scope: &TenantScope,
    ) -> Result<InvoiceDetails, RepositoryError> {
        let invoice = invoices::Entity::find_live()
            .filter(invoices::Column::Id.eq(id.into_inner()))
            .filter(invoice_scope(scope))
            .one(&self.db)
            .await?
            .ok_or(BillingError::InvoiceNotFound)?;

        hydrate(&self.db, invoice).await
    }

    /// Lists live invoices visible within `scope`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        scope: &TenantScope,
        filter: InvoiceFilter,
        page: PageRequest,
    ) -> Result<PageResponse<invoices::Model>, RepositoryError> {
        let mut query = invoices::Entity::find_live().filter(invoice_scope(scope));

        if let Some(student_id) = filter.student_id {
            query = query.filter(invoices::Column::StudentId.eq(student_id.into_inner()));
        }
        if let Some(status) = filter.status {
            query = query.filter(invoices::Column::Status.eq(DbInvoiceStatus::from(status)));
        }

        let total = query.clone().count(&self.db).await?;

        let data = query
            .order_by_desc(invoices::Column::CreatedAt)
            .order_by_desc(invoices::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(data, page, total))
    }

    /// Overrides an invoice's status. Amounts are never touched.
    ///
    /// # Errors
    ///
    /// - `InvoiceNotFound` if the invoice is absent, deleted or out of scope
    /// - `StatusContradictsAmounts` if the status disagrees with the amounts
    pub async fn update_status(
        &self,
        id: InvoiceId,
        status: InvoiceStatus,
        scope: &TenantScope,
    ) -> Result<InvoiceDetails, RepositoryError> {
        let txn = self.db.begin().await?;

        let invoice = invoices::Entity::find_live()
            .filter(invoices::Column::Id.eq(id.into_inner()))
            .filter(invoice_scope(scope))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(BillingError::InvoiceNotFound)?;

        BillingService::validate_status_override(&amounts_of(&invoice), status)?;

        let previous = InvoiceStatus::from(invoice.status);
        let mut active: invoices::ActiveModel = invoice.into();
        active.status = Set(status.into());
        active.updated_at = Set(Utc::now().into());
        let invoice = active.update(&txn).await?;

        txn.commit().await?;

        tracing::info!(
            invoice_id = %invoice.id,
            from = %previous,
            to = %status,
            "Invoice status updated"
        );

        hydrate(&self.db, invoice).await
    }

    /// Soft-deletes an invoice that has no payments.
    ///
    /// The invoice row stays locked from the payment check to the write, so a
    /// payment cannot land in between.
    ///
    /// # Errors
    ///
    /// - `InvoiceNotFound` if the invoice is absent, deleted or out of scope
    /// - `HasPayments` if any payment references the invoice
    pub async fn delete(&self, id: InvoiceId, scope: &TenantScope) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await?;

        let invoice = invoices::Entity::find_live()
            .filter(invoices::Column::Id.eq(id.into_inner()))
            .filter(invoice_scope(scope))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(BillingError::InvoiceNotFound)?;

        let payment_count = payments::Entity::find()
            .filter(payments::Column::InvoiceId.eq(invoice.id))
            .count(&txn)
            .await?;
        BillingService::ensure_deletable(payment_count)?;

        let now = Utc::now().into();
        let mut active: invoices::ActiveModel = invoice.into();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        let invoice = active.update(&txn).await?;

        txn.commit().await?;

        tracing::info!(invoice_id = %invoice.id, "Invoice deleted");
        Ok(())
    }

    /// Builds the fee statement of a student visible within `scope`.
    ///
    /// # Errors
    ///
    /// Returns `StudentNotFound` if the student is absent, deleted or out of
    /// scope.
    pub async fn fee_statement(
        &self,
        student_id: StudentId,
        scope: &TenantScope,
    ) -> Result<FeeStatement, RepositoryError> {
        let student = student::find_scoped(&self.db, student_id, scope)
            .await?
            .ok_or(BillingError::StudentNotFound)?;

        let lines = invoices::Entity::find_live()
            .filter(invoices::Column::StudentId.eq(student.id))
            .order_by_desc(invoices::Column::CreatedAt)
            .order_by_desc(invoices::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|invoice| StatementLine {
                invoice_number: invoice.invoice_number,
                issue_date: invoice.issue_date,
                due_date: invoice.due_date,
                total_amount: invoice.total_amount,
                paid_amount: invoice.paid_amount,
                balance: invoice.balance_amount,
                status: invoice.status.into(),
            })
            .collect();

        Ok(FeeStatement::from_invoices(student.into(), lines))
    }
}

/// Loads the lines, payments and student of an invoice.
pub(crate) async fn hydrate<C: ConnectionTrait>(
    conn: &C,
    invoice: invoices::Model,
) -> Result<InvoiceDetails, RepositoryError> {
    let items = invoice_items::Entity::find()
        .filter(invoice_items::Column::InvoiceId.eq(invoice.id))
        .order_by_asc(invoice_items::Column::Position)
        .find_also_related(fee_structures::Entity)
        .all(conn)
        .await?
        .into_iter()
        .map(|(item, fee)| InvoiceLine {
            item,
            fee_structure: fee.map(|fee| FeeStructureRef {
                id: fee.id,
                name: fee.name,
            }),
        })
        .collect();

    let payments = payments::Entity::find()
        .filter(payments::Column::InvoiceId.eq(invoice.id))
        .order_by_desc(payments::Column::PaymentDate)
        .order_by_desc(payments::Column::CreatedAt)
        .all(conn)
        .await?;

    let student = student::find_any(conn, invoice.student_id)
        .await?
        .ok_or(BillingError::StudentNotFound)?;

    Ok(InvoiceDetails {
        invoice,
        items,
        payments,
        student,
    })
}
