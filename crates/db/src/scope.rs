//! Soft-delete and tenant-scope query helpers.
//!
//! Every repository read starts from [`SoftDelete::find_live`] and adds one of
//! the scope conditions below. Tenancy hangs off `students.school_id`; invoices
//! and payments reach it through `IN (SELECT ...)` subqueries rather than
//! joins so that `SELECT ... FOR UPDATE` on an invoice locks only that row.
//!
//! # Usage
//!
//! ```ignore
//! use scholaris_db::scope::{invoice_scope, SoftDelete};
//!
//! let invoice = invoices::Entity::find_live()
//!     .filter(invoices::Column::Id.eq(id))
//!     .filter(invoice_scope(&scope))
//!     .one(&db)
//!     .await?;
//! ```

use scholaris_core::tenancy::TenantScope;
use scholaris_shared::types::SchoolId;
use sea_orm::sea_query::{Expr, Query, SelectStatement};
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, Select};

use crate::entities::{fee_structures, invoices, payments, schools, students, users};

/// Entities whose rows are hidden, not removed, when deleted.
pub trait SoftDelete: EntityTrait {
    /// The nullable `deleted_at` column.
    fn deleted_at_column() -> Self::Column;

    /// Selects rows that have not been soft-deleted.
    #[must_use]
    fn find_live() -> Select<Self> {
        Self::find().filter(Self::deleted_at_column().is_null())
    }
}

impl SoftDelete for schools::Entity {
    fn deleted_at_column() -> Self::Column {
        schools::Column::DeletedAt
    }
}

impl SoftDelete for users::Entity {
    fn deleted_at_column() -> Self::Column {
        users::Column::DeletedAt
    }
}

impl SoftDelete for students::Entity {
    fn deleted_at_column() -> Self::Column {
        students::Column::DeletedAt
    }
}

impl SoftDelete for fee_structures::Entity {
    fn deleted_at_column() -> Self::Column {
        fee_structures::Column::DeletedAt
    }
}

impl SoftDelete for invoices::Entity {
    fn deleted_at_column() -> Self::Column {
        invoices::Column::DeletedAt
    }
}

fn students_of(school_id: SchoolId) -> SelectStatement {
    Query::select()
        .column(students::Column::Id)
        .from(students::Entity)
        .and_where(students::Column::SchoolId.eq(school_id.into_inner()))
        .to_owned()
}

fn invoices_of(school_id: SchoolId) -> SelectStatement {
    Query::select()
        .column(invoices::Column::Id)
        .from(invoices::Entity)
        .and_where(invoices::Column::StudentId.in_subquery(students_of(school_id)))
        .to_owned()
}

fn match_nothing() -> Condition {
    Condition::all().add(Expr::cust("FALSE"))
}

/// Restricts a `students` query to the scope.
#[must_use]
pub fn student_scope(scope: &TenantScope) -> Condition {
    match scope {
        TenantScope::Unscoped => Condition::all(),
        TenantScope::School(school_id) => {
            Condition::all().add(students::Column::SchoolId.eq(school_id.into_inner()))
        }
        TenantScope::Nothing => match_nothing(),
    }
}

/// Restricts a `fee_structures` query to the scope.
#[must_use]
pub fn fee_structure_scope(scope: &TenantScope) -> Condition {
    match scope {
        TenantScope::Unscoped => Condition::all(),
        TenantScope::School(school_id) => {
            Condition::all().add(fee_structures::Column::SchoolId.eq(school_id.into_inner()))
        }
        TenantScope::Nothing => match_nothing(),
    }
}

/// Restricts an `invoices` query to the scope.
#[must_use]
pub fn invoice_scope(scope: &TenantScope) -> Condition {
    match scope {
        TenantScope::Unscoped => Condition::all(),
        TenantScope::School(school_id) => {
            Condition::all().add(invoices::Column::StudentId.in_subquery(students_of(*school_id)))
        }
        TenantScope::Nothing => match_nothing(),
    }
}

/// Restricts a `payments` query to the scope.
#[must_use]
pub fn payment_scope(scope: &TenantScope) -> Condition {
    match scope {
        TenantScope::Unscoped => Condition::all(),
        TenantScope::School(school_id) => {
            Condition::all().add(payments::Column::InvoiceId.in_subquery(invoices_of(*school_id)))
        }
        TenantScope::Nothing => match_nothing(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QuerySelect, QueryTrait};

    fn sql<E: EntityTrait>(select: Select<E>) -> String {
        select.build(DbBackend::Postgres).to_string()
    }

    #[test]
    fn test_find_live_excludes_deleted_rows() {
        let query = sql(invoices::Entity::find_live());
        assert!(query.contains(r#""invoices"."deleted_at" IS NULL"#));

        let query = sql(students::Entity::find_live());
        assert!(query.contains(r#""students"."deleted_at" IS NULL"#));
    }

    #[test]
    fn test_unscoped_adds_no_tenant_predicate() {
        let query = sql(invoices::Entity::find_live().filter(invoice_scope(&TenantScope::Unscoped)));
        assert!(!query.contains("school_id"));
        assert!(!query.contains("FALSE"));
    }

    #[test]
    fn test_school_scope_on_invoices_uses_subquery() {
        let school_id = SchoolId::new();
        let query = sql(
            invoices::Entity::find_live().filter(invoice_scope(&TenantScope::School(school_id))),
        );

        assert!(query.contains(r#""student_id" IN (SELECT"#));
        assert!(query.contains(r#"FROM "students""#));
        assert!(query.contains(r#""school_id" = "#));
        assert!(query.contains(&school_id.to_string()));
        assert!(!query.contains("JOIN"));
    }

    #[test]
    fn test_school_scope_on_payments_nests_through_invoices() {
        let school_id = SchoolId::new();
        let query =
            sql(payments::Entity::find().filter(payment_scope(&TenantScope::School(school_id))));

        assert!(query.contains(r#""invoice_id" IN (SELECT"#));
        assert!(query.contains(r#"FROM "invoices""#));
        assert!(query.contains(r#"FROM "students""#));
        assert!(query.contains(&school_id.to_string()));
    }

    #[test]
    fn test_school_scope_on_students() {
        let school_id = SchoolId::new();
        let query = sql(
            students::Entity::find_live().filter(student_scope(&TenantScope::School(school_id))),
        );
        assert!(query.contains(r#""students"."school_id" = "#));
        assert!(query.contains(&school_id.to_string()));
    }

    #[test]
    fn test_school_scope_on_fee_structures() {
        let school_id = SchoolId::new();
        let query = sql(
            fee_structures::Entity::find_live()
                .filter(fee_structure_scope(&TenantScope::School(school_id))),
        );
        assert!(query.contains(r#""fee_structures"."school_id" = "#));
        assert!(query.contains(r#""fee_structures"."deleted_at" IS NULL"#));
        assert!(query.contains(&school_id.to_string()));
    }

    #[test]
    fn test_nothing_scope_matches_no_rows() {
        for query in [
            sql(students::Entity::find_live().filter(student_scope(&TenantScope::Nothing))),
            sql(invoices::Entity::find_live().filter(invoice_scope(&TenantScope::Nothing))),
            sql(payments::Entity::find().filter(payment_scope(&TenantScope::Nothing))),
            sql(fee_structures::Entity::find_live()
                .filter(fee_structure_scope(&TenantScope::Nothing))),
        ] {
            assert!(query.contains("FALSE"), "{query}");
        }
    }

    #[test]
    fn test_locked_read_locks_only_invoices() {
        let query = sql(
            invoices::Entity::find_live()
                .filter(invoice_scope(&TenantScope::School(SchoolId::new())))
                .lock_exclusive(),
        );
        assert!(query.ends_with("FOR UPDATE"));
        assert!(!query.contains("JOIN"));
    }
}
