//! Tenant-scoped student lookups shared by the billing repositories.

use scholaris_core::billing::StatementStudent;
use scholaris_core::tenancy::TenantScope;
use scholaris_shared::types::StudentId;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::{students, users};
use crate::scope::{SoftDelete, student_scope};

/// A student together with the user account that carries their name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    /// Student ID.
    pub id: Uuid,
    /// Owning school.
    pub school_id: Uuid,
    /// School-issued code.
    pub student_code: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Login email.
    pub email: String,
}

impl StudentSummary {
    fn from_models(student: students::Model, user: &users::Model) -> Self {
        Self {
            id: student.id,
            school_id: student.school_id,
            student_code: student.student_code,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
        }
    }
}

impl From<StudentSummary> for StatementStudent {
    fn from(summary: StudentSummary) -> Self {
        Self {
            id: summary.id,
            name: format!("{} {}", summary.first_name, summary.last_name),
            student_code: summary.student_code,
            email: summary.email,
        }
    }
}

/// Finds a live student visible within `scope`.
pub(crate) async fn find_scoped<C: ConnectionTrait>(
    conn: &C,
    id: StudentId,
    scope: &TenantScope,
) -> Result<Option<StudentSummary>, DbErr> {
    let found = students::Entity::find_live()
        .filter(students::Column::Id.eq(id.into_inner()))
        .filter(student_scope(scope))
        .find_also_related(users::Entity)
        .one(conn)
        .await?;

    Ok(found.and_then(|(student, user)| {
        user.map(|user| StudentSummary::from_models(student, &user))
    }))
}

/// Loads a student regardless of scope or deletion, for hydrating records
/// that were already authorized through another path.
pub(crate) async fn find_any<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<Option<StudentSummary>, DbErr> {
    let found = students::Entity::find_by_id(id)
        .find_also_related(users::Entity)
        .one(conn)
        .await?;

    Ok(found.and_then(|(student, user)| {
        user.map(|user| StudentSummary::from_models(student, &user))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_student_uses_full_name() {
        let summary = StudentSummary {
            id: Uuid::new_v4(),
            school_id: Uuid::new_v4(),
            student_code: "STU-042".to_string(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: "grace@school.test".to_string(),
        };
        let student = StatementStudent::from(summary);
        assert_eq!(student.name, "Grace Hopper");
        assert_eq!(student.student_code, "STU-042");
    }
}
