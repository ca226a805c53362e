//! Fee statement routes.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use scholaris_core::tenancy::BillingAction;
use scholaris_shared::types::StudentId;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extractors::ApiPath;
use crate::{AppState, middleware::AuthUser};

/// Creates the statement routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/payments/students/{student_id}/statement",
        get(get_statement),
    )
}

/// GET `/payments/students/{student_id}/statement` - A student's fee statement.
async fn get_statement(
    State(state): State<AppState>,
    auth: AuthUser,
    student_id: Result<ApiPath<Uuid>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = auth.authorize(BillingAction::ViewStatement)?;
    let ApiPath(student_id) = student_id?;

    let statement = state
        .invoices()
        .fee_statement(StudentId::from_uuid(student_id), &scope)
        .await?;
    Ok(Json(statement))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use scholaris_shared::Role;
    use scholaris_shared::types::SchoolId;

    use crate::routes::test_support::{send, token};

    #[tokio::test]
    async fn test_statement_requires_token() {
        let (status, _) = send(
            "GET",
            "/api/v1/payments/students/0191d3a0-0000-7000-8000-000000000001/statement",
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_teachers_cannot_view_statements() {
        let token = token(Role::Teacher, Some(SchoolId::new()));
        let (status, _) = send(
            "GET",
            "/api/v1/payments/students/0191d3a0-0000-7000-8000-000000000001/statement",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_invalid_student_id() {
        let token = token(Role::Parent, Some(SchoolId::new()));
        let (status, _) = send(
            "GET",
            "/api/v1/payments/students/42/statement",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
