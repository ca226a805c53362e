//! Invoice routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
};
use scholaris_core::tenancy::BillingAction;
use scholaris_db::InvoiceFilter;
use scholaris_shared::types::{InvoiceId, PageRequest, StudentId};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::{
    CreateInvoiceRequest, InvoiceResponse, ListInvoicesQuery, MessageResponse, UpdateStatusRequest,
};
use crate::error::ApiError;
use crate::extractors::{ApiJson, ApiPath, ApiQuery};
use crate::{AppState, middleware::AuthUser};

/// Creates the invoice routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/payments/invoices",
            get(list_invoices).post(create_invoice),
        )
        .route(
            "/payments/invoices/{id}",
            get(get_invoice).delete(delete_invoice),
        )
        .route("/payments/invoices/{id}/status", patch(update_status))
}

/// POST `/payments/invoices` - Issue an invoice.
async fn create_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Result<ApiJson<CreateInvoiceRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = auth.authorize(BillingAction::CreateInvoice)?;
    let ApiJson(body) = body?;
    body.validate()?;

    let details = state.invoices().create(body.into(), &scope).await?;

    info!(
        invoice_id = %details.invoice.id,
        user_id = %auth.caller().user_id,
        "Invoice issued via API"
    );
    Ok((StatusCode::CREATED, Json(InvoiceResponse::from(details))))
}

/// GET `/payments/invoices` - List invoices.
async fn list_invoices(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<ApiQuery<ListInvoicesQuery>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = auth.authorize(BillingAction::ListInvoices)?;
    let ApiQuery(query) = query?;

    let page = PageRequest::new(query.page.unwrap_or(1), query.limit.unwrap_or(20))?;
    let filter = InvoiceFilter {
        student_id: query.student_id.map(StudentId::from_uuid),
        status: query.status,
    };

    let invoices = state.invoices().list(&scope, filter, page).await?;
    Ok(Json(invoices.map(InvoiceResponse::from)))
}

/// GET `/payments/invoices/{id}` - Get one invoice with items and payments.
async fn get_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<ApiPath<Uuid>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = auth.authorize(BillingAction::ViewInvoice)?;
    let ApiPath(id) = id?;

    let details = state.invoices().find(InvoiceId::from_uuid(id), &scope).await?;
    Ok(Json(InvoiceResponse::from(details)))
}

/// PATCH `/payments/invoices/{id}/status` - Override an invoice's status.
async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<ApiPath<Uuid>, ApiError>,
    body: Result<ApiJson<UpdateStatusRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = auth.authorize(BillingAction::UpdateInvoiceStatus)?;
    let ApiPath(id) = id?;
    let ApiJson(body) = body?;

    let details = state
        .invoices()
        .update_status(InvoiceId::from_uuid(id), body.status, &scope)
        .await?;
    Ok(Json(InvoiceResponse::from(details)))
}

/// DELETE `/payments/invoices/{id}` - Soft-delete an invoice without payments.
async fn delete_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<ApiPath<Uuid>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = auth.authorize(BillingAction::DeleteInvoice)?;
    let ApiPath(id) = id?;

    state
        .invoices()
        .delete(InvoiceId::from_uuid(id), &scope)
        .await?;
    Ok(Json(MessageResponse {
        message: "Invoice deleted successfully",
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use rstest::rstest;
    use scholaris_shared::Role;
    use scholaris_shared::types::SchoolId;

    use crate::routes::test_support::{send, token};

    const VALID_INVOICE: &str = r#"{
        "studentId": "0191d3a0-0000-7000-8000-000000000001",
        "dueDate": "2026-04-30",
        "items": [{"description": "Tuition", "unitPrice": "1000.00"}]
    }"#;

    fn admin() -> String {
        token(Role::SchoolAdmin, Some(SchoolId::new()))
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let (status, body) = send("GET", "/api/v1/payments/invoices", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_garbage_token_is_unauthorized() {
        let (status, _) = send(
            "GET",
            "/api/v1/payments/invoices",
            Some("not.a.jwt"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[case(Role::Student, "POST", "/api/v1/payments/invoices")]
    #[case(Role::Parent, "POST", "/api/v1/payments/invoices")]
    #[case(Role::Teacher, "POST", "/api/v1/payments/invoices")]
    #[case(Role::Student, "GET", "/api/v1/payments/invoices")]
    #[case(Role::Teacher, "GET", "/api/v1/payments/invoices/0191d3a0-0000-7000-8000-000000000001")]
    #[case(Role::Parent, "DELETE", "/api/v1/payments/invoices/0191d3a0-0000-7000-8000-000000000001")]
    #[tokio::test]
    async fn test_role_gate_forbids(#[case] role: Role, #[case] method: &str, #[case] uri: &str) {
        let token = token(role, Some(SchoolId::new()));
        let body = (method == "POST").then_some(VALID_INVOICE);

        let (status, json) = send(method, uri, Some(&token), body).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["error"], "FORBIDDEN");
    }

    #[tokio::test]
    async fn test_forbidden_before_body_is_parsed() {
        let token = token(Role::Student, Some(SchoolId::new()));
        let (status, _) = send(
            "POST",
            "/api/v1/payments/invoices",
            Some(&token),
            Some("{not json"),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[rstest]
    #[case::malformed_json("{not json")]
    #[case::empty_items(
        r#"{"studentId": "0191d3a0-0000-7000-8000-000000000001", "dueDate": "2026-04-30", "items": []}"#
    )]
    #[case::zero_quantity(
        r#"{"studentId": "0191d3a0-0000-7000-8000-000000000001", "dueDate": "2026-04-30", "items": [{"description": "Tuition", "unitPrice": "10", "quantity": 0}]}"#
    )]
    #[case::negative_price(
        r#"{"studentId": "0191d3a0-0000-7000-8000-000000000001", "dueDate": "2026-04-30", "items": [{"description": "Tuition", "unitPrice": "-10"}]}"#
    )]
    #[case::negative_discount(
        r#"{"studentId": "0191d3a0-0000-7000-8000-000000000001", "dueDate": "2026-04-30", "items": [{"description": "Tuition", "unitPrice": "10"}], "discount": "-1"}"#
    )]
    #[case::discount_exceeds_total(
        r#"{"studentId": "0191d3a0-0000-7000-8000-000000000001", "dueDate": "2026-04-30", "items": [{"description": "Tuition", "unitPrice": "10"}], "discount": "20"}"#
    )]
    #[case::three_decimals(
        r#"{"studentId": "0191d3a0-0000-7000-8000-000000000001", "dueDate": "2026-04-30", "items": [{"description": "Tuition", "unitPrice": "10.005"}]}"#
    )]
    #[case::missing_due_date(
        r#"{"studentId": "0191d3a0-0000-7000-8000-000000000001", "items": [{"description": "Tuition", "unitPrice": "10"}]}"#
    )]
    #[tokio::test]
    async fn test_invalid_invoice_rejected_before_store(#[case] body: &str) {
        let (status, json) = send(
            "POST",
            "/api/v1/payments/invoices",
            Some(&admin()),
            Some(body),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{json}");
        assert_eq!(json["error"], "VALIDATION_ERROR");
    }

    #[rstest]
    #[case("/api/v1/payments/invoices?limit=500")]
    #[case("/api/v1/payments/invoices?page=0")]
    #[case("/api/v1/payments/invoices?status=ARCHIVED")]
    #[case("/api/v1/payments/invoices?studentId=nope")]
    #[tokio::test]
    async fn test_invalid_list_query(#[case] uri: &str) {
        let (status, _) = send("GET", uri, Some(&admin()), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_invoice_id() {
        let (status, _) = send(
            "GET",
            "/api/v1/payments/invoices/not-a-uuid",
            Some(&admin()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_status_rejected() {
        let (status, _) = send(
            "PATCH",
            "/api/v1/payments/invoices/0191d3a0-0000-7000-8000-000000000001/status",
            Some(&admin()),
            Some(r#"{"status": "REFUNDED"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
