//! Payment routes.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use scholaris_core::billing::BillingService;
use scholaris_core::tenancy::BillingAction;
use scholaris_db::{PaymentFilter, RecordPaymentInput};
use scholaris_shared::types::{InvoiceId, PageRequest, PaymentId};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::{CreatePaymentRequest, ListPaymentsQuery, PaymentResponse};
use crate::error::ApiError;
use crate::extractors::{ApiJson, ApiPath, ApiQuery};
use crate::{AppState, middleware::AuthUser};

/// Creates the payment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments", get(list_payments).post(create_payment))
        .route("/payments/{id}", get(get_payment))
}

/// POST `/payments` - Record a payment against an invoice.
async fn create_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Result<ApiJson<CreatePaymentRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = auth.authorize(BillingAction::RecordPayment)?;
    let ApiJson(body) = body?;
    body.validate()?;
    BillingService::check_payment_amount(body.amount)?;

    let input = RecordPaymentInput {
        invoice_id: InvoiceId::from_uuid(body.invoice_id),
        amount: body.amount,
        method: body.payment_method,
        reference_number: body.reference_number,
        notes: body.notes,
        received_by: auth.caller().user_id,
    };
    let details = state.payments().record(input, &scope).await?;

    info!(
        payment_id = %details.payment.id,
        invoice_id = %details.invoice.id,
        user_id = %auth.caller().user_id,
        "Payment recorded via API"
    );
    Ok((StatusCode::CREATED, Json(PaymentResponse::from(details))))
}

/// GET `/payments` - List payments.
async fn list_payments(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<ApiQuery<ListPaymentsQuery>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = auth.authorize(BillingAction::ListPayments)?;
    let ApiQuery(query) = query?;

    if let (Some(from), Some(to)) = (query.from, query.to) {
        if from > to {
            return Err(ApiError::validation("'from' must not be after 'to'"));
        }
    }

    let page = PageRequest::new(query.page.unwrap_or(1), query.limit.unwrap_or(20))?;
    let filter = PaymentFilter {
        invoice_id: query.invoice_id.map(InvoiceId::from_uuid),
        from: query.from,
        to: query.to,
    };

    let payments = state.payments().list(&scope, filter, page).await?;
    Ok(Json(payments.map(PaymentResponse::from)))
}

/// GET `/payments/{id}` - Get one payment.
async fn get_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<ApiPath<Uuid>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = auth.authorize(BillingAction::ViewPayment)?;
    let ApiPath(id) = id?;

    let details = state.payments().find(PaymentId::from_uuid(id), &scope).await?;
    Ok(Json(PaymentResponse::from(details)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use rstest::rstest;
    use scholaris_shared::Role;
    use scholaris_shared::types::SchoolId;

    use crate::routes::test_support::{send, token};

    fn admin() -> String {
        token(Role::SchoolAdmin, Some(SchoolId::new()))
    }

    fn payment_body(amount: &str) -> String {
        format!(
            r#"{{"invoiceId": "0191d3a0-0000-7000-8000-000000000001", "amount": {amount}, "paymentMethod": "CASH"}}"#
        )
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let (status, body) = send(
            "POST",
            "/api/v1/payments",
            None,
            Some(payment_body("10").as_str()),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "UNAUTHORIZED");
    }

    #[rstest]
    #[case(Role::Student)]
    #[case(Role::Parent)]
    #[case(Role::Teacher)]
    #[tokio::test]
    async fn test_only_staff_record_payments(#[case] role: Role) {
        let token = token(role, Some(SchoolId::new()));
        let (status, _) = send(
            "POST",
            "/api/v1/payments",
            Some(&token),
            Some(payment_body("10").as_str()),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[rstest]
    #[case::zero("\"0\"", "Payment amount must be greater than zero")]
    #[case::negative("-25", "Payment amount must be greater than zero")]
    #[case::too_precise("\"10.001\"", "Payment amount must have at most 2 decimal places")]
    #[tokio::test]
    async fn test_invalid_amount_rejected_before_store(#[case] amount: &str, #[case] message: &str) {
        let (status, json) = send(
            "POST",
            "/api/v1/payments",
            Some(&admin()),
            Some(payment_body(amount).as_str()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], message);
    }

    #[tokio::test]
    async fn test_unknown_method_rejected() {
        let (status, _) = send(
            "POST",
            "/api/v1/payments",
            Some(&admin()),
            Some(r#"{"invoiceId": "0191d3a0-0000-7000-8000-000000000001", "amount": "10", "paymentMethod": "BARTER"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[case("/api/v1/payments?from=2026-05-01&to=2026-04-01")]
    #[case("/api/v1/payments?from=yesterday")]
    #[case("/api/v1/payments?limit=0")]
    #[tokio::test]
    async fn test_invalid_list_query(#[case] uri: &str) {
        let (status, _) = send("GET", uri, Some(&admin()), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_students_cannot_list_payments() {
        let token = token(Role::Student, Some(SchoolId::new()));
        let (status, _) = send("GET", "/api/v1/payments", Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
