//! Error to HTTP response mapping.
//!
//! Every handler error becomes `{"error": "<CODE>", "message": "<text>"}`.
//! Server errors are logged with their detail and answered with a generic
//! message.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use scholaris_core::billing::BillingError;
use scholaris_core::tenancy::AccessDenied;
use scholaris_db::RepositoryError;
use scholaris_shared::AppError;
use serde_json::json;
use tracing::error;
use validator::ValidationErrors;

/// Error returned by every handler.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// Creates a 401 error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self(AppError::Unauthorized(message.into()))
    }

    /// Creates a 400 error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self(AppError::Validation(message.into()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if err.is_server_error() {
            error!(error = %err, code = err.error_code(), "Request failed");
        }

        (
            status,
            Json(json!({
                "error": err.error_code(),
                "message": err.public_message(),
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        Self(err.into())
    }
}

impl From<BillingError> for ApiError {
    fn from(err: BillingError) -> Self {
        Self(err.into())
    }
}

impl From<AccessDenied> for ApiError {
    fn from(err: AccessDenied) -> Self {
        Self(err.into())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::validation(format!("Validation error: {errors}"))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use rstest::rstest;

    async fn render(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[rstest]
    #[case(AppError::Unauthorized("no".into()), 401, "UNAUTHORIZED")]
    #[case(AppError::Forbidden("no".into()), 403, "FORBIDDEN")]
    #[case(AppError::NotFound("Invoice not found".into()), 404, "NOT_FOUND")]
    #[case(AppError::Validation("bad".into()), 400, "VALIDATION_ERROR")]
    #[case(AppError::Conflict("dup".into()), 409, "CONFLICT")]
    #[tokio::test]
    async fn test_client_errors_render_code_and_message(
        #[case] err: AppError,
        #[case] status: u16,
        #[case] code: &str,
    ) {
        let message = err.public_message();
        let (actual, body) = render(ApiError(err)).await;

        assert_eq!(actual.as_u16(), status);
        assert_eq!(body["error"], code);
        assert_eq!(body["message"], message);
    }

    #[tokio::test]
    async fn test_server_errors_hide_detail() {
        let (status, body) =
            render(ApiError(AppError::Database("relation \"invoices\" missing".into()))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "DATABASE_ERROR");
        assert_eq!(body["message"], "An error occurred");
    }

    #[tokio::test]
    async fn test_billing_error_maps_through() {
        let err = BillingError::ExceedsBalance {
            balance: rust_decimal_macros::dec!(400),
        };
        let (status, body) = render(err.into()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "Payment amount exceeds balance. Maximum: 400.00"
        );
    }
}
