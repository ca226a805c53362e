//! Fee structure routes.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use scholaris_core::tenancy::BillingAction;
use scholaris_shared::types::{FeeStructureId, PageRequest, SchoolId};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::{
    CreateFeeStructureRequest, FeeStructureResponse, ListFeeStructuresQuery, MessageResponse,
    UpdateFeeStructureRequest,
};
use crate::error::ApiError;
use crate::extractors::{ApiJson, ApiPath, ApiQuery};
use crate::{AppState, middleware::AuthUser};

/// Creates the fee structure routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/fees", get(list_fee_structures).post(create_fee_structure))
        .route(
            "/fees/{id}",
            get(get_fee_structure)
                .patch(update_fee_structure)
                .delete(delete_fee_structure),
        )
}

/// POST `/fees` - Add a fee structure.
async fn create_fee_structure(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Result<ApiJson<CreateFeeStructureRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = auth.authorize(BillingAction::ManageFeeStructures)?;
    let ApiJson(body) = body?;
    body.validate()?;

    let school = body.school_id.map(SchoolId::from_uuid);
    let fee = state
        .fee_structures()
        .create(body.into(), school, &scope)
        .await?;

    info!(
        fee_structure_id = %fee.id,
        user_id = %auth.caller().user_id,
        "Fee structure created via API"
    );
    Ok((StatusCode::CREATED, Json(FeeStructureResponse::from(fee))))
}

/// GET `/fees` - List fee structures.
async fn list_fee_structures(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<ApiQuery<ListFeeStructuresQuery>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = auth.authorize(BillingAction::ManageFeeStructures)?;
    let ApiQuery(query) = query?;

    let page = PageRequest::new(query.page.unwrap_or(1), query.limit.unwrap_or(20))?;
    let fees = state
        .fee_structures()
        .list(&scope, query.search.as_deref(), page)
        .await?;
    Ok(Json(fees.map(FeeStructureResponse::from)))
}

/// GET `/fees/{id}` - Get one fee structure.
async fn get_fee_structure(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<ApiPath<Uuid>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = auth.authorize(BillingAction::ManageFeeStructures)?;
    let ApiPath(id) = id?;

    let fee = state
        .fee_structures()
        .find(FeeStructureId::from_uuid(id), &scope)
        .await?;
    Ok(Json(FeeStructureResponse::from(fee)))
}

/// PATCH `/fees/{id}` - Update a fee structure.
async fn update_fee_structure(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<ApiPath<Uuid>, ApiError>,
    body: Result<ApiJson<UpdateFeeStructureRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = auth.authorize(BillingAction::ManageFeeStructures)?;
    let ApiPath(id) = id?;
    let ApiJson(body) = body?;
    body.validate()?;

    let fee = state
        .fee_structures()
        .update(FeeStructureId::from_uuid(id), body.into(), &scope)
        .await?;
    Ok(Json(FeeStructureResponse::from(fee)))
}

/// DELETE `/fees/{id}` - Soft-delete a fee structure.
async fn delete_fee_structure(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<ApiPath<Uuid>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = auth.authorize(BillingAction::ManageFeeStructures)?;
    let ApiPath(id) = id?;

    state
        .fee_structures()
        .delete(FeeStructureId::from_uuid(id), &scope)
        .await?;

    info!(
        fee_structure_id = %id,
        user_id = %auth.caller().user_id,
        "Fee structure deleted via API"
    );
    Ok(Json(MessageResponse {
        message: "Fee structure deleted successfully",
    }))
}
