// src/handlers/quotation.rs

use crate::{
    auth::AuthUser,
    errors::{AppError, AppResult},
    models::{
        ApproveRejectRequest, ComparisonQuery, CreateComparisonRequest, QuotationComparison,
        QuotationInput, SelectQuotationRequest,
    },
    services::procurement::ProcurementService,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::info;
use uuid::Uuid;

async fn load_comparison(state: &AppState, comparison_id: Uuid) -> AppResult<QuotationComparison> {
    state
        .store
        .get_comparison(comparison_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Comparison {} not found", comparison_id)))
}

/// Start a vendor quotation comparison for a purchase request
#[utoipa::path(
    post,
    path = "/api/v1/quotations/comparison",
    request_body = CreateComparisonRequest,
    responses(
        (status = 201, description = "Comparison created in Draft", body = QuotationComparison),
        (status = 400, description = "Invalid comparison data"),
        (status = 409, description = "Comparison number already exists"),
    ),
    security(("bearer_auth" = [])),
    tag = "Procurement"
)]
pub async fn create_comparison(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<CreateComparisonRequest>,
) -> AppResult<(StatusCode, Json<QuotationComparison>)> {
    let comparison = ProcurementService::new_comparison(
        body,
        state.config.settings.procurement.value_threshold,
        &auth.name,
    )?;

    let comparison = state.store.insert_comparison(&comparison).await?;
    info!(
        comparison_id = %comparison.id,
        number = %comparison.comparison_number,
        quotations = comparison.quotations.len(),
        "Quotation comparison created"
    );

    Ok((StatusCode::CREATED, Json(comparison)))
}

#[utoipa::path(
    get,
    path = "/api/v1/quotations/comparison",
    params(ComparisonQuery),
    responses((status = 200, description = "Comparisons", body = Vec<QuotationComparison>)),
    security(("bearer_auth" = [])),
    tag = "Procurement"
)]
pub async fn list_comparisons(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ComparisonQuery>,
) -> AppResult<Json<Vec<QuotationComparison>>> {
    Ok(Json(state.store.list_comparisons(&query).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/quotations/comparison/{comparison_id}",
    params(("comparison_id" = Uuid, Path, description = "Comparison ID")),
    responses(
        (status = 200, description = "Comparison detail", body = QuotationComparison),
        (status = 404, description = "Comparison not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Procurement"
)]
pub async fn get_comparison(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(comparison_id): Path<Uuid>,
) -> AppResult<Json<QuotationComparison>> {
    Ok(Json(load_comparison(&state, comparison_id).await?))
}

/// Append a vendor quotation to a Draft comparison
#[utoipa::path(
    post,
    path = "/api/v1/quotations/comparison/{comparison_id}/quotations",
    request_body = QuotationInput,
    params(("comparison_id" = Uuid, Path, description = "Comparison ID")),
    responses(
        (status = 200, description = "Quotation added", body = QuotationComparison),
        (status = 404, description = "Comparison not found"),
        (status = 409, description = "Comparison is no longer a Draft"),
    ),
    security(("bearer_auth" = [])),
    tag = "Procurement"
)]
pub async fn add_quotation(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(comparison_id): Path<Uuid>,
    Json(body): Json<QuotationInput>,
) -> AppResult<Json<QuotationComparison>> {
    let mut comparison = load_comparison(&state, comparison_id).await?;
    let expected_version = comparison.version;

    ProcurementService::add_quotation(&mut comparison, body)?;

    let comparison = state
        .store
        .save_comparison(&comparison, expected_version)
        .await?;
    Ok(Json(comparison))
}

/// Select the winning quotation and send the comparison for review
#[utoipa::path(
    put,
    path = "/api/v1/quotations/comparison/{comparison_id}/select",
    request_body = SelectQuotationRequest,
    params(("comparison_id" = Uuid, Path, description = "Comparison ID")),
    responses(
        (status = 200, description = "Quotation selected", body = QuotationComparison),
        (status = 404, description = "Comparison or quotation not found"),
        (status = 409, description = "Comparison already decided or modified concurrently"),
    ),
    security(("bearer_auth" = [])),
    tag = "Procurement"
)]
pub async fn select_quotation(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(comparison_id): Path<Uuid>,
    Json(body): Json<SelectQuotationRequest>,
) -> AppResult<Json<QuotationComparison>> {
    let mut comparison = load_comparison(&state, comparison_id).await?;
    let expected_version = comparison.version;

    ProcurementService::select_quotation(&mut comparison, body.quotation_id, body.reason)?;

    let comparison = state
        .store
        .save_comparison(&comparison, expected_version)
        .await?;
    info!(
        comparison_id = %comparison.id,
        quotation_id = %body.quotation_id,
        requires_admin_approval = comparison.requires_admin_approval,
        "Quotation selected"
    );

    Ok(Json(comparison))
}

/// Approve or reject a comparison that is Under Review
#[utoipa::path(
    put,
    path = "/api/v1/quotations/comparison/{comparison_id}/approve-reject",
    request_body = ApproveRejectRequest,
    params(("comparison_id" = Uuid, Path, description = "Comparison ID")),
    responses(
        (status = 200, description = "Decision recorded", body = QuotationComparison),
        (status = 403, description = "Admin approval required"),
        (status = 404, description = "Comparison not found"),
        (status = 409, description = "Comparison is not Under Review"),
    ),
    security(("bearer_auth" = [])),
    tag = "Procurement"
)]
pub async fn approve_reject_comparison(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(comparison_id): Path<Uuid>,
    Json(body): Json<ApproveRejectRequest>,
) -> AppResult<Json<QuotationComparison>> {
    let mut comparison = load_comparison(&state, comparison_id).await?;
    let expected_version = comparison.version;

    let approver = body
        .approver
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| auth.name.clone());

    ProcurementService::decide(
        &mut comparison,
        body.decision,
        approver,
        body.remarks,
        auth.is_admin(),
    )?;

    let comparison = state
        .store
        .save_comparison(&comparison, expected_version)
        .await?;
    info!(
        comparison_id = %comparison.id,
        status = ?comparison.status,
        decided_by = %auth.name,
        "Comparison decided"
    );

    Ok(Json(comparison))
}
