// src/handlers/payroll.rs

use crate::{
    auth::AuthUser,
    errors::{AppError, AppResult},
    models::{
        CreatePayrollRequest, GeneratePayrollRequest, GeneratePayrollResponse, PayrollInputs,
        PayrollQuery, PayrollRecord, UpdatePayrollRequest,
    },
    services::payroll::{PayrollService, generate_from_attendance},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

fn paid_conflict(payroll_id: Uuid) -> AppError {
    AppError::Conflict(format!("Payroll {} is already paid", payroll_id))
}

async fn load_payroll(state: &AppState, payroll_id: Uuid) -> AppResult<PayrollRecord> {
    state
        .store
        .get_payroll(payroll_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Payroll {} not found", payroll_id)))
}

/// Create a payroll record for one employee and period; netSalary is derived
#[utoipa::path(
    post,
    path = "/api/v1/payroll",
    request_body = CreatePayrollRequest,
    responses(
        (status = 201, description = "Payroll created", body = PayrollRecord),
        (status = 400, description = "Invalid payroll input"),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Payroll already exists for this period"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn create_payroll(
    _auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<CreatePayrollRequest>,
) -> AppResult<(StatusCode, Json<PayrollRecord>)> {
    PayrollService::period_bounds(body.month, body.year)?;

    let employee = state
        .store
        .get_employee(body.employee_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", body.employee_id)))?;

    let defaults = &state.config.settings.payroll;
    let inputs = PayrollInputs {
        base_salary: body.base_salary.unwrap_or(employee.base_salary),
        total_working_days: body.total_working_days.unwrap_or(defaults.total_working_days),
        present_days: body.present_days,
        overtime_hours: body.overtime_hours.unwrap_or(Decimal::ZERO),
        overtime_rate_multiplier: body
            .overtime_rate_multiplier
            .unwrap_or(defaults.overtime_rate_multiplier),
        bonus: body.bonus.unwrap_or(Decimal::ZERO),
        deductions: body.deductions.unwrap_or(Decimal::ZERO),
    };
    let net_salary = PayrollService::calculate(&inputs)?;

    let now = Utc::now();
    let record = PayrollRecord {
        id: Uuid::new_v4(),
        employee_id: employee.id,
        month: body.month,
        year: body.year,
        base_salary: inputs.base_salary,
        present_days: inputs.present_days,
        total_working_days: inputs.total_working_days,
        overtime_hours: inputs.overtime_hours,
        overtime_rate_multiplier: inputs.overtime_rate_multiplier,
        bonus: inputs.bonus,
        deductions: inputs.deductions,
        net_salary,
        is_paid: false,
        paid_date: None,
        created_at: now,
        updated_at: now,
    };

    let record = state.store.insert_payroll(&record).await?;
    info!(
        payroll_id = %record.id,
        employee_id = %record.employee_id,
        net_salary = %record.net_salary,
        "Payroll created"
    );

    Ok((StatusCode::CREATED, Json(record)))
}

/// List payroll records
#[utoipa::path(
    get,
    path = "/api/v1/payroll",
    params(PayrollQuery),
    responses((status = 200, description = "Payroll records", body = Vec<PayrollRecord>)),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn list_payroll(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PayrollQuery>,
) -> AppResult<Json<Vec<PayrollRecord>>> {
    Ok(Json(state.store.list_payroll(&query).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/payroll/{payroll_id}",
    params(("payroll_id" = Uuid, Path, description = "Payroll record ID")),
    responses(
        (status = 200, description = "Payroll record", body = PayrollRecord),
        (status = 404, description = "Payroll not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn get_payroll(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(payroll_id): Path<Uuid>,
) -> AppResult<Json<PayrollRecord>> {
    Ok(Json(load_payroll(&state, payroll_id).await?))
}

/// Edit payroll inputs; netSalary is recomputed
#[utoipa::path(
    put,
    path = "/api/v1/payroll/{payroll_id}",
    request_body = UpdatePayrollRequest,
    params(("payroll_id" = Uuid, Path, description = "Payroll record ID")),
    responses(
        (status = 200, description = "Payroll updated", body = PayrollRecord),
        (status = 400, description = "Invalid payroll input"),
        (status = 404, description = "Payroll not found"),
        (status = 409, description = "Payroll already paid"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn update_payroll(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(payroll_id): Path<Uuid>,
    Json(body): Json<UpdatePayrollRequest>,
) -> AppResult<Json<PayrollRecord>> {
    let mut record = load_payroll(&state, payroll_id).await?;
    if record.is_paid {
        return Err(paid_conflict(payroll_id));
    }

    record.base_salary = body.base_salary.unwrap_or(record.base_salary);
    record.present_days = body.present_days.unwrap_or(record.present_days);
    record.total_working_days = body.total_working_days.unwrap_or(record.total_working_days);
    record.overtime_hours = body.overtime_hours.unwrap_or(record.overtime_hours);
    record.overtime_rate_multiplier = body
        .overtime_rate_multiplier
        .unwrap_or(record.overtime_rate_multiplier);
    record.bonus = body.bonus.unwrap_or(record.bonus);
    record.deductions = body.deductions.unwrap_or(record.deductions);
    record.net_salary = PayrollService::calculate(&record.inputs())?;
    record.updated_at = Utc::now();

    let record = state
        .store
        .update_payroll(&record)
        .await?
        .ok_or_else(|| paid_conflict(payroll_id))?;

    Ok(Json(record))
}

/// Delete an unpaid payroll record
#[utoipa::path(
    delete,
    path = "/api/v1/payroll/{payroll_id}",
    params(("payroll_id" = Uuid, Path, description = "Payroll record ID")),
    responses(
        (status = 200, description = "Payroll deleted"),
        (status = 404, description = "Payroll not found"),
        (status = 409, description = "Paid payroll cannot be deleted"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn delete_payroll(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(payroll_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let record = load_payroll(&state, payroll_id).await?;
    if record.is_paid || !state.store.delete_payroll(payroll_id).await? {
        return Err(paid_conflict(payroll_id));
    }

    Ok(Json(serde_json::json!({ "message": "Payroll deleted successfully" })))
}

/// Mark a payroll record as paid. One-way; a second call is a conflict.
#[utoipa::path(
    patch,
    path = "/api/v1/payroll/{payroll_id}/mark-paid",
    params(("payroll_id" = Uuid, Path, description = "Payroll record ID")),
    responses(
        (status = 200, description = "Payroll marked paid", body = PayrollRecord),
        (status = 404, description = "Payroll not found"),
        (status = 409, description = "Payroll already paid"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn mark_paid(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(payroll_id): Path<Uuid>,
) -> AppResult<Json<PayrollRecord>> {
    let record = load_payroll(&state, payroll_id).await?;
    if record.is_paid {
        return Err(paid_conflict(payroll_id));
    }

    let record = state
        .store
        .mark_payroll_paid(payroll_id, Utc::now())
        .await?
        .ok_or_else(|| paid_conflict(payroll_id))?;

    info!(payroll_id = %record.id, paid_by = %auth.name, "Payroll marked paid");
    Ok(Json(record))
}

/// Build or refresh every active employee's payroll for a month from attendance
#[utoipa::path(
    post,
    path = "/api/v1/payroll/generate-from-attendance",
    request_body = GeneratePayrollRequest,
    responses(
        (status = 200, description = "Per-employee generation outcome", body = GeneratePayrollResponse),
        (status = 400, description = "Invalid pay period"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn generate_payroll(
    _auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<GeneratePayrollRequest>,
) -> AppResult<Json<GeneratePayrollResponse>> {
    let response =
        generate_from_attendance(state.store.as_ref(), &state.config.settings.payroll, &body)
            .await?;
    Ok(Json(response))
}
