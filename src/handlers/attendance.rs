// src/handlers/attendance.rs

use crate::{
    auth::AuthUser,
    errors::{AppError, AppResult},
    models::{
        AttendanceQuery, AttendanceRecord, CreateAttendanceRequest, UpdateAttendanceRequest,
    },
    services::attendance::AttendanceService,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

/// Record one employee's attendance for a day; hours and overtime are derived
#[utoipa::path(
    post,
    path = "/api/v1/attendance",
    request_body = CreateAttendanceRequest,
    responses(
        (status = 201, description = "Attendance recorded", body = AttendanceRecord),
        (status = 400, description = "Malformed inTime/outTime"),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Attendance already recorded for that day"),
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn create_attendance(
    _auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<CreateAttendanceRequest>,
) -> AppResult<(StatusCode, Json<AttendanceRecord>)> {
    state
        .store
        .get_employee(body.employee_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", body.employee_id)))?;

    let worked = AttendanceService::derive_hours(
        body.status,
        body.in_time.as_deref(),
        body.out_time.as_deref(),
        state.config.settings.payroll.standard_shift_hours,
    )?;

    let now = Utc::now();
    let record = AttendanceRecord {
        id: Uuid::new_v4(),
        employee_id: body.employee_id,
        date: body.date,
        in_time: body.in_time,
        out_time: body.out_time,
        status: body.status,
        hours: worked.hours,
        overtime: worked.overtime,
        remarks: body.remarks,
        created_at: now,
        updated_at: now,
    };

    let record = state.store.insert_attendance(&record).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// List attendance records by employee and date range
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    params(AttendanceQuery),
    responses((status = 200, description = "Attendance records", body = Vec<AttendanceRecord>)),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn list_attendance(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<AttendanceQuery>,
) -> AppResult<Json<Vec<AttendanceRecord>>> {
    Ok(Json(state.store.list_attendance(&query).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/attendance/{attendance_id}",
    params(("attendance_id" = Uuid, Path, description = "Attendance record ID")),
    responses(
        (status = 200, description = "Attendance record", body = AttendanceRecord),
        (status = 404, description = "Attendance record not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn get_attendance(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(attendance_id): Path<Uuid>,
) -> AppResult<Json<AttendanceRecord>> {
    let record = state
        .store
        .get_attendance(attendance_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Attendance {} not found", attendance_id)))?;

    Ok(Json(record))
}

/// Edit times or status; hours and overtime are re-derived
#[utoipa::path(
    put,
    path = "/api/v1/attendance/{attendance_id}",
    request_body = UpdateAttendanceRequest,
    params(("attendance_id" = Uuid, Path, description = "Attendance record ID")),
    responses(
        (status = 200, description = "Attendance updated", body = AttendanceRecord),
        (status = 400, description = "Malformed inTime/outTime"),
        (status = 404, description = "Attendance record not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn update_attendance(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(attendance_id): Path<Uuid>,
    Json(body): Json<UpdateAttendanceRequest>,
) -> AppResult<Json<AttendanceRecord>> {
    let mut record = state
        .store
        .get_attendance(attendance_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Attendance {} not found", attendance_id)))?;

    if body.in_time.is_some() {
        record.in_time = body.in_time;
    }
    if body.out_time.is_some() {
        record.out_time = body.out_time;
    }
    if let Some(status) = body.status {
        record.status = status;
    }
    if body.remarks.is_some() {
        record.remarks = body.remarks;
    }

    let worked = AttendanceService::derive_hours(
        record.status,
        record.in_time.as_deref(),
        record.out_time.as_deref(),
        state.config.settings.payroll.standard_shift_hours,
    )?;
    record.hours = worked.hours;
    record.overtime = worked.overtime;
    record.updated_at = Utc::now();

    let record = state
        .store
        .update_attendance(&record)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Attendance {} not found", attendance_id)))?;

    Ok(Json(record))
}

#[utoipa::path(
    delete,
    path = "/api/v1/attendance/{attendance_id}",
    params(("attendance_id" = Uuid, Path, description = "Attendance record ID")),
    responses(
        (status = 200, description = "Attendance deleted"),
        (status = 404, description = "Attendance record not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn delete_attendance(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(attendance_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    if !state.store.delete_attendance(attendance_id).await? {
        return Err(AppError::NotFound(format!("Attendance {} not found", attendance_id)));
    }

    Ok(Json(serde_json::json!({ "message": "Attendance deleted successfully" })))
}
