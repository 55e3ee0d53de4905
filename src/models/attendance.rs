use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, ToSchema, PartialEq, Eq)]
#[sqlx(type_name = "attendance_status", rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    #[serde(rename = "Half Day")]
    HalfDay,
    Leave,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub date: NaiveDate,
    /// "HH:MM"
    pub in_time: Option<String>,
    /// "HH:MM"
    pub out_time: Option<String>,
    pub status: AttendanceStatus,
    pub hours: Decimal,
    pub overtime: Decimal,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAttendanceRequest {
    pub employee_id: Uuid,
    pub date: NaiveDate,
    pub in_time: Option<String>,
    pub out_time: Option<String>,
    pub status: AttendanceStatus,
    pub remarks: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttendanceRequest {
    pub in_time: Option<String>,
    pub out_time: Option<String>,
    pub status: Option<AttendanceStatus>,
    pub remarks: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AttendanceQuery {
    pub employee_id: Option<Uuid>,
    /// Inclusive lower bound
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound
    pub to: Option<NaiveDate>,
}
