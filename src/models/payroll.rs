use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayrollRecord {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub month: i32,
    pub year: i32,
    pub base_salary: Decimal,
    pub present_days: Decimal,
    pub total_working_days: i32,
    pub overtime_hours: Decimal,
    pub overtime_rate_multiplier: Decimal,
    pub bonus: Decimal,
    pub deductions: Decimal,
    /// Derived from the other inputs on every write.
    pub net_salary: Decimal,
    pub is_paid: bool,
    pub paid_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PayrollRecord {
    pub fn inputs(&self) -> PayrollInputs {
        PayrollInputs {
            base_salary: self.base_salary,
            total_working_days: self.total_working_days,
            present_days: self.present_days,
            overtime_hours: self.overtime_hours,
            overtime_rate_multiplier: self.overtime_rate_multiplier,
            bonus: self.bonus,
            deductions: self.deductions,
        }
    }
}

/// Everything the net-salary formula reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayrollInputs {
    pub base_salary: Decimal,
    pub total_working_days: i32,
    pub present_days: Decimal,
    pub overtime_hours: Decimal,
    pub overtime_rate_multiplier: Decimal,
    pub bonus: Decimal,
    pub deductions: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayrollRequest {
    pub employee_id: Uuid,
    pub month: i32,
    pub year: i32,
    /// Defaults to the employee's base salary
    pub base_salary: Option<Decimal>,
    pub present_days: Decimal,
    pub total_working_days: Option<i32>,
    pub overtime_hours: Option<Decimal>,
    pub overtime_rate_multiplier: Option<Decimal>,
    pub bonus: Option<Decimal>,
    pub deductions: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePayrollRequest {
    pub base_salary: Option<Decimal>,
    pub present_days: Option<Decimal>,
    pub total_working_days: Option<i32>,
    pub overtime_hours: Option<Decimal>,
    pub overtime_rate_multiplier: Option<Decimal>,
    pub bonus: Option<Decimal>,
    pub deductions: Option<Decimal>,
}

#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PayrollQuery {
    pub employee_id: Option<Uuid>,
    pub month: Option<i32>,
    pub year: Option<i32>,
    pub is_paid: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePayrollRequest {
    pub month: i32,
    pub year: i32,
    pub branch_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerationFailure {
    pub employee_id: Uuid,
    pub error: String,
}

#[derive(Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePayrollResponse {
    /// Records created or refreshed by this run
    pub created: Vec<PayrollRecord>,
    pub failed: Vec<GenerationFailure>,
}
