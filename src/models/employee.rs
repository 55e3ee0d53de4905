use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub designation: Option<String>,
    pub branch_id: Option<String>,
    pub base_salary: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub designation: Option<String>,
    pub branch_id: Option<String>,
    pub base_salary: Decimal,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub designation: Option<String>,
    pub branch_id: Option<String>,
    pub base_salary: Option<Decimal>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EmployeeQuery {
    pub branch_id: Option<String>,
    pub active: Option<bool>,
}
