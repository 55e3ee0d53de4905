use crate::{
    auth::AuthUser,
    errors::{AppError, AppResult},
    models::{CreateEmployeeRequest, Employee, EmployeeQuery, UpdateEmployeeRequest},
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

fn require_non_empty(value: &str, field: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// Register a new employee
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body = CreateEmployeeRequest,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 400, description = "Invalid employee data"),
        (status = 409, description = "Employee code already exists"),
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn create_employee(
    _auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<CreateEmployeeRequest>,
) -> AppResult<(StatusCode, Json<Employee>)> {
    require_non_empty(&body.employee_code, "employeeCode")?;
    require_non_empty(&body.first_name, "firstName")?;
    require_non_empty(&body.last_name, "lastName")?;
    if body.base_salary < Decimal::ZERO {
        return Err(AppError::Validation(
            "baseSalary cannot be negative".to_string(),
        ));
    }

    let now = Utc::now();
    let employee = Employee {
        id: Uuid::new_v4(),
        employee_code: body.employee_code.trim().to_string(),
        first_name: body.first_name.trim().to_string(),
        last_name: body.last_name.trim().to_string(),
        email: body.email,
        designation: body.designation,
        branch_id: body.branch_id,
        base_salary: body.base_salary,
        is_active: true,
        created_at: now,
        updated_at: now,
    };

    let employee = state.store.insert_employee(&employee).await?;
    info!(employee_id = %employee.id, code = %employee.employee_code, "Employee created");

    Ok((StatusCode::CREATED, Json(employee)))
}

/// List employees, optionally by branch and active flag
#[utoipa::path(
    get,
    path = "/api/v1/employees",
    params(EmployeeQuery),
    responses((status = 200, description = "List of employees", body = Vec<Employee>)),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn list_employees(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<EmployeeQuery>,
) -> AppResult<Json<Vec<Employee>>> {
    Ok(Json(state.store.list_employees(&query).await?))
}

/// Get a single employee
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}",
    params(("employee_id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee detail", body = Employee),
        (status = 404, description = "Employee not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn get_employee(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
) -> AppResult<Json<Employee>> {
    let employee = state
        .store
        .get_employee(employee_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", employee_id)))?;

    Ok(Json(employee))
}

/// Update an employee's details or salary
#[utoipa::path(
    put,
    path = "/api/v1/employees/{employee_id}",
    request_body = UpdateEmployeeRequest,
    params(("employee_id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee updated", body = Employee),
        (status = 400, description = "Invalid employee data"),
        (status = 404, description = "Employee not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn update_employee(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
    Json(body): Json<UpdateEmployeeRequest>,
) -> AppResult<Json<Employee>> {
    let mut employee = state
        .store
        .get_employee(employee_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", employee_id)))?;

    if let Some(first_name) = body.first_name {
        require_non_empty(&first_name, "firstName")?;
        employee.first_name = first_name.trim().to_string();
    }
    if let Some(last_name) = body.last_name {
        require_non_empty(&last_name, "lastName")?;
        employee.last_name = last_name.trim().to_string();
    }
    if let Some(base_salary) = body.base_salary {
        if base_salary < Decimal::ZERO {
            return Err(AppError::Validation(
                "baseSalary cannot be negative".to_string(),
            ));
        }
        employee.base_salary = base_salary;
    }
    if body.email.is_some() {
        employee.email = body.email;
    }
    if body.designation.is_some() {
        employee.designation = body.designation;
    }
    if body.branch_id.is_some() {
        employee.branch_id = body.branch_id;
    }
    if let Some(is_active) = body.is_active {
        employee.is_active = is_active;
    }
    employee.updated_at = Utc::now();

    let employee = state
        .store
        .update_employee(&employee)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", employee_id)))?;

    Ok(Json(employee))
}

/// Deactivate (soft-delete) an employee
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{employee_id}",
    params(("employee_id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee deactivated"),
        (status = 404, description = "Employee not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn deactivate_employee(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    if !state.store.deactivate_employee(employee_id).await? {
        return Err(AppError::NotFound(format!("Employee {} not found", employee_id)));
    }

    Ok(Json(serde_json::json!({ "message": "Employee deactivated successfully" })))
}
