// src/store/postgres.rs

use super::{PayrollBuilder, Store};
use crate::{
    errors::{AppError, AppResult, unique_violation},
    models::{
        AttendanceQuery, AttendanceRecord, ComparisonQuery, ComparisonStatus, Employee,
        EmployeeQuery, PayrollQuery, PayrollRecord, QuotationComparison, VendorQuotation,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, types::Json};
use tracing::debug;
use uuid::Uuid;

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

// Quotation entries live in a JSONB column; the row type carries the wrapper.
#[derive(FromRow)]
struct ComparisonRow {
    id: Uuid,
    comparison_number: String,
    purchase_request_id: Uuid,
    material_name: String,
    quantity: Decimal,
    unit: String,
    quotations: Json<Vec<VendorQuotation>>,
    selected_quotation_id: Option<Uuid>,
    selected_vendor_id: Option<Uuid>,
    selection_reason: Option<String>,
    status: ComparisonStatus,
    compared_by: Option<String>,
    approved_by: Option<String>,
    approval_date: Option<DateTime<Utc>>,
    approval_remarks: Option<String>,
    requires_admin_approval: bool,
    value_threshold: Decimal,
    version: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ComparisonRow> for QuotationComparison {
    fn from(row: ComparisonRow) -> Self {
        QuotationComparison {
            id: row.id,
            comparison_number: row.comparison_number,
            purchase_request_id: row.purchase_request_id,
            material_name: row.material_name,
            quantity: row.quantity,
            unit: row.unit,
            quotations: row.quotations.0,
            selected_quotation_id: row.selected_quotation_id,
            selected_vendor_id: row.selected_vendor_id,
            selection_reason: row.selection_reason,
            status: row.status,
            compared_by: row.compared_by,
            approved_by: row.approved_by,
            approval_date: row.approval_date,
            approval_remarks: row.approval_remarks,
            requires_admin_approval: row.requires_admin_approval,
            value_threshold: row.value_threshold,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }

    // ─── Employees ────────────────────────────────────────

    async fn insert_employee(&self, employee: &Employee) -> AppResult<Employee> {
        sqlx::query_as::<_, Employee>(
            r#"INSERT INTO employees (
                id, employee_code, first_name, last_name, email, designation,
                branch_id, base_salary, is_active, created_at, updated_at
            ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11)
            RETURNING *"#,
        )
        .bind(employee.id)
        .bind(&employee.employee_code)
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(&employee.email)
        .bind(&employee.designation)
        .bind(&employee.branch_id)
        .bind(employee.base_salary)
        .bind(employee.is_active)
        .bind(employee.created_at)
        .bind(employee.updated_at)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            unique_violation(
                e,
                format!("Employee code '{}' already exists", employee.employee_code),
            )
        })
    }

    async fn get_employee(&self, id: Uuid) -> AppResult<Option<Employee>> {
        Ok(
            sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.db)
                .await?,
        )
    }

    async fn list_employees(&self, filter: &EmployeeQuery) -> AppResult<Vec<Employee>> {
        Ok(sqlx::query_as::<_, Employee>(
            r#"SELECT * FROM employees
               WHERE ($1::text IS NULL OR branch_id = $1)
                 AND ($2::boolean IS NULL OR is_active = $2)
               ORDER BY created_at DESC"#,
        )
        .bind(&filter.branch_id)
        .bind(filter.active)
        .fetch_all(&self.db)
        .await?)
    }

    async fn update_employee(&self, employee: &Employee) -> AppResult<Option<Employee>> {
        Ok(sqlx::query_as::<_, Employee>(
            r#"UPDATE employees
               SET first_name = $2, last_name = $3, email = $4, designation = $5,
                   branch_id = $6, base_salary = $7, is_active = $8, updated_at = $9
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(employee.id)
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(&employee.email)
        .bind(&employee.designation)
        .bind(&employee.branch_id)
        .bind(employee.base_salary)
        .bind(employee.is_active)
        .bind(employee.updated_at)
        .fetch_optional(&self.db)
        .await?)
    }

    async fn deactivate_employee(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE employees SET is_active = false, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // ─── Attendance ───────────────────────────────────────

    async fn insert_attendance(&self, record: &AttendanceRecord) -> AppResult<AttendanceRecord> {
        sqlx::query_as::<_, AttendanceRecord>(
            r#"INSERT INTO attendance_records (
                id, employee_id, date, in_time, out_time, status,
                hours, overtime, remarks, created_at, updated_at
            ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11)
            RETURNING *"#,
        )
        .bind(record.id)
        .bind(record.employee_id)
        .bind(record.date)
        .bind(&record.in_time)
        .bind(&record.out_time)
        .bind(record.status)
        .bind(record.hours)
        .bind(record.overtime)
        .bind(&record.remarks)
        .bind(record.created_at)
        .bind(record.updated_at)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            unique_violation(
                e,
                format!(
                    "Attendance for employee {} on {} already exists",
                    record.employee_id, record.date
                ),
            )
        })
    }

    async fn get_attendance(&self, id: Uuid) -> AppResult<Option<AttendanceRecord>> {
        Ok(sqlx::query_as::<_, AttendanceRecord>(
            "SELECT * FROM attendance_records WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?)
    }

    async fn list_attendance(&self, filter: &AttendanceQuery) -> AppResult<Vec<AttendanceRecord>> {
        Ok(sqlx::query_as::<_, AttendanceRecord>(
            r#"SELECT * FROM attendance_records
               WHERE ($1::uuid IS NULL OR employee_id = $1)
                 AND ($2::date IS NULL OR date >= $2)
                 AND ($3::date IS NULL OR date <= $3)
               ORDER BY date DESC"#,
        )
        .bind(filter.employee_id)
        .bind(filter.from)
        .bind(filter.to)
        .fetch_all(&self.db)
        .await?)
    }

    async fn update_attendance(
        &self,
        record: &AttendanceRecord,
    ) -> AppResult<Option<AttendanceRecord>> {
        Ok(sqlx::query_as::<_, AttendanceRecord>(
            r#"UPDATE attendance_records
               SET in_time = $2, out_time = $3, status = $4, hours = $5,
                   overtime = $6, remarks = $7, updated_at = $8
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(record.id)
        .bind(&record.in_time)
        .bind(&record.out_time)
        .bind(record.status)
        .bind(record.hours)
        .bind(record.overtime)
        .bind(&record.remarks)
        .bind(record.updated_at)
        .fetch_optional(&self.db)
        .await?)
    }

    async fn delete_attendance(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM attendance_records WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ─── Payroll ──────────────────────────────────────────

    async fn insert_payroll(&self, record: &PayrollRecord) -> AppResult<PayrollRecord> {
        sqlx::query_as::<_, PayrollRecord>(
            r#"INSERT INTO payroll_records (
                id, employee_id, month, year, base_salary, present_days,
                total_working_days, overtime_hours, overtime_rate_multiplier,
                bonus, deductions, net_salary, is_paid, paid_date, created_at, updated_at
            ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16)
            RETURNING *"#,
        )
        .bind(record.id)
        .bind(record.employee_id)
        .bind(record.month)
        .bind(record.year)
        .bind(record.base_salary)
        .bind(record.present_days)
        .bind(record.total_working_days)
        .bind(record.overtime_hours)
        .bind(record.overtime_rate_multiplier)
        .bind(record.bonus)
        .bind(record.deductions)
        .bind(record.net_salary)
        .bind(record.is_paid)
        .bind(record.paid_date)
        .bind(record.created_at)
        .bind(record.updated_at)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            unique_violation(
                e,
                format!(
                    "Payroll for employee {} already exists for {:02}/{}",
                    record.employee_id, record.month, record.year
                ),
            )
        })
    }

    async fn regenerate_payroll(
        &self,
        employee_id: Uuid,
        month: i32,
        year: i32,
        build: &PayrollBuilder<'_>,
    ) -> AppResult<PayrollRecord> {
        let mut tx = self.db.begin().await?;

        // Row lock held until commit; a concurrent PUT waits for it.
        let existing = sqlx::query_as::<_, PayrollRecord>(
            r#"SELECT * FROM payroll_records
               WHERE employee_id = $1 AND month = $2 AND year = $3
               FOR UPDATE"#,
        )
        .bind(employee_id)
        .bind(month)
        .bind(year)
        .fetch_optional(&mut *tx)
        .await?;

        let record = build(existing.as_ref())?;
        let message = format!(
            "Payroll for employee {} already exists for {:02}/{}",
            employee_id, month, year
        );
        let conflict = || AppError::Conflict(message.clone());

        let saved = if existing.is_some() {
            sqlx::query_as::<_, PayrollRecord>(
                r#"UPDATE payroll_records
                   SET base_salary = $2, present_days = $3, total_working_days = $4,
                       overtime_hours = $5, overtime_rate_multiplier = $6, bonus = $7,
                       deductions = $8, net_salary = $9, updated_at = $10
                   WHERE id = $1 AND is_paid = false
                   RETURNING *"#,
            )
            .bind(record.id)
            .bind(record.base_salary)
            .bind(record.present_days)
            .bind(record.total_working_days)
            .bind(record.overtime_hours)
            .bind(record.overtime_rate_multiplier)
            .bind(record.bonus)
            .bind(record.deductions)
            .bind(record.net_salary)
            .bind(record.updated_at)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(conflict)?
        } else {
            // Two first-time runs race on the unique key; the loser conflicts.
            sqlx::query_as::<_, PayrollRecord>(
                r#"INSERT INTO payroll_records (
                    id, employee_id, month, year, base_salary, present_days,
                    total_working_days, overtime_hours, overtime_rate_multiplier,
                    bonus, deductions, net_salary, is_paid, paid_date, created_at, updated_at
                ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,false,NULL,$13,$14)
                RETURNING *"#,
            )
            .bind(record.id)
            .bind(record.employee_id)
            .bind(record.month)
            .bind(record.year)
            .bind(record.base_salary)
            .bind(record.present_days)
            .bind(record.total_working_days)
            .bind(record.overtime_hours)
            .bind(record.overtime_rate_multiplier)
            .bind(record.bonus)
            .bind(record.deductions)
            .bind(record.net_salary)
            .bind(record.created_at)
            .bind(record.updated_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| unique_violation(e, message.clone()))?
        };

        tx.commit().await?;
        debug!(employee_id = %employee_id, month, year, "payroll regenerated");
        Ok(saved)
    }

    async fn get_payroll(&self, id: Uuid) -> AppResult<Option<PayrollRecord>> {
        Ok(
            sqlx::query_as::<_, PayrollRecord>("SELECT * FROM payroll_records WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.db)
                .await?,
        )
    }

    async fn list_payroll(&self, filter: &PayrollQuery) -> AppResult<Vec<PayrollRecord>> {
        Ok(sqlx::query_as::<_, PayrollRecord>(
            r#"SELECT * FROM payroll_records
               WHERE ($1::uuid IS NULL OR employee_id = $1)
                 AND ($2::int IS NULL OR month = $2)
                 AND ($3::int IS NULL OR year = $3)
                 AND ($4::boolean IS NULL OR is_paid = $4)
               ORDER BY year DESC, month DESC, created_at DESC"#,
        )
        .bind(filter.employee_id)
        .bind(filter.month)
        .bind(filter.year)
        .bind(filter.is_paid)
        .fetch_all(&self.db)
        .await?)
    }

    async fn update_payroll(&self, record: &PayrollRecord) -> AppResult<Option<PayrollRecord>> {
        Ok(sqlx::query_as::<_, PayrollRecord>(
            r#"UPDATE payroll_records
               SET base_salary = $2, present_days = $3, total_working_days = $4,
                   overtime_hours = $5, overtime_rate_multiplier = $6, bonus = $7,
                   deductions = $8, net_salary = $9, updated_at = $10
               WHERE id = $1 AND is_paid = false
               RETURNING *"#,
        )
        .bind(record.id)
        .bind(record.base_salary)
        .bind(record.present_days)
        .bind(record.total_working_days)
        .bind(record.overtime_hours)
        .bind(record.overtime_rate_multiplier)
        .bind(record.bonus)
        .bind(record.deductions)
        .bind(record.net_salary)
        .bind(record.updated_at)
        .fetch_optional(&self.db)
        .await?)
    }

    async fn mark_payroll_paid(
        &self,
        id: Uuid,
        paid_at: DateTime<Utc>,
    ) -> AppResult<Option<PayrollRecord>> {
        Ok(sqlx::query_as::<_, PayrollRecord>(
            r#"UPDATE payroll_records
               SET is_paid = true, paid_date = $2, updated_at = $2
               WHERE id = $1 AND is_paid = false
               RETURNING *"#,
        )
        .bind(id)
        .bind(paid_at)
        .fetch_optional(&self.db)
        .await?)
    }

    async fn delete_payroll(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM payroll_records WHERE id = $1 AND is_paid = false")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ─── Quotation comparisons ────────────────────────────

    async fn insert_comparison(
        &self,
        comparison: &QuotationComparison,
    ) -> AppResult<QuotationComparison> {
        let row = sqlx::query_as::<_, ComparisonRow>(
            r#"INSERT INTO quotation_comparisons (
                id, comparison_number, purchase_request_id, material_name, quantity, unit,
                quotations, selected_quotation_id, selected_vendor_id, selection_reason,
                status, compared_by, approved_by, approval_date, approval_remarks,
                requires_admin_approval, value_threshold, version, created_at, updated_at
            ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16,$17,$18,$19,$20)
            RETURNING *"#,
        )
        .bind(comparison.id)
        .bind(&comparison.comparison_number)
        .bind(comparison.purchase_request_id)
        .bind(&comparison.material_name)
        .bind(comparison.quantity)
        .bind(&comparison.unit)
        .bind(Json(&comparison.quotations))
        .bind(comparison.selected_quotation_id)
        .bind(comparison.selected_vendor_id)
        .bind(&comparison.selection_reason)
        .bind(comparison.status)
        .bind(&comparison.compared_by)
        .bind(&comparison.approved_by)
        .bind(comparison.approval_date)
        .bind(&comparison.approval_remarks)
        .bind(comparison.requires_admin_approval)
        .bind(comparison.value_threshold)
        .bind(comparison.version)
        .bind(comparison.created_at)
        .bind(comparison.updated_at)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            unique_violation(
                e,
                format!(
                    "Comparison number '{}' already exists",
                    comparison.comparison_number
                ),
            )
        })?;
        Ok(row.into())
    }

    async fn get_comparison(&self, id: Uuid) -> AppResult<Option<QuotationComparison>> {
        let row = sqlx::query_as::<_, ComparisonRow>(
            "SELECT * FROM quotation_comparisons WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn list_comparisons(
        &self,
        filter: &ComparisonQuery,
    ) -> AppResult<Vec<QuotationComparison>> {
        let rows = sqlx::query_as::<_, ComparisonRow>(
            r#"SELECT * FROM quotation_comparisons
               WHERE ($1::comparison_status IS NULL OR status = $1)
                 AND ($2::uuid IS NULL OR purchase_request_id = $2)
               ORDER BY created_at DESC"#,
        )
        .bind(filter.status)
        .bind(filter.purchase_request_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn save_comparison(
        &self,
        comparison: &QuotationComparison,
        expected_version: i32,
    ) -> AppResult<QuotationComparison> {
        let row = sqlx::query_as::<_, ComparisonRow>(
            r#"UPDATE quotation_comparisons
               SET quotations = $3, selected_quotation_id = $4, selected_vendor_id = $5,
                   selection_reason = $6, status = $7, approved_by = $8, approval_date = $9,
                   approval_remarks = $10, requires_admin_approval = $11,
                   version = version + 1, updated_at = $12
               WHERE id = $1 AND version = $2
               RETURNING *"#,
        )
        .bind(comparison.id)
        .bind(expected_version)
        .bind(Json(&comparison.quotations))
        .bind(comparison.selected_quotation_id)
        .bind(comparison.selected_vendor_id)
        .bind(&comparison.selection_reason)
        .bind(comparison.status)
        .bind(&comparison.approved_by)
        .bind(comparison.approval_date)
        .bind(&comparison.approval_remarks)
        .bind(comparison.requires_admin_approval)
        .bind(comparison.updated_at)
        .fetch_optional(&self.db)
        .await?;

        match row {
            Some(row) => Ok(row.into()),
            None => {
                let exists = sqlx::query("SELECT 1 FROM quotation_comparisons WHERE id = $1")
                    .bind(comparison.id)
                    .fetch_optional(&self.db)
                    .await?
                    .is_some();
                if exists {
                    Err(AppError::Conflict(format!(
                        "Comparison {} was modified concurrently",
                        comparison.id
                    )))
                } else {
                    Err(AppError::NotFound(format!(
                        "Comparison {} not found",
                        comparison.id
                    )))
                }
            }
        }
    }
}
