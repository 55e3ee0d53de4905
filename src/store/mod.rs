// src/store/mod.rs

use crate::{
    errors::AppResult,
    models::{
        AttendanceQuery, AttendanceRecord, ComparisonQuery, Employee, EmployeeQuery,
        PayrollQuery, PayrollRecord, QuotationComparison,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub type PayrollBuilder<'a> =
    dyn Fn(Option<&PayrollRecord>) -> AppResult<PayrollRecord> + Send + Sync + 'a;

/// Persistence seam for every resource the API serves.
///
/// Implementations enforce the uniqueness rules themselves (one attendance
/// record per employee and day, one payroll record per employee and period,
/// unique comparison numbers) and report violations as `AppError::Conflict`.
/// Writes that must not touch paid payroll records return `None` when the
/// guard rejects them.
#[async_trait]
pub trait Store: Send + Sync {
    async fn ping(&self) -> AppResult<()>;

    // ─── Employees ────────────────────────────────────────
    async fn insert_employee(&self, employee: &Employee) -> AppResult<Employee>;
    async fn get_employee(&self, id: Uuid) -> AppResult<Option<Employee>>;
    async fn list_employees(&self, filter: &EmployeeQuery) -> AppResult<Vec<Employee>>;
    async fn update_employee(&self, employee: &Employee) -> AppResult<Option<Employee>>;
    async fn deactivate_employee(&self, id: Uuid) -> AppResult<bool>;

    // ─── Attendance ───────────────────────────────────────
    async fn insert_attendance(&self, record: &AttendanceRecord) -> AppResult<AttendanceRecord>;
    async fn get_attendance(&self, id: Uuid) -> AppResult<Option<AttendanceRecord>>;
    async fn list_attendance(&self, filter: &AttendanceQuery) -> AppResult<Vec<AttendanceRecord>>;
    async fn update_attendance(
        &self,
        record: &AttendanceRecord,
    ) -> AppResult<Option<AttendanceRecord>>;
    async fn delete_attendance(&self, id: Uuid) -> AppResult<bool>;

    // ─── Payroll ──────────────────────────────────────────
    async fn insert_payroll(&self, record: &PayrollRecord) -> AppResult<PayrollRecord>;
    /// Builds and saves the record for one employee and period. `build` sees
    /// the stored record, if any, while it is locked against other writers,
    /// so manual edits committed meanwhile are never lost.
    async fn regenerate_payroll(
        &self,
        employee_id: Uuid,
        month: i32,
        year: i32,
        build: &PayrollBuilder<'_>,
    ) -> AppResult<PayrollRecord>;
    async fn get_payroll(&self, id: Uuid) -> AppResult<Option<PayrollRecord>>;
    async fn list_payroll(&self, filter: &PayrollQuery) -> AppResult<Vec<PayrollRecord>>;
    /// `None` when the record is missing or already paid.
    async fn update_payroll(&self, record: &PayrollRecord) -> AppResult<Option<PayrollRecord>>;
    /// `None` when the record is missing or already paid.
    async fn mark_payroll_paid(
        &self,
        id: Uuid,
        paid_at: DateTime<Utc>,
    ) -> AppResult<Option<PayrollRecord>>;
    /// Only unpaid records are removed.
    async fn delete_payroll(&self, id: Uuid) -> AppResult<bool>;

    // ─── Quotation comparisons ────────────────────────────
    async fn insert_comparison(
        &self,
        comparison: &QuotationComparison,
    ) -> AppResult<QuotationComparison>;
    async fn get_comparison(&self, id: Uuid) -> AppResult<Option<QuotationComparison>>;
    async fn list_comparisons(&self, filter: &ComparisonQuery)
    -> AppResult<Vec<QuotationComparison>>;
    /// Persists `comparison` only if the stored version still equals
    /// `expected_version`; the saved copy carries `expected_version + 1`.
    async fn save_comparison(
        &self,
        comparison: &QuotationComparison,
        expected_version: i32,
    ) -> AppResult<QuotationComparison>;
}
