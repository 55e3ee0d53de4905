// src/store/memory.rs

use super::{PayrollBuilder, Store};
use crate::{
    errors::{AppError, AppResult},
    models::{
        AttendanceQuery, AttendanceRecord, ComparisonQuery, Employee, EmployeeQuery,
        PayrollQuery, PayrollRecord, QuotationComparison,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    employees: HashMap<Uuid, Employee>,
    attendance: HashMap<Uuid, AttendanceRecord>,
    payroll: HashMap<Uuid, PayrollRecord>,
    comparisons: HashMap<Uuid, QuotationComparison>,
}

/// Process-local store used when no database is configured and in tests.
/// A single mutex serializes every write, which gives the same
/// uniqueness and version guarantees the Postgres schema provides.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| AppError::Internal("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        self.lock().map(|_| ())
    }

    // ─── Employees ────────────────────────────────────────

    async fn insert_employee(&self, employee: &Employee) -> AppResult<Employee> {
        let mut tables = self.lock()?;
        if tables
            .employees
            .values()
            .any(|e| e.employee_code == employee.employee_code)
        {
            return Err(AppError::Conflict(format!(
                "Employee code '{}' already exists",
                employee.employee_code
            )));
        }
        tables.employees.insert(employee.id, employee.clone());
        Ok(employee.clone())
    }

    async fn get_employee(&self, id: Uuid) -> AppResult<Option<Employee>> {
        Ok(self.lock()?.employees.get(&id).cloned())
    }

    async fn list_employees(&self, filter: &EmployeeQuery) -> AppResult<Vec<Employee>> {
        let tables = self.lock()?;
        let mut employees: Vec<Employee> = tables
            .employees
            .values()
            .filter(|e| {
                filter
                    .branch_id
                    .as_ref()
                    .is_none_or(|b| e.branch_id.as_ref() == Some(b))
            })
            .filter(|e| filter.active.is_none_or(|a| e.is_active == a))
            .cloned()
            .collect();
        employees.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(employees)
    }

    async fn update_employee(&self, employee: &Employee) -> AppResult<Option<Employee>> {
        let mut tables = self.lock()?;
        match tables.employees.get_mut(&employee.id) {
            Some(existing) => {
                *existing = employee.clone();
                Ok(Some(employee.clone()))
            }
            None => Ok(None),
        }
    }

    async fn deactivate_employee(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.lock()?;
        match tables.employees.get_mut(&id) {
            Some(employee) => {
                employee.is_active = false;
                employee.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // ─── Attendance ───────────────────────────────────────

    async fn insert_attendance(&self, record: &AttendanceRecord) -> AppResult<AttendanceRecord> {
        let mut tables = self.lock()?;
        if tables
            .attendance
            .values()
            .any(|r| r.employee_id == record.employee_id && r.date == record.date)
        {
            return Err(AppError::Conflict(format!(
                "Attendance for employee {} on {} already exists",
                record.employee_id, record.date
            )));
        }
        tables.attendance.insert(record.id, record.clone());
        Ok(record.clone())
    }

    async fn get_attendance(&self, id: Uuid) -> AppResult<Option<AttendanceRecord>> {
        Ok(self.lock()?.attendance.get(&id).cloned())
    }

    async fn list_attendance(&self, filter: &AttendanceQuery) -> AppResult<Vec<AttendanceRecord>> {
        let tables = self.lock()?;
        let mut records: Vec<AttendanceRecord> = tables
            .attendance
            .values()
            .filter(|r| filter.employee_id.is_none_or(|id| r.employee_id == id))
            .filter(|r| filter.from.is_none_or(|from| r.date >= from))
            .filter(|r| filter.to.is_none_or(|to| r.date <= to))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(records)
    }

    async fn update_attendance(
        &self,
        record: &AttendanceRecord,
    ) -> AppResult<Option<AttendanceRecord>> {
        let mut tables = self.lock()?;
        match tables.attendance.get_mut(&record.id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(Some(record.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_attendance(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.lock()?.attendance.remove(&id).is_some())
    }

    // ─── Payroll ──────────────────────────────────────────

    async fn insert_payroll(&self, record: &PayrollRecord) -> AppResult<PayrollRecord> {
        let mut tables = self.lock()?;
        if same_period(&tables, record.employee_id, record.month, record.year).is_some() {
            return Err(AppError::Conflict(format!(
                "Payroll for employee {} already exists for {:02}/{}",
                record.employee_id, record.month, record.year
            )));
        }
        tables.payroll.insert(record.id, record.clone());
        Ok(record.clone())
    }

    async fn regenerate_payroll(
        &self,
        employee_id: Uuid,
        month: i32,
        year: i32,
        build: &PayrollBuilder<'_>,
    ) -> AppResult<PayrollRecord> {
        let mut tables = self.lock()?;
        let existing = same_period(&tables, employee_id, month, year);
        let record = build(existing)?;
        tables.payroll.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get_payroll(&self, id: Uuid) -> AppResult<Option<PayrollRecord>> {
        Ok(self.lock()?.payroll.get(&id).cloned())
    }

    async fn list_payroll(&self, filter: &PayrollQuery) -> AppResult<Vec<PayrollRecord>> {
        let tables = self.lock()?;
        let mut records: Vec<PayrollRecord> = tables
            .payroll
            .values()
            .filter(|p| filter.employee_id.is_none_or(|id| p.employee_id == id))
            .filter(|p| filter.month.is_none_or(|m| p.month == m))
            .filter(|p| filter.year.is_none_or(|y| p.year == y))
            .filter(|p| filter.is_paid.is_none_or(|paid| p.is_paid == paid))
            .cloned()
            .collect();
        records.sort_by(|a, b| (b.year, b.month).cmp(&(a.year, a.month)));
        Ok(records)
    }

    async fn update_payroll(&self, record: &PayrollRecord) -> AppResult<Option<PayrollRecord>> {
        let mut tables = self.lock()?;
        match tables.payroll.get_mut(&record.id) {
            Some(existing) if !existing.is_paid => {
                *existing = PayrollRecord {
                    is_paid: false,
                    paid_date: None,
                    ..record.clone()
                };
                Ok(Some(existing.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn mark_payroll_paid(
        &self,
        id: Uuid,
        paid_at: DateTime<Utc>,
    ) -> AppResult<Option<PayrollRecord>> {
        let mut tables = self.lock()?;
        match tables.payroll.get_mut(&id) {
            Some(record) if !record.is_paid => {
                record.is_paid = true;
                record.paid_date = Some(paid_at);
                record.updated_at = paid_at;
                Ok(Some(record.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_payroll(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.lock()?;
        let removable = tables.payroll.get(&id).is_some_and(|p| !p.is_paid);
        if removable {
            tables.payroll.remove(&id);
        }
        Ok(removable)
    }

    // ─── Quotation comparisons ────────────────────────────

    async fn insert_comparison(
        &self,
        comparison: &QuotationComparison,
    ) -> AppResult<QuotationComparison> {
        let mut tables = self.lock()?;
        if tables
            .comparisons
            .values()
            .any(|c| c.comparison_number == comparison.comparison_number)
        {
            return Err(AppError::Conflict(format!(
                "Comparison number '{}' already exists",
                comparison.comparison_number
            )));
        }
        tables.comparisons.insert(comparison.id, comparison.clone());
        Ok(comparison.clone())
    }

    async fn get_comparison(&self, id: Uuid) -> AppResult<Option<QuotationComparison>> {
        Ok(self.lock()?.comparisons.get(&id).cloned())
    }

    async fn list_comparisons(
        &self,
        filter: &ComparisonQuery,
    ) -> AppResult<Vec<QuotationComparison>> {
        let tables = self.lock()?;
        let mut comparisons: Vec<QuotationComparison> = tables
            .comparisons
            .values()
            .filter(|c| filter.status.is_none_or(|s| c.status == s))
            .filter(|c| {
                filter
                    .purchase_request_id
                    .is_none_or(|id| c.purchase_request_id == id)
            })
            .cloned()
            .collect();
        comparisons.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(comparisons)
    }

    async fn save_comparison(
        &self,
        comparison: &QuotationComparison,
        expected_version: i32,
    ) -> AppResult<QuotationComparison> {
        let mut tables = self.lock()?;
        let stored = tables
            .comparisons
            .get_mut(&comparison.id)
            .ok_or_else(|| AppError::NotFound(format!("Comparison {} not found", comparison.id)))?;

        if stored.version != expected_version {
            return Err(AppError::Conflict(format!(
                "Comparison {} was modified concurrently",
                comparison.id
            )));
        }

        *stored = QuotationComparison {
            version: expected_version + 1,
            ..comparison.clone()
        };
        Ok(stored.clone())
    }
}

fn same_period(
    tables: &Tables,
    employee_id: Uuid,
    month: i32,
    year: i32,
) -> Option<&PayrollRecord> {
    tables
        .payroll
        .values()
        .find(|p| p.employee_id == employee_id && p.month == month && p.year == year)
}
