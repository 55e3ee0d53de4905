// src/services/payroll.rs

use crate::{
    config::PayrollSettings,
    errors::{AppError, AppResult},
    models::{
        AttendanceQuery, Employee, EmployeeQuery, GeneratePayrollRequest,
        GeneratePayrollResponse, GenerationFailure, PayrollInputs, PayrollRecord,
    },
    services::attendance::AttendanceService,
    store::Store,
};
use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use tracing::{info, warn};
use uuid::Uuid;

// Limits of the NUMERIC(14,2) / (8,2) / (6,2) payroll columns.
const MAX_AMOUNT: Decimal = dec!(999999999999.99);
const MAX_OVERTIME_HOURS: Decimal = dec!(999999.99);
const MAX_SMALL: Decimal = dec!(9999.99);
const MAX_DECIMAL_PLACES: u32 = 2;

pub struct PayrollService;

impl PayrollService {
    /// Net salary for one pay period, rounded to a whole amount.
    ///
    /// dailyRate × presentDays + hourlyRate × multiplier × overtimeHours
    /// + bonus − deductions, where the hourly rate assumes 8-hour days.
    pub fn calculate(inputs: &PayrollInputs) -> AppResult<Decimal> {
        Self::validate(inputs)?;

        let too_large =
            || AppError::Validation("payroll amounts are too large to compute".to_string());

        let working_days = Decimal::from(inputs.total_working_days);
        let earned_salary = inputs
            .base_salary
            .checked_div(working_days)
            .and_then(|daily_rate| daily_rate.checked_mul(inputs.present_days))
            .ok_or_else(too_large)?;
        let overtime_pay = working_days
            .checked_mul(dec!(8))
            .and_then(|shift_hours| inputs.base_salary.checked_div(shift_hours))
            .and_then(|hourly_rate| hourly_rate.checked_mul(inputs.overtime_rate_multiplier))
            .and_then(|rate| rate.checked_mul(inputs.overtime_hours))
            .ok_or_else(too_large)?;

        let net = earned_salary
            .checked_add(overtime_pay)
            .and_then(|gross| gross.checked_add(inputs.bonus))
            .and_then(|gross| gross.checked_sub(inputs.deductions))
            .ok_or_else(too_large)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

        if net.abs() > MAX_AMOUNT {
            return Err(AppError::Validation(format!(
                "netSalary {net} exceeds the maximum of {MAX_AMOUNT}"
            )));
        }
        Ok(net)
    }

    pub fn validate(inputs: &PayrollInputs) -> AppResult<()> {
        if inputs.base_salary <= Decimal::ZERO {
            return Err(AppError::Validation(
                "baseSalary must be greater than 0".to_string(),
            ));
        }
        if inputs.total_working_days <= 0 {
            return Err(AppError::Validation(
                "totalWorkingDays must be greater than 0".to_string(),
            ));
        }
        let bounded = [
            ("baseSalary", inputs.base_salary, MAX_AMOUNT),
            ("presentDays", inputs.present_days, MAX_SMALL),
            ("overtimeHours", inputs.overtime_hours, MAX_OVERTIME_HOURS),
            ("overtimeRateMultiplier", inputs.overtime_rate_multiplier, MAX_SMALL),
            ("bonus", inputs.bonus, MAX_AMOUNT),
            ("deductions", inputs.deductions, MAX_AMOUNT),
        ];
        for (field, value, max) in bounded {
            if value < Decimal::ZERO {
                return Err(AppError::Validation(format!("{field} cannot be negative")));
            }
            if value > max {
                return Err(AppError::Validation(format!("{field} cannot exceed {max}")));
            }
            if value.normalize().scale() > MAX_DECIMAL_PLACES {
                return Err(AppError::Validation(format!(
                    "{field} allows at most {MAX_DECIMAL_PLACES} decimal places"
                )));
            }
        }
        Ok(())
    }

    /// Returns the first and last day of a pay period.
    pub fn period_bounds(month: i32, year: i32) -> AppResult<(NaiveDate, NaiveDate)> {
        let invalid = || AppError::Validation(format!("invalid pay period {month}/{year}"));

        let month = u32::try_from(month)
            .ok()
            .filter(|m| (1..=12).contains(m))
            .ok_or_else(invalid)?;
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(invalid)?;
        let last = next.pred_opt().ok_or_else(invalid)?;

        debug_assert_eq!(last.month(), month);
        Ok((first, last))
    }

    /// Builds and prices a record; `existing` supplies the manual inputs
    /// (bonus, deductions, multiplier, working days) a regeneration keeps.
    fn build_generated(
        employee: &Employee,
        month: i32,
        year: i32,
        present_days: Decimal,
        overtime_hours: Decimal,
        existing: Option<&PayrollRecord>,
        settings: &PayrollSettings,
    ) -> AppResult<PayrollRecord> {
        let now = Utc::now();
        let inputs = PayrollInputs {
            base_salary: employee.base_salary,
            total_working_days: existing
                .map_or(settings.total_working_days, |p| p.total_working_days),
            present_days,
            overtime_hours,
            overtime_rate_multiplier: existing
                .map_or(settings.overtime_rate_multiplier, |p| p.overtime_rate_multiplier),
            bonus: existing.map_or(Decimal::ZERO, |p| p.bonus),
            deductions: existing.map_or(Decimal::ZERO, |p| p.deductions),
        };
        let net_salary = Self::calculate(&inputs)?;

        Ok(PayrollRecord {
            id: existing.map_or_else(Uuid::new_v4, |p| p.id),
            employee_id: employee.id,
            month,
            year,
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
            created_at: existing.map_or(now, |p| p.created_at),
            updated_at: now,
        })
    }
}

/// Aggregate one month of attendance into a payroll record per active
/// employee. Each employee succeeds or fails on its own; only failures to
/// read the employee list abort the run.
pub async fn generate_from_attendance(
    store: &dyn Store,
    settings: &PayrollSettings,
    request: &GeneratePayrollRequest,
) -> AppResult<GeneratePayrollResponse> {
    let (from, to) = PayrollService::period_bounds(request.month, request.year)?;

    let employees = store
        .list_employees(&EmployeeQuery {
            branch_id: request.branch_id.clone(),
            active: Some(true),
        })
        .await?;

    info!(
        month = request.month,
        year = request.year,
        employees = employees.len(),
        "Generating payroll from attendance"
    );

    let mut response = GeneratePayrollResponse::default();

    for employee in &employees {
        match generate_for_employee(store, settings, employee, request, from, to).await {
            Ok(record) => response.created.push(record),
            Err(e) => {
                warn!(employee_id = %employee.id, error = %e, "Payroll generation failed");
                response.failed.push(GenerationFailure {
                    employee_id: employee.id,
                    error: e.to_string(),
                });
            }
        }
    }

    info!(
        created = response.created.len(),
        failed = response.failed.len(),
        "Payroll generation complete"
    );

    Ok(response)
}

async fn generate_for_employee(
    store: &dyn Store,
    settings: &PayrollSettings,
    employee: &Employee,
    request: &GeneratePayrollRequest,
    from: NaiveDate,
    to: NaiveDate,
) -> AppResult<PayrollRecord> {
    let attendance = store
        .list_attendance(&AttendanceQuery {
            employee_id: Some(employee.id),
            from: Some(from),
            to: Some(to),
        })
        .await?;

    let present_days: Decimal = attendance
        .iter()
        .map(|r| AttendanceService::day_weight(r.status))
        .sum();
    let overtime_hours: Decimal = attendance.iter().map(|r| r.overtime).sum();

    let already_paid = || {
        AppError::Conflict(format!(
            "Payroll for {:02}/{} is already paid",
            request.month, request.year
        ))
    };
    let build = |existing: Option<&PayrollRecord>| {
        if existing.is_some_and(|p| p.is_paid) {
            return Err(already_paid());
        }
        PayrollService::build_generated(
            employee,
            request.month,
            request.year,
            present_days,
            overtime_hours,
            existing,
            settings,
        )
    };

    store
        .regenerate_payroll(employee.id, request.month, request.year, &build)
        .await
}
