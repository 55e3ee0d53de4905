// src/services/attendance.rs

use crate::{
    errors::{AppError, AppResult},
    models::AttendanceStatus,
};
use chrono::{NaiveTime, Timelike};
use rust_decimal::{Decimal, RoundingStrategy};

pub struct AttendanceService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkedHours {
    pub hours: Decimal,
    pub overtime: Decimal,
}

impl WorkedHours {
    pub const ZERO: WorkedHours = WorkedHours {
        hours: Decimal::ZERO,
        overtime: Decimal::ZERO,
    };
}

impl AttendanceService {
    /// Derive worked hours and overtime for one day.
    ///
    /// Absent days are zero without looking at the times. A day with either
    /// time missing is also zero (open check-in). Malformed times and an out
    /// time before the in time are rejected so nothing is persisted.
    pub fn derive_hours(
        status: AttendanceStatus,
        in_time: Option<&str>,
        out_time: Option<&str>,
        shift_hours: Decimal,
    ) -> AppResult<WorkedHours> {
        if status == AttendanceStatus::Absent {
            return Ok(WorkedHours::ZERO);
        }

        let (Some(in_time), Some(out_time)) = (in_time, out_time) else {
            return Ok(WorkedHours::ZERO);
        };

        let in_minutes = minutes_of_day(in_time, "inTime")?;
        let out_minutes = minutes_of_day(out_time, "outTime")?;

        if out_minutes < in_minutes {
            return Err(AppError::Validation(format!(
                "outTime {out_time} is earlier than inTime {in_time}"
            )));
        }

        let hours = (Decimal::from(out_minutes - in_minutes) / Decimal::from(60))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let overtime = (hours - shift_hours).max(Decimal::ZERO);

        Ok(WorkedHours { hours, overtime })
    }

    /// Days credited towards `presentDays` for one record.
    pub fn day_weight(status: AttendanceStatus) -> Decimal {
        match status {
            AttendanceStatus::Present => Decimal::ONE,
            AttendanceStatus::HalfDay => Decimal::new(5, 1),
            AttendanceStatus::Absent | AttendanceStatus::Leave => Decimal::ZERO,
        }
    }
}

fn minutes_of_day(raw: &str, field: &str) -> AppResult<u32> {
    let time = NaiveTime::parse_from_str(raw.trim(), "%H:%M").map_err(|_| {
        AppError::Validation(format!("{field} must be a time in HH:MM format, got '{raw}'"))
    })?;
    Ok(time.hour() * 60 + time.minute())
}
