use chrono::{Datelike, NaiveDate};

use crate::error::RuleError;
use crate::model::schedule::{ResolvedSchedule, UpdateSchedule, WorkSchedule};

/// `0` = Sunday .. `6` = Saturday.
pub fn day_of_week(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Combines the weekday policy and the holiday flag for `date`.
///
/// A missing policy is a data-integrity problem, never papered over with a default.
pub fn resolve(
    date: NaiveDate,
    policy: Option<&WorkSchedule>,
    is_holiday: bool,
) -> Result<ResolvedSchedule, RuleError> {
    let day = day_of_week(date);
    let policy = policy.ok_or_else(|| {
        RuleError::Configuration(format!("no work schedule for weekday {day}"))
    })?;
    if policy.day_of_week != day {
        return Err(RuleError::Configuration(format!(
            "schedule for weekday {} returned for weekday {day}",
            policy.day_of_week
        )));
    }

    Ok(ResolvedSchedule {
        date,
        start_time: policy.start_time,
        end_time: policy.end_time,
        min_work_hours: policy.min_work_hours,
        is_holiday,
    })
}

pub fn validate(policy: &WorkSchedule) -> Result<(), RuleError> {
    if policy.day_of_week > 6 {
        return Err(RuleError::InvalidInput(format!(
            "dayOfWeek must be between 0 and 6, got {}",
            policy.day_of_week
        )));
    }
    if policy.start_time >= policy.end_time {
        return Err(RuleError::InvalidInput(
            "startTime must be earlier than endTime".into(),
        ));
    }
    if !policy.min_work_hours.is_finite() || policy.min_work_hours <= 0.0 {
        return Err(RuleError::InvalidInput(
            "minWorkHours must be greater than zero".into(),
        ));
    }
    Ok(())
}

/// Applies a partial update on top of the stored policy and validates the result.
pub fn merge(current: &WorkSchedule, update: &UpdateSchedule) -> Result<WorkSchedule, RuleError> {
    let merged = WorkSchedule {
        day_of_week: current.day_of_week,
        start_time: update.start_time.unwrap_or(current.start_time),
        end_time: update.end_time.unwrap_or(current.end_time),
        min_work_hours: update.min_work_hours.unwrap_or(current.min_work_hours),
    };
    validate(&merged)?;
    Ok(merged)
}
