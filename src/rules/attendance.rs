//! Per employee and day: `NoRecord -> CheckedIn -> CheckedOut`.
//!
//! Each transition takes the current snapshot of the day's record and returns
//! the record to persist. Nothing here reads a clock or touches storage.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::RuleError;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus, Evidence};
use crate::model::schedule::ResolvedSchedule;
use crate::model::user::Employee;
use crate::rules::clock::{Remaining, hours_from_minutes, minutes_between, required_minutes};

/// Late strictly after the scheduled start, at minute granularity.
pub fn status_for(evidence: &Evidence, schedule: &ResolvedSchedule) -> AttendanceStatus {
    if minutes_between(schedule.start_time, evidence.time) > 0 {
        AttendanceStatus::Late
    } else {
        AttendanceStatus::Present
    }
}

pub fn check_in(
    existing: Option<AttendanceRecord>,
    employee_id: u64,
    date: NaiveDate,
    evidence: Evidence,
    schedule: &ResolvedSchedule,
) -> Result<AttendanceRecord, RuleError> {
    if existing.as_ref().is_some_and(|r| r.check_in.is_some()) {
        return Err(RuleError::AlreadyCheckedIn);
    }

    let status = status_for(&evidence, schedule);

    // An absence placeholder is taken over in place.
    let id = existing.map(|r| r.id).unwrap_or(0);

    Ok(AttendanceRecord {
        id,
        employee_id,
        date,
        check_in: Some(evidence),
        check_out: None,
        status,
        work_hours: 0.0,
    })
}

pub fn check_out(
    existing: Option<AttendanceRecord>,
    evidence: Evidence,
    schedule: &ResolvedSchedule,
) -> Result<AttendanceRecord, RuleError> {
    let mut record = existing.ok_or(RuleError::NotCheckedInYet)?;
    let checked_in_at = match &record.check_in {
        Some(check_in) => check_in.time,
        None => return Err(RuleError::NotCheckedInYet),
    };
    if record.check_out.is_some() {
        return Err(RuleError::AlreadyCheckedOut);
    }

    let worked = minutes_between(checked_in_at, evidence.time);
    ensure_minimum(worked, schedule)?;

    record.work_hours = hours_from_minutes(worked);
    record.check_out = Some(evidence);
    Ok(record)
}

/// Minutes between check-in and check-out, `None` until both exist.
pub fn worked_minutes(record: &AttendanceRecord) -> Option<i64> {
    match (&record.check_in, &record.check_out) {
        (Some(check_in), Some(check_out)) => Some(minutes_between(check_in.time, check_out.time)),
        _ => None,
    }
}

pub fn ensure_minimum(worked: i64, schedule: &ResolvedSchedule) -> Result<(), RuleError> {
    let required = required_minutes(schedule.min_work_hours);
    if worked < required {
        return Err(RuleError::MinimumHoursNotMet {
            required_hours: schedule.min_work_hours,
            remaining: Remaining::new(required - worked),
        });
    }
    Ok(())
}

/// Whether absences may be recorded for `schedule.date` as seen at `now`.
pub fn day_closed(schedule: &ResolvedSchedule, now: NaiveDateTime) -> bool {
    let today = now.date();
    schedule.date < today || (schedule.date == today && now.time() >= schedule.end_time)
}

/// Placeholder for an employee who never showed up on a closed working day.
pub fn mark_absent(
    existing: Option<&AttendanceRecord>,
    employee: &Employee,
    schedule: &ResolvedSchedule,
) -> Option<AttendanceRecord> {
    if schedule.is_holiday
        || existing.is_some()
        || !employee.is_employee()
        || employee.joined_on > schedule.date
    {
        return None;
    }
    Some(AttendanceRecord::absent(employee.id, schedule.date))
}
