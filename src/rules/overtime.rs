//! Per employee and day: `None -> Running -> Ended`, plus the approval decision.

use chrono::{NaiveDate, NaiveTime};

use crate::error::RuleError;
use crate::model::attendance::AttendanceRecord;
use crate::model::overtime::{OvertimeRecord, OvertimeStatus};
use crate::model::schedule::ResolvedSchedule;
use crate::rules::attendance::{ensure_minimum, worked_minutes};
use crate::rules::clock::{hours_from_minutes, minutes_between};

/// Preconditions are checked in order; the first failure wins.
pub fn start(
    attendance: Option<&AttendanceRecord>,
    open: Option<&OvertimeRecord>,
    schedule: &ResolvedSchedule,
    employee_id: u64,
    date: NaiveDate,
    reason: &str,
    now: NaiveTime,
) -> Result<OvertimeRecord, RuleError> {
    let attendance = match attendance {
        Some(record) if record.check_in.is_some() => record,
        _ => return Err(RuleError::NotCheckedIn),
    };
    let worked = worked_minutes(attendance).ok_or(RuleError::NotCheckedOut)?;
    ensure_minimum(worked, schedule)?;

    if open.is_some() {
        return Err(RuleError::OvertimeAlreadyRunning);
    }

    let reason = reason.trim();
    if reason.is_empty() {
        return Err(RuleError::ReasonRequired);
    }

    Ok(OvertimeRecord {
        id: 0,
        employee_id,
        date,
        start_time: now,
        end_time: None,
        duration: 0.0,
        reason: reason.to_string(),
        status: OvertimeStatus::Pending,
        approved_by: None,
    })
}

/// Closes the running session. The approval status is left alone.
pub fn end(open: Option<OvertimeRecord>, now: NaiveTime) -> Result<OvertimeRecord, RuleError> {
    let mut record = match open {
        Some(record) if record.is_open() => record,
        _ => return Err(RuleError::NoActiveOvertime),
    };
    record.duration = hours_from_minutes(minutes_between(record.start_time, now));
    record.end_time = Some(now);
    Ok(record)
}

/// `pending -> approved | rejected`, once.
pub fn decide(
    record: Option<OvertimeRecord>,
    admin_id: u64,
    approved: bool,
) -> Result<OvertimeRecord, RuleError> {
    let mut record = record.ok_or(RuleError::NotFound)?;
    if record.status != OvertimeStatus::Pending {
        return Err(RuleError::AlreadyDecided(record.status));
    }
    record.status = if approved {
        OvertimeStatus::Approved
    } else {
        OvertimeStatus::Rejected
    };
    record.approved_by = Some(admin_id);
    Ok(record)
}
