use chrono::{NaiveDate, NaiveDateTime};

use crate::error::RuleError;
use crate::model::attendance::{AttendanceRecord, Evidence, EvidencePayload};
use crate::repository::{AttendanceFilter, Repository, Transaction};
use crate::rules::attendance as rules;
use crate::rules::stats::{self, DailyOverview};
use crate::service::calendar::resolve_in;

pub async fn check_in<R: Repository>(
    repo: &R,
    employee_id: u64,
    payload: EvidencePayload,
    now: NaiveDateTime,
) -> Result<AttendanceRecord, RuleError> {
    payload.validate()?;
    let date = now.date();
    let evidence = payload.stamp(now.time());

    let record = match try_check_in(repo, employee_id, date, evidence.clone()).await {
        // Another writer created the day's row first. Re-read it once: a
        // concurrent check-in turns into AlreadyCheckedIn, an absence
        // placeholder gets taken over.
        Err(RuleError::Store(e)) if e.is_conflict() => {
            tracing::debug!(employee_id, %date, "Check-in raced a concurrent write, retrying");
            match try_check_in(repo, employee_id, date, evidence).await {
                Err(RuleError::Store(e)) if e.is_conflict() => Err(RuleError::AlreadyCheckedIn),
                other => other,
            }
        }
        other => other,
    }?;

    tracing::info!(
        employee_id,
        %date,
        status = %record.status,
        "Checked in"
    );
    Ok(record)
}

async fn try_check_in<R: Repository>(
    repo: &R,
    employee_id: u64,
    date: NaiveDate,
    evidence: Evidence,
) -> Result<AttendanceRecord, RuleError> {
    let mut tx = repo.begin().await?;
    let existing = tx.attendance_for_update(employee_id, date).await?;
    let schedule = resolve_in(&mut tx, date).await?;

    let record = rules::check_in(existing, employee_id, date, evidence, &schedule)?;
    let record = tx.save_attendance(record).await?;
    tx.commit().await?;
    Ok(record)
}

pub async fn check_out<R: Repository>(
    repo: &R,
    employee_id: u64,
    payload: EvidencePayload,
    now: NaiveDateTime,
) -> Result<AttendanceRecord, RuleError> {
    payload.validate()?;
    let date = now.date();
    let evidence = payload.stamp(now.time());

    let mut tx = repo.begin().await?;
    let existing = tx.attendance_for_update(employee_id, date).await?;
    let schedule = resolve_in(&mut tx, date).await?;

    let record = rules::check_out(existing, evidence, &schedule)?;
    let record = tx.save_attendance(record).await?;
    tx.commit().await?;

    tracing::info!(employee_id, %date, work_hours = record.work_hours, "Checked out");
    Ok(record)
}

pub async fn list<R: Repository>(
    repo: &R,
    filter: &AttendanceFilter,
) -> Result<Vec<AttendanceRecord>, RuleError> {
    Ok(repo.list_attendance(filter).await?)
}

/// Writes an `absent` placeholder for every employee without a record on a
/// closed working day. Returns how many were written.
pub async fn mark_absences<R: Repository>(
    repo: &R,
    date: NaiveDate,
    now: NaiveDateTime,
) -> Result<u32, RuleError> {
    let mut tx = repo.begin().await?;
    let schedule = resolve_in(&mut tx, date).await?;
    drop(tx);

    if !rules::day_closed(&schedule, now) {
        return Err(RuleError::InvalidInput(format!(
            "The working day {date} has not ended yet"
        )));
    }
    if schedule.is_holiday {
        return Ok(0);
    }

    let mut written = 0;
    for employee in repo.list_employees().await? {
        let mut tx = repo.begin().await?;
        let existing = tx.attendance_for_update(employee.id, date).await?;
        let Some(placeholder) = rules::mark_absent(existing.as_ref(), &employee, &schedule) else {
            continue;
        };
        match tx.save_attendance(placeholder).await {
            Ok(_) => {}
            Err(e) if e.is_conflict() => {
                tracing::debug!(employee_id = employee.id, %date, "Skipped absence, record appeared concurrently");
                continue;
            }
            Err(e) => return Err(e.into()),
        }
        match tx.commit().await {
            Ok(()) => written += 1,
            Err(e) if e.is_conflict() => continue,
            Err(e) => return Err(e.into()),
        }
    }

    tracing::info!(%date, written, "Absences marked");
    Ok(written)
}

pub async fn daily_overview<R: Repository>(
    repo: &R,
    date: NaiveDate,
) -> Result<DailyOverview, RuleError> {
    let employees = repo.list_employees().await?;
    let filter = AttendanceFilter {
        date: Some(date),
        ..AttendanceFilter::default()
    };
    let attendance = repo.list_attendance(&filter).await?;
    Ok(stats::daily_overview(date, &employees, &attendance))
}
