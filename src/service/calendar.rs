//! Work schedules and the holiday calendar.

use chrono::{Datelike, NaiveDate};

use crate::error::{RuleError, StoreError};
use crate::rules::schedule;
use crate::model::schedule::{
    Holiday, ResolvedSchedule, UpdateHoliday, UpdateSchedule, WorkSchedule, default_holidays,
    default_work_schedules,
};
use crate::repository::{Repository, Transaction};

/// Resolves `date` inside an open transaction.
pub async fn resolve_in<T: Transaction>(
    tx: &mut T,
    date: NaiveDate,
) -> Result<ResolvedSchedule, RuleError> {
    let policy = tx.policy(schedule::day_of_week(date)).await?;
    let is_holiday = tx.is_holiday(date).await?;
    schedule::resolve(date, policy.as_ref(), is_holiday).inspect_err(|e| {
        tracing::error!(date = %date, error = %e, "Work schedule lookup failed");
    })
}

pub async fn resolve<R: Repository>(repo: &R, date: NaiveDate) -> Result<ResolvedSchedule, RuleError> {
    let mut tx = repo.begin().await?;
    resolve_in(&mut tx, date).await
}

pub async fn list_policies<R: Repository>(repo: &R) -> Result<Vec<WorkSchedule>, RuleError> {
    Ok(repo.list_policies().await?)
}

pub async fn update_policy<R: Repository>(
    repo: &R,
    update: &UpdateSchedule,
) -> Result<WorkSchedule, RuleError> {
    if update.day_of_week > 6 {
        return Err(RuleError::InvalidInput(format!(
            "dayOfWeek must be between 0 and 6, got {}",
            update.day_of_week
        )));
    }

    let mut tx = repo.begin().await?;
    let current = tx.policy(update.day_of_week).await?.ok_or_else(|| {
        RuleError::Configuration(format!("no work schedule for weekday {}", update.day_of_week))
    })?;
    let merged = schedule::merge(&current, update)?;
    tx.save_policy(&merged).await?;
    tx.commit().await?;

    tracing::info!(day_of_week = merged.day_of_week, "Work schedule updated");
    Ok(merged)
}

pub async fn reset_policies<R: Repository>(repo: &R) -> Result<Vec<WorkSchedule>, RuleError> {
    let defaults = default_work_schedules();
    let mut tx = repo.begin().await?;
    tx.replace_policies(&defaults).await?;
    tx.commit().await?;

    tracing::info!("Work schedules reset to defaults");
    Ok(defaults)
}

/// Holidays ordered by date, optionally limited to one year.
pub async fn list_holidays<R: Repository>(
    repo: &R,
    year: Option<i32>,
) -> Result<Vec<Holiday>, RuleError> {
    let holidays = repo.list_holidays().await?;
    Ok(holidays
        .into_iter()
        .filter(|h| year.is_none_or(|y| h.date.year() == y))
        .collect())
}

fn holiday_name(name: &str) -> Result<String, RuleError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RuleError::InvalidInput("Holiday name is required".into()));
    }
    Ok(name.to_string())
}

fn duplicate_holiday(date: NaiveDate) -> impl FnOnce(StoreError) -> RuleError {
    move |e| match e {
        StoreError::Duplicate => {
            RuleError::InvalidInput(format!("A holiday already exists on {date}"))
        }
        other => other.into(),
    }
}

pub async fn add_holiday<R: Repository>(repo: &R, holiday: Holiday) -> Result<Holiday, RuleError> {
    let holiday = Holiday {
        name: holiday_name(&holiday.name)?,
        ..holiday
    };

    let mut tx = repo.begin().await?;
    tx.insert_holiday(&holiday)
        .await
        .map_err(duplicate_holiday(holiday.date))?;
    tx.commit().await?;

    tracing::info!(date = %holiday.date, "Holiday added");
    Ok(holiday)
}

pub async fn update_holiday<R: Repository>(
    repo: &R,
    update: UpdateHoliday,
) -> Result<Holiday, RuleError> {
    let mut tx = repo.begin().await?;
    let current = tx.holiday(update.old_date).await?.ok_or(RuleError::NotFound)?;

    let updated = Holiday {
        date: update.date.unwrap_or(current.date),
        name: match update.name.as_deref() {
            Some(name) => holiday_name(name)?,
            None => current.name,
        },
    };

    let found = tx
        .update_holiday(update.old_date, &updated)
        .await
        .map_err(duplicate_holiday(updated.date))?;
    if !found {
        return Err(RuleError::NotFound);
    }
    tx.commit().await?;

    tracing::info!(old_date = %update.old_date, date = %updated.date, "Holiday updated");
    Ok(updated)
}

pub async fn delete_holiday<R: Repository>(repo: &R, date: NaiveDate) -> Result<(), RuleError> {
    let mut tx = repo.begin().await?;
    if !tx.delete_holiday(date).await? {
        return Err(RuleError::NotFound);
    }
    tx.commit().await?;

    tracing::info!(date = %date, "Holiday deleted");
    Ok(())
}

pub async fn reset_holidays<R: Repository>(repo: &R) -> Result<Vec<Holiday>, RuleError> {
    let defaults = default_holidays();
    let mut tx = repo.begin().await?;
    tx.replace_holidays(&defaults).await?;
    tx.commit().await?;

    tracing::info!("Holidays reset to defaults");
    Ok(defaults)
}
