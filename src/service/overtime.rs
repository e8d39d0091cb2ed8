use chrono::NaiveDateTime;

use crate::error::RuleError;
use crate::model::overtime::OvertimeRecord;
use crate::repository::{OvertimeFilter, Repository, Transaction};
use crate::rules::overtime as rules;
use crate::service::calendar::resolve_in;
use crate::utils::hhmm;

pub async fn start<R: Repository>(
    repo: &R,
    employee_id: u64,
    reason: &str,
    now: NaiveDateTime,
) -> Result<OvertimeRecord, RuleError> {
    let date = now.date();

    let mut tx = repo.begin().await?;
    // The attendance row doubles as the per-day lock for overtime.
    let attendance = tx.attendance_for_update(employee_id, date).await?;
    let open = tx.open_overtime(employee_id, date).await?;
    let schedule = resolve_in(&mut tx, date).await?;

    let record = rules::start(
        attendance.as_ref(),
        open.as_ref(),
        &schedule,
        employee_id,
        date,
        reason,
        hhmm::truncate(now.time()),
    )?;
    let record = tx.save_overtime(record).await?;
    tx.commit().await?;

    tracing::info!(employee_id, %date, overtime_id = record.id, "Overtime started");
    Ok(record)
}

pub async fn end<R: Repository>(
    repo: &R,
    employee_id: u64,
    now: NaiveDateTime,
) -> Result<OvertimeRecord, RuleError> {
    let date = now.date();

    let mut tx = repo.begin().await?;
    tx.attendance_for_update(employee_id, date).await?;
    let open = tx.open_overtime(employee_id, date).await?;

    let record = rules::end(open, hhmm::truncate(now.time()))?;
    let record = tx.save_overtime(record).await?;
    tx.commit().await?;

    tracing::info!(
        employee_id,
        %date,
        overtime_id = record.id,
        duration = record.duration,
        "Overtime ended"
    );
    Ok(record)
}

/// Approves or rejects a pending record. The caller must already be an administrator.
pub async fn decide<R: Repository>(
    repo: &R,
    overtime_id: u64,
    admin_id: u64,
    approved: bool,
) -> Result<OvertimeRecord, RuleError> {
    let mut tx = repo.begin().await?;
    let current = tx.overtime_for_update(overtime_id).await?;

    let record = rules::decide(current, admin_id, approved)?;
    let record = tx.save_overtime(record).await?;
    tx.commit().await?;

    tracing::info!(overtime_id, admin_id, status = %record.status, "Overtime decided");
    Ok(record)
}

pub async fn list<R: Repository>(
    repo: &R,
    filter: &OvertimeFilter,
) -> Result<Vec<OvertimeRecord>, RuleError> {
    Ok(repo.list_overtime(filter).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::overtime::OvertimeStatus;
    use crate::model::schedule::UpdateSchedule;
    use crate::repository::memory::MemoryRepository;
    use crate::service::attendance::{check_in, check_out};
    use crate::service::calendar;
    use crate::service::fixtures::{ADMIN, BUDI, SITI, at, evidence, monday, repo};
    use chrono::NaiveTime;

    async fn worked_full_day(repo: &MemoryRepository, employee_id: u64) {
        check_in(repo, employee_id, evidence(), at(monday(), 8, 5)).await.unwrap();
        check_out(repo, employee_id, evidence(), at(monday(), 16, 10)).await.unwrap();
    }

    #[actix_web::test]
    async fn without_check_in_overtime_cannot_start() {
        let repo = repo().await;
        let err = start(&repo, BUDI, "finishing report", at(monday(), 17, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, RuleError::NotCheckedIn));
    }

    #[actix_web::test]
    async fn eligibility_follows_the_attendance_day() {
        let repo = repo().await;
        let reason = "finishing report";

        assert!(matches!(
            start(&repo, BUDI, reason, at(monday(), 12, 0)).await,
            Err(RuleError::NotCheckedIn)
        ));

        check_in(&repo, BUDI, evidence(), at(monday(), 8, 0)).await.unwrap();
        assert!(matches!(
            start(&repo, BUDI, reason, at(monday(), 12, 0)).await,
            Err(RuleError::NotCheckedOut)
        ));

        check_out(&repo, BUDI, evidence(), at(monday(), 16, 0)).await.unwrap();
        assert!(matches!(
            start(&repo, BUDI, "  ", at(monday(), 16, 5)).await,
            Err(RuleError::ReasonRequired)
        ));

        let record = start(&repo, BUDI, reason, at(monday(), 16, 5)).await.unwrap();
        assert_eq!(record.status, OvertimeStatus::Pending);
        assert!(record.is_open());
    }

    #[actix_web::test]
    async fn raised_minimum_blocks_overtime_after_check_out() {
        let repo = repo().await;
        worked_full_day(&repo, BUDI).await;

        let stricter = UpdateSchedule {
            day_of_week: 1,
            start_time: None,
            end_time: None,
            min_work_hours: Some(9.0),
        };
        calendar::update_policy(&repo, &stricter).await.unwrap();

        let err = start(&repo, BUDI, "finishing report", at(monday(), 16, 15))
            .await
            .unwrap_err();
        match err {
            RuleError::MinimumHoursNotMet { remaining, .. } => assert_eq!(remaining.minutes, 55),
            other => panic!("expected MinimumHoursNotMet, got {other:?}"),
        }
    }

    #[actix_web::test]
    async fn only_one_session_runs_at_a_time() {
        let repo = repo().await;
        worked_full_day(&repo, BUDI).await;

        start(&repo, BUDI, "first", at(monday(), 16, 15)).await.unwrap();
        let err = start(&repo, BUDI, "second", at(monday(), 16, 20)).await.unwrap_err();
        assert!(matches!(err, RuleError::OvertimeAlreadyRunning));

        // Other employees are unaffected.
        worked_full_day(&repo, SITI).await;
        assert!(start(&repo, SITI, "parallel", at(monday(), 16, 20)).await.is_ok());

        end(&repo, BUDI, at(monday(), 17, 0)).await.unwrap();
        assert!(start(&repo, BUDI, "second", at(monday(), 17, 5)).await.is_ok());
    }

    #[actix_web::test]
    async fn full_overtime_lifecycle() {
        let repo = repo().await;
        worked_full_day(&repo, BUDI).await;

        let started = start(&repo, BUDI, "finishing report", at(monday(), 16, 15))
            .await
            .unwrap();
        assert_eq!(started.status, OvertimeStatus::Pending);
        assert_eq!(started.start_time, NaiveTime::from_hms_opt(16, 15, 0).unwrap());

        let ended = end(&repo, BUDI, at(monday(), 18, 45)).await.unwrap();
        assert_eq!(ended.id, started.id);
        assert_eq!(ended.duration, 2.5);
        assert_eq!(ended.status, OvertimeStatus::Pending);

        let approved = decide(&repo, ended.id, ADMIN, true).await.unwrap();
        assert_eq!(approved.status, OvertimeStatus::Approved);
        assert_eq!(approved.approved_by, Some(ADMIN));

        let again = decide(&repo, ended.id, ADMIN, false).await.unwrap_err();
        assert!(matches!(again, RuleError::AlreadyDecided(OvertimeStatus::Approved)));
    }

    #[actix_web::test]
    async fn ending_at_the_start_minute_yields_zero() {
        let repo = repo().await;
        worked_full_day(&repo, BUDI).await;
        start(&repo, BUDI, "late call", at(monday(), 16, 30)).await.unwrap();

        let ended = end(&repo, BUDI, at(monday(), 16, 30)).await.unwrap();
        assert_eq!(ended.duration, 0.0);
        assert!(matches!(
            end(&repo, BUDI, at(monday(), 17, 0)).await,
            Err(RuleError::NoActiveOvertime)
        ));
    }

    #[actix_web::test]
    async fn running_session_may_be_decided_before_it_ends() {
        let repo = repo().await;
        worked_full_day(&repo, BUDI).await;
        let started = start(&repo, BUDI, "deploy", at(monday(), 16, 15)).await.unwrap();

        decide(&repo, started.id, ADMIN, false).await.unwrap();
        let ended = end(&repo, BUDI, at(monday(), 17, 15)).await.unwrap();
        assert_eq!(ended.status, OvertimeStatus::Rejected);
        assert_eq!(ended.duration, 1.0);
    }

    #[actix_web::test]
    async fn deciding_an_unknown_record_fails() {
        let repo = repo().await;
        assert!(matches!(
            decide(&repo, 42, ADMIN, true).await,
            Err(RuleError::NotFound)
        ));
    }

    #[actix_web::test]
    async fn listing_is_newest_first_and_scoped() {
        let repo = repo().await;
        worked_full_day(&repo, BUDI).await;
        worked_full_day(&repo, SITI).await;
        start(&repo, BUDI, "one", at(monday(), 16, 15)).await.unwrap();
        end(&repo, BUDI, at(monday(), 17, 0)).await.unwrap();
        start(&repo, BUDI, "two", at(monday(), 17, 5)).await.unwrap();
        start(&repo, SITI, "three", at(monday(), 16, 20)).await.unwrap();

        let filter = OvertimeFilter {
            employee_id: Some(BUDI),
            ..OvertimeFilter::default()
        };
        let budi = list(&repo, &filter).await.unwrap();
        let reasons: Vec<_> = budi.iter().map(|r| r.reason.as_str()).collect();
        assert_eq!(reasons, ["two", "one"]);

        assert_eq!(list(&repo, &OvertimeFilter::default()).await.unwrap().len(), 3);
    }
}
