use chrono::NaiveDate;

use crate::error::RuleError;
use crate::repository::{AttendanceFilter, OvertimeFilter, Repository};
use crate::rules::stats::{self, AttendanceStats, Period};

/// Monthly summary for one employee, or for everyone when `employee_id` is `None`.
///
/// Missing `month`/`year` default to the month containing `today`.
pub async fn get_stats<R: Repository>(
    repo: &R,
    employee_id: Option<u64>,
    month: Option<u32>,
    year: Option<i32>,
    today: NaiveDate,
) -> Result<AttendanceStats, RuleError> {
    let period = Period::or_current(month, year, today)?;

    let attendance = repo
        .list_attendance(&AttendanceFilter {
            employee_id,
            date: None,
            period: Some(period),
        })
        .await?;
    let overtime = repo
        .list_overtime(&OvertimeFilter {
            employee_id,
            period: Some(period),
        })
        .await?;

    Ok(stats::summarize(employee_id, period, &attendance, &overtime))
}
