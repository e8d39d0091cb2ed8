//! Read-side folds over attendance and overtime records.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::RuleError;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::overtime::{OvertimeRecord, OvertimeStatus};
use crate::model::user::Employee;
use crate::rules::clock::round2;

/// A calendar month, `month` in `1..=12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub month: u32,
    pub year: i32,
}

impl Period {
    pub fn new(month: u32, year: i32) -> Result<Self, RuleError> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(RuleError::InvalidInput(format!(
                "invalid period {year}-{month:02}"
            )));
        }
        Ok(Self { month, year })
    }

    /// Falls back to the month containing `today` for whatever is missing.
    pub fn or_current(
        month: Option<u32>,
        year: Option<i32>,
        today: NaiveDate,
    ) -> Result<Self, RuleError> {
        Self::new(
            month.unwrap_or_else(|| today.month()),
            year.unwrap_or_else(|| today.year()),
        )
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.month() == self.month && date.year() == self.year
    }

    /// Half-open `[first day, first day of next month)`.
    pub fn bounds(&self) -> (NaiveDate, NaiveDate) {
        let first = NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN);
        let next = if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
        };
        (first, next.unwrap_or(NaiveDate::MAX))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStats {
    pub present: u32,
    pub late: u32,
    pub absent: u32,
    #[schema(example = 168.5)]
    pub total_work_hours: f64,
    #[schema(example = 6.25)]
    pub overtime_hours: f64,
    pub total: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyOverview {
    pub total_employees: u32,
    pub present: u32,
    pub late: u32,
    pub absent: u32,
    pub not_checked_in: u32,
}

/// Counts status buckets and sums hours for the records inside the scope.
///
/// Only approved overtime counts towards `overtime_hours`.
pub fn summarize(
    employee_id: Option<u64>,
    period: Period,
    attendance: &[AttendanceRecord],
    overtime: &[OvertimeRecord],
) -> AttendanceStats {
    let in_scope = |owner: u64, date: NaiveDate| {
        employee_id.is_none_or(|id| id == owner) && period.contains(date)
    };

    let mut stats = AttendanceStats::default();
    let mut work_hours = 0.0;

    for record in attendance.iter().filter(|r| in_scope(r.employee_id, r.date)) {
        match record.status {
            AttendanceStatus::Present => stats.present += 1,
            AttendanceStatus::Late => stats.late += 1,
            AttendanceStatus::Absent => stats.absent += 1,
            AttendanceStatus::Holiday => {}
        }
        work_hours += record.work_hours;
    }

    let overtime_hours: f64 = overtime
        .iter()
        .filter(|r| r.status == OvertimeStatus::Approved && in_scope(r.employee_id, r.date))
        .map(|r| r.duration)
        .sum();

    stats.total_work_hours = round2(work_hours);
    stats.overtime_hours = round2(overtime_hours);
    stats.total = stats.present + stats.late + stats.absent;
    stats
}

/// Snapshot of one day across all employee accounts.
pub fn daily_overview(
    date: NaiveDate,
    employees: &[Employee],
    attendance: &[AttendanceRecord],
) -> DailyOverview {
    let mut overview = DailyOverview::default();

    for employee in employees.iter().filter(|e| e.is_employee()) {
        overview.total_employees += 1;
        let record = attendance
            .iter()
            .find(|r| r.employee_id == employee.id && r.date == date);
        match record.map(|r| r.status) {
            Some(AttendanceStatus::Present) => overview.present += 1,
            Some(AttendanceStatus::Late) => overview.late += 1,
            Some(AttendanceStatus::Absent) => overview.absent += 1,
            Some(AttendanceStatus::Holiday) => {}
            None => overview.not_checked_in += 1,
        }
    }

    overview
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::role::Role;
    use chrono::NaiveTime;

    fn d(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, month, day).unwrap()
    }

    fn record(employee_id: u64, date: NaiveDate, status: AttendanceStatus, hours: f64) -> AttendanceRecord {
        AttendanceRecord {
            id: 1,
            employee_id,
            date,
            check_in: None,
            check_out: None,
            status,
            work_hours: hours,
        }
    }

    fn overtime(employee_id: u64, date: NaiveDate, status: OvertimeStatus, duration: f64) -> OvertimeRecord {
        OvertimeRecord {
            id: 1,
            employee_id,
            date,
            start_time: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(18, 0, 0),
            duration,
            reason: "r".into(),
            status,
            approved_by: None,
        }
    }

    #[test]
    fn empty_scope_is_all_zeros() {
        let stats = summarize(Some(7), Period::new(1, 2026).unwrap(), &[], &[]);
        assert_eq!(stats, AttendanceStats::default());
        assert_eq!(stats.total, 0);
        assert_eq!(stats.total_work_hours, 0.0);
    }

    #[test]
    fn folds_buckets_for_one_employee_and_month() {
        let attendance = vec![
            record(7, d(1, 5), AttendanceStatus::Present, 8.0),
            record(7, d(1, 6), AttendanceStatus::Late, 8.08),
            record(7, d(1, 7), AttendanceStatus::Absent, 0.0),
            record(7, d(2, 2), AttendanceStatus::Present, 8.0),
            record(8, d(1, 5), AttendanceStatus::Present, 9.0),
        ];
        let overtime = vec![
            overtime(7, d(1, 5), OvertimeStatus::Approved, 2.5),
            overtime(7, d(1, 6), OvertimeStatus::Pending, 1.0),
            overtime(7, d(1, 7), OvertimeStatus::Rejected, 3.0),
            overtime(8, d(1, 5), OvertimeStatus::Approved, 4.0),
        ];

        let stats = summarize(Some(7), Period::new(1, 2026).unwrap(), &attendance, &overtime);
        assert_eq!(stats.present, 1);
        assert_eq!(stats.late, 1);
        assert_eq!(stats.absent, 1);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.total_work_hours, 16.08);
        assert_eq!(stats.overtime_hours, 2.5);

        let everyone = summarize(None, Period::new(1, 2026).unwrap(), &attendance, &overtime);
        assert_eq!(everyone.present, 2);
        assert_eq!(everyone.overtime_hours, 6.5);
    }

    #[test]
    fn bounds_roll_over_december() {
        let (first, next) = Period::new(12, 2026).unwrap().bounds();
        assert_eq!(first, d(12, 1));
        assert_eq!(next, NaiveDate::from_ymd_opt(2027, 1, 1).unwrap());
    }

    #[test]
    fn period_validation_and_defaulting() {
        assert!(Period::new(13, 2026).is_err());
        assert!(Period::new(0, 2026).is_err());
        let p = Period::or_current(None, Some(2025), d(3, 14)).unwrap();
        assert_eq!(p, Period { month: 3, year: 2025 });
    }

    #[test]
    fn overview_splits_absent_from_not_yet_checked_in() {
        let joined = d(1, 1);
        let employees = vec![
            Employee { id: 1, role: Role::Admin, joined_on: joined },
            Employee { id: 7, role: Role::Employee, joined_on: joined },
            Employee { id: 8, role: Role::Employee, joined_on: joined },
            Employee { id: 9, role: Role::Employee, joined_on: joined },
            Employee { id: 10, role: Role::Employee, joined_on: joined },
        ];
        let attendance = vec![
            record(7, d(1, 5), AttendanceStatus::Present, 0.0),
            record(8, d(1, 5), AttendanceStatus::Late, 0.0),
            record(9, d(1, 5), AttendanceStatus::Absent, 0.0),
            record(10, d(1, 6), AttendanceStatus::Present, 0.0),
        ];

        let overview = daily_overview(d(1, 5), &employees, &attendance);
        assert_eq!(
            overview,
            DailyOverview {
                total_employees: 4,
                present: 1,
                late: 1,
                absent: 1,
                not_checked_in: 1,
            }
        );
    }
}
