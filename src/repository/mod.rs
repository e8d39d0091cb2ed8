//! Store contracts consumed by the services.
//!
//! A [`Transaction`] is the unit of atomicity: every state-machine operation
//! reads, validates and writes through one, and nothing is visible to other
//! callers before [`Transaction::commit`]. Dropping a transaction discards it.

use chrono::NaiveDate;

use crate::error::StoreError;
use crate::model::attendance::AttendanceRecord;
use crate::model::overtime::OvertimeRecord;
use crate::model::schedule::{Holiday, WorkSchedule};
use crate::model::user::Employee;
use crate::rules::stats::Period;

#[cfg(test)]
pub mod memory;
pub mod mysql;
mod rows;

pub use mysql::MySqlRepository;

#[derive(Debug, Default, Clone)]
pub struct AttendanceFilter {
    pub employee_id: Option<u64>,
    pub date: Option<NaiveDate>,
    pub period: Option<Period>,
}

impl AttendanceFilter {
    pub fn matches(&self, record: &AttendanceRecord) -> bool {
        self.employee_id.is_none_or(|id| id == record.employee_id)
            && self.date.is_none_or(|d| d == record.date)
            && self.period.is_none_or(|p| p.contains(record.date))
    }
}

#[derive(Debug, Default, Clone)]
pub struct OvertimeFilter {
    pub employee_id: Option<u64>,
    pub period: Option<Period>,
}

impl OvertimeFilter {
    pub fn matches(&self, record: &OvertimeRecord) -> bool {
        self.employee_id.is_none_or(|id| id == record.employee_id)
            && self.period.is_none_or(|p| p.contains(record.date))
    }
}

#[allow(async_fn_in_trait)]
pub trait Repository {
    type Tx<'a>: Transaction
    where
        Self: 'a;

    async fn begin(&self) -> Result<Self::Tx<'_>, StoreError>;

    /// Newest first.
    async fn list_attendance(
        &self,
        filter: &AttendanceFilter,
    ) -> Result<Vec<AttendanceRecord>, StoreError>;

    /// Newest first.
    async fn list_overtime(&self, filter: &OvertimeFilter)
    -> Result<Vec<OvertimeRecord>, StoreError>;

    async fn list_employees(&self) -> Result<Vec<Employee>, StoreError>;

    /// Ordered by weekday.
    async fn list_policies(&self) -> Result<Vec<WorkSchedule>, StoreError>;

    /// Ordered by date.
    async fn list_holidays(&self) -> Result<Vec<Holiday>, StoreError>;
}

#[allow(async_fn_in_trait)]
pub trait Transaction {
    /// Reads the day's record and holds it against concurrent writers.
    async fn attendance_for_update(
        &mut self,
        employee_id: u64,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, StoreError>;

    /// Inserts when `record.id == 0`, updates otherwise. A second row for the
    /// same employee and date fails with [`StoreError::Duplicate`].
    async fn save_attendance(
        &mut self,
        record: AttendanceRecord,
    ) -> Result<AttendanceRecord, StoreError>;

    async fn open_overtime(
        &mut self,
        employee_id: u64,
        date: NaiveDate,
    ) -> Result<Option<OvertimeRecord>, StoreError>;

    async fn overtime_for_update(&mut self, id: u64) -> Result<Option<OvertimeRecord>, StoreError>;

    /// Inserts when `record.id == 0`, updates otherwise.
    async fn save_overtime(&mut self, record: OvertimeRecord)
    -> Result<OvertimeRecord, StoreError>;

    async fn policy(&mut self, day_of_week: u8) -> Result<Option<WorkSchedule>, StoreError>;

    async fn is_holiday(&mut self, date: NaiveDate) -> Result<bool, StoreError>;

    async fn save_policy(&mut self, policy: &WorkSchedule) -> Result<(), StoreError>;

    async fn replace_policies(&mut self, policies: &[WorkSchedule]) -> Result<(), StoreError>;

    /// Fails with [`StoreError::Duplicate`] when the date is already a holiday.
    async fn insert_holiday(&mut self, holiday: &Holiday) -> Result<(), StoreError>;

    /// Returns `false` when no holiday exists on `old_date`.
    async fn update_holiday(
        &mut self,
        old_date: NaiveDate,
        holiday: &Holiday,
    ) -> Result<bool, StoreError>;

    async fn holiday(&mut self, date: NaiveDate) -> Result<Option<Holiday>, StoreError>;

    /// Returns `false` when nothing was deleted.
    async fn delete_holiday(&mut self, date: NaiveDate) -> Result<bool, StoreError>;

    async fn replace_holidays(&mut self, holidays: &[Holiday]) -> Result<(), StoreError>;

    async fn commit(self) -> Result<(), StoreError>;
}
