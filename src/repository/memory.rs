//! In-process store used by the service tests.
//!
//! One async mutex guards the whole state and is held for the lifetime of a
//! transaction, so transactions are fully serialized. Writes go to a staged
//! copy that replaces the shared state on commit.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use futures::lock::{Mutex, MutexGuard};

use crate::error::StoreError;
use crate::model::attendance::AttendanceRecord;
use crate::model::overtime::OvertimeRecord;
use crate::model::role::Role;
use crate::model::schedule::{Holiday, WorkSchedule, default_holidays, default_work_schedules};
use crate::model::user::Employee;
use crate::repository::{AttendanceFilter, OvertimeFilter, Repository, Transaction};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    employees: Vec<Employee>,
    attendance: Vec<AttendanceRecord>,
    overtime: Vec<OvertimeRecord>,
    policies: BTreeMap<u8, WorkSchedule>,
    holidays: BTreeMap<NaiveDate, String>,
    next_attendance_id: u64,
    next_overtime_id: u64,
    racing_absence: bool,
}

#[derive(Clone, Default)]
pub struct MemoryRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryRepository {
    /// Empty store seeded with the default week and holiday calendar.
    pub fn seeded() -> Self {
        let state = MemoryState {
            policies: default_work_schedules()
                .into_iter()
                .map(|p| (p.day_of_week, p))
                .collect(),
            holidays: default_holidays()
                .into_iter()
                .map(|h| (h.date, h.name))
                .collect(),
            ..MemoryState::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub async fn add_employee(&self, id: u64, role: Role, joined_on: NaiveDate) {
        self.state.lock().await.employees.push(Employee {
            id,
            role,
            joined_on,
        });
    }

    pub async fn remove_policy(&self, day_of_week: u8) {
        self.state.lock().await.policies.remove(&day_of_week);
    }

    /// The next attendance insert loses a race against a concurrently
    /// committed absence placeholder for the same employee and day.
    pub async fn race_next_insert_with_absence(&self) {
        self.state.lock().await.racing_absence = true;
    }

    pub async fn attendance_count(&self) -> usize {
        self.state.lock().await.attendance.len()
    }
}

pub struct MemoryTx<'a> {
    shared: MutexGuard<'a, MemoryState>,
    staged: MemoryState,
}

fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> (NaiveDate, u64)) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

impl Repository for MemoryRepository {
    type Tx<'a>
        = MemoryTx<'a>
    where
        Self: 'a;

    async fn begin(&self) -> Result<MemoryTx<'_>, StoreError> {
        let shared = self.state.lock().await;
        let staged = shared.clone();
        Ok(MemoryTx { shared, staged })
    }

    async fn list_attendance(
        &self,
        filter: &AttendanceFilter,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let state = self.state.lock().await;
        let mut records: Vec<_> = state
            .attendance
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        newest_first(&mut records, |r| (r.date, r.id));
        Ok(records)
    }

    async fn list_overtime(
        &self,
        filter: &OvertimeFilter,
    ) -> Result<Vec<OvertimeRecord>, StoreError> {
        let state = self.state.lock().await;
        let mut records: Vec<_> = state
            .overtime
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        newest_first(&mut records, |r| (r.date, r.id));
        Ok(records)
    }

    async fn list_employees(&self) -> Result<Vec<Employee>, StoreError> {
        Ok(self.state.lock().await.employees.clone())
    }

    async fn list_policies(&self) -> Result<Vec<WorkSchedule>, StoreError> {
        Ok(self.state.lock().await.policies.values().cloned().collect())
    }

    async fn list_holidays(&self) -> Result<Vec<Holiday>, StoreError> {
        Ok(self
            .state
            .lock()
            .await
            .holidays
            .iter()
            .map(|(date, name)| Holiday {
                date: *date,
                name: name.clone(),
            })
            .collect())
    }
}

impl Transaction for MemoryTx<'_> {
    async fn attendance_for_update(
        &mut self,
        employee_id: u64,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        Ok(self
            .staged
            .attendance
            .iter()
            .find(|r| r.employee_id == employee_id && r.date == date)
            .cloned())
    }

    async fn save_attendance(
        &mut self,
        mut record: AttendanceRecord,
    ) -> Result<AttendanceRecord, StoreError> {
        if record.is_persisted() {
            let slot = self
                .staged
                .attendance
                .iter_mut()
                .find(|r| r.id == record.id)
                .ok_or_else(|| StoreError::Corrupt(format!("attendance {} vanished", record.id)))?;
            *slot = record.clone();
            return Ok(record);
        }

        if self.shared.racing_absence {
            // The competing writer commits straight into the shared state.
            let shared = &mut *self.shared;
            shared.racing_absence = false;
            shared.next_attendance_id += 1;
            let mut placeholder = AttendanceRecord::absent(record.employee_id, record.date);
            placeholder.id = shared.next_attendance_id;
            shared.attendance.push(placeholder);
            return Err(StoreError::Duplicate);
        }

        if self
            .staged
            .attendance
            .iter()
            .any(|r| r.employee_id == record.employee_id && r.date == record.date)
        {
            return Err(StoreError::Duplicate);
        }

        self.staged.next_attendance_id += 1;
        record.id = self.staged.next_attendance_id;
        self.staged.attendance.push(record.clone());
        Ok(record)
    }

    async fn open_overtime(
        &mut self,
        employee_id: u64,
        date: NaiveDate,
    ) -> Result<Option<OvertimeRecord>, StoreError> {
        Ok(self
            .staged
            .overtime
            .iter()
            .filter(|r| r.employee_id == employee_id && r.date == date && r.is_open())
            .min_by_key(|r| r.id)
            .cloned())
    }

    async fn overtime_for_update(&mut self, id: u64) -> Result<Option<OvertimeRecord>, StoreError> {
        Ok(self.staged.overtime.iter().find(|r| r.id == id).cloned())
    }

    async fn save_overtime(
        &mut self,
        mut record: OvertimeRecord,
    ) -> Result<OvertimeRecord, StoreError> {
        if record.is_persisted() {
            let slot = self
                .staged
                .overtime
                .iter_mut()
                .find(|r| r.id == record.id)
                .ok_or_else(|| StoreError::Corrupt(format!("overtime {} vanished", record.id)))?;
            *slot = record.clone();
            return Ok(record);
        }

        self.staged.next_overtime_id += 1;
        record.id = self.staged.next_overtime_id;
        self.staged.overtime.push(record.clone());
        Ok(record)
    }

    async fn policy(&mut self, day_of_week: u8) -> Result<Option<WorkSchedule>, StoreError> {
        Ok(self.staged.policies.get(&day_of_week).cloned())
    }

    async fn is_holiday(&mut self, date: NaiveDate) -> Result<bool, StoreError> {
        Ok(self.staged.holidays.contains_key(&date))
    }

    async fn save_policy(&mut self, policy: &WorkSchedule) -> Result<(), StoreError> {
        self.staged.policies.insert(policy.day_of_week, policy.clone());
        Ok(())
    }

    async fn replace_policies(&mut self, policies: &[WorkSchedule]) -> Result<(), StoreError> {
        self.staged.policies = policies
            .iter()
            .map(|p| (p.day_of_week, p.clone()))
            .collect();
        Ok(())
    }

    async fn insert_holiday(&mut self, holiday: &Holiday) -> Result<(), StoreError> {
        if self.staged.holidays.contains_key(&holiday.date) {
            return Err(StoreError::Duplicate);
        }
        self.staged.holidays.insert(holiday.date, holiday.name.clone());
        Ok(())
    }

    async fn update_holiday(
        &mut self,
        old_date: NaiveDate,
        holiday: &Holiday,
    ) -> Result<bool, StoreError> {
        if !self.staged.holidays.contains_key(&old_date) {
            return Ok(false);
        }
        if holiday.date != old_date && self.staged.holidays.contains_key(&holiday.date) {
            return Err(StoreError::Duplicate);
        }
        self.staged.holidays.remove(&old_date);
        self.staged.holidays.insert(holiday.date, holiday.name.clone());
        Ok(true)
    }

    async fn holiday(&mut self, date: NaiveDate) -> Result<Option<Holiday>, StoreError> {
        Ok(self.staged.holidays.get(&date).map(|name| Holiday {
            date,
            name: name.clone(),
        }))
    }

    async fn delete_holiday(&mut self, date: NaiveDate) -> Result<bool, StoreError> {
        Ok(self.staged.holidays.remove(&date).is_some())
    }

    async fn replace_holidays(&mut self, holidays: &[Holiday]) -> Result<(), StoreError> {
        self.staged.holidays = holidays
            .iter()
            .map(|h| (h.date, h.name.clone()))
            .collect();
        Ok(())
    }

    async fn commit(mut self) -> Result<(), StoreError> {
        *self.shared = self.staged;
        Ok(())
    }
}
