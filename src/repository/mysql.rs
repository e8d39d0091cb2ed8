use chrono::NaiveDate;
use sqlx::{MySql, MySqlPool};

use crate::error::StoreError;
use crate::model::attendance::AttendanceRecord;
use crate::model::overtime::OvertimeRecord;
use crate::model::schedule::{Holiday, WorkSchedule};
use crate::model::user::Employee;
use crate::repository::rows::{
    ATTENDANCE_COLUMNS, AttendanceRow, EmployeeRow, EvidenceColumns, HolidayRow,
    OVERTIME_COLUMNS, OvertimeRow, ScheduleRow,
};
use crate::repository::{AttendanceFilter, OvertimeFilter, Repository, Transaction};

#[derive(Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

pub struct MySqlTx {
    tx: sqlx::Transaction<'static, MySql>,
}

// Helper enum for typed SQLx binding
enum FilterValue {
    U64(u64),
    Date(NaiveDate),
}

impl Repository for MySqlRepository {
    type Tx<'a>
        = MySqlTx
    where
        Self: 'a;

    async fn begin(&self) -> Result<MySqlTx, StoreError> {
        let tx = self.pool.begin().await.map_err(StoreError::from_sqlx)?;
        Ok(MySqlTx { tx })
    }

    async fn list_attendance(
        &self,
        filter: &AttendanceFilter,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let mut where_sql = String::from(" WHERE 1=1");
        let mut args: Vec<FilterValue> = Vec::new();

        if let Some(id) = filter.employee_id {
            where_sql.push_str(" AND user_id = ?");
            args.push(FilterValue::U64(id));
        }
        if let Some(date) = filter.date {
            where_sql.push_str(" AND date = ?");
            args.push(FilterValue::Date(date));
        }
        if let Some(period) = filter.period {
            let (first, next) = period.bounds();
            where_sql.push_str(" AND date >= ? AND date < ?");
            args.push(FilterValue::Date(first));
            args.push(FilterValue::Date(next));
        }

        let sql = format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance_records{where_sql} \
             ORDER BY date DESC, check_in_time DESC"
        );
        let mut q = sqlx::query_as::<_, AttendanceRow>(&sql);
        for arg in args {
            q = match arg {
                FilterValue::U64(v) => q.bind(v),
                FilterValue::Date(v) => q.bind(v),
            };
        }

        q.fetch_all(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)?
            .into_iter()
            .map(AttendanceRecord::try_from)
            .collect()
    }

    async fn list_overtime(
        &self,
        filter: &OvertimeFilter,
    ) -> Result<Vec<OvertimeRecord>, StoreError> {
        let mut where_sql = String::from(" WHERE 1=1");
        let mut args: Vec<FilterValue> = Vec::new();

        if let Some(id) = filter.employee_id {
            where_sql.push_str(" AND user_id = ?");
            args.push(FilterValue::U64(id));
        }
        if let Some(period) = filter.period {
            let (first, next) = period.bounds();
            where_sql.push_str(" AND date >= ? AND date < ?");
            args.push(FilterValue::Date(first));
            args.push(FilterValue::Date(next));
        }

        let sql = format!(
            "SELECT {OVERTIME_COLUMNS} FROM overtime_records{where_sql} \
             ORDER BY date DESC, start_time DESC"
        );
        let mut q = sqlx::query_as::<_, OvertimeRow>(&sql);
        for arg in args {
            q = match arg {
                FilterValue::U64(v) => q.bind(v),
                FilterValue::Date(v) => q.bind(v),
            };
        }

        q.fetch_all(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)?
            .into_iter()
            .map(OvertimeRecord::try_from)
            .collect()
    }

    async fn list_employees(&self) -> Result<Vec<Employee>, StoreError> {
        sqlx::query_as::<_, EmployeeRow>("SELECT id, role_id, created_at FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)?
            .into_iter()
            .map(Employee::try_from)
            .collect()
    }

    async fn list_policies(&self) -> Result<Vec<WorkSchedule>, StoreError> {
        let rows = sqlx::query_as::<_, ScheduleRow>(
            "SELECT day_of_week, start_time, end_time, min_work_hours \
             FROM work_schedules ORDER BY day_of_week",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)?;
        Ok(rows.into_iter().map(WorkSchedule::from).collect())
    }

    async fn list_holidays(&self) -> Result<Vec<Holiday>, StoreError> {
        let rows = sqlx::query_as::<_, HolidayRow>("SELECT date, name FROM holidays ORDER BY date")
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)?;
        Ok(rows.into_iter().map(Holiday::from).collect())
    }
}

impl Transaction for MySqlTx {
    async fn attendance_for_update(
        &mut self,
        employee_id: u64,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        let sql = format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance_records \
             WHERE user_id = ? AND date = ? FOR UPDATE"
        );
        sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(employee_id)
            .bind(date)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(StoreError::from_sqlx)?
            .map(AttendanceRecord::try_from)
            .transpose()
    }

    async fn save_attendance(
        &mut self,
        mut record: AttendanceRecord,
    ) -> Result<AttendanceRecord, StoreError> {
        let check_in = EvidenceColumns::of(record.check_in.as_ref());
        let check_out = EvidenceColumns::of(record.check_out.as_ref());

        if record.is_persisted() {
            sqlx::query(
                r#"
                UPDATE attendance_records
                SET check_in_time = ?, check_in_photo = ?, check_in_latitude = ?,
                    check_in_longitude = ?, check_in_address = ?,
                    check_out_time = ?, check_out_photo = ?, check_out_latitude = ?,
                    check_out_longitude = ?, check_out_address = ?,
                    status = ?, work_hours = ?
                WHERE id = ?
                "#,
            )
            .bind(check_in.time)
            .bind(check_in.photo)
            .bind(check_in.latitude)
            .bind(check_in.longitude)
            .bind(check_in.address)
            .bind(check_out.time)
            .bind(check_out.photo)
            .bind(check_out.latitude)
            .bind(check_out.longitude)
            .bind(check_out.address)
            .bind(record.status.as_ref())
            .bind(record.work_hours)
            .bind(record.id)
            .execute(&mut *self.tx)
            .await
            .map_err(StoreError::from_sqlx)?;
            return Ok(record);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO attendance_records
                (user_id, date,
                 check_in_time, check_in_photo, check_in_latitude, check_in_longitude, check_in_address,
                 check_out_time, check_out_photo, check_out_latitude, check_out_longitude, check_out_address,
                 status, work_hours)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.employee_id)
        .bind(record.date)
        .bind(check_in.time)
        .bind(check_in.photo)
        .bind(check_in.latitude)
        .bind(check_in.longitude)
        .bind(check_in.address)
        .bind(check_out.time)
        .bind(check_out.photo)
        .bind(check_out.latitude)
        .bind(check_out.longitude)
        .bind(check_out.address)
        .bind(record.status.as_ref())
        .bind(record.work_hours)
        .execute(&mut *self.tx)
        .await
        .map_err(StoreError::from_sqlx)?;

        record.id = result.last_insert_id();
        Ok(record)
    }

    async fn open_overtime(
        &mut self,
        employee_id: u64,
        date: NaiveDate,
    ) -> Result<Option<OvertimeRecord>, StoreError> {
        let sql = format!(
            "SELECT {OVERTIME_COLUMNS} FROM overtime_records \
             WHERE user_id = ? AND date = ? AND end_time IS NULL \
             ORDER BY id LIMIT 1 FOR UPDATE"
        );
        sqlx::query_as::<_, OvertimeRow>(&sql)
            .bind(employee_id)
            .bind(date)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(StoreError::from_sqlx)?
            .map(OvertimeRecord::try_from)
            .transpose()
    }

    async fn overtime_for_update(&mut self, id: u64) -> Result<Option<OvertimeRecord>, StoreError> {
        let sql = format!("SELECT {OVERTIME_COLUMNS} FROM overtime_records WHERE id = ? FOR UPDATE");
        sqlx::query_as::<_, OvertimeRow>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(StoreError::from_sqlx)?
            .map(OvertimeRecord::try_from)
            .transpose()
    }

    async fn save_overtime(
        &mut self,
        mut record: OvertimeRecord,
    ) -> Result<OvertimeRecord, StoreError> {
        if record.is_persisted() {
            sqlx::query(
                r#"
                UPDATE overtime_records
                SET end_time = ?, duration = ?, reason = ?, status = ?, approved_by = ?
                WHERE id = ?
                "#,
            )
            .bind(record.end_time)
            .bind(record.duration)
            .bind(&record.reason)
            .bind(record.status.as_ref())
            .bind(record.approved_by)
            .bind(record.id)
            .execute(&mut *self.tx)
            .await
            .map_err(StoreError::from_sqlx)?;
            return Ok(record);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO overtime_records
                (user_id, date, start_time, end_time, duration, reason, status, approved_by)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.employee_id)
        .bind(record.date)
        .bind(record.start_time)
        .bind(record.end_time)
        .bind(record.duration)
        .bind(&record.reason)
        .bind(record.status.as_ref())
        .bind(record.approved_by)
        .execute(&mut *self.tx)
        .await
        .map_err(StoreError::from_sqlx)?;

        record.id = result.last_insert_id();
        Ok(record)
    }

    async fn policy(&mut self, day_of_week: u8) -> Result<Option<WorkSchedule>, StoreError> {
        let row = sqlx::query_as::<_, ScheduleRow>(
            "SELECT day_of_week, start_time, end_time, min_work_hours \
             FROM work_schedules WHERE day_of_week = ?",
        )
        .bind(day_of_week)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(StoreError::from_sqlx)?;
        Ok(row.map(WorkSchedule::from))
    }

    async fn is_holiday(&mut self, date: NaiveDate) -> Result<bool, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM holidays WHERE date = ?")
            .bind(date)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(StoreError::from_sqlx)?;
        Ok(count > 0)
    }

    async fn save_policy(&mut self, policy: &WorkSchedule) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO work_schedules (day_of_week, start_time, end_time, min_work_hours)
            VALUES (?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                start_time = VALUES(start_time),
                end_time = VALUES(end_time),
                min_work_hours = VALUES(min_work_hours)
            "#,
        )
        .bind(policy.day_of_week)
        .bind(policy.start_time)
        .bind(policy.end_time)
        .bind(policy.min_work_hours)
        .execute(&mut *self.tx)
        .await
        .map_err(StoreError::from_sqlx)?;
        Ok(())
    }

    async fn replace_policies(&mut self, policies: &[WorkSchedule]) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM work_schedules")
            .execute(&mut *self.tx)
            .await
            .map_err(StoreError::from_sqlx)?;
        for policy in policies {
            self.save_policy(policy).await?;
        }
        Ok(())
    }

    async fn insert_holiday(&mut self, holiday: &Holiday) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO holidays (date, name) VALUES (?, ?)")
            .bind(holiday.date)
            .bind(&holiday.name)
            .execute(&mut *self.tx)
            .await
            .map_err(StoreError::from_sqlx)?;
        Ok(())
    }

    async fn update_holiday(
        &mut self,
        old_date: NaiveDate,
        holiday: &Holiday,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE holidays SET date = ?, name = ? WHERE date = ?")
            .bind(holiday.date)
            .bind(&holiday.name)
            .bind(old_date)
            .execute(&mut *self.tx)
            .await
            .map_err(StoreError::from_sqlx)?;
        Ok(result.rows_affected() > 0)
    }

    async fn holiday(&mut self, date: NaiveDate) -> Result<Option<Holiday>, StoreError> {
        let row = sqlx::query_as::<_, HolidayRow>("SELECT date, name FROM holidays WHERE date = ?")
            .bind(date)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(StoreError::from_sqlx)?;
        Ok(row.map(Holiday::from))
    }

    async fn delete_holiday(&mut self, date: NaiveDate) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM holidays WHERE date = ?")
            .bind(date)
            .execute(&mut *self.tx)
            .await
            .map_err(StoreError::from_sqlx)?;
        Ok(result.rows_affected() > 0)
    }

    async fn replace_holidays(&mut self, holidays: &[Holiday]) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM holidays")
            .execute(&mut *self.tx)
            .await
            .map_err(StoreError::from_sqlx)?;
        for holiday in holidays {
            self.insert_holiday(holiday).await?;
        }
        Ok(())
    }

    async fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().await.map_err(StoreError::from_sqlx)?;
        Ok(())
    }
}
