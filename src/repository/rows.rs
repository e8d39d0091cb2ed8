//! Flat MySQL rows and their mapping to the nested aggregates.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::FromRow;

use crate::error::StoreError;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus, Evidence, Location};
use crate::model::overtime::{OvertimeRecord, OvertimeStatus};
use crate::model::role::Role;
use crate::model::schedule::{Holiday, WorkSchedule};
use crate::model::user::Employee;

pub const ATTENDANCE_COLUMNS: &str = "id, user_id, date, \
    check_in_time, check_in_photo, check_in_latitude, check_in_longitude, check_in_address, \
    check_out_time, check_out_photo, check_out_latitude, check_out_longitude, check_out_address, \
    status, work_hours";

pub const OVERTIME_COLUMNS: &str =
    "id, user_id, date, start_time, end_time, duration, reason, status, approved_by";

#[derive(Debug, FromRow)]
pub struct AttendanceRow {
    pub id: u64,
    pub user_id: u64,
    pub date: NaiveDate,
    pub check_in_time: Option<NaiveTime>,
    pub check_in_photo: Option<String>,
    pub check_in_latitude: Option<f64>,
    pub check_in_longitude: Option<f64>,
    pub check_in_address: Option<String>,
    pub check_out_time: Option<NaiveTime>,
    pub check_out_photo: Option<String>,
    pub check_out_latitude: Option<f64>,
    pub check_out_longitude: Option<f64>,
    pub check_out_address: Option<String>,
    pub status: String,
    pub work_hours: f64,
}

/// Column values of one evidence slot, all `NULL` when the slot is empty.
pub struct EvidenceColumns<'a> {
    pub time: Option<NaiveTime>,
    pub photo: Option<&'a str>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<&'a str>,
}

impl<'a> EvidenceColumns<'a> {
    pub fn of(evidence: Option<&'a Evidence>) -> Self {
        Self {
            time: evidence.map(|e| e.time),
            photo: evidence.map(|e| e.photo.as_str()),
            latitude: evidence.map(|e| e.location.latitude),
            longitude: evidence.map(|e| e.location.longitude),
            address: evidence.map(|e| e.location.address.as_str()),
        }
    }
}

fn evidence(
    time: Option<NaiveTime>,
    photo: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    address: Option<String>,
) -> Option<Evidence> {
    time.map(|time| Evidence {
        time,
        photo: photo.unwrap_or_default(),
        location: Location {
            latitude: latitude.unwrap_or_default(),
            longitude: longitude.unwrap_or_default(),
            address: address.unwrap_or_default(),
        },
    })
}

impl TryFrom<AttendanceRow> for AttendanceRecord {
    type Error = StoreError;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        let status = AttendanceStatus::from_str(&row.status).map_err(|_| {
            StoreError::Corrupt(format!(
                "attendance {} has unknown status {:?}",
                row.id, row.status
            ))
        })?;
        let check_in = evidence(
            row.check_in_time,
            row.check_in_photo,
            row.check_in_latitude,
            row.check_in_longitude,
            row.check_in_address,
        );
        let check_out = evidence(
            row.check_out_time,
            row.check_out_photo,
            row.check_out_latitude,
            row.check_out_longitude,
            row.check_out_address,
        );
        if check_out.is_some() && check_in.is_none() {
            return Err(StoreError::Corrupt(format!(
                "attendance {} has a check-out without a check-in",
                row.id
            )));
        }

        Ok(AttendanceRecord {
            id: row.id,
            employee_id: row.user_id,
            date: row.date,
            check_in,
            check_out,
            status,
            work_hours: row.work_hours,
        })
    }
}

#[derive(Debug, FromRow)]
pub struct OvertimeRow {
    pub id: u64,
    pub user_id: u64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: Option<NaiveTime>,
    pub duration: f64,
    pub reason: String,
    pub status: String,
    pub approved_by: Option<u64>,
}

impl TryFrom<OvertimeRow> for OvertimeRecord {
    type Error = StoreError;

    fn try_from(row: OvertimeRow) -> Result<Self, Self::Error> {
        let status = OvertimeStatus::from_str(&row.status).map_err(|_| {
            StoreError::Corrupt(format!(
                "overtime {} has unknown status {:?}",
                row.id, row.status
            ))
        })?;
        Ok(OvertimeRecord {
            id: row.id,
            employee_id: row.user_id,
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
            duration: row.duration,
            reason: row.reason,
            status,
            approved_by: row.approved_by,
        })
    }
}

#[derive(Debug, FromRow)]
pub struct ScheduleRow {
    pub day_of_week: u8,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub min_work_hours: f64,
}

impl From<ScheduleRow> for WorkSchedule {
    fn from(row: ScheduleRow) -> Self {
        WorkSchedule {
            day_of_week: row.day_of_week,
            start_time: row.start_time,
            end_time: row.end_time,
            min_work_hours: row.min_work_hours,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct HolidayRow {
    pub date: NaiveDate,
    pub name: String,
}

impl From<HolidayRow> for Holiday {
    fn from(row: HolidayRow) -> Self {
        Holiday {
            date: row.date,
            name: row.name,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct EmployeeRow {
    pub id: u64,
    pub role_id: u8,
    pub created_at: NaiveDateTime,
}

impl TryFrom<EmployeeRow> for Employee {
    type Error = StoreError;

    fn try_from(row: EmployeeRow) -> Result<Self, Self::Error> {
        let role = Role::from_id(row.role_id).ok_or_else(|| {
            StoreError::Corrupt(format!("user {} has unknown role {}", row.id, row.role_id))
        })?;
        Ok(Employee {
            id: row.id,
            role,
            joined_on: row.created_at.date(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> AttendanceRow {
        AttendanceRow {
            id: 5,
            user_id: 7,
            date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            check_in_time: NaiveTime::from_hms_opt(8, 5, 0),
            check_in_photo: Some("in.jpg".into()),
            check_in_latitude: Some(-6.2),
            check_in_longitude: Some(106.8),
            check_in_address: Some("Gate A".into()),
            check_out_time: None,
            check_out_photo: None,
            check_out_latitude: None,
            check_out_longitude: None,
            check_out_address: None,
            status: "late".into(),
            work_hours: 0.0,
        }
    }

    #[test]
    fn flat_row_becomes_nested_evidence() {
        let record = AttendanceRecord::try_from(row()).unwrap();
        assert_eq!(record.employee_id, 7);
        assert_eq!(record.status, AttendanceStatus::Late);
        let check_in = record.check_in.unwrap();
        assert_eq!(check_in.location.address, "Gate A");
        assert_eq!(check_in.photo, "in.jpg");
        assert!(record.check_out.is_none());
    }

    #[test]
    fn unknown_status_is_corrupt() {
        let mut bad = row();
        bad.status = "sick".into();
        assert!(matches!(
            AttendanceRecord::try_from(bad),
            Err(StoreError::Corrupt(_))
        ));
    }

    #[test]
    fn check_out_without_check_in_is_corrupt() {
        let mut bad = row();
        bad.check_in_time = None;
        bad.check_out_time = NaiveTime::from_hms_opt(16, 0, 0);
        assert!(matches!(
            AttendanceRecord::try_from(bad),
            Err(StoreError::Corrupt(_))
        ));
    }

    #[test]
    fn empty_evidence_slot_maps_to_nulls() {
        let cols = EvidenceColumns::of(None);
        assert!(cols.time.is_none() && cols.photo.is_none() && cols.address.is_none());
    }
}
