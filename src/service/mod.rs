//! Orchestration of the rule engine against a [`Repository`](crate::repository::Repository).
//!
//! Every mutating operation follows the same shape: open a transaction, lock
//! the `(employee, date)` key, resolve the day's schedule, apply the pure
//! transition from [`crate::rules`], persist and commit. `now` is always passed
//! in by the caller.

pub mod attendance;
pub mod calendar;
pub mod overtime;
pub mod stats;

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

    use crate::model::attendance::{EvidencePayload, Location};
    use crate::model::role::Role;
    use crate::repository::memory::MemoryRepository;

    pub const ADMIN: u64 = 1;
    pub const BUDI: u64 = 7;
    pub const SITI: u64 = 8;

    /// Monday, a regular 08:00-16:00 working day.
    pub fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
    }

    pub fn at(date: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        date.and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap())
    }

    pub fn evidence() -> EvidencePayload {
        EvidencePayload {
            photo: "data:image/jpeg;base64,AAAA".into(),
            location: Location {
                latitude: -6.2,
                longitude: 106.8,
                address: "Jl. Sudirman No. 1".into(),
            },
        }
    }

    pub async fn repo() -> MemoryRepository {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let joined = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        let repo = MemoryRepository::seeded();
        repo.add_employee(ADMIN, Role::Admin, joined).await;
        repo.add_employee(BUDI, Role::Employee, joined).await;
        repo.add_employee(SITI, Role::Employee, joined).await;
        repo
    }
}
