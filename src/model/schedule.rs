use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::utils::hhmm;

/// Working hours for one weekday (`0` = Sunday .. `6` = Saturday).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkSchedule {
    #[schema(example = 1)]
    pub day_of_week: u8,
    #[serde(with = "hhmm")]
    #[schema(example = "08:00", value_type = String)]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    #[schema(example = "16:00", value_type = String)]
    pub end_time: NaiveTime,
    #[schema(example = 8.0)]
    pub min_work_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Holiday {
    #[schema(example = "2026-08-17", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(example = "Hari Kemerdekaan")]
    pub name: String,
}

/// Policy in force on a given date.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSchedule {
    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    #[schema(example = "08:00", value_type = String)]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    #[schema(example = "16:00", value_type = String)]
    pub end_time: NaiveTime,
    #[schema(example = 8.0)]
    pub min_work_hours: f64,
    pub is_holiday: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSchedule {
    #[schema(example = 6)]
    pub day_of_week: u8,
    #[serde(default, with = "hhmm::option")]
    #[schema(example = "08:00", value_type = Option<String>)]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "hhmm::option")]
    #[schema(example = "13:00", value_type = Option<String>)]
    pub end_time: Option<NaiveTime>,
    #[schema(example = 5.0)]
    pub min_work_hours: Option<f64>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHoliday {
    #[schema(example = "2026-10-20", value_type = String, format = "date")]
    pub old_date: NaiveDate,
    #[schema(example = "2026-10-21", value_type = Option<String>, format = "date")]
    pub date: Option<NaiveDate>,
    pub name: Option<String>,
}

// Sunday..Friday 08:00-16:00 for 8 hours, Saturday 08:00-13:00 for 5 hours.
const DEFAULT_WEEK: [(u8, (u32, u32), (u32, u32), f64); 7] = [
    (0, (8, 0), (16, 0), 8.0),
    (1, (8, 0), (16, 0), 8.0),
    (2, (8, 0), (16, 0), 8.0),
    (3, (8, 0), (16, 0), 8.0),
    (4, (8, 0), (16, 0), 8.0),
    (5, (8, 0), (16, 0), 8.0),
    (6, (8, 0), (13, 0), 5.0),
];

const DEFAULT_HOLIDAY_YEAR: i32 = 2026;

const DEFAULT_HOLIDAYS: [(u32, u32, &str); 15] = [
    (1, 1, "Tahun Baru"),
    (1, 29, "Tahun Baru Imlek"),
    (3, 20, "Hari Raya Nyepi"),
    (3, 31, "Wafat Isa Al-Masih"),
    (4, 3, "Isra Mi'raj"),
    (5, 1, "Hari Buruh"),
    (5, 13, "Kenaikan Isa Al-Masih"),
    (5, 14, "Idul Fitri"),
    (5, 15, "Idul Fitri"),
    (6, 1, "Hari Lahir Pancasila"),
    (7, 21, "Idul Adha"),
    (8, 11, "Tahun Baru Islam"),
    (8, 17, "Hari Kemerdekaan"),
    (10, 20, "Maulid Nabi"),
    (12, 25, "Natal"),
];

/// Canonical weekly schedule used for first-run seeding and for reset.
pub fn default_work_schedules() -> Vec<WorkSchedule> {
    DEFAULT_WEEK
        .iter()
        .filter_map(|&(day, (sh, sm), (eh, em), hours)| {
            Some(WorkSchedule {
                day_of_week: day,
                start_time: NaiveTime::from_hms_opt(sh, sm, 0)?,
                end_time: NaiveTime::from_hms_opt(eh, em, 0)?,
                min_work_hours: hours,
            })
        })
        .collect()
}

/// Canonical holiday calendar used for first-run seeding and for reset.
pub fn default_holidays() -> Vec<Holiday> {
    DEFAULT_HOLIDAYS
        .iter()
        .filter_map(|&(month, day, name)| {
            Some(Holiday {
                date: NaiveDate::from_ymd_opt(DEFAULT_HOLIDAY_YEAR, month, day)?,
                name: name.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_weekday_once() {
        let week = default_work_schedules();
        let days: Vec<u8> = week.iter().map(|s| s.day_of_week).collect();
        assert_eq!(days, vec![0, 1, 2, 3, 4, 5, 6]);
        assert!(week.iter().all(|s| s.start_time < s.end_time && s.min_work_hours > 0.0));
    }

    #[test]
    fn default_holidays_are_unique_dates() {
        let holidays = default_holidays();
        assert_eq!(holidays.len(), DEFAULT_HOLIDAYS.len());
        let mut dates: Vec<_> = holidays.iter().map(|h| h.date).collect();
        dates.dedup();
        assert_eq!(dates.len(), holidays.len());
    }
}
