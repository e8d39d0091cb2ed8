use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

use crate::utils::hhmm;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OvertimeStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OvertimeRecord {
    /// `0` until the record has been persisted.
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 2)]
    pub employee_id: u64,
    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    #[schema(example = "16:15", value_type = String)]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm::option")]
    #[schema(example = "18:45", value_type = Option<String>)]
    pub end_time: Option<NaiveTime>,
    #[schema(example = 2.5)]
    pub duration: f64,
    #[schema(example = "finishing report")]
    pub reason: String,
    pub status: OvertimeStatus,
    #[schema(example = 1, nullable = true)]
    pub approved_by: Option<u64>,
}

impl OvertimeRecord {
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StartOvertimeRequest {
    #[schema(example = "finishing report")]
    pub reason: String,
}
