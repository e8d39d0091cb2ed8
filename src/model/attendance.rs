use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

use crate::error::RuleError;
use crate::utils::hhmm;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    pub latitude: f64,
    #[schema(example = 106.816666)]
    pub longitude: f64,
    #[schema(example = "Jl. Sudirman No. 1, Jakarta")]
    pub address: String,
}

/// Photo and position captured with a check-in or check-out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Evidence {
    #[serde(with = "hhmm")]
    #[schema(example = "08:05", value_type = String)]
    pub time: NaiveTime,
    /// Opaque image payload (data URL or storage URL).
    #[schema(example = "data:image/jpeg;base64,/9j/4AAQ...")]
    pub photo: String,
    pub location: Location,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Late,
    Absent,
    Holiday,
}

/// One employee's attendance for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    /// `0` until the record has been persisted.
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 2)]
    pub employee_id: u64,
    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub date: NaiveDate,
    pub check_in: Option<Evidence>,
    pub check_out: Option<Evidence>,
    pub status: AttendanceStatus,
    #[schema(example = 8.08)]
    pub work_hours: f64,
}

impl AttendanceRecord {
    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }

    /// Placeholder for a closed working day without any check-in.
    pub fn absent(employee_id: u64, date: NaiveDate) -> Self {
        Self {
            id: 0,
            employee_id,
            date,
            check_in: None,
            check_out: None,
            status: AttendanceStatus::Absent,
            work_hours: 0.0,
        }
    }
}

/// Body of a check-in or check-out request. The time is stamped server-side.
#[derive(Debug, Deserialize, ToSchema)]
pub struct EvidencePayload {
    #[schema(example = "data:image/jpeg;base64,/9j/4AAQ...")]
    pub photo: String,
    pub location: Location,
}

impl EvidencePayload {
    /// Every check-in and check-out must carry a photo.
    pub fn validate(&self) -> Result<(), RuleError> {
        if self.photo.trim().is_empty() {
            return Err(RuleError::InvalidInput("Photo is required".into()));
        }
        Ok(())
    }

    pub fn stamp(self, time: NaiveTime) -> Evidence {
        Evidence {
            time: hhmm::truncate(time),
            photo: self.photo,
            location: self.location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn status_text_matches_storage_values() {
        assert_eq!(AttendanceStatus::Late.as_ref(), "late");
        assert_eq!(
            AttendanceStatus::from_str("present").unwrap(),
            AttendanceStatus::Present
        );
        assert!(AttendanceStatus::from_str("sick").is_err());
    }

    #[test]
    fn evidence_uses_minute_wire_format() {
        let evidence = EvidencePayload {
            photo: "blob".into(),
            location: Location {
                latitude: -6.2,
                longitude: 106.8,
                address: "HQ".into(),
            },
        }
        .stamp(NaiveTime::from_hms_opt(8, 5, 42).unwrap());

        let value = serde_json::to_value(&evidence).unwrap();
        assert_eq!(value["time"], json!("08:05"));
        assert_eq!(value["location"]["address"], json!("HQ"));
    }
}
