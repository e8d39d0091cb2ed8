//! `HH:MM` wire format for wall-clock times.
//!
//! Records are kept at minute granularity, so seconds are dropped on the way
//! out and rejected on the way in.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serializer, de::Error};

pub const FORMAT: &str = "%H:%M";

/// Drops seconds and sub-seconds.
pub fn truncate(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

pub fn parse(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), FORMAT).ok()
}

pub fn format(time: NaiveTime) -> String {
    time.format(FORMAT).to_string()
}

pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(*time))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| D::Error::custom(format!("expected HH:MM, got {raw:?}")))
}

pub mod option {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(
        time: &Option<NaiveTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match time {
            Some(t) => super::serialize(t, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveTime>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => super::parse(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("expected HH:MM, got {raw:?}"))),
            None => Ok(None),
        }
    }
}
