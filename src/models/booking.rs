use chrono::{Datelike, DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub booking_id: String,
    pub customer_name: String,
    #[serde(with = "timestamp")]
    pub booking_date: DateTime<Utc>,
    pub amount: serde_json::Number,
    pub vendor: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /bookings`. Every field is optional at the wire level so
/// that absence can be reported as a validation failure instead of a
/// deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub booking_id: Option<String>,
    pub customer_name: Option<String>,
    pub booking_date: Option<String>,
    pub amount: Option<serde_json::Number>,
    pub vendor: Option<String>,
}

impl CreateBookingRequest {
    pub fn into_booking(self, now: DateTime<Utc>) -> Result<Booking, AppError> {
        let (Some(booking_id), Some(customer_name), Some(booking_date), Some(amount), Some(vendor)) = (
            present(self.booking_id),
            present(self.customer_name),
            present(self.booking_date),
            self.amount,
            present(self.vendor),
        ) else {
            return Err(AppError::Validation("Missing required fields".to_string()));
        };

        let booking_date = parse_booking_date(&booking_date)
            .ok_or_else(|| AppError::Validation("Invalid bookingDate".to_string()))?;

        Ok(Booking {
            booking_id,
            customer_name,
            booking_date,
            amount,
            vendor,
            created_at: now,
            updated_at: now,
        })
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Normalizes a submitted booking date. A bare `YYYY-MM-DD` is midnight UTC;
/// timestamps with an offset are converted to UTC; timestamps without one are
/// taken as UTC. Years outside 0000..=9999 are rejected.
pub fn parse_booking_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Some(day) = parse_day(s) {
        return Some(Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN)));
    }

    let parsed = DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|naive| Utc.from_utc_datetime(&naive))
        })?;

    storable_year(parsed.year()).then_some(parsed)
}

/// Parses a `YYYY-MM-DD` calendar day within the storable year range.
pub fn parse_day(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .filter(|day| storable_year(day.year()))
}

// `format_timestamp` is only fixed-width for four-digit years.
fn storable_year(year: i32) -> bool {
    (0..=9999).contains(&year)
}

/// Fixed-width UTC rendering, so lexical order matches chronological order.
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_timestamp(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
