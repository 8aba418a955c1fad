use chrono::{Datelike, DateTime, Duration, NaiveDate, TimeZone, Utc};

use crate::models::booking::format_timestamp;

/// A conjunction of predicates over the booking collection. Starts out
/// matching everything; each builder call narrows it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingFilter {
    predicates: Vec<Predicate>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `start <= bookingDate < end`
    BookingDateIn {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    VendorEq(String),
}

impl BookingFilter {
    pub fn all() -> Self {
        Self::default()
    }

    /// Restricts to bookings whose date falls on the given UTC calendar day.
    pub fn on_day(mut self, day: NaiveDate) -> Self {
        let start = Utc.from_utc_datetime(&day.and_time(chrono::NaiveTime::MIN));
        self.predicates.push(Predicate::BookingDateIn {
            start,
            end: start + Duration::days(1),
        });
        self
    }

    pub fn vendor(mut self, vendor: impl Into<String>) -> Self {
        self.predicates.push(Predicate::VendorEq(vendor.into()));
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Renders the filter as a `WHERE` clause body plus its positional
    /// parameters.
    pub fn to_sql(&self) -> (String, Vec<String>) {
        let mut clause = String::from("1 = 1");
        let mut params = Vec::new();

        for predicate in &self.predicates {
            match predicate {
                Predicate::BookingDateIn { start, end } => {
                    params.push(format_timestamp(start));
                    clause.push_str(&format!(" AND booking_date >= ?{}", params.len()));
                    // Every storable date sorts below a five-digit year, whose
                    // rendering is not fixed-width.
                    if end.year() <= 9999 {
                        params.push(format_timestamp(end));
                        clause.push_str(&format!(" AND booking_date < ?{}", params.len()));
                    }
                }
                Predicate::VendorEq(vendor) => {
                    params.push(vendor.clone());
                    clause.push_str(&format!(" AND vendor = ?{}", params.len()));
                }
            }
        }

        (clause, params)
    }
}
