use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use crate::db::filter::BookingFilter;
use crate::db::queries;
use crate::errors::AppError;
use crate::models::booking::parse_day;
use crate::models::{Booking, CreateBookingRequest, Envelope};
use crate::state::AppState;

const NOT_FOUND: &str = "Booking not found";

// POST /bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<Booking>>), AppError> {
    let Json(request) = body.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    let booking = request.into_booking(Utc::now())?;

    let db = state.storage.handle()?;

    // Check and insert are separate calls; concurrent creates with the same
    // id can both pass the check.
    let existing = {
        let conn = db.conn()?;
        queries::find_booking(&conn, db.bookings(), &booking.booking_id)?
    };
    if existing.is_some() {
        return Err(AppError::Conflict(
            "Booking with this id already exists.".to_string(),
        ));
    }

    {
        let conn = db.conn()?;
        queries::insert_booking(&conn, db.bookings(), &booking)?;
    }

    tracing::info!(booking_id = %booking.booking_id, vendor = %booking.vendor, "booking created");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message("Booking created successfully", booking)),
    ))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListBookingsQuery {
    pub date: Option<String>,
    pub vendor: Option<String>,
}

impl ListBookingsQuery {
    pub fn into_filter(self) -> Result<BookingFilter, AppError> {
        let mut filter = BookingFilter::all();

        if let Some(date) = self.date.filter(|d| !d.is_empty()) {
            let day = parse_day(&date).ok_or_else(|| {
                AppError::Validation("Invalid date filter, expected YYYY-MM-DD".to_string())
            })?;
            filter = filter.on_day(day);
        }

        if let Some(vendor) = self.vendor.filter(|v| !v.is_empty()) {
            filter = filter.vendor(vendor);
        }

        Ok(filter)
    }
}

// GET /bookings
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListBookingsQuery>, QueryRejection>,
) -> Result<Json<Envelope<Vec<Booking>>>, AppError> {
    let Query(query) = query.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    let filter = query.into_filter()?;
    let db = state.storage.handle()?;

    let bookings = {
        let conn = db.conn()?;
        queries::find_bookings(&conn, db.bookings(), &filter)?
    };

    Ok(Json(Envelope::data(bookings)))
}

// GET /bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Booking>>, AppError> {
    let db = state.storage.handle()?;

    let booking = {
        let conn = db.conn()?;
        queries::find_booking(&conn, db.bookings(), &id)?
    };

    booking
        .map(|b| Json(Envelope::data(b)))
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
}

// DELETE /bookings/:id
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<()>>, AppError> {
    let db = state.storage.handle()?;

    let deleted = {
        let conn = db.conn()?;
        queries::delete_booking(&conn, db.bookings(), &id)?
    };

    if deleted == 0 {
        return Err(AppError::NotFound(NOT_FOUND.to_string()));
    }

    tracing::info!(booking_id = %id, "booking deleted");
    Ok(Json(Envelope::message("Booking deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::filter::Predicate;

    fn query(date: Option<&str>, vendor: Option<&str>) -> ListBookingsQuery {
        ListBookingsQuery {
            date: date.map(String::from),
            vendor: vendor.map(String::from),
        }
    }

    #[test]
    fn test_empty_params_are_ignored() {
        let filter = query(Some(""), Some("")).into_filter().unwrap();
        assert!(filter.predicates().is_empty());
    }

    #[test]
    fn test_vendor_only() {
        let filter = query(None, Some("V1")).into_filter().unwrap();
        assert_eq!(filter.predicates(), &[Predicate::VendorEq("V1".to_string())]);
    }

    #[test]
    fn test_invalid_date_rejected() {
        for date in ["03/01/2024", "+10000-01-01"] {
            let err = query(Some(date), None).into_filter().unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
    }
}
