use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use super::filter::BookingFilter;
use super::Collection;
use crate::errors::AppError;
use crate::models::booking::format_timestamp;
use crate::models::Booking;

pub fn find_booking(
    conn: &Connection,
    collection: &Collection,
    booking_id: &str,
) -> Result<Option<Booking>, AppError> {
    let document: Option<String> = conn
        .query_row(
            &format!(
                "SELECT document FROM {} WHERE booking_id = ?1 ORDER BY seq LIMIT 1",
                collection.table()
            ),
            params![booking_id],
            |row| row.get(0),
        )
        .optional()?;

    match document {
        Some(doc) => Ok(Some(serde_json::from_str(&doc)?)),
        None => Ok(None),
    }
}

pub fn insert_booking(
    conn: &Connection,
    collection: &Collection,
    booking: &Booking,
) -> Result<(), AppError> {
    let document = serde_json::to_string(booking)?;

    conn.execute(
        &format!(
            "INSERT INTO {} (booking_id, booking_date, vendor, document) VALUES (?1, ?2, ?3, ?4)",
            collection.table()
        ),
        params![
            booking.booking_id,
            format_timestamp(&booking.booking_date),
            booking.vendor,
            document,
        ],
    )?;
    Ok(())
}

/// Matching bookings, most recent `bookingDate` first.
pub fn find_bookings(
    conn: &Connection,
    collection: &Collection,
    filter: &BookingFilter,
) -> Result<Vec<Booking>, AppError> {
    let (clause, values) = filter.to_sql();
    let mut stmt = conn.prepare(&format!(
        "SELECT document FROM {} WHERE {clause} ORDER BY booking_date DESC, seq DESC",
        collection.table()
    ))?;

    let documents = stmt
        .query_map(params_from_iter(values.iter()), |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut bookings = Vec::with_capacity(documents.len());
    for doc in documents {
        bookings.push(serde_json::from_str(&doc)?);
    }
    Ok(bookings)
}

/// Removes at most one booking with the given id. Returns the number removed.
pub fn delete_booking(
    conn: &Connection,
    collection: &Collection,
    booking_id: &str,
) -> Result<usize, AppError> {
    let table = collection.table();
    let count = conn.execute(
        &format!(
            "DELETE FROM {table} WHERE seq = (SELECT seq FROM {table} WHERE booking_id = ?1 ORDER BY seq LIMIT 1)"
        ),
        params![booking_id],
    )?;
    Ok(count)
}
