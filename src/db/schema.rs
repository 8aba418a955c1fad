use anyhow::Context;
use rusqlite::Connection;

use super::{quote_ident, Collection};

/// Creates the collection table and its lookup indexes if they are missing.
///
/// `booking_id` is indexed but deliberately not unique: uniqueness is checked
/// by the create handler before insert.
pub fn ensure_collection(conn: &Connection, collection: &Collection) -> anyhow::Result<()> {
    let table = collection.table();
    let schema = quote_ident(collection.schema());
    let unqualified = quote_ident(collection.name());
    let index = |column: &str| quote_ident(&format!("{}_{column}_idx", collection.name()));

    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            seq INTEGER PRIMARY KEY,
            booking_id TEXT NOT NULL,
            booking_date TEXT NOT NULL,
            vendor TEXT NOT NULL,
            document TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS {schema}.{booking_id_idx} ON {unqualified} (booking_id);
        CREATE INDEX IF NOT EXISTS {schema}.{booking_date_idx} ON {unqualified} (booking_date);",
        booking_id_idx = index("booking_id"),
        booking_date_idx = index("booking_date"),
    ))
    .with_context(|| {
        format!(
            "failed to create collection {}.{}",
            collection.schema(),
            collection.name()
        )
    })?;

    tracing::debug!(collection = %collection.name(), "collection ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attached() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("ATTACH DATABASE ':memory:' AS shop;")
            .unwrap();
        conn
    }

    #[test]
    fn test_ensure_collection_is_idempotent() {
        let conn = attached();
        let coll = Collection::new("shop", "bookings");
        ensure_collection(&conn, &coll).unwrap();
        ensure_collection(&conn, &coll).unwrap();

        let indexes: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM shop.sqlite_master WHERE type = 'index' AND tbl_name = 'bookings'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(indexes, 2);
    }

    #[test]
    fn test_booking_id_not_unique_at_storage_level() {
        let conn = attached();
        let coll = Collection::new("shop", "bookings");
        ensure_collection(&conn, &coll).unwrap();

        for _ in 0..2 {
            conn.execute(
                "INSERT INTO shop.bookings (booking_id, booking_date, vendor, document) VALUES ('B1', '', '', '{}')",
                [],
            )
            .unwrap();
        }
    }
}
