pub mod filter;
pub mod queries;
pub mod schema;

use std::sync::{Mutex, MutexGuard, OnceLock};

use anyhow::Context;
use rusqlite::Connection;

use crate::config::AppConfig;
use crate::errors::AppError;

/// Owns the process-wide database handle. Constructed once in `main` and
/// shared through `AppState`; the handle only exists after `connect` succeeds.
pub struct Storage {
    url: String,
    database_name: String,
    collection_name: String,
    handle: OnceLock<Database>,
}

impl Storage {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            url: config.database_url.clone(),
            database_name: config.database_name.clone(),
            collection_name: config.collection_name.clone(),
            handle: OnceLock::new(),
        }
    }

    /// Opens the database and ensures the booking collection exists. A second
    /// call after success returns the existing handle.
    pub fn connect(&self) -> anyhow::Result<&Database> {
        if let Some(db) = self.handle.get() {
            return Ok(db);
        }

        let db = Database::open(&self.url, &self.database_name, &self.collection_name)?;
        tracing::info!(
            database = %self.database_name,
            collection = %self.collection_name,
            "connected to database"
        );
        Ok(self.handle.get_or_init(|| db))
    }

    pub fn handle(&self) -> Result<&Database, AppError> {
        self.handle.get().ok_or(AppError::Uninitialized)
    }
}

/// A live connection with the database file attached under its configured
/// name.
pub struct Database {
    conn: Mutex<Connection>,
    bookings: Collection,
}

impl Database {
    pub fn open(url: &str, name: &str, collection: &str) -> anyhow::Result<Self> {
        if name.eq_ignore_ascii_case("main") || name.eq_ignore_ascii_case("temp") {
            anyhow::bail!("database name `{name}` is reserved");
        }

        let path = sqlite_path(url);
        let conn = Connection::open_in_memory().context("failed to open connection")?;

        conn.execute(
            &format!("ATTACH DATABASE ?1 AS {}", quote_ident(name)),
            [path],
        )
        .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(&format!("PRAGMA {}.journal_mode=WAL;", quote_ident(name)))
            .context("failed to set database pragmas")?;

        let bookings = Collection::new(name, collection);
        schema::ensure_collection(&conn, &bookings)?;

        Ok(Self {
            conn: Mutex::new(conn),
            bookings,
        })
    }

    pub fn bookings(&self) -> &Collection {
        &self.bookings
    }

    /// Locks the connection for the duration of one storage call.
    pub fn conn(&self) -> Result<MutexGuard<'_, Connection>, AppError> {
        self.conn.lock().map_err(|_| AppError::LockPoisoned)
    }
}

/// A named table of JSON documents inside an attached database.
#[derive(Debug, Clone)]
pub struct Collection {
    schema: String,
    name: String,
}

impl Collection {
    pub fn new(schema: &str, name: &str) -> Self {
        Self {
            schema: schema.to_string(),
            name: name.to_string(),
        }
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Schema-qualified, quoted table name for use in SQL text.
    pub fn table(&self) -> String {
        format!("{}.{}", quote_ident(&self.schema), quote_ident(&self.name))
    }
}

fn sqlite_path(url: &str) -> &str {
    url.strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url)
}

pub(crate) fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
