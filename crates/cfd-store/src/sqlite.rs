//! SQLite-based store implementation.

use async_trait::async_trait;
use cfd_core::{Company, CompanyStore, DataError, Financials, Result, Ticker};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, instrument};

/// SQLite-backed company store.
///
/// Companies live in a single `companies` table; the normalized financials
/// are kept as a JSON text column that stays `NULL` until the first
/// successful fetch.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a SQLite store at the given path.
    ///
    /// # Arguments
    /// * `path` - Path to the SQLite database file
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or schema creation fails.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| DataError::Store(e.to_string()))?;
        Self::with_connection(conn)
    }

    /// Create an in-memory SQLite store.
    ///
    /// Useful for testing; data is lost when the store is dropped.
    ///
    /// # Errors
    /// Returns an error if schema creation fails.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| DataError::Store(e.to_string()))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DataError::Store(e.to_string()))
    }

    /// Initialize the database schema.
    fn initialize_schema(&self) -> Result<()> {
        let conn = self.lock()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS companies (
                ticker TEXT PRIMARY KEY,
                cik TEXT NOT NULL,
                name TEXT NOT NULL,
                exchange TEXT NULL,
                financials TEXT NULL,
                financials_updated_at TEXT NULL
            )",
            [],
        )
        .map_err(|e| DataError::Store(e.to_string()))?;

        debug!("SQLite store schema initialized");
        Ok(())
    }

    /// Insert a company, or update the existing row with the same ticker.
    ///
    /// This is the ingestion path; the page pipeline never creates rows.
    /// Re-upserting unchanged financials keeps their original timestamp.
    ///
    /// # Errors
    /// Returns an error if the financials cannot be encoded or the write fails.
    #[instrument(skip(self, company), fields(ticker = %company.ticker))]
    pub fn upsert_company(&self, company: &Company) -> Result<()> {
        let financials = company
            .financials
            .as_ref()
            .map(encode_financials)
            .transpose()?;
        let updated_at = financials.as_ref().map(|_| Utc::now().to_rfc3339());

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO companies (ticker, cik, name, exchange, financials, financials_updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(ticker) DO UPDATE SET
                cik = excluded.cik,
                name = excluded.name,
                exchange = excluded.exchange,
                financials = excluded.financials,
                financials_updated_at = CASE
                    WHEN excluded.financials IS companies.financials
                    THEN companies.financials_updated_at
                    ELSE excluded.financials_updated_at
                END",
            params![
                company.ticker.as_str(),
                company.cik,
                company.name,
                company.exchange,
                financials,
                updated_at,
            ],
        )
        .map_err(|e| DataError::Store(e.to_string()))?;

        debug!("Upserted company");
        Ok(())
    }

    /// When the financials of a company were last written.
    ///
    /// Returns `Ok(None)` for unknown tickers and for rows without financials.
    ///
    /// # Errors
    /// Returns an error if the query fails or the stored timestamp is malformed.
    pub fn financials_updated_at(&self, ticker: &Ticker) -> Result<Option<DateTime<Utc>>> {
        let conn = self.lock()?;
        let value: Option<Option<String>> = conn
            .query_row(
                "SELECT financials_updated_at FROM companies WHERE ticker = ?1",
                params![ticker.as_str()],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| DataError::Store(e.to_string()))?;

        value
            .flatten()
            .map(|s| {
                DateTime::parse_from_rfc3339(&s)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| DataError::Parse(format!("Invalid timestamp {s}: {e}")))
            })
            .transpose()
    }
}

fn encode_financials(financials: &Financials) -> Result<String> {
    serde_json::to_string(financials).map_err(|e| DataError::Store(e.to_string()))
}

fn decode_financials(json: &str) -> Result<Financials> {
    serde_json::from_str(json).map_err(|e| DataError::Parse(format!("Stored financials: {e}")))
}

#[async_trait]
impl CompanyStore for SqliteStore {
    #[instrument(skip(self), fields(ticker = %ticker))]
    async fn get_company(&self, ticker: &Ticker) -> Result<Option<Company>> {
        let conn = self.lock()?;

        let row = conn
            .query_row(
                "SELECT ticker, cik, name, exchange, financials
                 FROM companies
                 WHERE ticker = ?1",
                params![ticker.as_str()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, Option<String>>(3)?,
                        row.get::<_, Option<String>>(4)?,
                    ))
                },
            )
            .optional()
            .map_err(|e| DataError::Store(e.to_string()))?;

        let Some((ticker, cik, name, exchange, financials)) = row else {
            debug!("No company row found");
            return Ok(None);
        };

        let financials = financials.as_deref().map(decode_financials).transpose()?;
        debug!(cached = financials.is_some(), "Found company row");

        Ok(Some(Company {
            ticker: Ticker::new(ticker),
            cik,
            name,
            exchange,
            financials,
        }))
    }

    #[instrument(skip(self, financials), fields(ticker = %ticker, metrics = financials.len()))]
    async fn set_financials(&self, ticker: &Ticker, financials: &Financials) -> Result<()> {
        let json = encode_financials(financials)?;
        let now = Utc::now().to_rfc3339();

        let conn = self.lock()?;
        let updated = conn
            .execute(
                "UPDATE companies SET financials = ?2, financials_updated_at = ?3 WHERE ticker = ?1",
                params![ticker.as_str(), json, now],
            )
            .map_err(|e| DataError::Store(e.to_string()))?;

        if updated == 0 {
            return Err(DataError::Store(format!(
                "No company with ticker {ticker}"
            )));
        }

        debug!("Stored financials");
        Ok(())
    }
}
