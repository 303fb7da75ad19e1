//! Storage layer for workbill.
//!
//! Persists the rate configuration and the current session snapshot using
//! `rusqlite`. The calculator in `wb-core` never touches this crate; only
//! the CLI reads and writes through it.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but
//! not `Sync`. A `Database` instance can be moved between threads but cannot
//! be shared across threads without external synchronization. The CLI opens
//! one connection per invocation, so this never comes up in practice.
//!
//! # Schema
//!
//! ## Timestamp Format
//!
//! Timestamps are stored as TEXT in ISO 8601 format (e.g.,
//! `2024-01-15T10:30:00Z`). This ensures:
//! - Lexicographic ordering matches chronological ordering
//! - Human-readable values in the database
//! - Timezone-aware (always UTC)
//!
//! ## Settings
//!
//! Rate configuration lives in a key-value `settings` table under stable
//! keys (`hourly_rate`, `travel_rate_per_km`, `apply_standard_fee`) so the
//! values survive application restarts and schema evolution stays cheap.
//! Unknown keys are ignored on read; unparseable values degrade to the
//! field's default with a warning rather than failing the program.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

use wb_core::{Km, Rate, RateConfig, Session, SessionState};

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A stored timestamp failed to parse.
    #[error("invalid timestamp in {column}: {value}")]
    TimestampParse {
        column: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Settings key for the hourly labour rate.
const KEY_HOURLY_RATE: &str = "hourly_rate";
/// Settings key for the per-kilometer travel rate.
const KEY_TRAVEL_RATE: &str = "travel_rate_per_km";
/// Settings key for the standard fee toggle.
const KEY_STANDARD_FEE: &str = "apply_standard_fee";

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection
    /// closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            -- Current session snapshot: a single row holding the start/stop
            -- instants (ISO 8601 TEXT, nullable) and the travel distance.
            CREATE TABLE IF NOT EXISTS session (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                started_at TEXT,
                ended_at TEXT,
                distance_km REAL NOT NULL DEFAULT 0
            );
            ",
        )?;
        Ok(())
    }

    /// Loads the persisted rate configuration.
    ///
    /// Missing keys fall back to the defaults (zero rates, fee off).
    pub fn load_rates(&self) -> Result<RateConfig, DbError> {
        Ok(RateConfig {
            hourly_rate: self.rate_setting(KEY_HOURLY_RATE)?,
            travel_rate_per_km: self.rate_setting(KEY_TRAVEL_RATE)?,
            apply_standard_fee: self.bool_setting(KEY_STANDARD_FEE)?,
        })
    }

    /// Persists the rate configuration under its stable keys.
    pub fn save_rates(&self, rates: &RateConfig) -> Result<(), DbError> {
        self.put_setting(KEY_HOURLY_RATE, &rates.hourly_rate.value().to_string())?;
        self.put_setting(KEY_TRAVEL_RATE, &rates.travel_rate_per_km.value().to_string())?;
        self.put_setting(KEY_STANDARD_FEE, &rates.apply_standard_fee.to_string())?;
        Ok(())
    }

    /// Loads the current session snapshot.
    ///
    /// Returns an idle session when nothing has been stored yet. A stored
    /// end instant without a start instant cannot be written through this
    /// API; if one shows up anyway (hand-edited database) the session loads
    /// as idle with a warning.
    pub fn load_session(&self) -> Result<Session, DbError> {
        let row = self
            .conn
            .query_row(
                "SELECT started_at, ended_at, distance_km FROM session WHERE id = 1",
                [],
                |row| {
                    Ok((
                        row.get::<_, Option<String>>(0)?,
                        row.get::<_, Option<String>>(1)?,
                        row.get::<_, f64>(2)?,
                    ))
                },
            )
            .optional()?;

        let Some((started_at, ended_at, distance_km)) = row else {
            return Ok(Session::default());
        };

        let started_at = started_at
            .map(|v| parse_instant("started_at", &v))
            .transpose()?;
        let ended_at = ended_at
            .map(|v| parse_instant("ended_at", &v))
            .transpose()?;

        let state = match (started_at, ended_at) {
            (None, None) => SessionState::Idle,
            (Some(started_at), None) => SessionState::Open { started_at },
            (Some(started_at), Some(ended_at)) => SessionState::Closed {
                started_at,
                ended_at,
            },
            (None, Some(ended_at)) => {
                tracing::warn!(%ended_at, "session row has an end without a start, treating as idle");
                SessionState::Idle
            }
        };

        if distance_km < 0.0 {
            tracing::warn!(distance_km, "negative stored distance, clamping to zero");
        }

        Ok(Session {
            state,
            distance_km: Km::clamped(distance_km),
        })
    }

    /// Persists the session snapshot, replacing any previous one.
    pub fn save_session(&self, session: &Session) -> Result<(), DbError> {
        self.conn.execute(
            "
            INSERT INTO session (id, started_at, ended_at, distance_km)
            VALUES (1, ?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                started_at = excluded.started_at,
                ended_at = excluded.ended_at,
                distance_km = excluded.distance_km
            ",
            params![
                session.started_at().map(format_instant),
                session.ended_at().map(format_instant),
                session.distance_km.value(),
            ],
        )?;
        Ok(())
    }

    /// Deletes the stored session snapshot.
    ///
    /// A subsequent [`Self::load_session`] returns an idle session.
    pub fn clear_session(&self) -> Result<(), DbError> {
        self.conn.execute("DELETE FROM session WHERE id = 1", [])?;
        Ok(())
    }

    fn put_setting(&self, key: &str, value: &str) -> Result<(), DbError> {
        self.conn.execute(
            "
            INSERT INTO settings (key, value, updated_at)
            VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            ",
            params![key, value],
        )?;
        Ok(())
    }

    fn setting(&self, key: &str) -> Result<Option<String>, DbError> {
        let value = self
            .conn
            .query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn rate_setting(&self, key: &'static str) -> Result<Rate, DbError> {
        let Some(raw) = self.setting(key)? else {
            return Ok(Rate::ZERO);
        };
        match raw.parse::<f64>() {
            Ok(value) => {
                if !value.is_finite() || value < 0.0 {
                    tracing::warn!(key, value, "out-of-range rate setting, clamping to zero");
                }
                Ok(Rate::clamped(value))
            }
            Err(_) => {
                tracing::warn!(key, value = %raw, "unparseable rate setting, using zero");
                Ok(Rate::ZERO)
            }
        }
    }

    fn bool_setting(&self, key: &'static str) -> Result<bool, DbError> {
        let Some(raw) = self.setting(key)? else {
            return Ok(false);
        };
        match raw.parse::<bool>() {
            Ok(value) => Ok(value),
            Err(_) => {
                tracing::warn!(key, value = %raw, "unparseable boolean setting, using false");
                Ok(false)
            }
        }
    }
}

/// Formats an instant for storage.
fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parses a stored instant.
fn parse_instant(column: &'static str, value: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|source| DbError::TimestampParse {
            column,
            value: value.to_string(),
            source,
        })
}
