// ABOUTME: Database manager: connection, idempotent upserts, SQL-file application
// ABOUTME: One file per record family; every logical record is one short transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Seeder Contributors

//! Database management.
//!
//! All operations are insert-or-update on the record's natural unique
//! key and are idempotent: applying the same record twice leaves the
//! same final state. Writes that span multiple statements for one
//! logical record (a metrics row and its child breakdowns, one anomaly
//! batch) run in a single transaction; a failure rolls back only that
//! unit.

mod anomaly;
mod exclusions;
mod groups;
mod health;
mod questionnaire;
mod schema;
mod users;

pub use anomaly::ANOMALY_BATCH_SIZE;
pub use exclusions::ExclusionSummary;

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use uuid::Uuid;

use crate::errors::{SeedError, SeedResult};

/// Database manager over a `SQLite` pool.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open a connection pool, creating the database file if needed.
    /// Foreign keys are enforced so child breakdowns cascade with their
    /// parent metric rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed or the database cannot
    /// be opened.
    pub async fn connect(database_url: &str) -> SeedResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        Ok(Self { pool })
    }

    /// Reference to the underlying pool for advanced operations.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Connectivity probe; fails fast before a run starts real work.
    ///
    /// # Errors
    ///
    /// Returns an error if the database is unreachable.
    pub async fn ping(&self) -> SeedResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Parse a stored TEXT primary key back into a [`Uuid`].
pub(crate) fn parse_uuid(value: &str) -> SeedResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|err| SeedError::Validation(format!("malformed id '{value}': {err}")))
}

/// Parse a stored timestamp. Rows written by this tool carry RFC 3339;
/// rows created through SQL defaults carry the engine's plain format.
pub(crate) fn parse_timestamp(value: &str) -> SeedResult<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|err| SeedError::Validation(format!("malformed timestamp '{value}': {err}")))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn timestamps_parse_both_stored_formats() {
        assert!(parse_timestamp("2024-03-01T08:30:00+00:00").is_ok());
        assert!(parse_timestamp("2024-03-01 08:30:00").is_ok());
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn uuid_parse_reports_validation_errors() {
        assert!(matches!(
            parse_uuid("not-a-uuid"),
            Err(SeedError::Validation(_))
        ));
    }
}
