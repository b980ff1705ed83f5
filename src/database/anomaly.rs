// ABOUTME: Batched anomaly-score upserts keyed on (user, date, time slot)
// ABOUTME: Fixed batch size bounds memory and statement count; batches fail independently
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Seeder Contributors

use std::collections::HashSet;

use chrono::NaiveDate;
use sqlx::Row;
use tracing::{debug, warn};
use uuid::Uuid;

use super::Database;
use crate::errors::{SeedError, SeedResult};
use crate::models::AnomalyScore;

/// Scores written per transaction. A 60-day run at the default interval
/// is ~17k rows per user; the fixed size bounds statement count, not
/// throughput to a consumer.
pub const ANOMALY_BATCH_SIZE: usize = 1000;

impl Database {
    /// Upsert anomaly scores for one user in batches. Each batch is one
    /// transaction; a failed batch is reported and skipped while prior
    /// and following batches stand. Returns the number of rows written.
    ///
    /// # Errors
    ///
    /// Returns a database error only for failures outside batch writes
    /// (acquiring a connection); per-batch failures are logged.
    pub async fn save_anomaly_scores(
        &self,
        user_id: Uuid,
        scores: &[AnomalyScore],
    ) -> SeedResult<u64> {
        let mut written: u64 = 0;

        for (index, batch) in scores.chunks(ANOMALY_BATCH_SIZE).enumerate() {
            match self.write_anomaly_batch(user_id, batch).await {
                Ok(count) => {
                    written += count;
                    debug!("wrote anomaly batch {index} ({count} rows) for user {user_id}");
                }
                Err(err) => {
                    warn!("anomaly batch {index} for user {user_id} failed, skipping: {err}");
                }
            }
        }

        Ok(written)
    }

    async fn write_anomaly_batch(
        &self,
        user_id: Uuid,
        batch: &[AnomalyScore],
    ) -> SeedResult<u64> {
        let user_id = user_id.to_string();
        let mut tx = self.pool().begin().await?;

        for score in batch {
            sqlx::query(
                r"
                INSERT INTO anomaly_scores (user_id, date, time_slot, score, label)
                VALUES (?, ?, ?, ?, ?)
                ON CONFLICT (user_id, date, time_slot) DO UPDATE SET
                    score = excluded.score,
                    label = excluded.label
                ",
            )
            .bind(&user_id)
            .bind(score.date.to_string())
            .bind(score.time_slot)
            .bind(score.score)
            .bind(score.label.as_deref())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(batch.len() as u64)
    }

    /// Dates in the range that already carry anomaly rows for the user.
    /// The skip policy operates on whole days, matching the day-level
    /// granularity of the other record families.
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub async fn existing_anomaly_dates(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> SeedResult<HashSet<NaiveDate>> {
        let rows = sqlx::query(
            "SELECT DISTINCT date FROM anomaly_scores WHERE user_id = ? AND date BETWEEN ? AND ?",
        )
        .bind(user_id.to_string())
        .bind(start.to_string())
        .bind(end.to_string())
        .fetch_all(self.pool())
        .await?;

        rows.iter()
            .map(|row| {
                let date: String = row.get("date");
                NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|err| {
                    SeedError::Validation(format!("malformed stored date '{date}': {err}"))
                })
            })
            .collect()
    }
}
