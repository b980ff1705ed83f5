// ABOUTME: Transactional upsert of a daily metrics row and its child breakdowns
// ABOUTME: Parent first with id read-back; children only when their fields are present
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Seeder Contributors

use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use sqlx::Row;
use uuid::Uuid;

use super::Database;
use crate::errors::{SeedError, SeedResult};
use crate::models::DailyMetrics;

impl Database {
    /// Upsert one day of health metrics for a user. The parent row is
    /// written first and its generated id read back; each child
    /// breakdown is then upserted independently, and only when present
    /// in the input — an absent child writes no row rather than zeros.
    /// The whole record is one transaction.
    ///
    /// # Errors
    ///
    /// Returns a database error if any statement in the unit fails; the
    /// unit is rolled back as a whole.
    pub async fn save_daily_metrics(
        &self,
        user_id: Uuid,
        metrics: &DailyMetrics,
    ) -> SeedResult<i64> {
        let mut tx = self.pool().begin().await?;

        let row = sqlx::query(
            r"
            INSERT INTO health_metrics
                (user_id, date, resting_hr, max_hr, sleep_hours, hrv_rest, step_count, data_volume, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (user_id, date) DO UPDATE SET
                resting_hr = excluded.resting_hr,
                max_hr = excluded.max_hr,
                sleep_hours = excluded.sleep_hours,
                hrv_rest = excluded.hrv_rest,
                step_count = excluded.step_count,
                data_volume = excluded.data_volume,
                created_at = excluded.created_at
            RETURNING id
            ",
        )
        .bind(user_id.to_string())
        .bind(metrics.date.to_string())
        .bind(metrics.resting_hr)
        .bind(metrics.max_hr)
        .bind(metrics.sleep_hours)
        .bind(metrics.hrv_rest)
        .bind(metrics.step_count)
        .bind(metrics.data_volume)
        .bind(Utc::now().to_rfc3339())
        .fetch_one(&mut *tx)
        .await?;

        let metric_id: i64 = row.get("id");

        if let Some(zones) = &metrics.zones {
            sqlx::query(
                r"
                INSERT INTO heart_rate_zones
                    (health_metric_id, very_light_percent, light_percent, moderate_percent,
                     intense_percent, beast_mode_percent)
                VALUES (?, ?, ?, ?, ?, ?)
                ON CONFLICT (health_metric_id) DO UPDATE SET
                    very_light_percent = excluded.very_light_percent,
                    light_percent = excluded.light_percent,
                    moderate_percent = excluded.moderate_percent,
                    intense_percent = excluded.intense_percent,
                    beast_mode_percent = excluded.beast_mode_percent
                ",
            )
            .bind(metric_id)
            .bind(zones.very_light)
            .bind(zones.light)
            .bind(zones.moderate)
            .bind(zones.intense)
            .bind(zones.beast_mode)
            .execute(&mut *tx)
            .await?;
        }

        if let Some(movement) = &metrics.movement {
            sqlx::query(
                r"
                INSERT INTO movement_speeds
                    (health_metric_id, walking_minutes, walking_fast_minutes,
                     jogging_minutes, running_minutes)
                VALUES (?, ?, ?, ?, ?)
                ON CONFLICT (health_metric_id) DO UPDATE SET
                    walking_minutes = excluded.walking_minutes,
                    walking_fast_minutes = excluded.walking_fast_minutes,
                    jogging_minutes = excluded.jogging_minutes,
                    running_minutes = excluded.running_minutes
                ",
            )
            .bind(metric_id)
            .bind(movement.walking_minutes)
            .bind(movement.walking_fast_minutes)
            .bind(movement.jogging_minutes)
            .bind(movement.running_minutes)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(metric_id)
    }

    /// Dates in the range that already have a metrics row for the user;
    /// the skip policy filters the generated sequence against this set.
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub async fn existing_metric_dates(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> SeedResult<HashSet<NaiveDate>> {
        let rows = sqlx::query(
            "SELECT date FROM health_metrics WHERE user_id = ? AND date BETWEEN ? AND ?",
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
