// ABOUTME: Questionnaire-response upserts keyed on (user, date)
// ABOUTME: A run's entries for one user are written as a single transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Seeder Contributors

use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use sqlx::Row;
use uuid::Uuid;

use super::Database;
use crate::errors::{SeedError, SeedResult};
use crate::models::QuestionnaireEntry;

impl Database {
    /// Upsert a batch of questionnaire entries for one user. The batch is
    /// one all-or-nothing unit.
    ///
    /// # Errors
    ///
    /// Returns a database error if any entry fails; the batch rolls back.
    pub async fn save_questionnaire_entries(
        &self,
        user_id: Uuid,
        entries: &[QuestionnaireEntry],
    ) -> SeedResult<u64> {
        if entries.is_empty() {
            return Ok(0);
        }

        let user_id = user_id.to_string();
        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool().begin().await?;

        for entry in entries {
            sqlx::query(
                r"
                INSERT INTO questionnaire_data
                    (user_id, date, perceived_sleep_quality, fatigue_level, motivation_level, created_at)
                VALUES (?, ?, ?, ?, ?, ?)
                ON CONFLICT (user_id, date) DO UPDATE SET
                    perceived_sleep_quality = excluded.perceived_sleep_quality,
                    fatigue_level = excluded.fatigue_level,
                    motivation_level = excluded.motivation_level,
                    created_at = excluded.created_at
                ",
            )
            .bind(&user_id)
            .bind(entry.date.to_string())
            .bind(entry.perceived_sleep_quality)
            .bind(entry.fatigue_level)
            .bind(entry.motivation_level)
            .bind(&now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(entries.len() as u64)
    }

    /// Dates in the range that already have a response for the user.
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub async fn existing_questionnaire_dates(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> SeedResult<HashSet<NaiveDate>> {
        let rows = sqlx::query(
            "SELECT date FROM questionnaire_data WHERE user_id = ? AND date BETWEEN ? AND ?",
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
