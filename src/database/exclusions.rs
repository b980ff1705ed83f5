// ABOUTME: Exclusion-calendar operations: days a group is not expected to report
// ABOUTME: Single days, Saturday sweeps, weekly patterns, and config-driven application
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Seeder Contributors

use chrono::{Datelike, NaiveDate};
use sqlx::Row;
use tracing::{info, warn};
use uuid::Uuid;

use super::Database;
use crate::config::ExclusionConfig;
use crate::errors::{SeedError, SeedResult};
use crate::generators::date_range;
use crate::models::ExcludedDay;

/// Default reason recorded when none is supplied.
const DEFAULT_REASON: &str = "No data expected";

/// Outcome of applying an exclusion configuration.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExclusionSummary {
    /// Groups whose rules were applied.
    pub groups_processed: usize,
    /// Groups skipped because of missing references or bad windows.
    pub groups_skipped: usize,
    /// Excluded days written in total.
    pub days_added: u64,
}

impl Database {
    /// Mark a day as excluded for a group; re-marking updates the reason.
    ///
    /// # Errors
    ///
    /// Returns a database error if the write fails.
    pub async fn add_excluded_day(
        &self,
        group_id: Uuid,
        date: NaiveDate,
        reason: &str,
    ) -> SeedResult<()> {
        sqlx::query(
            r"
            INSERT INTO excluded_days (group_id, date, reason)
            VALUES (?, ?, ?)
            ON CONFLICT (group_id, date) DO UPDATE SET
                reason = excluded.reason
            ",
        )
        .bind(group_id.to_string())
        .bind(date.to_string())
        .bind(reason)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Remove an excluded day. Returns `false` when no row existed.
    ///
    /// # Errors
    ///
    /// Returns a database error if the delete fails.
    pub async fn remove_excluded_day(
        &self,
        group_id: Uuid,
        date: NaiveDate,
    ) -> SeedResult<bool> {
        let result = sqlx::query("DELETE FROM excluded_days WHERE group_id = ? AND date = ?")
            .bind(group_id.to_string())
            .bind(date.to_string())
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Excluded days for a group, optionally bounded to a window.
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub async fn excluded_days(
        &self,
        group_id: Uuid,
        window: Option<(NaiveDate, NaiveDate)>,
    ) -> SeedResult<Vec<ExcludedDay>> {
        let rows = match window {
            Some((start, end)) => {
                sqlx::query(
                    "SELECT date, reason FROM excluded_days \
                     WHERE group_id = ? AND date BETWEEN ? AND ? ORDER BY date",
                )
                .bind(group_id.to_string())
                .bind(start.to_string())
                .bind(end.to_string())
                .fetch_all(self.pool())
                .await?
            }
            None => {
                sqlx::query(
                    "SELECT date, reason FROM excluded_days WHERE group_id = ? ORDER BY date",
                )
                .bind(group_id.to_string())
                .fetch_all(self.pool())
                .await?
            }
        };

        rows.iter()
            .map(|row| {
                let date: String = row.get("date");
                let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|err| {
                    SeedError::Validation(format!("malformed stored date '{date}': {err}"))
                })?;
                Ok(ExcludedDay {
                    date,
                    reason: row.get("reason"),
                })
            })
            .collect()
    }

    /// Exclude every date in the window whose weekday number (0 = Monday)
    /// appears in `weekdays`. Returns the number of days written.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError::Validation`] for an inverted window, or a
    /// database error if a write fails.
    pub async fn add_weekly_pattern(
        &self,
        group_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
        weekdays: &[u32],
        reason: &str,
    ) -> SeedResult<u64> {
        if start > end {
            return Err(SeedError::Validation(format!(
                "exclusion window starts after it ends ({start} > {end})"
            )));
        }

        let mut added = 0;
        for date in date_range(start, end) {
            if weekdays.contains(&date.weekday().num_days_from_monday()) {
                self.add_excluded_day(group_id, date, reason).await?;
                added += 1;
            }
        }
        Ok(added)
    }

    /// Exclude every Saturday in the window.
    ///
    /// # Errors
    ///
    /// Same as [`Database::add_weekly_pattern`].
    pub async fn add_saturdays(
        &self,
        group_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> SeedResult<u64> {
        self.add_weekly_pattern(group_id, start, end, &[5], "Saturday - no data expected")
            .await
    }

    /// Apply an exclusion configuration group-by-group. One group's bad
    /// window or unknown name is logged and skipped; the rest proceed.
    ///
    /// # Errors
    ///
    /// Returns a database error only for failures outside per-group
    /// application.
    pub async fn apply_exclusion_config(
        &self,
        config: &ExclusionConfig,
    ) -> SeedResult<ExclusionSummary> {
        let mut summary = ExclusionSummary::default();

        for group_config in &config.groups {
            let Some(group_id) = self.get_group_id(&group_config.group).await? else {
                warn!(
                    "exclusion config references unknown group '{}', skipping",
                    group_config.group
                );
                summary.groups_skipped += 1;
                continue;
            };

            match self.apply_group_exclusions(group_id, group_config).await {
                Ok(added) => {
                    info!(
                        "applied {added} exclusions for group '{}'",
                        group_config.group
                    );
                    summary.groups_processed += 1;
                    summary.days_added += added;
                }
                Err(err) => {
                    warn!(
                        "failed to apply exclusions for group '{}': {err}",
                        group_config.group
                    );
                    summary.groups_skipped += 1;
                }
            }
        }

        Ok(summary)
    }

    async fn apply_group_exclusions(
        &self,
        group_id: Uuid,
        config: &crate::config::GroupExclusions,
    ) -> SeedResult<u64> {
        let mut added = 0;

        if config.exclude_saturdays {
            added += self
                .add_saturdays(group_id, config.start_date, config.end_date)
                .await?;
        }

        for pattern in &config.weekly_patterns {
            added += self
                .add_weekly_pattern(
                    group_id,
                    config.start_date,
                    config.end_date,
                    &pattern.weekdays,
                    &pattern.reason,
                )
                .await?;
        }

        for specific in &config.specific_dates {
            let reason = specific.reason.as_deref().unwrap_or(DEFAULT_REASON);
            self.add_excluded_day(group_id, specific.date, reason)
                .await?;
            added += 1;
        }

        Ok(added)
    }
}
