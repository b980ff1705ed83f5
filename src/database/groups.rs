// ABOUTME: Group upserts and idempotent membership inserts
// ABOUTME: Re-seeding updates the description only and never re-parents the creator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Seeder Contributors

use chrono::{NaiveDate, Utc};
use sqlx::Row;
use uuid::Uuid;

use super::{parse_uuid, Database};
use crate::errors::{SeedError, SeedResult};
use crate::models::UserRole;

impl Database {
    /// Create or refresh a group. The creator must be an existing admin.
    /// On conflict with an existing name only the description changes;
    /// `created_by` and `campaign_start_date` are set at creation.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError::Referential`] when the creator is missing or
    /// not an admin, or a database error if the write fails.
    pub async fn upsert_group(
        &self,
        name: &str,
        description: &str,
        created_by_username: &str,
        campaign_start_date: Option<NaiveDate>,
    ) -> SeedResult<Uuid> {
        let creator = self
            .get_user_by_username(created_by_username)
            .await?
            .ok_or_else(|| {
                SeedError::Referential(format!(
                    "creator '{created_by_username}' not found for group '{name}'"
                ))
            })?;

        if creator.role != UserRole::Admin {
            return Err(SeedError::Referential(format!(
                "creator '{created_by_username}' of group '{name}' is not an admin"
            )));
        }

        let row = sqlx::query(
            r"
            INSERT INTO groups (id, group_name, description, created_by, campaign_start_date, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT (group_name) DO UPDATE SET
                description = excluded.description
            RETURNING id
            ",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(name)
        .bind(description)
        .bind(creator.id.to_string())
        .bind(campaign_start_date.as_ref().map(ToString::to_string))
        .bind(Utc::now().to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        let id: String = row.get("id");
        parse_uuid(&id)
    }

    /// Look up a group id by name.
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub async fn get_group_id(&self, name: &str) -> SeedResult<Option<Uuid>> {
        let id: Option<String> =
            sqlx::query_scalar("SELECT id FROM groups WHERE group_name = ?")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;

        id.as_deref().map(parse_uuid).transpose()
    }

    /// Add a user to a group. Returns `false` when the membership
    /// already existed (the insert is a no-op).
    ///
    /// # Errors
    ///
    /// Returns a database error if the write fails.
    pub async fn add_membership(&self, user_id: Uuid, group_id: Uuid) -> SeedResult<bool> {
        let result = sqlx::query(
            r"
            INSERT INTO user_groups (user_id, group_id)
            VALUES (?, ?)
            ON CONFLICT (user_id, group_id) DO NOTHING
            ",
        )
        .bind(user_id.to_string())
        .bind(group_id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
