// ABOUTME: User account upserts keyed on the unique username
// ABOUTME: Re-seeding refreshes the credential but preserves id and role
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Seeder Contributors

use chrono::Utc;
use sqlx::Row;
use uuid::Uuid;

use super::{parse_timestamp, parse_uuid, Database};
use crate::errors::{SeedError, SeedResult};
use crate::models::{User, UserRole};

impl Database {
    /// Create or refresh a user. On conflict with an existing username
    /// only the credential and activity timestamp change; the row keeps
    /// its id and role.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError::Validation`] for an empty username, or a
    /// database error if the write fails.
    pub async fn upsert_user(
        &self,
        username: &str,
        password_hash: &str,
        role: UserRole,
    ) -> SeedResult<Uuid> {
        if username.trim().is_empty() {
            return Err(SeedError::Validation(
                "username must not be empty".to_owned(),
            ));
        }

        let now = Utc::now().to_rfc3339();
        let row = sqlx::query(
            r"
            INSERT INTO users (id, username, password_hash, role, is_active, created_at, last_active)
            VALUES (?, ?, ?, ?, 1, ?, ?)
            ON CONFLICT (username) DO UPDATE SET
                password_hash = excluded.password_hash,
                last_active = excluded.last_active
            RETURNING id
            ",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(username)
        .bind(password_hash)
        .bind(role.as_str())
        .bind(&now)
        .bind(&now)
        .fetch_one(&self.pool)
        .await?;

        let id: String = row.get("id");
        parse_uuid(&id)
    }

    /// Look up a user by username.
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub async fn get_user_by_username(&self, username: &str) -> SeedResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, username, password_hash, role, is_active, created_at \
             FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let id: String = row.get("id");
        let role: String = row.get("role");
        let created_at: String = row.get("created_at");

        Ok(Some(User {
            id: parse_uuid(&id)?,
            username: row.get("username"),
            password_hash: row.get("password_hash"),
            role: UserRole::from_str_opt(&role).ok_or_else(|| {
                SeedError::Validation(format!("unknown role '{role}' for user {username}"))
            })?,
            is_active: row.get::<i64, _>("is_active") != 0,
            created_at: parse_timestamp(&created_at)?,
        }))
    }

    /// Whether a user row exists for the given id.
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub async fn user_exists(&self, user_id: Uuid) -> SeedResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE id = ?")
            .bind(user_id.to_string())
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }
}
