// ABOUTME: Ordered SQL-file application for schema, function, and migration directories
// ABOUTME: One transaction per file, statements split on semicolon boundaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Seeder Contributors

use std::path::{Path, PathBuf};

use sqlx::Row;
use tracing::{error, info};

use super::Database;
use crate::errors::{SeedError, SeedResult};

impl Database {
    /// Apply every `*.sql` file in the directory, in filename order.
    /// Each file runs inside its own transaction; because later files
    /// depend on earlier ones (tables before indexes before views), the
    /// first failing file aborts the application. Returns the number of
    /// files applied.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError::Validation`] when the directory is missing,
    /// or a database error naming the failing file.
    pub async fn apply_sql_dir(&self, dir: &Path) -> SeedResult<usize> {
        if !dir.is_dir() {
            return Err(SeedError::Validation(format!(
                "SQL directory not found: {}",
                dir.display()
            )));
        }

        let files = sorted_sql_files(dir)?;
        if files.is_empty() {
            info!("no SQL files found in {}", dir.display());
            return Ok(0);
        }

        info!("applying {} SQL files from {}", files.len(), dir.display());

        for file in &files {
            let name = file
                .file_name()
                .map_or_else(String::new, |name| name.to_string_lossy().into_owned());
            if let Err(err) = self.apply_sql_file(file).await {
                error!("failed applying {name}: {err}");
                return Err(err);
            }
            info!("applied {name}");
        }

        Ok(files.len())
    }

    /// Same as [`Database::apply_sql_dir`], but an absent directory is a
    /// success — function and migration directories are optional.
    ///
    /// # Errors
    ///
    /// Same as [`Database::apply_sql_dir`] for a present directory.
    pub async fn apply_sql_dir_if_present(&self, dir: &Path) -> SeedResult<usize> {
        if dir.is_dir() {
            self.apply_sql_dir(dir).await
        } else {
            info!("optional SQL directory not present: {}", dir.display());
            Ok(0)
        }
    }

    async fn apply_sql_file(&self, file: &Path) -> SeedResult<()> {
        let contents = std::fs::read_to_string(file)?;
        let mut tx = self.pool().begin().await?;

        for statement in contents.split(';') {
            let statement = statement.trim();
            if statement.is_empty() {
                continue;
            }
            sqlx::query(statement).execute(&mut *tx).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Drop every user table, for `--drop` reinitialization. Foreign-key
    /// enforcement is suspended for the sweep so drop order is
    /// irrelevant.
    ///
    /// # Errors
    ///
    /// Returns a database error if the sweep fails.
    pub async fn drop_all_tables(&self) -> SeedResult<()> {
        let rows = sqlx::query(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
        )
        .fetch_all(self.pool())
        .await?;

        sqlx::query("PRAGMA foreign_keys = OFF")
            .execute(self.pool())
            .await?;

        for row in &rows {
            let name: String = row.get("name");
            sqlx::query(&format!("DROP TABLE IF EXISTS \"{name}\""))
                .execute(self.pool())
                .await?;
        }

        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(self.pool())
            .await?;

        info!("dropped {} tables", rows.len());
        Ok(())
    }
}

fn sorted_sql_files(dir: &Path) -> SeedResult<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("sql"))
        })
        .collect();
    files.sort();
    Ok(files)
}
