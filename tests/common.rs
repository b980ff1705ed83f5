// ABOUTME: Shared helpers for integration tests
// ABOUTME: File-backed temporary databases with the real schema applied
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Seeder Contributors

#![allow(missing_docs, clippy::unwrap_used, dead_code)]

use std::path::Path;

use tempfile::TempDir;

use campaign_seeder::database::Database;

/// Create a temporary file-backed database with the shipped schema
/// applied. The `TempDir` guard must stay alive for the test's duration.
pub async fn create_test_db() -> (Database, TempDir) {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite:{}", dir.path().join("test.db").display());
    let db = Database::connect(&url).await.unwrap();

    let schema_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("schema/tables");
    db.apply_sql_dir(&schema_dir).await.unwrap();

    (db, dir)
}
