// ABOUTME: Library entry point for the campaign seeding engine
// ABOUTME: Deterministic synthetic generators plus an idempotent upsert persistence layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Seeder Contributors

#![deny(unsafe_code)]

//! # Campaign Seeder
//!
//! Provisions a health-monitoring platform's database with
//! realistic-looking synthetic time-series data for test and demo
//! campaigns: daily health metrics with heart-rate zone and
//! movement-speed breakdowns, questionnaire responses, high-frequency
//! anomaly scores, and the admin/group/participant rows they hang off.
//!
//! Two properties drive the design:
//!
//! - **Determinism**: each entity's data comes from a random stream
//!   derived from its identifier, so regenerating or extending one
//!   user's history never re-rolls anyone else's, and tests can assert
//!   exact output for a known identifier.
//! - **Idempotence**: every write is an upsert on the record's natural
//!   unique key. Re-seeding skips existing dates by default or
//!   overwrites them on request — it never duplicates.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use campaign_seeder::config::load_seed_config;
//! use campaign_seeder::database::Database;
//! use campaign_seeder::errors::SeedResult;
//! use campaign_seeder::seeder::{seed_database, SeedOptions};
//!
//! #[tokio::main]
//! async fn main() -> SeedResult<()> {
//!     let config = load_seed_config(Path::new("config/db_seed.yaml"))?;
//!     let db = Database::connect("sqlite:./data/campaign.db").await?;
//!     db.apply_sql_dir(Path::new("schema/tables")).await?;
//!     let summary = seed_database(&db, &config, &SeedOptions::default()).await?;
//!     println!("seeded {} participants", summary.participants_seeded);
//!     Ok(())
//! }
//! ```

/// Configuration documents: seed config, exclusions, database URL.
pub mod config;

/// Database manager and per-record-family upsert operations.
pub mod database;

/// Error taxonomy and result alias.
pub mod errors;

/// Synthetic time-series generators and deterministic RNG scopes.
pub mod generators;

/// Tracing subscriber setup for the binaries.
pub mod logging;

/// Record types shared between generators and persistence.
pub mod models;

/// Seeding orchestrator and range-import operations.
pub mod seeder;
