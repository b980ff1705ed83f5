// ABOUTME: Configuration documents consumed by the seeder binaries
// ABOUTME: Seed config, exclusion config, and database-URL resolution
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Seeder Contributors

//! Configuration loading.

pub mod database;
pub mod exclusions;
pub mod seed;

pub use database::resolve_database_url;
pub use exclusions::{ExclusionConfig, GroupExclusions, SpecificDate, WeeklyPattern};
pub use seed::{
    load_seed_config, parse_seed_config, AdminEntry, DatabaseSettings, GroupEntry, GroupNames,
    ParticipantEntry, SeedConfig,
};
