// ABOUTME: Seed-configuration document: admins, groups, participants
// ABOUTME: Missing required sections are configuration errors reported before any writes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Seeder Contributors

//! Seed configuration.
//!
//! The document has three required sections (`admins`, `groups`,
//! `participants`) and an optional `database` section. Parsing goes
//! through a raw representation so a missing section is reported by
//! name as a configuration error rather than a generic parse failure.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{SeedError, SeedResult};

/// Optional database section; only a full URL is honored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Full connection URL, e.g. `sqlite:./data/campaign.db`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// An admin account to create or refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminEntry {
    /// Unique login name.
    pub username: String,
    /// Plain-text password; hashed before storage.
    pub password: String,
}

/// A participant group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupEntry {
    /// Unique group name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Username of the creating admin.
    pub created_by: String,
    /// First day of the campaign, if scheduled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_start_date: Option<NaiveDate>,
}

/// One group name or a list of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupNames {
    /// A single group assignment.
    One(String),
    /// Multiple group assignments.
    Many(Vec<String>),
}

impl GroupNames {
    /// The assignment list, regardless of document shape.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::One(name) => vec![name.as_str()],
            Self::Many(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

/// A participant account, its memberships, and its generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantEntry {
    /// Unique login name.
    pub username: String,
    /// Plain-text password; hashed before storage.
    pub password: String,
    /// Group assignment(s); unknown names are skipped with a warning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<GroupNames>,
    /// Opt-out flag for synthetic data generation.
    #[serde(default = "default_generate_data")]
    pub generate_data: bool,
    /// Override of the run-level day count for this participant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_days: Option<i64>,
}

const fn default_generate_data() -> bool {
    true
}

/// Validated seed configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Optional connection settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseSettings>,
    /// Admin accounts, created first.
    pub admins: Vec<AdminEntry>,
    /// Groups, created by the admins.
    pub groups: Vec<GroupEntry>,
    /// Participant accounts and their generation settings.
    pub participants: Vec<ParticipantEntry>,
}

#[derive(Deserialize)]
struct RawSeedConfig {
    #[serde(default)]
    database: Option<DatabaseSettings>,
    admins: Option<Vec<AdminEntry>>,
    groups: Option<Vec<GroupEntry>>,
    participants: Option<Vec<ParticipantEntry>>,
}

/// Load and validate a seed configuration file.
///
/// # Errors
///
/// Returns [`SeedError::Config`] when the file cannot be read, is not
/// valid YAML, or is missing a required section.
pub fn load_seed_config(path: &Path) -> SeedResult<SeedConfig> {
    let contents = fs::read_to_string(path)
        .map_err(|err| SeedError::Config(format!("cannot read {}: {err}", path.display())))?;
    parse_seed_config(&contents)
}

/// Parse and validate a seed configuration document.
///
/// # Errors
///
/// Returns [`SeedError::Config`] on malformed YAML or a missing
/// required section.
pub fn parse_seed_config(contents: &str) -> SeedResult<SeedConfig> {
    let raw: RawSeedConfig = serde_yaml::from_str(contents)
        .map_err(|err| SeedError::Config(format!("invalid seed config: {err}")))?;

    let admins = require_section(raw.admins, "admins")?;
    let groups = require_section(raw.groups, "groups")?;
    let participants = require_section(raw.participants, "participants")?;

    Ok(SeedConfig {
        database: raw.database,
        admins,
        groups,
        participants,
    })
}

fn require_section<T>(section: Option<T>, name: &str) -> SeedResult<T> {
    section.ok_or_else(|| SeedError::Config(format!("missing required section: {name}")))
}
