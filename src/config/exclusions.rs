// ABOUTME: Exclusion-calendar configuration: per-group no-data-expected days
// ABOUTME: Supports Saturday shorthands, weekly patterns, and specific dates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Seeder Contributors

//! Exclusion configuration.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{SeedError, SeedResult};

/// A weekly recurrence of excluded weekdays (0 = Monday .. 6 = Sunday).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyPattern {
    /// Weekday numbers to exclude.
    pub weekdays: Vec<u32>,
    /// Reason recorded on each excluded day.
    #[serde(default = "default_pattern_reason")]
    pub reason: String,
}

fn default_pattern_reason() -> String {
    "Regular exclusion".to_owned()
}

/// A one-off excluded date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecificDate {
    /// The excluded day.
    pub date: NaiveDate,
    /// Reason recorded on the day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Exclusion rules for one group over a date window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupExclusions {
    /// Group name; unknown names are skipped with a warning.
    pub group: String,
    /// First day of the window.
    pub start_date: NaiveDate,
    /// Last day of the window, inclusive.
    pub end_date: NaiveDate,
    /// Exclude every Saturday in the window.
    #[serde(default)]
    pub exclude_saturdays: bool,
    /// Weekly weekday patterns to exclude.
    #[serde(default)]
    pub weekly_patterns: Vec<WeeklyPattern>,
    /// One-off dates to exclude.
    #[serde(default)]
    pub specific_dates: Vec<SpecificDate>,
}

/// The full exclusion document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExclusionConfig {
    /// Per-group exclusion rules.
    pub groups: Vec<GroupExclusions>,
}

impl ExclusionConfig {
    /// Load an exclusion configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError::Config`] when the file cannot be read or the
    /// document is malformed or missing its `groups` section.
    pub fn load(path: &Path) -> SeedResult<Self> {
        let contents = fs::read_to_string(path).map_err(|err| {
            SeedError::Config(format!("cannot read {}: {err}", path.display()))
        })?;
        Self::parse(&contents)
    }

    /// Parse an exclusion configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError::Config`] on malformed YAML.
    pub fn parse(contents: &str) -> SeedResult<Self> {
        serde_yaml::from_str(contents)
            .map_err(|err| SeedError::Config(format!("invalid exclusion config: {err}")))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn parses_all_rule_shapes() {
        let doc = r"
groups:
  - group: Alpha Team
    start_date: 2024-01-01
    end_date: 2024-03-31
    exclude_saturdays: true
    weekly_patterns:
      - weekdays: [6]
        reason: Sunday rest day
    specific_dates:
      - date: 2024-02-14
        reason: Holiday
      - date: 2024-02-15
";
        let config = ExclusionConfig::parse(doc).unwrap();
        assert_eq!(config.groups.len(), 1);
        let group = &config.groups[0];
        assert!(group.exclude_saturdays);
        assert_eq!(group.weekly_patterns[0].weekdays, vec![6]);
        assert_eq!(group.specific_dates.len(), 2);
        assert_eq!(group.specific_dates[1].reason, None);
    }

    #[test]
    fn missing_groups_section_is_a_config_error() {
        let err = ExclusionConfig::parse("other: 1").unwrap_err();
        assert!(matches!(err, SeedError::Config(_)));
    }

    #[test]
    fn pattern_reason_defaults() {
        let doc = r"
groups:
  - group: Alpha Team
    start_date: 2024-01-01
    end_date: 2024-01-31
    weekly_patterns:
      - weekdays: [0, 2]
";
        let config = ExclusionConfig::parse(doc).unwrap();
        assert_eq!(
            config.groups[0].weekly_patterns[0].reason,
            "Regular exclusion"
        );
    }
}
