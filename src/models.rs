// ABOUTME: Record types shared between the generators and the persistence layer
// ABOUTME: Field shapes mirror the campaign database schema one-to-one
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Seeder Contributors

//! Data model for seeded records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of an account in the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Platform administrator; may own groups.
    Admin,
    /// Campaign participant; owns generated health data.
    Participant,
}

impl UserRole {
    /// Database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Participant => "participant",
        }
    }

    /// Parse the database representation.
    #[must_use]
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "participant" => Some(Self::Participant),
            _ => None,
        }
    }
}

/// A platform account row.
#[derive(Debug, Clone)]
pub struct User {
    /// Primary key.
    pub id: Uuid,
    /// Unique login name; the stable cross-environment identity.
    pub username: String,
    /// Opaque one-way credential hash.
    pub password_hash: String,
    /// Account role.
    pub role: UserRole,
    /// Inactive accounts cannot log in but keep their data.
    pub is_active: bool,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
}

/// A participant group row.
#[derive(Debug, Clone)]
pub struct Group {
    /// Primary key.
    pub id: Uuid,
    /// Unique group name.
    pub name: String,
    /// Free-form description; the only field updated on re-seed.
    pub description: String,
    /// Creating admin's user id.
    pub created_by: Uuid,
    /// First day of the campaign, when known.
    pub campaign_start_date: Option<NaiveDate>,
}

/// Whether regeneration may touch rows that already exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WritePolicy {
    /// Leave existing (owner, date) keys untouched; write only new dates.
    #[default]
    Skip,
    /// Re-upsert every date in the range, replacing prior values.
    Overwrite,
}

/// Heart-rate zone shares for one day; the five percentages sum to 100
/// after generation, and storage accepts [99.0, 101.0] for external rows.
#[derive(Debug, Clone, PartialEq)]
pub struct HeartRateZones {
    /// Share of the day in the very-light zone, percent.
    pub very_light: f64,
    /// Light zone share, percent.
    pub light: f64,
    /// Moderate zone share, percent.
    pub moderate: f64,
    /// Intense zone share, percent.
    pub intense: f64,
    /// Beast-mode zone share, percent.
    pub beast_mode: f64,
}

impl HeartRateZones {
    /// Sum of the five shares.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.very_light + self.light + self.moderate + self.intense + self.beast_mode
    }
}

/// Minutes spent in each movement-speed band for one day. The four bands
/// are disjoint; their sum is the day's active-minutes budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementSpeeds {
    /// Walking minutes.
    pub walking_minutes: i64,
    /// Fast-walking minutes.
    pub walking_fast_minutes: i64,
    /// Jogging minutes.
    pub jogging_minutes: i64,
    /// Running minutes.
    pub running_minutes: i64,
}

impl MovementSpeeds {
    /// Total active minutes across the four bands.
    #[must_use]
    pub const fn total_minutes(&self) -> i64 {
        self.walking_minutes
            + self.walking_fast_minutes
            + self.jogging_minutes
            + self.running_minutes
    }
}

/// One day of health metrics for one user, with optional child breakdowns.
/// A `None` child means "no row" at persistence time, never a zeroed row.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyMetrics {
    /// Calendar day the record covers.
    pub date: NaiveDate,
    /// Resting heart rate, bpm.
    pub resting_hr: i64,
    /// Maximum heart rate, bpm.
    pub max_hr: i64,
    /// Sleep duration, hours.
    pub sleep_hours: f64,
    /// Resting heart-rate variability, ms.
    pub hrv_rest: i64,
    /// Step count.
    pub step_count: i64,
    /// Estimated raw-data volume for the day, bytes.
    pub data_volume: i64,
    /// Zone breakdown child row.
    pub zones: Option<HeartRateZones>,
    /// Movement-speed child row.
    pub movement: Option<MovementSpeeds>,
}

impl DailyMetrics {
    /// Estimate the stored byte volume for a metrics record: a fixed base,
    /// plus each present child row, plus the standing per-day anomaly
    /// allotment (288 five-minute slots at 8 bytes).
    #[must_use]
    pub const fn estimate_data_volume(
        has_zones: bool,
        has_movement: bool,
    ) -> i64 {
        let mut volume = 40;
        if has_zones {
            volume += 40;
        }
        if has_movement {
            volume += 16;
        }
        volume + 2304
    }
}

/// One day's questionnaire response; every score is an integer in [0, 100].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionnaireEntry {
    /// Calendar day of the response.
    pub date: NaiveDate,
    /// Self-reported sleep quality.
    pub perceived_sleep_quality: i64,
    /// Self-reported fatigue.
    pub fatigue_level: i64,
    /// Self-reported motivation.
    pub motivation_level: i64,
}

/// One anomaly score at a fixed time slot within a day.
#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyScore {
    /// Calendar day of the slot.
    pub date: NaiveDate,
    /// Minutes past midnight at the start of the slot.
    pub time_slot: i64,
    /// Anomaly score in [0, 1].
    pub score: f64,
    /// Label carried only by designated spike slots.
    pub label: Option<String>,
}

/// One excluded calendar day for a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludedDay {
    /// Day no data is expected.
    pub date: NaiveDate,
    /// Human-readable reason for the exclusion.
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_storage_form() {
        for role in [UserRole::Admin, UserRole::Participant] {
            assert_eq!(UserRole::from_str_opt(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::from_str_opt("supervisor"), None);
    }

    #[test]
    fn data_volume_counts_present_children() {
        assert_eq!(DailyMetrics::estimate_data_volume(true, true), 2400);
        assert_eq!(DailyMetrics::estimate_data_volume(true, false), 2384);
        assert_eq!(DailyMetrics::estimate_data_volume(false, false), 2344);
    }

    #[test]
    fn movement_total_is_band_sum() {
        let movement = MovementSpeeds {
            walking_minutes: 40,
            walking_fast_minutes: 20,
            jogging_minutes: 10,
            running_minutes: 5,
        };
        assert_eq!(movement.total_minutes(), 75);
    }
}
