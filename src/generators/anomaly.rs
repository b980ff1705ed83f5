// ABOUTME: High-frequency anomaly-score generator over fixed time slots
// ABOUTME: Time-of-day banded baselines plus noise, with a few planned spike slots
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Seeder Contributors

//! Anomaly scores.
//!
//! Each day is divided into fixed-size slots (288 per day at the default
//! 5-minute interval). A slot's score is the user's base anomaly level
//! scaled by a time-of-day multiplier, plus Gaussian noise, clamped to
//! [0, 1]. Up to three slots per run are designated spikes: their score
//! is boosted and they carry a label; every other slot is label-free.

use std::collections::HashMap;

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;

use super::gauss;
use crate::models::AnomalyScore;

/// Default slot width in minutes (288 slots per day).
pub const DEFAULT_SLOT_INTERVAL_MINUTES: i64 = 5;

/// Upper bound on deliberate spike slots per user per run.
pub const MAX_SPIKES_PER_RUN: usize = 3;

/// Labels a spike slot may carry.
pub const SPIKE_LABELS: [&str; 3] = ["Activity spike", "Sleep disruption", "Stress event"];

/// Number of slots in one day at the given interval.
#[must_use]
pub const fn slots_per_day(interval_minutes: i64) -> i64 {
    24 * 60 / interval_minutes
}

/// Per-user anomaly profile.
#[derive(Debug, Clone)]
pub struct AnomalyBaselines {
    base_level: f64,
    variability: f64,
    morning_factor: f64,
    afternoon_factor: f64,
    evening_factor: f64,
    night_factor: f64,
}

impl AnomalyBaselines {
    /// Draw a user's anomaly profile. Some users simply run hotter than
    /// others, and each time-of-day band scales independently.
    pub fn sample(rng: &mut impl Rng) -> Self {
        Self {
            base_level: rng.gen_range(0.1..0.3),
            variability: rng.gen_range(0.05..0.15),
            morning_factor: rng.gen_range(0.8..1.2),
            afternoon_factor: rng.gen_range(0.8..1.2),
            evening_factor: rng.gen_range(0.8..1.2),
            night_factor: rng.gen_range(0.8..1.2),
        }
    }

    /// Multiplier for the band containing the given hour.
    fn time_factor(&self, hour: i64) -> f64 {
        match hour {
            6..=11 => self.morning_factor,
            12..=17 => self.afternoon_factor,
            18..=21 => self.evening_factor,
            _ => self.night_factor,
        }
    }
}

/// Pick the spike slots for a run: up to [`MAX_SPIKES_PER_RUN`] distinct
/// dates, one random slot each.
pub fn plan_spikes(
    dates: &[NaiveDate],
    interval_minutes: i64,
    rng: &mut impl Rng,
) -> HashMap<NaiveDate, i64> {
    let slot_count = slots_per_day(interval_minutes);
    let spike_dates: Vec<NaiveDate> = dates
        .choose_multiple(rng, MAX_SPIKES_PER_RUN.min(dates.len()))
        .copied()
        .collect();

    spike_dates
        .into_iter()
        .map(|date| (date, rng.gen_range(0..slot_count)))
        .collect()
}

/// Generate scores for every slot of every date, in order.
pub fn generate_range(
    baselines: &AnomalyBaselines,
    dates: &[NaiveDate],
    interval_minutes: i64,
    spikes: &HashMap<NaiveDate, i64>,
    rng: &mut impl Rng,
) -> Vec<AnomalyScore> {
    let slot_count = slots_per_day(interval_minutes);
    let mut scores = Vec::with_capacity(dates.len() * slot_count as usize);

    for date in dates {
        for slot in 0..slot_count {
            let time_minutes = slot * interval_minutes;
            let hour = time_minutes / 60;

            let base = baselines.base_level * baselines.time_factor(hour);
            let noise = gauss(rng, 0.0, baselines.variability);
            let mut score = (base + noise).clamp(0.0, 1.0);

            let label = if spikes.get(date) == Some(&slot) {
                score = (score + rng.gen_range(0.3..0.7)).min(1.0);
                SPIKE_LABELS.choose(rng).map(|&label| label.to_owned())
            } else {
                None
            };

            scores.push(AnomalyScore {
                date: *date,
                time_slot: time_minutes,
                score: (score * 10_000.0).round() / 10_000.0,
                label,
            });
        }
    }

    scores
}
