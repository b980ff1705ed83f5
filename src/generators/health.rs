// ABOUTME: Daily health-metric generator with zone and movement-speed breakdowns
// ABOUTME: Per-user baselines plus bounded daily noise, clamped to physiological floors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Seeder Contributors

//! Daily health metrics.
//!
//! A user's records are correlated across days because every day perturbs
//! the same per-user baselines instead of rolling independent values.
//! Weekends scale the step count down; sleep and heart-rate fields get
//! independent bounded jitter.

use chrono::NaiveDate;
use rand::Rng;

use super::{gauss, is_weekend};
use crate::models::{DailyMetrics, HeartRateZones, MovementSpeeds};

/// Step-count multiplier applied on Saturdays and Sundays.
const WEEKEND_STEP_FACTOR: f64 = 0.8;

/// Base zone shares before daily perturbation, very-light through beast-mode.
const ZONE_BASE_PERCENTAGES: [f64; 5] = [30.0, 25.0, 20.0, 15.0, 10.0];

/// Standard deviation of the per-zone daily perturbation.
const ZONE_NOISE_STD: f64 = 5.0;

/// Per-user baseline values, drawn once per generation run from the
/// user's deterministic stream. Every generated day perturbs these.
#[derive(Debug, Clone)]
pub struct HealthBaselines {
    /// Baseline resting heart rate, bpm.
    pub resting_hr: i64,
    /// Baseline maximum heart rate, bpm.
    pub max_hr: i64,
    /// Baseline sleep duration, hours.
    pub sleep_hours: f64,
    /// Baseline resting HRV, ms.
    pub hrv_rest: i64,
    /// Baseline daily step count.
    pub step_count: i64,
}

impl HealthBaselines {
    /// Draw a user's baselines.
    pub fn sample(rng: &mut impl Rng) -> Self {
        Self {
            resting_hr: rng.gen_range(55..=70),
            max_hr: rng.gen_range(140..=180),
            sleep_hours: rng.gen_range(6.5..8.5),
            hrv_rest: rng.gen_range(40..=80),
            step_count: rng.gen_range(6000..=12000),
        }
    }
}

/// Generate one day of metrics from the baselines.
pub fn generate_day(
    baselines: &HealthBaselines,
    date: NaiveDate,
    rng: &mut impl Rng,
) -> DailyMetrics {
    let weekend_factor = if is_weekend(date) {
        WEEKEND_STEP_FACTOR
    } else {
        1.0
    };

    let resting_hr = baselines.resting_hr + rng.gen_range(-5..=6);
    let max_hr = baselines.max_hr + rng.gen_range(-10..=11);
    let sleep_hours = (baselines.sleep_hours + gauss(rng, 0.0, 0.7)).max(0.0);
    let hrv_rest = (baselines.hrv_rest + rng.gen_range(-15..=16)).max(10);
    let step_count =
        (baselines.step_count as f64 * weekend_factor) as i64 + rng.gen_range(-2000..=3000);

    let zones = sample_zone_shares(rng);
    let (_budget, movement) = sample_movement(rng);

    DailyMetrics {
        date,
        resting_hr,
        max_hr,
        sleep_hours,
        hrv_rest,
        step_count,
        data_volume: DailyMetrics::estimate_data_volume(true, true),
        zones: Some(zones),
        movement: Some(movement),
    }
}

/// Generate metrics for every date in the slice, in order.
pub fn generate_range(
    baselines: &HealthBaselines,
    dates: &[NaiveDate],
    rng: &mut impl Rng,
) -> Vec<DailyMetrics> {
    dates
        .iter()
        .map(|date| generate_day(baselines, *date, rng))
        .collect()
}

/// Perturb the base shares, clamp each to [0, 100], then renormalize so
/// the five sum to exactly 100.
fn sample_zone_shares(rng: &mut impl Rng) -> HeartRateZones {
    let mut shares = [0.0f64; 5];
    for (share, base) in shares.iter_mut().zip(ZONE_BASE_PERCENTAGES) {
        *share = (base + gauss(rng, 0.0, ZONE_NOISE_STD)).clamp(0.0, 100.0);
    }

    let sum: f64 = shares.iter().sum();
    if sum > 0.0 {
        for share in &mut shares {
            *share = *share / sum * 100.0;
        }
    }

    HeartRateZones {
        very_light: shares[0],
        light: shares[1],
        moderate: shares[2],
        intense: shares[3],
        beast_mode: shares[4],
    }
}

/// Sample the day's active-minutes budget and split it across the four
/// movement bands. Proportions are renormalized to 1 before scaling, so
/// truncation is the only source of drift (at most 1 minute per band).
fn sample_movement(rng: &mut impl Rng) -> (i64, MovementSpeeds) {
    let budget = rng.gen_range(30..=180);

    let walking = rng.gen_range(0.4..0.7);
    let walking_fast = rng.gen_range(0.15..0.35);
    let jogging = rng.gen_range(0.05..0.25);
    let running = (1.0_f64 - walking - walking_fast - jogging).max(0.01);

    let total = walking + walking_fast + jogging + running;
    let budget_f = budget as f64;

    let movement = MovementSpeeds {
        walking_minutes: (budget_f * walking / total) as i64,
        walking_fast_minutes: (budget_f * walking_fast / total) as i64,
        jogging_minutes: (budget_f * jogging / total) as i64,
        running_minutes: (budget_f * running / total) as i64,
    };

    (budget, movement)
}
