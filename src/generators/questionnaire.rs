// ABOUTME: Daily questionnaire-response generator with weekday effects and attrition
// ABOUTME: Scores are bounded integers; 15% of days are skipped to mimic non-response
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Seeder Contributors

//! Questionnaire responses.
//!
//! Weekends raise perceived sleep quality and lower motivation; fatigue
//! drifts upward across the work week. The non-response draw happens
//! before any value draws for a date, so attrition is part of the
//! deterministic stream.

use chrono::{Datelike, NaiveDate};
use rand::Rng;

use super::{gauss, is_weekend};
use crate::models::QuestionnaireEntry;

/// Probability that a user skips the questionnaire on a given day.
const SKIP_PROBABILITY: f64 = 0.15;

/// Weekend additive effect on sleep quality.
const WEEKEND_SLEEP_BONUS: f64 = 0.5;

/// Weekend additive effect on motivation.
const WEEKEND_MOTIVATION_PENALTY: f64 = -0.3;

/// Maximum fatigue drift reached at the end of the week.
const WEEKLY_FATIGUE_SPAN: f64 = 1.5;

/// Per-user response baselines and variabilities.
#[derive(Debug, Clone)]
pub struct QuestionnaireBaselines {
    base_sleep_quality: f64,
    base_fatigue: f64,
    base_motivation: f64,
    sleep_variability: f64,
    fatigue_variability: f64,
    motivation_variability: f64,
}

impl QuestionnaireBaselines {
    /// Draw a user's response profile.
    pub fn sample(rng: &mut impl Rng) -> Self {
        Self {
            base_sleep_quality: rng.gen_range(60.0..80.0),
            base_fatigue: rng.gen_range(30.0..60.0),
            base_motivation: rng.gen_range(60.0..85.0),
            sleep_variability: rng.gen_range(10.0..25.0),
            fatigue_variability: rng.gen_range(15.0..30.0),
            motivation_variability: rng.gen_range(10.0..20.0),
        }
    }
}

/// Generate responses for a date range; skipped days produce no entry.
pub fn generate_range(
    baselines: &QuestionnaireBaselines,
    dates: &[NaiveDate],
    rng: &mut impl Rng,
) -> Vec<QuestionnaireEntry> {
    dates
        .iter()
        .filter_map(|date| generate_day(baselines, *date, rng))
        .collect()
}

/// Generate one day's response, or `None` on a non-response day.
pub fn generate_day(
    baselines: &QuestionnaireBaselines,
    date: NaiveDate,
    rng: &mut impl Rng,
) -> Option<QuestionnaireEntry> {
    if rng.gen_bool(SKIP_PROBABILITY) {
        return None;
    }

    let weekend = is_weekend(date);
    let sleep_bonus = if weekend { WEEKEND_SLEEP_BONUS } else { 0.0 };
    let motivation_penalty = if weekend {
        WEEKEND_MOTIVATION_PENALTY
    } else {
        0.0
    };

    // Monday is 0, Sunday is 6: fatigue climbs through the week.
    let week_progress = f64::from(date.weekday().num_days_from_monday()) / 6.0;
    let fatigue_drift = week_progress * WEEKLY_FATIGUE_SPAN;

    let sleep_quality = (baselines.base_sleep_quality
        + sleep_bonus
        + gauss(rng, 0.0, baselines.sleep_variability))
    .clamp(0.0, 100.0);
    let fatigue_level = (baselines.base_fatigue
        + fatigue_drift
        + gauss(rng, 0.0, baselines.fatigue_variability))
    .clamp(0.0, 100.0);
    let motivation_level = (baselines.base_motivation
        + motivation_penalty
        + gauss(rng, 0.0, baselines.motivation_variability))
    .clamp(0.0, 100.0);

    Some(QuestionnaireEntry {
        date,
        perceived_sleep_quality: sleep_quality.round() as i64,
        fatigue_level: fatigue_level.round() as i64,
        motivation_level: motivation_level.round() as i64,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::generators::{date_range, rng::scoped_rng};

    #[test]
    fn scores_stay_in_bounds() {
        let mut rng = scoped_rng("p020", "questionnaire");
        let baselines = QuestionnaireBaselines::sample(&mut rng);
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let entries = generate_range(&baselines, &date_range(start, end), &mut rng);

        assert!(!entries.is_empty());
        for entry in &entries {
            assert!((0..=100).contains(&entry.perceived_sleep_quality));
            assert!((0..=100).contains(&entry.fatigue_level));
            assert!((0..=100).contains(&entry.motivation_level));
        }
    }

    #[test]
    fn attrition_drops_roughly_fifteen_percent() {
        let mut rng = scoped_rng("p021", "questionnaire");
        let baselines = QuestionnaireBaselines::sample(&mut rng);
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let dates = date_range(start, end);
        let entries = generate_range(&baselines, &dates, &mut rng);

        let response_rate = entries.len() as f64 / dates.len() as f64;
        assert!(
            (0.78..=0.92).contains(&response_rate),
            "response rate {response_rate}"
        );
    }

    #[test]
    fn runs_are_reproducible_including_skipped_days() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 4, 30).unwrap();
        let dates = date_range(start, end);

        let mut rng_a = scoped_rng("p022", "questionnaire");
        let baselines_a = QuestionnaireBaselines::sample(&mut rng_a);
        let run_a = generate_range(&baselines_a, &dates, &mut rng_a);

        let mut rng_b = scoped_rng("p022", "questionnaire");
        let baselines_b = QuestionnaireBaselines::sample(&mut rng_b);
        let run_b = generate_range(&baselines_b, &dates, &mut rng_b);

        assert_eq!(run_a, run_b);
    }
}
