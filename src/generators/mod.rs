// ABOUTME: Synthetic time-series generators for campaign seed data
// ABOUTME: Pure functions over an explicit RNG; persistence decides what is kept
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Seeder Contributors

//! Metric generators.
//!
//! Every generator takes an explicit `&mut impl Rng` and a calendar
//! position and returns plain record structs. Generation always covers
//! the full requested range; skip/overwrite filtering is a persistence
//! concern, which keeps a fixed identifier's output byte-identical
//! between runs regardless of what already exists in the database.

pub mod anomaly;
pub mod health;
pub mod questionnaire;
pub mod rng;

use chrono::{Datelike, NaiveDate, Weekday};
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Every date from `start` through `end`, inclusive.
#[must_use]
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start
        .iter_days()
        .take_while(|date| *date <= end)
        .collect()
}

/// Saturday or Sunday.
#[must_use]
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Gaussian sample with the given mean and standard deviation.
/// All call sites pass finite positive deviations, so the distribution
/// constructor cannot fail; the mean is the degenerate fallback.
pub(crate) fn gauss(rng: &mut impl Rng, mean: f64, std_dev: f64) -> f64 {
    Normal::new(mean, std_dev).map_or(mean, |normal| normal.sample(rng))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn date_range_is_inclusive() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let range = date_range(start, end);
        assert_eq!(range.len(), 5);
        assert_eq!(range[0], start);
        assert_eq!(range[4], end);
    }

    #[test]
    fn single_day_range() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(date_range(day, day), vec![day]);
    }

    #[test]
    fn weekend_detection() {
        // 2024-01-06 was a Saturday.
        assert!(is_weekend(NaiveDate::from_ymd_opt(2024, 1, 6).unwrap()));
        assert!(is_weekend(NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()));
        assert!(!is_weekend(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()));
    }
}
