// ABOUTME: Exclusion-calendar tests: single days, patterns, config application
// ABOUTME: Unknown groups and bad windows skip per group without aborting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Seeder Contributors

#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use chrono::NaiveDate;
use uuid::Uuid;

use campaign_seeder::config::ExclusionConfig;
use campaign_seeder::database::Database;
use campaign_seeder::errors::SeedError;
use campaign_seeder::models::UserRole;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn create_group(db: &Database, name: &str) -> Uuid {
    db.upsert_user("admin", "hash", UserRole::Admin).await.unwrap();
    db.upsert_group(name, "cohort", "admin", None).await.unwrap()
}

#[tokio::test]
async fn excluded_day_upsert_updates_the_reason() {
    let (db, _guard) = common::create_test_db().await;
    let group_id = create_group(&db, "Alpha Team").await;
    let day = date(2024, 7, 14);

    db.add_excluded_day(group_id, day, "Holiday").await.unwrap();
    db.add_excluded_day(group_id, day, "National holiday")
        .await
        .unwrap();

    let days = db.excluded_days(group_id, None).await.unwrap();
    assert_eq!(days.len(), 1);
    assert_eq!(days[0].reason, "National holiday");

    assert!(db.remove_excluded_day(group_id, day).await.unwrap());
    assert!(!db.remove_excluded_day(group_id, day).await.unwrap());
}

#[tokio::test]
async fn saturday_sweep_covers_exactly_the_saturdays() {
    let (db, _guard) = common::create_test_db().await;
    let group_id = create_group(&db, "Alpha Team").await;

    // June 2024 has five Saturdays (1, 8, 15, 22, 29).
    let added = db
        .add_saturdays(group_id, date(2024, 6, 1), date(2024, 6, 30))
        .await
        .unwrap();
    assert_eq!(added, 5);

    let days = db.excluded_days(group_id, None).await.unwrap();
    assert_eq!(days.len(), 5);
    assert_eq!(days[0].date, date(2024, 6, 1));
    assert_eq!(days[4].date, date(2024, 6, 29));
}

#[tokio::test]
async fn inverted_window_is_a_validation_error() {
    let (db, _guard) = common::create_test_db().await;
    let group_id = create_group(&db, "Alpha Team").await;

    let err = db
        .add_saturdays(group_id, date(2024, 6, 30), date(2024, 6, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, SeedError::Validation(_)));
    assert!(db.excluded_days(group_id, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn window_filter_bounds_the_listing() {
    let (db, _guard) = common::create_test_db().await;
    let group_id = create_group(&db, "Alpha Team").await;

    for day in [date(2024, 1, 5), date(2024, 2, 5), date(2024, 3, 5)] {
        db.add_excluded_day(group_id, day, "drill").await.unwrap();
    }

    let windowed = db
        .excluded_days(group_id, Some((date(2024, 2, 1), date(2024, 2, 28))))
        .await
        .unwrap();
    assert_eq!(windowed.len(), 1);
    assert_eq!(windowed[0].date, date(2024, 2, 5));
}

#[tokio::test]
async fn config_application_isolates_unknown_groups() {
    let (db, _guard) = common::create_test_db().await;
    create_group(&db, "Alpha Team").await;

    let doc = r"
groups:
  - group: Ghost Team
    start_date: 2024-06-01
    end_date: 2024-06-30
    exclude_saturdays: true
  - group: Alpha Team
    start_date: 2024-06-01
    end_date: 2024-06-30
    exclude_saturdays: true
    weekly_patterns:
      - weekdays: [6]
        reason: Sunday rest
    specific_dates:
      - date: 2024-06-24
        reason: Midsummer
";
    let config = ExclusionConfig::parse(doc).unwrap();
    let summary = db.apply_exclusion_config(&config).await.unwrap();

    assert_eq!(summary.groups_processed, 1);
    assert_eq!(summary.groups_skipped, 1);
    // 5 Saturdays + 5 Sundays + 1 specific date.
    assert_eq!(summary.days_added, 11);
}
