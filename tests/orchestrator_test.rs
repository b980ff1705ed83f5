// ABOUTME: Full seeding-run tests: stage ordering, per-entity isolation, opt-outs
// ABOUTME: One malformed entity must never abort the rest of the run
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Seeder Contributors

#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use chrono::NaiveDate;
use sqlx::Row;

use campaign_seeder::config::parse_seed_config;
use campaign_seeder::models::WritePolicy;
use campaign_seeder::seeder::{seed_database, SeedOptions};

const CAMPAIGN_CONFIG: &str = r"
admins:
  - username: admin
    password: campaign-admin-pw
groups:
  - name: Alpha Team
    description: First cohort
    created_by: admin
  - name: Bravo Team
    description: Second cohort
    created_by: admin
participants:
  - username: p001
    password: pw-one
    groups: Alpha Team
  - username: p002
    password: pw-two
    groups:
      - Alpha Team
      - Bravo Team
  - username: p003
    password: pw-three
    groups: Ghost Team
";

fn test_options() -> SeedOptions {
    SeedOptions {
        policy: WritePolicy::Skip,
        // Hourly slots keep the volume reasonable for a test run.
        anomaly_interval_minutes: 60,
        skip_anomalies: false,
        default_data_days: 60,
        end_date: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
    }
}

#[tokio::test]
async fn campaign_with_one_bad_assignment_still_completes() {
    let (db, _guard) = common::create_test_db().await;
    let config = parse_seed_config(CAMPAIGN_CONFIG).unwrap();

    let summary = seed_database(&db, &config, &test_options()).await.unwrap();

    assert_eq!(summary.admins_seeded, 1);
    assert_eq!(summary.groups_seeded, 2);
    assert_eq!(summary.participants_seeded, 3);
    assert_eq!(summary.participants_failed, 0);
    // p001 -> Alpha, p002 -> Alpha + Bravo.
    assert_eq!(summary.memberships_added, 3);
    // p003's unknown group is skipped with a warning, not a failure.
    assert_eq!(summary.memberships_skipped, 1);
    assert_eq!(summary.data_participants_seeded, 3);
    assert_eq!(summary.data_participants_failed, 0);

    // 60-day window ending "today" is 61 inclusive days per participant.
    assert_eq!(summary.metric_days_written, 61 * 3);
    assert!(summary.questionnaire_entries_written > 0);
    assert_eq!(summary.anomaly_scores_written, 61 * 24 * 3);

    // All three participants have generated rows, including the one with
    // the bad group assignment.
    for username in ["p001", "p002", "p003"] {
        let days: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM health_metrics hm \
             JOIN users u ON u.id = hm.user_id WHERE u.username = ?",
        )
        .bind(username)
        .fetch_one(db.pool())
        .await
        .unwrap();
        assert_eq!(days, 61, "days for {username}");
    }
}

#[tokio::test]
async fn reseeding_with_skip_policy_writes_no_new_records() {
    let (db, _guard) = common::create_test_db().await;
    let config = parse_seed_config(CAMPAIGN_CONFIG).unwrap();
    let options = test_options();

    let first = seed_database(&db, &config, &options).await.unwrap();
    assert!(first.metric_days_written > 0);

    let second = seed_database(&db, &config, &options).await.unwrap();
    assert_eq!(second.metric_days_written, 0);
    assert_eq!(second.questionnaire_entries_written, 0);
    assert_eq!(second.anomaly_scores_written, 0);
    // Accounts and groups are refreshed, memberships already exist.
    assert_eq!(second.participants_seeded, 3);
    assert_eq!(second.memberships_added, 0);
    assert_eq!(second.memberships_existing, 3);
}

#[tokio::test]
async fn generation_opt_out_and_day_override_are_honored() {
    let config_doc = r"
admins:
  - username: admin
    password: pw
groups:
  - name: Alpha Team
    description: cohort
    created_by: admin
participants:
  - username: active
    password: pw
    groups: Alpha Team
    data_days: 7
  - username: dormant
    password: pw
    groups: Alpha Team
    generate_data: false
";
    let (db, _guard) = common::create_test_db().await;
    let config = parse_seed_config(config_doc).unwrap();

    let summary = seed_database(&db, &config, &test_options()).await.unwrap();

    assert_eq!(summary.data_participants_seeded, 1);
    assert_eq!(summary.metric_days_written, 8);

    let dormant_rows: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM health_metrics hm \
         JOIN users u ON u.id = hm.user_id WHERE u.username = 'dormant'",
    )
    .fetch_one(db.pool())
    .await
    .unwrap();
    assert_eq!(dormant_rows, 0);
}

#[tokio::test]
async fn skip_anomalies_flag_omits_the_anomaly_stage() {
    let (db, _guard) = common::create_test_db().await;
    let config = parse_seed_config(CAMPAIGN_CONFIG).unwrap();
    let options = SeedOptions {
        skip_anomalies: true,
        ..test_options()
    };

    let summary = seed_database(&db, &config, &options).await.unwrap();

    assert_eq!(summary.anomaly_scores_written, 0);
    assert!(summary.metric_days_written > 0);

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM anomaly_scores")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(rows, 0);
}

#[tokio::test]
async fn group_with_missing_creator_fails_alone() {
    let config_doc = r"
admins:
  - username: admin
    password: pw
groups:
  - name: Orphan Team
    description: no such creator
    created_by: ghost-admin
  - name: Alpha Team
    description: cohort
    created_by: admin
participants:
  - username: p001
    password: pw
    groups: Alpha Team
    generate_data: false
";
    let (db, _guard) = common::create_test_db().await;
    let config = parse_seed_config(config_doc).unwrap();

    let summary = seed_database(&db, &config, &test_options()).await.unwrap();

    assert_eq!(summary.groups_seeded, 1);
    assert_eq!(summary.groups_failed, 1);
    assert_eq!(summary.memberships_added, 1);

    let names: Vec<String> = sqlx::query("SELECT group_name FROM groups")
        .fetch_all(db.pool())
        .await
        .unwrap()
        .iter()
        .map(|row| row.get::<String, _>("group_name"))
        .collect();
    assert_eq!(names, vec!["Alpha Team".to_owned()]);
}

#[tokio::test]
async fn stored_credentials_are_hashed() {
    let config_doc = r"
admins:
  - username: admin
    password: plaintext-password
groups: []
participants: []
";
    let (db, _guard) = common::create_test_db().await;
    let config = parse_seed_config(config_doc).unwrap();
    seed_database(&db, &config, &test_options()).await.unwrap();

    let user = db.get_user_by_username("admin").await.unwrap().unwrap();
    assert_ne!(user.password_hash, "plaintext-password");
    assert!(bcrypt::verify("plaintext-password", &user.password_hash).unwrap());
}
