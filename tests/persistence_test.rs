// ABOUTME: Upsert-protocol tests: idempotence, conflict behavior, parent/child units
// ABOUTME: Exercises the storage boundary constraints the schema enforces
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Seeder Contributors

#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use chrono::NaiveDate;
use sqlx::Row;

use campaign_seeder::database::{Database, ANOMALY_BATCH_SIZE};
use campaign_seeder::errors::SeedError;
use campaign_seeder::models::{
    AnomalyScore, DailyMetrics, HeartRateZones, MovementSpeeds, UserRole,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_metrics(day: NaiveDate) -> DailyMetrics {
    DailyMetrics {
        date: day,
        resting_hr: 62,
        max_hr: 171,
        sleep_hours: 7.4,
        hrv_rest: 55,
        step_count: 9512,
        data_volume: DailyMetrics::estimate_data_volume(true, true),
        zones: Some(HeartRateZones {
            very_light: 31.0,
            light: 24.0,
            moderate: 20.0,
            intense: 15.0,
            beast_mode: 10.0,
        }),
        movement: Some(MovementSpeeds {
            walking_minutes: 55,
            walking_fast_minutes: 25,
            jogging_minutes: 12,
            running_minutes: 6,
        }),
    }
}

async fn count(db: &Database, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(db.pool())
        .await
        .unwrap()
}

#[tokio::test]
async fn user_upsert_preserves_id_and_role() {
    let (db, _guard) = common::create_test_db().await;

    let first = db
        .upsert_user("chief", "hash-one", UserRole::Admin)
        .await
        .unwrap();
    // Re-seeding the same username refreshes the credential only.
    let second = db
        .upsert_user("chief", "hash-two", UserRole::Participant)
        .await
        .unwrap();

    assert_eq!(first, second);
    let user = db.get_user_by_username("chief").await.unwrap().unwrap();
    assert_eq!(user.password_hash, "hash-two");
    assert_eq!(user.role, UserRole::Admin);
    assert_eq!(count(&db, "users").await, 1);
}

#[tokio::test]
async fn empty_username_is_a_validation_error() {
    let (db, _guard) = common::create_test_db().await;
    let err = db
        .upsert_user("   ", "hash", UserRole::Participant)
        .await
        .unwrap_err();
    assert!(matches!(err, SeedError::Validation(_)));
    assert_eq!(count(&db, "users").await, 0);
}

#[tokio::test]
async fn group_upsert_updates_description_only() {
    let (db, _guard) = common::create_test_db().await;
    db.upsert_user("admin", "hash", UserRole::Admin).await.unwrap();
    db.upsert_user("admin2", "hash", UserRole::Admin).await.unwrap();

    let first = db
        .upsert_group("Alpha Team", "first description", "admin", Some(date(2024, 3, 1)))
        .await
        .unwrap();
    let second = db
        .upsert_group("Alpha Team", "second description", "admin2", None)
        .await
        .unwrap();

    assert_eq!(first, second);
    let row = sqlx::query(
        "SELECT description, created_by, campaign_start_date FROM groups WHERE group_name = ?",
    )
    .bind("Alpha Team")
    .fetch_one(db.pool())
    .await
    .unwrap();

    let admin = db.get_user_by_username("admin").await.unwrap().unwrap();
    assert_eq!(row.get::<String, _>("description"), "second description");
    // The creator is never re-parented.
    assert_eq!(row.get::<String, _>("created_by"), admin.id.to_string());
    assert_eq!(
        row.get::<Option<String>, _>("campaign_start_date").as_deref(),
        Some("2024-03-01")
    );
}

#[tokio::test]
async fn group_creator_must_be_an_existing_admin() {
    let (db, _guard) = common::create_test_db().await;
    db.upsert_user("p001", "hash", UserRole::Participant)
        .await
        .unwrap();

    let missing = db
        .upsert_group("Alpha Team", "desc", "ghost", None)
        .await
        .unwrap_err();
    assert!(matches!(missing, SeedError::Referential(_)));

    let not_admin = db
        .upsert_group("Alpha Team", "desc", "p001", None)
        .await
        .unwrap_err();
    assert!(matches!(not_admin, SeedError::Referential(_)));

    assert_eq!(count(&db, "groups").await, 0);
}

#[tokio::test]
async fn membership_insert_is_idempotent() {
    let (db, _guard) = common::create_test_db().await;
    db.upsert_user("admin", "hash", UserRole::Admin).await.unwrap();
    let user_id = db
        .upsert_user("p001", "hash", UserRole::Participant)
        .await
        .unwrap();
    let group_id = db
        .upsert_group("Alpha Team", "desc", "admin", None)
        .await
        .unwrap();

    assert!(db.add_membership(user_id, group_id).await.unwrap());
    assert!(!db.add_membership(user_id, group_id).await.unwrap());
    assert_eq!(count(&db, "user_groups").await, 1);
}

#[tokio::test]
async fn metrics_upsert_writes_parent_then_children_once() {
    let (db, _guard) = common::create_test_db().await;
    let user_id = db
        .upsert_user("p001", "hash", UserRole::Participant)
        .await
        .unwrap();

    let day = date(2024, 4, 2);
    let first_id = db.save_daily_metrics(user_id, &sample_metrics(day)).await.unwrap();

    let mut updated = sample_metrics(day);
    updated.step_count = 4200;
    let second_id = db.save_daily_metrics(user_id, &updated).await.unwrap();

    // Same (user, date) key: same row, updated fields, single child rows.
    assert_eq!(first_id, second_id);
    assert_eq!(count(&db, "health_metrics").await, 1);
    assert_eq!(count(&db, "heart_rate_zones").await, 1);
    assert_eq!(count(&db, "movement_speeds").await, 1);

    let steps: i64 = sqlx::query_scalar("SELECT step_count FROM health_metrics WHERE id = ?")
        .bind(first_id)
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(steps, 4200);
}

#[tokio::test]
async fn absent_children_write_no_rows() {
    let (db, _guard) = common::create_test_db().await;
    let user_id = db
        .upsert_user("p001", "hash", UserRole::Participant)
        .await
        .unwrap();

    let mut metrics = sample_metrics(date(2024, 4, 3));
    metrics.zones = None;
    metrics.movement = None;
    metrics.data_volume = DailyMetrics::estimate_data_volume(false, false);
    db.save_daily_metrics(user_id, &metrics).await.unwrap();

    assert_eq!(count(&db, "health_metrics").await, 1);
    assert_eq!(count(&db, "heart_rate_zones").await, 0);
    assert_eq!(count(&db, "movement_speeds").await, 0);
}

#[tokio::test]
async fn children_cascade_with_their_parent() {
    let (db, _guard) = common::create_test_db().await;
    let user_id = db
        .upsert_user("p001", "hash", UserRole::Participant)
        .await
        .unwrap();
    db.save_daily_metrics(user_id, &sample_metrics(date(2024, 4, 4)))
        .await
        .unwrap();

    sqlx::query("DELETE FROM health_metrics")
        .execute(db.pool())
        .await
        .unwrap();

    assert_eq!(count(&db, "heart_rate_zones").await, 0);
    assert_eq!(count(&db, "movement_speeds").await, 0);
}

#[tokio::test]
async fn storage_rejects_zone_sums_outside_tolerance() {
    let (db, _guard) = common::create_test_db().await;
    let user_id = db
        .upsert_user("p001", "hash", UserRole::Participant)
        .await
        .unwrap();
    let metric_id = db
        .save_daily_metrics(user_id, &{
            let mut metrics = sample_metrics(date(2024, 4, 5));
            metrics.zones = None;
            metrics
        })
        .await
        .unwrap();

    // 50% total is outside the persisted [99, 101] band.
    let result = sqlx::query(
        "INSERT INTO heart_rate_zones \
         (health_metric_id, very_light_percent, light_percent, moderate_percent, \
          intense_percent, beast_mode_percent) \
         VALUES (?, 10, 10, 10, 10, 10)",
    )
    .bind(metric_id)
    .execute(db.pool())
    .await;
    assert!(result.is_err());

    // 99.5 is inside the band even though the generator emits exactly 100.
    sqlx::query(
        "INSERT INTO heart_rate_zones \
         (health_metric_id, very_light_percent, light_percent, moderate_percent, \
          intense_percent, beast_mode_percent) \
         VALUES (?, 30, 24.5, 20, 15, 10)",
    )
    .bind(metric_id)
    .execute(db.pool())
    .await
    .unwrap();
}

#[tokio::test]
async fn anomaly_scores_write_in_batches_and_upsert() {
    let (db, _guard) = common::create_test_db().await;
    let user_id = db
        .upsert_user("p001", "hash", UserRole::Participant)
        .await
        .unwrap();

    // Two and a half batches across a few days of slots.
    let total = ANOMALY_BATCH_SIZE * 2 + ANOMALY_BATCH_SIZE / 2;
    let scores: Vec<AnomalyScore> = (0..total)
        .map(|index| AnomalyScore {
            date: date(2024, 4, 1) + chrono::Duration::days((index / 288) as i64),
            time_slot: ((index % 288) * 5) as i64,
            score: 0.25,
            label: None,
        })
        .collect();

    let written = db.save_anomaly_scores(user_id, &scores).await.unwrap();
    assert_eq!(written, total as u64);
    assert_eq!(count(&db, "anomaly_scores").await, total as i64);

    // Re-applying the same scores updates in place.
    let rewritten = db.save_anomaly_scores(user_id, &scores).await.unwrap();
    assert_eq!(rewritten, total as u64);
    assert_eq!(count(&db, "anomaly_scores").await, total as i64);
}

#[tokio::test]
async fn sql_dir_application_is_ordered_and_optional() {
    let (db, _guard) = common::create_test_db().await;

    // The shipped functions directory applies on top of the tables.
    let functions_dir =
        std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("schema/functions");
    let applied = db.apply_sql_dir_if_present(&functions_dir).await.unwrap();
    assert_eq!(applied, 1);

    // Optional directories may be absent; required ones may not.
    let missing = std::path::Path::new("schema/does-not-exist");
    assert_eq!(db.apply_sql_dir_if_present(missing).await.unwrap(), 0);
    assert!(matches!(
        db.apply_sql_dir(missing).await.unwrap_err(),
        SeedError::Validation(_)
    ));
}

#[tokio::test]
async fn drop_all_tables_clears_the_schema() {
    let (db, _guard) = common::create_test_db().await;
    db.upsert_user("p001", "hash", UserRole::Participant)
        .await
        .unwrap();

    db.drop_all_tables().await.unwrap();

    let tables: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
    )
    .fetch_one(db.pool())
    .await
    .unwrap();
    assert_eq!(tables, 0);

    // Reinitialization works on the same connection.
    let schema_dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("schema/tables");
    db.apply_sql_dir(&schema_dir).await.unwrap();
    assert_eq!(count(&db, "users").await, 0);
}
