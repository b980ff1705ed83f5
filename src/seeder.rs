// ABOUTME: Seeding orchestrator: admins, groups, participants, memberships, generated data
// ABOUTME: Five ordered stages; one entity's failure never aborts the run
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Seeder Contributors

//! Seeding orchestration.
//!
//! Stages run strictly in order and each drains its full input before
//! the next begins, so group creation can rely on every admin existing
//! and data generation can rely on every participant existing. Within a
//! stage, entities are independent: a failure is logged with the entity
//! name and the stage moves on.
//!
//! The range-import operations (`import_health_range` and friends) are
//! also the public surface for regenerating or extending one user's
//! history without touching anyone else's.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::{ParticipantEntry, SeedConfig};
use crate::database::Database;
use crate::errors::{SeedError, SeedResult};
use crate::generators::anomaly::{self, AnomalyBaselines, DEFAULT_SLOT_INTERVAL_MINUTES};
use crate::generators::health::{self, HealthBaselines};
use crate::generators::questionnaire::{self, QuestionnaireBaselines};
use crate::generators::{date_range, rng::scoped_rng};
use crate::models::{UserRole, WritePolicy};

/// Default length of a participant's generated history, in days.
pub const DEFAULT_DATA_DAYS: i64 = 60;

/// Run-level seeding parameters.
#[derive(Debug, Clone)]
pub struct SeedOptions {
    /// Skip or overwrite existing date-keyed records.
    pub policy: WritePolicy,
    /// Anomaly slot width in minutes.
    pub anomaly_interval_minutes: i64,
    /// Omit the anomaly-generation step entirely.
    pub skip_anomalies: bool,
    /// Day count for participants without a `data_days` override.
    pub default_data_days: i64,
    /// Last generated day; ranges end here.
    pub end_date: NaiveDate,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            policy: WritePolicy::Skip,
            anomaly_interval_minutes: DEFAULT_SLOT_INTERVAL_MINUTES,
            skip_anomalies: false,
            default_data_days: DEFAULT_DATA_DAYS,
            end_date: Utc::now().date_naive(),
        }
    }
}

/// Counts reported at the end of a seeding run.
#[derive(Debug, Default, Clone, Copy)]
pub struct SeedSummary {
    /// Admin accounts created or refreshed.
    pub admins_seeded: usize,
    /// Admin entries that failed.
    pub admins_failed: usize,
    /// Groups created or refreshed.
    pub groups_seeded: usize,
    /// Group entries that failed.
    pub groups_failed: usize,
    /// Participant accounts created or refreshed.
    pub participants_seeded: usize,
    /// Participant entries that failed.
    pub participants_failed: usize,
    /// Memberships newly added.
    pub memberships_added: usize,
    /// Memberships that already existed.
    pub memberships_existing: usize,
    /// Membership assignments skipped over unknown group names.
    pub memberships_skipped: usize,
    /// Participants whose generated data completed.
    pub data_participants_seeded: usize,
    /// Participants whose generated data failed entirely.
    pub data_participants_failed: usize,
    /// Health-metric days written.
    pub metric_days_written: u64,
    /// Questionnaire entries written.
    pub questionnaire_entries_written: u64,
    /// Anomaly scores written.
    pub anomaly_scores_written: u64,
}

/// Outcome of one range-import operation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportOutcome {
    /// Records written (new or overwritten).
    pub written: u64,
    /// Records left untouched under the skip policy.
    pub skipped: u64,
}

/// Seed the database from a validated configuration.
///
/// # Errors
///
/// Returns an error only for failures that invalidate the whole run
/// (lost connectivity); per-entity failures are logged and counted in
/// the summary.
#[allow(clippy::too_many_lines)]
pub async fn seed_database(
    db: &Database,
    config: &SeedConfig,
    options: &SeedOptions,
) -> SeedResult<SeedSummary> {
    let mut summary = SeedSummary::default();

    info!("creating admin users...");
    for admin in &config.admins {
        match create_account(db, &admin.username, &admin.password, UserRole::Admin).await {
            Ok(id) => {
                info!("admin ready: {} ({id})", admin.username);
                summary.admins_seeded += 1;
            }
            Err(err) => {
                warn!("failed to create admin '{}': {err}", admin.username);
                summary.admins_failed += 1;
            }
        }
    }
    if summary.admins_seeded == 0 {
        warn!("no admin users were created; group creation may fail");
    }

    info!("creating groups...");
    for group in &config.groups {
        match db
            .upsert_group(
                &group.name,
                &group.description,
                &group.created_by,
                group.campaign_start_date,
            )
            .await
        {
            Ok(_) => {
                let campaign = group
                    .campaign_start_date
                    .map(|date| format!(" (campaign starts {date})"))
                    .unwrap_or_default();
                info!("group ready: {}{campaign}", group.name);
                summary.groups_seeded += 1;
            }
            Err(err) => {
                warn!("failed to create group '{}': {err}", group.name);
                summary.groups_failed += 1;
            }
        }
    }

    info!("creating participants...");
    let mut participant_ids: HashMap<String, Uuid> = HashMap::new();
    for participant in &config.participants {
        match create_account(
            db,
            &participant.username,
            &participant.password,
            UserRole::Participant,
        )
        .await
        {
            Ok(id) => {
                info!("participant ready: {} ({id})", participant.username);
                participant_ids.insert(participant.username.clone(), id);
                summary.participants_seeded += 1;
            }
            Err(err) => {
                warn!(
                    "failed to create participant '{}': {err}",
                    participant.username
                );
                summary.participants_failed += 1;
            }
        }
    }

    info!("assigning group memberships...");
    for participant in &config.participants {
        let Some(&user_id) = participant_ids.get(&participant.username) else {
            continue;
        };
        if let Err(err) = assign_memberships(db, user_id, participant, &mut summary).await {
            warn!(
                "failed to assign memberships for '{}': {err}",
                participant.username
            );
        }
    }

    info!("generating participant data...");
    for participant in &config.participants {
        if !participant_ids.contains_key(&participant.username) {
            continue;
        }
        if !participant.generate_data {
            info!("data generation opted out for {}", participant.username);
            continue;
        }

        let days = participant.data_days.unwrap_or(options.default_data_days);
        let start = options.end_date - Duration::days(days);
        match seed_participant_data(db, &participant.username, start, options, &mut summary)
            .await
        {
            Ok(()) => summary.data_participants_seeded += 1,
            Err(err) => {
                warn!(
                    "failed to generate data for '{}': {err}",
                    participant.username
                );
                summary.data_participants_failed += 1;
            }
        }
    }

    info!(
        "seeding complete: {} admins, {} groups, {} participants, {} metric days, {} questionnaire entries, {} anomaly scores",
        summary.admins_seeded,
        summary.groups_seeded,
        summary.participants_seeded,
        summary.metric_days_written,
        summary.questionnaire_entries_written,
        summary.anomaly_scores_written,
    );

    Ok(summary)
}

/// Hash the credential and upsert the account.
async fn create_account(
    db: &Database,
    username: &str,
    password: &str,
    role: UserRole,
) -> SeedResult<Uuid> {
    let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;
    db.upsert_user(username, &password_hash, role).await
}

async fn assign_memberships(
    db: &Database,
    user_id: Uuid,
    participant: &ParticipantEntry,
    summary: &mut SeedSummary,
) -> SeedResult<()> {
    let Some(groups) = &participant.groups else {
        return Ok(());
    };

    for name in groups.names() {
        match db.get_group_id(name).await? {
            Some(group_id) => {
                if db.add_membership(user_id, group_id).await? {
                    info!("  {} assigned to group: {name}", participant.username);
                    summary.memberships_added += 1;
                } else {
                    summary.memberships_existing += 1;
                }
            }
            None => {
                warn!(
                    "  group '{name}' not found, skipping assignment for {}",
                    participant.username
                );
                summary.memberships_skipped += 1;
            }
        }
    }
    Ok(())
}

/// Generate and persist all record families for one participant. Each
/// family fails independently; a questionnaire batch failure does not
/// block anomaly generation.
async fn seed_participant_data(
    db: &Database,
    username: &str,
    start: NaiveDate,
    options: &SeedOptions,
    summary: &mut SeedSummary,
) -> SeedResult<()> {
    let end = options.end_date;
    info!("generating data for {username} from {start} to {end}");

    // A missing user aborts this participant before any generation.
    let outcome = import_health_range(db, username, start, end, options.policy).await?;
    summary.metric_days_written += outcome.written;

    match import_questionnaire_range(db, username, start, end, options.policy).await {
        Ok(outcome) => summary.questionnaire_entries_written += outcome.written,
        Err(err) => warn!("questionnaire generation failed for {username}: {err}"),
    }

    if options.skip_anomalies {
        info!("anomaly generation disabled for this run");
    } else {
        match import_anomaly_range(
            db,
            username,
            start,
            end,
            options.anomaly_interval_minutes,
            options.policy,
        )
        .await
        {
            Ok(outcome) => summary.anomaly_scores_written += outcome.written,
            Err(err) => warn!("anomaly generation failed for {username}: {err}"),
        }
    }

    Ok(())
}

/// Resolve the owner and validate the range shared by all imports.
async fn resolve_owner(
    db: &Database,
    username: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> SeedResult<Uuid> {
    if start > end {
        return Err(SeedError::Validation(format!(
            "start date {start} is after end date {end}"
        )));
    }
    let user = db.get_user_by_username(username).await?.ok_or_else(|| {
        SeedError::Referential(format!("user '{username}' does not exist"))
    })?;
    Ok(user.id)
}

/// Generate and persist daily health metrics for one user over an
/// inclusive date range. The full range is always generated from the
/// user's deterministic stream; the policy decides which dates are
/// persisted. Per-date persistence failures are logged and skipped.
///
/// # Errors
///
/// Returns [`SeedError::Referential`] when the user does not exist
/// (before any writes), [`SeedError::Validation`] for an inverted
/// range, or a database error if the skip-set query fails.
pub async fn import_health_range(
    db: &Database,
    username: &str,
    start: NaiveDate,
    end: NaiveDate,
    policy: WritePolicy,
) -> SeedResult<ImportOutcome> {
    let user_id = resolve_owner(db, username, start, end).await?;
    let dates = date_range(start, end);

    let mut rng = scoped_rng(username, "health");
    let baselines = HealthBaselines::sample(&mut rng);
    let records = health::generate_range(&baselines, &dates, &mut rng);

    let skip_dates = match policy {
        WritePolicy::Skip => db.existing_metric_dates(user_id, start, end).await?,
        WritePolicy::Overwrite => std::collections::HashSet::new(),
    };
    if !skip_dates.is_empty() {
        info!(
            "found {} existing metric days for {username} that will be skipped",
            skip_dates.len()
        );
    }

    let mut outcome = ImportOutcome::default();
    for record in &records {
        if skip_dates.contains(&record.date) {
            outcome.skipped += 1;
            continue;
        }
        match db.save_daily_metrics(user_id, record).await {
            Ok(_) => outcome.written += 1,
            Err(err) => {
                warn!(
                    "failed to save metrics for {username} on {}: {err}",
                    record.date
                );
            }
        }
    }

    info!(
        "health metrics for {username}: {} written, {} skipped",
        outcome.written, outcome.skipped
    );
    Ok(outcome)
}

/// Generate and persist questionnaire responses for one user over an
/// inclusive date range. Non-response days are part of the
/// deterministic stream, not of the policy.
///
/// # Errors
///
/// Same contract as [`import_health_range`]; the batch write is one
/// unit and its failure is returned to the caller.
pub async fn import_questionnaire_range(
    db: &Database,
    username: &str,
    start: NaiveDate,
    end: NaiveDate,
    policy: WritePolicy,
) -> SeedResult<ImportOutcome> {
    let user_id = resolve_owner(db, username, start, end).await?;
    let dates = date_range(start, end);

    let mut rng = scoped_rng(username, "questionnaire");
    let baselines = QuestionnaireBaselines::sample(&mut rng);
    let entries = questionnaire::generate_range(&baselines, &dates, &mut rng);

    let skip_dates = match policy {
        WritePolicy::Skip => db.existing_questionnaire_dates(user_id, start, end).await?,
        WritePolicy::Overwrite => std::collections::HashSet::new(),
    };

    let (to_write, skipped): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .partition(|entry| !skip_dates.contains(&entry.date));

    let written = db.save_questionnaire_entries(user_id, &to_write).await?;
    info!(
        "questionnaire entries for {username}: {written} written, {} skipped",
        skipped.len()
    );

    Ok(ImportOutcome {
        written,
        skipped: skipped.len() as u64,
    })
}

/// Generate and persist anomaly scores for one user over an inclusive
/// date range. The skip policy operates on whole days; overwrite
/// re-upserts every (date, slot).
///
/// # Errors
///
/// Same contract as [`import_health_range`], plus
/// [`SeedError::Validation`] for an interval outside 1..=1440 minutes.
pub async fn import_anomaly_range(
    db: &Database,
    username: &str,
    start: NaiveDate,
    end: NaiveDate,
    interval_minutes: i64,
    policy: WritePolicy,
) -> SeedResult<ImportOutcome> {
    if !(1..=1440).contains(&interval_minutes) {
        return Err(SeedError::Validation(format!(
            "anomaly interval must be between 1 and 1440 minutes, got {interval_minutes}"
        )));
    }
    let user_id = resolve_owner(db, username, start, end).await?;
    let dates = date_range(start, end);

    let mut rng = scoped_rng(username, "anomaly");
    let baselines = AnomalyBaselines::sample(&mut rng);
    let spikes = anomaly::plan_spikes(&dates, interval_minutes, &mut rng);
    let scores = anomaly::generate_range(&baselines, &dates, interval_minutes, &spikes, &mut rng);

    let skip_dates = match policy {
        WritePolicy::Skip => db.existing_anomaly_dates(user_id, start, end).await?,
        WritePolicy::Overwrite => std::collections::HashSet::new(),
    };

    let (to_write, skipped): (Vec<_>, Vec<_>) = scores
        .into_iter()
        .partition(|score| !skip_dates.contains(&score.date));

    let written = db.save_anomaly_scores(user_id, &to_write).await?;
    info!(
        "anomaly scores for {username}: {written} written, {} skipped",
        skipped.len()
    );

    Ok(ImportOutcome {
        written,
        skipped: skipped.len() as u64,
    })
}
