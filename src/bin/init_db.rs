// ABOUTME: Database initializer: schema application, optional drop, optional seeding
// ABOUTME: Loads and validates the seed config before any write when seeding is requested
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Seeder Contributors

//! Database initializer for the campaign platform.
//!
//! Usage:
//! ```bash
//! # Create tables from the schema directory
//! cargo run --bin init-db
//!
//! # Recreate everything and seed from the default config
//! cargo run --bin init-db -- --drop --seed
//!
//! # Seed a specific database with a specific config
//! cargo run --bin init-db -- --seed --config config/campaign_2025_seed.yml \
//!     --db-url sqlite:./data/campaign_2025.db
//!
//! # Re-seed, overwriting existing generated records
//! cargo run --bin init-db -- --seed --overwrite
//!
//! # Seed without the high-frequency anomaly data
//! cargo run --bin init-db -- --seed --skip-anomalies
//! ```

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use tracing::info;

use campaign_seeder::config::{load_seed_config, resolve_database_url};
use campaign_seeder::database::Database;
use campaign_seeder::logging;
use campaign_seeder::models::WritePolicy;
use campaign_seeder::seeder::{seed_database, SeedOptions};

#[derive(Parser)]
#[command(
    name = "init-db",
    about = "Campaign database initializer",
    long_about = "Create the campaign schema from ordered SQL files and optionally seed it with synthetic data"
)]
struct InitArgs {
    /// Drop existing tables before creating new ones
    #[arg(long)]
    drop: bool,

    /// Seed the database with data from the configuration file
    #[arg(long)]
    seed: bool,

    /// Path to the seed configuration file
    #[arg(long, default_value = "config/db_seed.yaml")]
    config: PathBuf,

    /// Database connection URL (overrides config file and environment)
    #[arg(long)]
    db_url: Option<String>,

    /// Directory of ordered schema files
    #[arg(long, default_value = "schema/tables")]
    schema_dir: PathBuf,

    /// Directory of SQL function/view files (applied when present)
    #[arg(long, default_value = "schema/functions")]
    functions_dir: PathBuf,

    /// Directory of migration files (applied when present)
    #[arg(long, default_value = "schema/migrations")]
    migrations_dir: PathBuf,

    /// Interval in minutes between anomaly-score slots
    #[arg(long, default_value = "5")]
    anomaly_interval: i64,

    /// Skip generating anomaly data
    #[arg(long)]
    skip_anomalies: bool,

    /// Overwrite existing generated records instead of skipping them
    #[arg(long)]
    overwrite: bool,

    /// Default number of days of generated history per participant
    #[arg(long, default_value = "60")]
    data_days: i64,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = InitArgs::parse();
    logging::init(args.verbose);

    info!("=== Campaign Database Initializer ===");

    // When seeding, the config must validate before anything touches the
    // database; otherwise a missing config file is tolerated.
    let seed_config = if args.seed {
        Some(load_seed_config(&args.config)?)
    } else {
        load_seed_config(&args.config).ok()
    };

    let settings = seed_config.as_ref().and_then(|config| config.database.clone());
    let database_url = resolve_database_url(args.db_url.as_deref(), settings.as_ref());

    let db = Database::connect(&database_url).await?;
    db.ping().await?;
    info!("database connection successful");

    if args.drop {
        info!("dropping all tables...");
        db.drop_all_tables().await?;
    }

    info!("creating tables from schema files...");
    db.apply_sql_dir(&args.schema_dir).await?;
    db.apply_sql_dir_if_present(&args.migrations_dir).await?;
    db.apply_sql_dir_if_present(&args.functions_dir).await?;

    if args.seed {
        if let Some(config) = &seed_config {
            let options = SeedOptions {
                policy: if args.overwrite {
                    WritePolicy::Overwrite
                } else {
                    WritePolicy::Skip
                },
                anomaly_interval_minutes: args.anomaly_interval,
                skip_anomalies: args.skip_anomalies,
                default_data_days: args.data_days,
                end_date: Utc::now().date_naive(),
            };

            let summary = seed_database(&db, config, &options).await?;

            info!("");
            info!("=== Seeding Summary ===");
            info!(
                "admins: {} seeded, {} failed",
                summary.admins_seeded, summary.admins_failed
            );
            info!(
                "groups: {} seeded, {} failed",
                summary.groups_seeded, summary.groups_failed
            );
            info!(
                "participants: {} seeded, {} failed",
                summary.participants_seeded, summary.participants_failed
            );
            info!(
                "memberships: {} added, {} existing, {} skipped",
                summary.memberships_added,
                summary.memberships_existing,
                summary.memberships_skipped
            );
            info!(
                "generated data: {} participants ({} failed), {} metric days, {} questionnaire entries, {} anomaly scores",
                summary.data_participants_seeded,
                summary.data_participants_failed,
                summary.metric_days_written,
                summary.questionnaire_entries_written,
                summary.anomaly_scores_written
            );
        }
    }

    Ok(())
}
