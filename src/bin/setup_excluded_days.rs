// ABOUTME: Exclusion-calendar CLI: mark days a group is not expected to report
// ABOUTME: Config-driven application plus one-shot add/remove/list/saturdays commands
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Seeder Contributors

//! Exclusion-calendar management.
//!
//! Usage:
//! ```bash
//! # Apply an exclusion configuration file
//! cargo run --bin setup-excluded-days -- apply --config config/exclusions.yaml
//!
//! # Exclude one day for a group
//! cargo run --bin setup-excluded-days -- add --group "Alpha Team" \
//!     --date 2025-07-14 --reason "Public holiday"
//!
//! # Exclude every Saturday in a window
//! cargo run --bin setup-excluded-days -- saturdays --group "Alpha Team" \
//!     --start-date 2025-06-01 --end-date 2025-08-31
//!
//! # List a group's exclusions
//! cargo run --bin setup-excluded-days -- list --group "Alpha Team"
//! ```

use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::info;
use uuid::Uuid;

use campaign_seeder::config::{resolve_database_url, ExclusionConfig};
use campaign_seeder::database::Database;
use campaign_seeder::logging;

#[derive(Parser)]
#[command(
    name = "setup-excluded-days",
    about = "Manage excluded days for campaign groups",
    long_about = "Mark calendar days as no-data-expected per group, from a config file or one-shot commands"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database connection URL (overrides environment)
    #[arg(long, global = true)]
    db_url: Option<String>,

    /// Enable verbose logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Apply an exclusion configuration file
    Apply {
        /// Path to the exclusion configuration (YAML)
        #[arg(long)]
        config: PathBuf,
    },

    /// Add one excluded day for a group
    Add {
        /// Group name
        #[arg(long)]
        group: String,

        /// Date to exclude (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        /// Reason recorded on the exclusion
        #[arg(long, default_value = "No data expected")]
        reason: String,
    },

    /// Remove one excluded day for a group
    Remove {
        /// Group name
        #[arg(long)]
        group: String,

        /// Date to remove (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
    },

    /// List excluded days for a group
    List {
        /// Group name
        #[arg(long)]
        group: String,

        /// Window start (YYYY-MM-DD); requires --end-date
        #[arg(long)]
        start_date: Option<NaiveDate>,

        /// Window end (YYYY-MM-DD); requires --start-date
        #[arg(long)]
        end_date: Option<NaiveDate>,
    },

    /// Exclude every Saturday in a date range
    Saturdays {
        /// Group name
        #[arg(long)]
        group: String,

        /// Window start (YYYY-MM-DD)
        #[arg(long)]
        start_date: NaiveDate,

        /// Window end (YYYY-MM-DD)
        #[arg(long)]
        end_date: NaiveDate,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let database_url = resolve_database_url(cli.db_url.as_deref(), None);
    let db = Database::connect(&database_url).await?;
    db.ping().await?;

    match cli.command {
        Command::Apply { config } => {
            let config = ExclusionConfig::load(&config)?;
            let summary = db.apply_exclusion_config(&config).await?;
            info!(
                "processed {} groups ({} skipped), added {} exclusions",
                summary.groups_processed, summary.groups_skipped, summary.days_added
            );
        }
        Command::Add {
            group,
            date,
            reason,
        } => {
            let group_id = resolve_group(&db, &group).await?;
            db.add_excluded_day(group_id, date, &reason).await?;
            info!("excluded {date} for '{group}' ({reason})");
        }
        Command::Remove { group, date } => {
            let group_id = resolve_group(&db, &group).await?;
            if db.remove_excluded_day(group_id, date).await? {
                info!("removed exclusion {date} for '{group}'");
            } else {
                info!("no exclusion on {date} for '{group}'");
            }
        }
        Command::List {
            group,
            start_date,
            end_date,
        } => {
            let window = match (start_date, end_date) {
                (Some(start), Some(end)) => Some((start, end)),
                (None, None) => None,
                _ => bail!("--start-date and --end-date must be given together"),
            };
            let group_id = resolve_group(&db, &group).await?;
            let days = db.excluded_days(group_id, window).await?;
            info!("{} excluded days for '{group}':", days.len());
            for day in days {
                info!("  {} - {}", day.date, day.reason);
            }
        }
        Command::Saturdays {
            group,
            start_date,
            end_date,
        } => {
            let group_id = resolve_group(&db, &group).await?;
            let added = db.add_saturdays(group_id, start_date, end_date).await?;
            info!("excluded {added} Saturdays for '{group}'");
        }
    }

    Ok(())
}

async fn resolve_group(db: &Database, name: &str) -> Result<Uuid> {
    db.get_group_id(name)
        .await?
        .ok_or_else(|| anyhow!("group '{name}' not found"))
}
