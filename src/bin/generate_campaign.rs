// ABOUTME: Campaign config generator: CSV or directory scan to a seed-config YAML
// ABOUTME: Mints random credentials; participants default to no data generation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Seeder Contributors

//! Seed-configuration generator.
//!
//! Usage:
//! ```bash
//! # From a directory tree (group folders containing participant folders)
//! cargo run --bin generate-campaign -- --directory /data/campaigns/2025 campaign_2025
//!
//! # From a CSV file with participant_id,group columns
//! cargo run --bin generate-campaign -- --csv participants.csv campaign_2025
//!
//! # Preview without writing
//! cargo run --bin generate-campaign -- --csv participants.csv campaign_2025 --dry-run
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{ArgGroup, Parser};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use campaign_seeder::config::{
    AdminEntry, GroupEntry, GroupNames, ParticipantEntry, SeedConfig,
};
use campaign_seeder::logging;

/// Characters drawn for generated credentials.
const PASSWORD_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*";

/// Participant password length.
const PASSWORD_LENGTH: usize = 12;

/// Admin password length.
const ADMIN_PASSWORD_LENGTH: usize = 16;

#[derive(Parser)]
#[command(
    name = "generate-campaign",
    about = "Generate a campaign seed configuration",
    long_about = "Scan a directory tree or CSV roster into a seed-config YAML with generated credentials",
    group(ArgGroup::new("input").required(true).args(["directory", "csv"]))
)]
struct GenerateArgs {
    /// Root directory containing group folders with participant subfolders
    #[arg(long, short = 'd')]
    directory: Option<PathBuf>,

    /// CSV file with participant_id,group columns
    #[arg(long, short = 'c')]
    csv: Option<PathBuf>,

    /// Name of the campaign (e.g. campaign_2025)
    campaign_name: String,

    /// Output file path (default: config/seed-data/<campaign>_seed.yml)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Admin username
    #[arg(long, default_value = "admin")]
    admin_user: String,

    /// Days of sample data participants would generate when enabled
    #[arg(long, default_value = "60")]
    data_days: i64,

    /// Show what would be generated without writing the file
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = GenerateArgs::parse();
    logging::init(args.verbose);

    let roster = if let Some(csv) = &args.csv {
        info!("reading participants from CSV: {}", csv.display());
        scan_csv(csv)?
    } else if let Some(directory) = &args.directory {
        info!("scanning directory structure: {}", directory.display());
        scan_directory(directory)?
    } else {
        bail!("no input source specified");
    };

    if roster.is_empty() {
        bail!("no groups with participants found in the input source");
    }
    info!("found {} groups", roster.len());

    let config = build_config(&args, &roster);
    print_summary(&args.campaign_name, &config);

    let output = args.output.clone().unwrap_or_else(|| {
        PathBuf::from("config/seed-data").join(format!("{}_seed.yml", args.campaign_name))
    });

    if args.dry_run {
        info!("dry run - configuration would be saved to {}", output.display());
        return Ok(());
    }

    save_config(&config, &args.campaign_name, &output)?;
    info!("seed configuration saved to {}", output.display());
    Ok(())
}

/// Groups in input order, each with its participants in input order.
type Roster = Vec<(String, Vec<String>)>;

fn roster_entry<'a>(roster: &'a mut Roster, group: &str) -> &'a mut Vec<String> {
    let position = roster
        .iter()
        .position(|(name, _)| name == group)
        .unwrap_or_else(|| {
            roster.push((group.to_owned(), Vec::new()));
            roster.len() - 1
        });
    &mut roster[position].1
}

/// Read a `participant_id,group` roster. A header row is detected by its
/// column names; malformed and duplicate rows are warned about and
/// skipped.
fn scan_csv(path: &Path) -> Result<Roster> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("cannot read CSV file {}", path.display()))?;

    let mut roster = Roster::new();

    for (index, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let participant = fields.first().copied().unwrap_or_default();
        let group = fields.get(1).copied().unwrap_or_default();

        if index == 0 && looks_like_header(participant, group) {
            info!("detected CSV header: {participant},{group}");
            continue;
        }

        if participant.is_empty() || group.is_empty() {
            warn!("row {} has missing values, skipping: {line}", index + 1);
            continue;
        }

        let participants = roster_entry(&mut roster, group);
        if participants.iter().any(|existing| existing == participant) {
            warn!("duplicate participant '{participant}' in group '{group}', skipping");
        } else {
            participants.push(participant.to_owned());
        }
    }

    Ok(roster)
}

fn looks_like_header(first: &str, second: &str) -> bool {
    let first = first.to_lowercase();
    let second = second.to_lowercase();
    matches!(first.as_str(), "participant_id" | "participant" | "username" | "id")
        || second == "group"
}

/// Scan a directory tree: each subdirectory is a group, each of its
/// subdirectories a participant. Groups without participants are skipped.
fn scan_directory(root: &Path) -> Result<Roster> {
    if !root.is_dir() {
        bail!("root path is not a directory: {}", root.display());
    }

    let mut roster = Roster::new();

    let mut group_dirs: Vec<PathBuf> = fs::read_dir(root)?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    group_dirs.sort();

    for group_dir in group_dirs {
        let group_name = group_dir
            .file_name()
            .map_or_else(String::new, |name| name.to_string_lossy().into_owned());

        let mut participants: Vec<String> = fs::read_dir(&group_dir)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .filter_map(|path| {
                path.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
            })
            .collect();
        participants.sort();

        if participants.is_empty() {
            warn!("group '{group_name}' has no participants, skipping");
        } else {
            roster.push((group_name, participants));
        }
    }

    Ok(roster)
}

fn generate_password(rng: &mut impl Rng, length: usize) -> String {
    (0..length)
        .map(|_| {
            let index = rng.gen_range(0..PASSWORD_ALPHABET.len());
            char::from(PASSWORD_ALPHABET[index])
        })
        .collect()
}

fn build_config(args: &GenerateArgs, roster: &Roster) -> SeedConfig {
    let mut rng = StdRng::from_entropy();

    let admins = vec![AdminEntry {
        username: args.admin_user.clone(),
        password: generate_password(&mut rng, ADMIN_PASSWORD_LENGTH),
    }];

    let groups = roster
        .iter()
        .map(|(name, _)| GroupEntry {
            name: name.clone(),
            description: format!("Participant group for {name} in {}", args.campaign_name),
            created_by: args.admin_user.clone(),
            campaign_start_date: None,
        })
        .collect();

    let mut participants = Vec::new();
    for (group, members) in roster {
        for member in members {
            participants.push(ParticipantEntry {
                username: member.clone(),
                password: generate_password(&mut rng, PASSWORD_LENGTH),
                groups: Some(GroupNames::One(group.clone())),
                generate_data: false,
                data_days: (args.data_days != 60).then_some(args.data_days),
            });
        }
    }

    SeedConfig {
        database: None,
        admins,
        groups,
        participants,
    }
}

fn print_summary(campaign_name: &str, config: &SeedConfig) {
    info!("configuration summary for {campaign_name}:");
    info!("  admin users: {}", config.admins.len());
    info!("  groups: {}", config.groups.len());
    info!("  participants: {}", config.participants.len());

    info!("generated credentials:");
    for admin in &config.admins {
        info!("  admin '{}': {}", admin.username, admin.password);
    }

    for group in &config.groups {
        let members: Vec<&str> = config
            .participants
            .iter()
            .filter(|participant| {
                participant
                    .groups
                    .as_ref()
                    .is_some_and(|groups| groups.names().contains(&group.name.as_str()))
            })
            .map(|participant| participant.username.as_str())
            .collect();
        info!("  {} ({} participants)", group.name, members.len());
    }

    warn!("change the admin password before production use and keep this file secure");
}

fn save_config(config: &SeedConfig, campaign_name: &str, output: &Path) -> Result<()> {
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;
    }

    let header = format!(
        "# Seed Data Configuration\n\
         # Generated on: {}\n\
         # Campaign: {campaign_name}\n\
         #\n\
         # All passwords in this file are auto-generated. Keep it secure\n\
         # and never commit it to a public repository.\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S")
    );

    let body = serde_yaml::to_string(config)?;
    fs::write(output, format!("{header}{body}"))
        .with_context(|| format!("cannot write {}", output.display()))?;
    Ok(())
}
