// ABOUTME: Database connection URL resolution with an explicit priority chain
// ABOUTME: CLI flag, then config file, then DATABASE_URL, then the bundled default
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Seeder Contributors

//! Connection-URL resolution.

use std::env;

use tracing::info;

use super::seed::DatabaseSettings;

/// Fallback when nothing else supplies a URL.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/campaign.db";

/// Resolve the connection URL. Priority: command line, then the config
/// document's `database.url`, then the `DATABASE_URL` environment
/// variable, then [`DEFAULT_DATABASE_URL`].
#[must_use]
pub fn resolve_database_url(
    cli_url: Option<&str>,
    settings: Option<&DatabaseSettings>,
) -> String {
    if let Some(url) = cli_url {
        info!("using database URL from command line");
        return url.to_owned();
    }

    if let Some(url) = settings.and_then(|settings| settings.url.as_deref()) {
        info!("using database URL from config file");
        return url.to_owned();
    }

    if let Ok(url) = env::var("DATABASE_URL") {
        info!("using database URL from DATABASE_URL");
        return url;
    }

    info!("using default database URL: {DEFAULT_DATABASE_URL}");
    DEFAULT_DATABASE_URL.to_owned()
}
