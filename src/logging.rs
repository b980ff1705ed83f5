// ABOUTME: Tracing subscriber setup shared by the seeder binaries
// ABOUTME: Env-filtered fmt output; verbosity flag maps to the debug level
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Seeder Contributors

//! Logging setup.

use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber. `RUST_LOG` overrides the level the
/// verbosity flag selects.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
