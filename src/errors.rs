// ABOUTME: Unified error types for the seeding engine and its binaries
// ABOUTME: Maps each failure class to the smallest unit that can recover from it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Seeder Contributors

//! Error taxonomy for the seeder.
//!
//! Four classes matter operationally: configuration errors abort a run
//! before any writes, referential errors skip one entity, persistence
//! errors skip one record or batch, and validation errors fail one
//! operation without side effects. Everything carries enough context to
//! name the entity, date, or unit affected.

use thiserror::Error;

/// Result alias used throughout the library.
pub type SeedResult<T> = Result<T, SeedError>;

/// Errors produced by the seeding engine.
#[derive(Error, Debug)]
pub enum SeedError {
    /// The seed or exclusion configuration is missing or malformed.
    /// Fatal: reported once, before any database writes.
    #[error("configuration error: {0}")]
    Config(String),

    /// A referenced owner, group, or creator does not exist.
    /// The referencing entity is skipped; the run continues.
    #[error("referential error: {0}")]
    Referential(String),

    /// Caller-supplied input is out of range or malformed.
    /// The operation fails without side effects.
    #[error("validation error: {0}")]
    Validation(String),

    /// A database write or query failed. The failing unit (one record,
    /// one batch, one file) is skipped; sibling units proceed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A schema, function, or config file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// An exclusion document failed to parse.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Password hashing failed.
    #[error("credential error: {0}")]
    Credential(#[from] bcrypt::BcryptError),
}

impl SeedError {
    /// True for errors that must abort the whole run rather than one unit.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
