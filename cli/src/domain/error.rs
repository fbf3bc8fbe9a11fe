//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

// ── Config errors ─────────────────────────────────────────────────────────────

/// Missing or contradictory settings. Always fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "Could not find a config file (looked for {searched}).\n\n\
         Create cjob.yml in the current directory or point CJOB_CONFIG at one."
    )]
    NotFound { searched: String },

    #[error("Cannot parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error(
        "Settings must have both AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY, or AWS_PROFILE."
    )]
    MissingCredentials,

    #[error(
        "Settings have both AWS_PROFILE and access keys. Choose one credential mode."
    )]
    ConflictingCredentials,

    #[error("Must have a EC2_SPOT_MAX_PRICE > 0 if using spot instances.")]
    InvalidSpotPrice,

    #[error(
        "One-time spot instances cannot use EC2_SHUTDOWN_BEHAVIOUR: stop. \
         Use terminate or turn off EC2_USE_SPOT."
    )]
    SpotCannotStop,

    #[error("Invalid value for {key}: {value}\n\nValid values: {valid}")]
    InvalidValue {
        key: &'static str,
        value: String,
        valid: &'static str,
    },

    #[error("S3_BUCKET_NAME is not set. Add it to your config to use object storage.")]
    MissingBucket,
}

// ── Lifecycle errors ──────────────────────────────────────────────────────────

/// Where a private key was expected but not found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyLocation {
    /// The local key file.
    Local,
    /// The provider's key pair list.
    Provider,
}

impl fmt::Display for KeyLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("the local filesystem"),
            Self::Provider => f.write_str("AWS"),
        }
    }
}

/// Errors raised by the instance lifecycle manager.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error(
        "Key pair '{key_name}' is missing from {missing} but present elsewhere ({path}).\n\n\
         Either delete the remaining copy so cjob can create a fresh pair, \
         or restore the missing one. cjob will not overwrite it."
    )]
    KeyConflict {
        key_name: String,
        missing: KeyLocation,
        path: PathBuf,
    },

    #[error("No machine image matches the base image filters.")]
    ImageNotFound,

    #[error("Refusing to touch unmanaged instance {id} (name '{name}').")]
    UnmanagedInstance { id: String, name: String },

    #[error(
        "Job '{job}' already has a live instance ({instance_id}).\n\n\
         Stop it first or pick another name."
    )]
    AlreadyLive { job: String, instance_id: String },

    #[error("Instance for job '{0}' did not appear after boot.")]
    NotFoundAfterBoot(String),

    #[error("Job '{0}' was cancelled.")]
    Cancelled(String),
}
