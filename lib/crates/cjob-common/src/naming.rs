//! Reserved-prefix naming policy.
//!
//! Every instance cjob creates is tagged `Name=cjob-<job>`. Anything in the
//! account without the prefix belongs to someone else and must stay invisible
//! to listing, lookup, and cleanup.

use thiserror::Error;

/// Literal prefix carried by every tool-managed resource name.
pub const JOB_PREFIX: &str = "cjob-";

/// CLI wildcard meaning "every managed instance". Never a job name.
pub const ALL_JOBS: &str = "all";

/// Misuse of the naming policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("name '{0}' already carries the 'cjob-' prefix")]
    AlreadyPrefixed(String),

    #[error("name '{0}' does not carry the 'cjob-' prefix")]
    MissingPrefix(String),

    #[error("'all' is reserved and cannot be used as a job name")]
    Reserved,
}

/// Prepend the reserved prefix.
///
/// # Errors
///
/// Returns [`NameError::AlreadyPrefixed`] when `name` is already prefixed.
pub fn add_prefix(name: &str) -> Result<String, NameError> {
    if has_prefix(name) {
        return Err(NameError::AlreadyPrefixed(name.to_string()));
    }
    Ok(format!("{JOB_PREFIX}{name}"))
}

#[must_use]
pub fn has_prefix(name: &str) -> bool {
    name.starts_with(JOB_PREFIX)
}

/// Remove the reserved prefix.
///
/// # Errors
///
/// Returns [`NameError::MissingPrefix`] when `name` is not prefixed.
pub fn strip_prefix(name: &str) -> Result<&str, NameError> {
    name.strip_prefix(JOB_PREFIX)
        .ok_or_else(|| NameError::MissingPrefix(name.to_string()))
}

/// Turn a job name typed by the user into the managed instance name.
///
/// # Errors
///
/// Returns [`NameError::Reserved`] for the `all` wildcard and
/// [`NameError::AlreadyPrefixed`] if the user typed the prefix themselves.
pub fn job_name(input: &str) -> Result<String, NameError> {
    if input == ALL_JOBS {
        return Err(NameError::Reserved);
    }
    add_prefix(input)
}
