//! Key pair reconciliation between the local filesystem and the provider.

use std::path::Path;

use crate::domain::error::KeyLocation;

/// What to do about the configured key pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPlan {
    /// Present in both places.
    Reuse,
    /// Present in neither place: create remotely, save the private key locally.
    Create,
    /// Present in exactly one place; the field names the missing side.
    Conflict(KeyLocation),
}

/// The remote key name is the file stem of the local private key path.
#[must_use]
pub fn key_name_for(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(String::from)
}

#[must_use]
pub fn plan(exists_remotely: bool, exists_locally: bool) -> KeyPlan {
    match (exists_remotely, exists_locally) {
        (true, true) => KeyPlan::Reuse,
        (false, false) => KeyPlan::Create,
        (true, false) => KeyPlan::Conflict(KeyLocation::Local),
        (false, true) => KeyPlan::Conflict(KeyLocation::Provider),
    }
}
