//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`: never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};

use anyhow::Result;

use crate::domain::ec2::{
    CreatedKeyPair, Filter, IpPermission, KeyPairInfo, LaunchRequest, MachineImage, Reservation,
    SecurityGroup, Volume,
};

// ── Compute Provider Port ─────────────────────────────────────────────────────

/// The slice of the EC2 API that cjob drives.
///
/// Implementations return raw provider records. Filtering down to managed
/// instances happens in the application layer, never here.
#[allow(async_fn_in_trait)]
pub trait ComputeProvider {
    /// Every reservation in the region, managed or not.
    async fn describe_instances(&self) -> Result<Vec<Reservation>>;
    async fn start_instances(&self, ids: &[String]) -> Result<()>;
    async fn stop_instances(&self, ids: &[String]) -> Result<()>;
    /// Terminate all `ids` in one request.
    async fn terminate_instances(&self, ids: &[String]) -> Result<()>;

    /// Key pairs whose name is `name`; empty when there is none.
    async fn describe_key_pairs(&self, name: &str) -> Result<Vec<KeyPairInfo>>;
    async fn create_key_pair(&self, name: &str) -> Result<CreatedKeyPair>;

    /// Look up a security group by name.
    async fn find_security_group(&self, name: &str) -> Result<Option<SecurityGroup>>;
    /// Create a security group tagged `Name=<name>` and return its id.
    async fn create_security_group(&self, name: &str, description: &str) -> Result<String>;
    async fn authorize_ingress(&self, group_id: &str, rule: &IpPermission) -> Result<()>;
    async fn authorize_egress(&self, group_id: &str, rule: &IpPermission) -> Result<()>;

    async fn describe_images(&self, owners: &[&str], filters: &[Filter])
    -> Result<Vec<MachineImage>>;

    async fn describe_volumes(&self) -> Result<Vec<Volume>>;
    async fn delete_volume(&self, volume_id: &str) -> Result<()>;

    /// Launch one instance and return its id.
    async fn run_instances(&self, request: &LaunchRequest) -> Result<String>;
}

// ── Object Store Port ─────────────────────────────────────────────────────────

/// Object storage used by the upload, download and ls commands.
#[allow(async_fn_in_trait)]
pub trait ObjectStore {
    async fn upload_file(&self, bucket: &str, local: &Path, key: &str) -> Result<()>;
    async fn download_file(&self, bucket: &str, key: &str, dest: &Path) -> Result<()>;
    /// All keys under `prefix`, across every page.
    async fn list_keys(&self, bucket: &str, prefix: &str) -> Result<Vec<String>>;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: std::time::Duration,
    ) -> Result<Output>;
    /// Run a program with inherited stdio and return only its exit status.
    async fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait: no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Local filesystem access needed by key setup and uploads.
pub trait LocalFs {
    fn exists(&self, path: &Path) -> bool;
    fn is_file(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    /// Write private key material readable only by the owner, creating
    /// parent directories as needed.
    fn write_private_key(&self, path: &Path, material: &str) -> Result<()>;
    /// Every regular file under `dir`, as paths relative to `dir`, sorted.
    fn walk_files(&self, dir: &Path) -> Result<Vec<PathBuf>>;
}
