//! Application service: SSH sessions and remote commands on job instances.

use std::process::ExitStatus;

use anyhow::{Context, Result};
use cjob_common::JobInstance;

use crate::application::ports::CommandRunner;
use crate::domain::config::Settings;
use crate::domain::ssh::ssh_args;

/// Public address of a running instance.
///
/// # Errors
///
/// Returns an error if the instance is not running or has no public address.
pub fn reachable_address(instance: &JobInstance) -> Result<&str> {
    anyhow::ensure!(
        instance.is_running(),
        "{} is {}, not running",
        instance.job(),
        instance.state()
    );
    instance
        .public_ip()
        .with_context(|| format!("{} has no public address", instance.job()))
}

/// Run `ssh` against `instance` with inherited stdio. An empty `command`
/// opens an interactive shell.
///
/// # Errors
///
/// Returns an error if the instance is unreachable or `ssh` cannot be spawned.
pub async fn ssh(
    runner: &impl CommandRunner,
    settings: &Settings,
    instance: &JobInstance,
    command: &[String],
) -> Result<ExitStatus> {
    let host = reachable_address(instance)?;
    let args = ssh_args(&settings.key_file_path, &settings.ssh_user, host, command);
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    tracing::debug!(job = instance.name(), host, "ssh");
    runner.run_status("ssh", &args).await.context("running ssh")
}

/// Run `command` on `instance` and fail unless it exits zero.
///
/// # Errors
///
/// Returns an error if ssh fails to start or the remote command fails.
pub async fn run_remote(
    runner: &impl CommandRunner,
    settings: &Settings,
    instance: &JobInstance,
    command: &[String],
) -> Result<()> {
    let status = ssh(runner, settings, instance, command).await?;
    anyhow::ensure!(
        status.success(),
        "remote command on {} failed ({status})",
        instance.job()
    );
    Ok(())
}
