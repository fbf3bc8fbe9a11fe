//! Application service: job creation and the start use-case.
//!
//! Supporting resources are set up idempotently before each launch and are
//! never rolled back when a later step fails.

use anyhow::{Context, Result};
use cjob_common::{InstanceState, JobInstance, NameError, has_prefix};

use crate::application::ports::{ComputeProvider, LocalFs, ProgressReporter};
use crate::application::services::images::latest_base_image;
use crate::application::services::instances::find;
use crate::domain::config::Settings;
use crate::domain::ec2::LaunchRequest;
use crate::domain::error::LifecycleError;
use crate::domain::keypair::{self, KeyPlan};
use crate::domain::security_group::{
    DEFAULT_SECURITY_GROUP, allows_all_egress, allows_ssh, open_egress, ssh_ingress,
};

/// Outcome of the `start_job` use-case.
#[derive(Debug)]
pub enum StartOutcome {
    /// The job was already running; nothing was changed.
    AlreadyRunning(JobInstance),
    /// The job is still booting; nothing was changed.
    Booting(JobInstance),
    /// A stopped instance was started again.
    Resumed(JobInstance),
    /// The instance is mid-transition and was left alone.
    Busy(JobInstance),
    /// No live instance existed, so a new one was launched.
    Created { instance_id: String },
}

/// Start `job_id`, creating it when no live instance exists.
///
/// # Errors
///
/// Returns an error if `job_id` is unprefixed or any provider step fails.
pub async fn start_job(
    provider: &impl ComputeProvider,
    fs: &impl LocalFs,
    settings: &Settings,
    reporter: &impl ProgressReporter,
    job_id: &str,
) -> Result<StartOutcome> {
    let Some(instance) = find(provider, job_id).await? else {
        let instance_id = create_job(provider, fs, settings, reporter, job_id).await?;
        return Ok(StartOutcome::Created { instance_id });
    };

    Ok(match instance.state() {
        InstanceState::Running => StartOutcome::AlreadyRunning(instance),
        InstanceState::Pending => StartOutcome::Booting(instance),
        InstanceState::Stopped => {
            reporter.step(&format!("starting stopped instance {}...", instance.id()));
            provider
                .start_instances(&[instance.id().to_string()])
                .await
                .with_context(|| format!("starting {job_id}"))?;
            tracing::info!(job = job_id, instance_id = instance.id(), "resumed");
            StartOutcome::Resumed(instance)
        }
        InstanceState::Stopping
        | InstanceState::ShuttingDown
        | InstanceState::Rebooting
        | InstanceState::Terminated => StartOutcome::Busy(instance),
    })
}

/// Launch a new instance for `job_id` and return its id.
///
/// # Errors
///
/// Returns an error if `job_id` is unprefixed, the key pair is in a
/// conflicting state, no base image is found, or a provider call fails.
pub async fn create_job(
    provider: &impl ComputeProvider,
    fs: &impl LocalFs,
    settings: &Settings,
    reporter: &impl ProgressReporter,
    job_id: &str,
) -> Result<String> {
    if !has_prefix(job_id) {
        return Err(NameError::MissingPrefix(job_id.to_string()).into());
    }

    let security_group_id = match &settings.security_group {
        Some(id) => id.clone(),
        None => ensure_security_group(provider, reporter).await?,
    };

    let image_id = match &settings.image_id {
        Some(id) => id.clone(),
        None => {
            reporter.step("resolving latest base image...");
            latest_base_image(provider).await?
        }
    };

    let key_name = ensure_key_pair(provider, fs, settings, reporter).await?;

    let request = LaunchRequest {
        name: job_id.to_string(),
        image_id,
        instance_type: settings.instance_type.clone(),
        security_group_id,
        key_name,
        shutdown_behaviour: settings.shutdown_behaviour.as_str().to_string(),
        iam_instance_profile: settings.iam_instance_profile.clone(),
        spot_max_price: settings.spot.map(|s| s.max_price),
    };

    reporter.step(&format!("launching {} ({})...", job_id, request.instance_type));
    let instance_id = provider
        .run_instances(&request)
        .await
        .with_context(|| format!("launching {job_id}"))?;
    tracing::info!(
        job = job_id,
        instance_id = %instance_id,
        image_id = %request.image_id,
        spot = request.spot_max_price.is_some(),
        "launched"
    );
    Ok(instance_id)
}

/// Find or create the default security group and make sure it allows SSH in
/// and everything out. Returns the group id.
///
/// # Errors
///
/// Returns an error if a provider call fails or the group cannot be re-read
/// after creation.
pub async fn ensure_security_group(
    provider: &impl ComputeProvider,
    reporter: &impl ProgressReporter,
) -> Result<String> {
    let group = match provider.find_security_group(DEFAULT_SECURITY_GROUP).await? {
        Some(group) => group,
        None => {
            reporter.step(&format!("creating security group {DEFAULT_SECURITY_GROUP}..."));
            let id = provider
                .create_security_group(DEFAULT_SECURITY_GROUP, "cjob job instances")
                .await
                .context("creating security group")?;
            tracing::info!(group_id = %id, "created security group");
            reporter.success(&format!("created security group {DEFAULT_SECURITY_GROUP} ({id})"));
            provider
                .find_security_group(DEFAULT_SECURITY_GROUP)
                .await?
                .with_context(|| format!("security group {id} not visible after creation"))?
        }
    };

    if !allows_ssh(&group) {
        provider
            .authorize_ingress(&group.group_id, &ssh_ingress())
            .await
            .context("authorizing SSH ingress")?;
        tracing::info!(group_id = %group.group_id, "authorized SSH ingress");
    }
    if !allows_all_egress(&group) {
        provider
            .authorize_egress(&group.group_id, &open_egress())
            .await
            .context("authorizing egress")?;
        tracing::info!(group_id = %group.group_id, "authorized egress");
    }
    Ok(group.group_id)
}

/// Reconcile the configured key file with the provider's key pairs and
/// return the key name to launch with.
///
/// # Errors
///
/// Returns [`LifecycleError::KeyConflict`] when the key exists on only one
/// side, or an error if creating or saving the key fails.
pub async fn ensure_key_pair(
    provider: &impl ComputeProvider,
    fs: &impl LocalFs,
    settings: &Settings,
    reporter: &impl ProgressReporter,
) -> Result<String> {
    let path = &settings.key_file_path;
    let key_name = keypair::key_name_for(path)
        .with_context(|| format!("cannot derive a key name from {}", path.display()))?;

    let remote = !provider.describe_key_pairs(&key_name).await?.is_empty();
    let local = fs.exists(path);

    match keypair::plan(remote, local) {
        KeyPlan::Reuse => Ok(key_name),
        KeyPlan::Conflict(missing) => Err(LifecycleError::KeyConflict {
            key_name,
            missing,
            path: path.clone(),
        }
        .into()),
        KeyPlan::Create => {
            reporter.step(&format!("creating key pair {key_name}..."));
            let created = provider
                .create_key_pair(&key_name)
                .await
                .with_context(|| format!("creating key pair {key_name}"))?;
            fs.write_private_key(path, &created.key_material)?;
            tracing::info!(key_name = %created.key_name, path = %path.display(), "saved new key pair");
            reporter.success(&format!(
                "created key pair {} and saved it to {}",
                created.key_name,
                path.display()
            ));
            Ok(created.key_name)
        }
    }
}
