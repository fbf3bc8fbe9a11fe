//! Application service: listing, lookup and termination of job instances.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::{Context, Result};
use cjob_common::{InstanceState, JobInstance, NameError, has_prefix};

use crate::application::ports::ComputeProvider;
use crate::domain::error::LifecycleError;
use crate::domain::instances::{duplicate_names, managed_instances};

/// Fresh snapshot of every live managed instance.
///
/// # Errors
///
/// Returns an error if the provider listing fails.
pub async fn list_managed(provider: &impl ComputeProvider) -> Result<Vec<JobInstance>> {
    let reservations = provider
        .describe_instances()
        .await
        .context("listing instances")?;
    Ok(managed_instances(&reservations))
}

/// The live instance named `name`, if any.
///
/// When several instances share the name the first one listed wins and a
/// warning is logged.
///
/// # Errors
///
/// Returns an error if the provider listing fails.
pub async fn find(provider: &impl ComputeProvider, name: &str) -> Result<Option<JobInstance>> {
    let mut matches: Vec<JobInstance> = list_managed(provider)
        .await?
        .into_iter()
        .filter(|i| i.name() == name)
        .collect();
    if matches.len() > 1 {
        tracing::warn!(
            job = name,
            count = matches.len(),
            "several live instances share this job name, using the first"
        );
    }
    if matches.is_empty() {
        return Ok(None);
    }
    Ok(Some(matches.swap_remove(0)))
}

/// The live managed instance with provider id `id`, if any.
///
/// # Errors
///
/// Returns an error if the provider listing fails.
pub async fn find_by_id(provider: &impl ComputeProvider, id: &str) -> Result<Option<JobInstance>> {
    Ok(list_managed(provider)
        .await?
        .into_iter()
        .find(|i| i.id() == id))
}

/// Terminate every live instance named `job_id` and return their ids.
///
/// Nothing matching is a no-op with no provider write.
///
/// # Errors
///
/// Returns an error if `job_id` is not a managed name or a provider call fails.
pub async fn stop_job(provider: &impl ComputeProvider, job_id: &str) -> Result<Vec<String>> {
    if !has_prefix(job_id) {
        return Err(NameError::MissingPrefix(job_id.to_string()).into());
    }
    let ids: Vec<String> = list_managed(provider)
        .await?
        .into_iter()
        .filter(|i| i.name() == job_id)
        .map(|i| i.id().to_string())
        .collect();
    if ids.is_empty() {
        tracing::debug!(job = job_id, "no live instance to stop");
        return Ok(ids);
    }
    provider
        .terminate_instances(&ids)
        .await
        .with_context(|| format!("terminating {job_id}"))?;
    tracing::info!(job = job_id, instance_ids = ?ids, "terminated");
    Ok(ids)
}

/// Stop, without terminating, every running or pending instance named
/// `job_id` and return their ids. `start_job` resumes them later.
///
/// Nothing stoppable is a no-op with no provider write.
///
/// # Errors
///
/// Returns an error if `job_id` is not a managed name or a provider call fails.
pub async fn pause_job(provider: &impl ComputeProvider, job_id: &str) -> Result<Vec<String>> {
    if !has_prefix(job_id) {
        return Err(NameError::MissingPrefix(job_id.to_string()).into());
    }
    let ids: Vec<String> = list_managed(provider)
        .await?
        .into_iter()
        .filter(|i| {
            i.name() == job_id
                && matches!(i.state(), InstanceState::Running | InstanceState::Pending)
        })
        .map(|i| i.id().to_string())
        .collect();
    if ids.is_empty() {
        tracing::debug!(job = job_id, "no running instance to stop");
        return Ok(ids);
    }
    provider
        .stop_instances(&ids)
        .await
        .with_context(|| format!("stopping {job_id}"))?;
    tracing::info!(job = job_id, instance_ids = ?ids, "stopped");
    Ok(ids)
}

/// Terminate every managed instance.
///
/// Every name is checked before the first terminate call, so one bad record
/// aborts the whole operation with nothing touched.
///
/// # Errors
///
/// Returns [`LifecycleError::UnmanagedInstance`] if any listed name lacks the
/// prefix, or an error from the provider.
pub async fn stop_all(provider: &impl ComputeProvider) -> Result<Vec<JobInstance>> {
    let instances = list_managed(provider).await?;
    terminate_each(provider, &instances).await?;
    Ok(instances)
}

/// Terminate `instances` one request at a time after checking every name.
///
/// # Errors
///
/// Returns [`LifecycleError::UnmanagedInstance`] before any write if a name
/// lacks the prefix.
pub async fn terminate_each(
    provider: &impl ComputeProvider,
    instances: &[JobInstance],
) -> Result<()> {
    if let Some(bad) = instances.iter().find(|i| !has_prefix(i.name())) {
        return Err(LifecycleError::UnmanagedInstance {
            id: bad.id().to_string(),
            name: bad.name().to_string(),
        }
        .into());
    }
    for instance in instances {
        provider
            .terminate_instances(&[instance.id().to_string()])
            .await
            .with_context(|| format!("terminating {}", instance.name()))?;
        tracing::info!(job = instance.name(), instance_id = instance.id(), "terminated");
    }
    Ok(())
}

/// Live managed instances and the names that appear more than once.
///
/// # Errors
///
/// Returns an error if the provider listing fails.
pub async fn status(provider: &impl ComputeProvider) -> Result<(Vec<JobInstance>, Vec<String>)> {
    let instances = list_managed(provider).await?;
    let duplicates = duplicate_names(&instances);
    Ok((instances, duplicates))
}
