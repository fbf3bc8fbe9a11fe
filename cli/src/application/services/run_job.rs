//! Application service: run one unit of work on a dedicated instance.
//!
//! The instance is launched, given a fixed boot delay, handed to the work
//! future, and terminated afterwards on every exit path. Only the instance
//! launched here is ever terminated.

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use cjob_common::JobInstance;

use crate::application::ports::{ComputeProvider, LocalFs, ProgressReporter};
use crate::application::services::instances::{find, find_by_id};
use crate::application::services::provision::create_job;
use crate::domain::config::Settings;
use crate::domain::error::LifecycleError;

/// Launch `job_id`, wait `boot_wait`, run `work`, then terminate the
/// launched instance.
///
/// A job that already has a live instance is refused before anything is
/// launched. Failures before the launch request succeeds leave nothing to
/// tear down and return straight away. From then on `cancel` resolving
/// before the work finishes aborts the run with
/// [`LifecycleError::Cancelled`], and teardown always happens.
///
/// # Errors
///
/// Returns [`LifecycleError::AlreadyLive`] for a name in use, otherwise the
/// first error from creation, lookup, the work, or cancellation. A teardown
/// failure is returned only when everything before it succeeded; otherwise
/// it is logged and the original error wins.
#[allow(clippy::too_many_arguments)]
pub async fn run_job<T, W, Fut, C>(
    provider: &impl ComputeProvider,
    fs: &impl LocalFs,
    settings: &Settings,
    reporter: &impl ProgressReporter,
    job_id: &str,
    boot_wait: Duration,
    cancel: C,
    work: W,
) -> Result<T>
where
    W: FnOnce(JobInstance) -> Fut,
    Fut: Future<Output = Result<T>>,
    C: Future<Output = ()>,
{
    if let Some(existing) = find(provider, job_id).await? {
        return Err(LifecycleError::AlreadyLive {
            job: job_id.to_string(),
            instance_id: existing.id().to_string(),
        }
        .into());
    }
    let instance_id = create_job(provider, fs, settings, reporter, job_id).await?;

    let body = async {
        reporter.step(&format!("waiting {}s for boot...", boot_wait.as_secs()));
        tokio::time::sleep(boot_wait).await;
        let instance = find_by_id(provider, &instance_id)
            .await?
            .ok_or_else(|| LifecycleError::NotFoundAfterBoot(job_id.to_string()))?;
        tracing::info!(job = job_id, instance_id = instance.id(), "running work");
        work(instance).await
    };

    let outcome = tokio::select! {
        result = body => result,
        () = cancel => {
            tracing::warn!(job = job_id, "cancelled, tearing down");
            Err(LifecycleError::Cancelled(job_id.to_string()).into())
        }
    };

    reporter.step(&format!("terminating {instance_id}..."));
    let teardown = provider
        .terminate_instances(std::slice::from_ref(&instance_id))
        .await
        .with_context(|| format!("terminating {job_id} ({instance_id})"));
    if teardown.is_ok() {
        tracing::info!(job = job_id, instance_id = %instance_id, "terminated");
    }

    match (outcome, teardown) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(teardown_err)) => {
            tracing::error!(
                job = job_id,
                error = %format!("{teardown_err:#}"),
                "teardown failed after an earlier error; instance may still be running"
            );
            reporter.warn(&format!(
                "could not terminate {instance_id}; it may still be running"
            ));
            Err(e)
        }
    }
}
