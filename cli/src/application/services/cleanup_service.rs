//! Application service: age-based instance cleanup and orphaned volume
//! removal.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::application::ports::ComputeProvider;
use crate::application::services::instances::list_managed;
use crate::domain::cleanup::{CleanupDecision, select_expired, select_orphaned};
use crate::domain::config::Settings;

/// Terminate every unprotected instance older than `max_hours`.
///
/// With `dry_run` the decision is computed and returned without any write.
/// Selected instances are terminated in a single request.
///
/// # Errors
///
/// Returns an error if listing or terminating fails.
pub async fn cleanup_instances(
    provider: &impl ComputeProvider,
    settings: &Settings,
    now: DateTime<Utc>,
    dry_run: bool,
) -> Result<CleanupDecision> {
    let instances = list_managed(provider).await?;
    let decision = CleanupDecision {
        instances: select_expired(
            &instances,
            now,
            settings.max_hours,
            &settings.protected_instances,
        ),
        volumes: Vec::new(),
    };

    if decision.instances.is_empty() {
        tracing::info!(max_hours = settings.max_hours, "no instances past the uptime limit");
        return Ok(decision);
    }
    for expired in &decision.instances {
        tracing::info!(
            job = %expired.name,
            instance_id = %expired.id,
            uptime_hours = expired.uptime_hours,
            dry_run,
            "past uptime limit"
        );
    }
    if !dry_run {
        provider
            .terminate_instances(&decision.instance_ids())
            .await
            .context("terminating expired instances")?;
    }
    Ok(decision)
}

/// Delete every unattached volume, one request per volume.
///
/// # Errors
///
/// Returns an error on the first failed listing or deletion.
pub async fn cleanup_volumes(
    provider: &impl ComputeProvider,
    dry_run: bool,
) -> Result<CleanupDecision> {
    let volumes = provider
        .describe_volumes()
        .await
        .context("listing volumes")?;
    let decision = CleanupDecision {
        instances: Vec::new(),
        volumes: select_orphaned(&volumes),
    };

    if decision.volumes.is_empty() {
        tracing::info!("no orphaned volumes");
        return Ok(decision);
    }
    for volume_id in &decision.volumes {
        tracing::info!(volume_id = %volume_id, dry_run, "orphaned volume");
        if !dry_run {
            provider
                .delete_volume(volume_id)
                .await
                .with_context(|| format!("deleting volume {volume_id}"))?;
        }
    }
    Ok(decision)
}
