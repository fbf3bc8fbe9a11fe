//! Cost-control cleanup decisions.
//!
//! Instances can be exempted by name. Volumes cannot: any unattached volume
//! is treated as orphaned.

use chrono::{DateTime, Utc};
use cjob_common::JobInstance;
use serde::Serialize;

use crate::domain::ec2::Volume;

/// An instance chosen for termination and the uptime that condemned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpiredInstance {
    pub id: String,
    pub name: String,
    pub uptime_hours: i64,
    pub launched_at: DateTime<Utc>,
}

/// The outcome of one cleanup pass. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupDecision {
    pub instances: Vec<ExpiredInstance>,
    pub volumes: Vec<String>,
}

impl CleanupDecision {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty() && self.volumes.is_empty()
    }

    #[must_use]
    pub fn instance_ids(&self) -> Vec<String> {
        self.instances.iter().map(|i| i.id.clone()).collect()
    }
}

/// `true` when `instance` is on the protected list, by full or bare name.
#[must_use]
pub fn is_protected(instance: &JobInstance, protected: &[String]) -> bool {
    protected
        .iter()
        .any(|p| p == instance.name() || p == instance.job())
}

/// Select unprotected instances whose whole-hour uptime exceeds `max_hours`.
#[must_use]
pub fn select_expired(
    instances: &[JobInstance],
    now: DateTime<Utc>,
    max_hours: u32,
    protected: &[String],
) -> Vec<ExpiredInstance> {
    instances
        .iter()
        .filter(|i| !is_protected(i, protected))
        .filter_map(|i| {
            let uptime_hours = i.uptime(now).num_hours();
            (uptime_hours > i64::from(max_hours)).then(|| ExpiredInstance {
                id: i.id().to_string(),
                name: i.name().to_string(),
                uptime_hours,
                launched_at: i.launched_at(),
            })
        })
        .collect()
}

/// Select every unattached volume.
#[must_use]
pub fn select_orphaned(volumes: &[Volume]) -> Vec<String> {
    volumes
        .iter()
        .filter(|v| v.is_orphaned())
        .map(|v| v.volume_id.clone())
        .collect()
}
