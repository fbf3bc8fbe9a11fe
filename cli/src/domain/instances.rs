//! Mapping raw provider listings onto managed job instances.

use std::collections::BTreeMap;

use cjob_common::{InstanceState, JobInstance, has_prefix};

use crate::domain::ec2::Reservation;

/// Flatten reservations into the managed, non-terminated instances.
///
/// Instances without a `Name` tag get an empty name and fall out at the
/// prefix check along with every other unmanaged instance.
#[must_use]
pub fn managed_instances(reservations: &[Reservation]) -> Vec<JobInstance> {
    reservations
        .iter()
        .flat_map(|r| r.instances.iter())
        .filter(|i| i.state.name != InstanceState::Terminated)
        .filter(|i| has_prefix(i.name_tag()))
        .filter_map(|i| {
            JobInstance::new(
                &i.instance_id,
                i.name_tag(),
                &i.instance_type,
                i.public_ip().map(String::from),
                i.state.name,
                i.launch_time,
            )
            .ok()
        })
        .collect()
}

/// Managed names that appear on more than one live instance, sorted.
#[must_use]
pub fn duplicate_names(instances: &[JobInstance]) -> Vec<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for i in instances {
        *counts.entry(i.name()).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(name, _)| name.to_string())
        .collect()
}
