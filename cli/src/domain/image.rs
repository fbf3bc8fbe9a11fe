//! Base machine image selection.
//!
//! The filter set is pinned to one OS release and architecture.

use chrono::{DateTime, Utc};

use anyhow::{Context, Result};

use crate::domain::ec2::{Filter, MachineImage};
use crate::domain::error::LifecycleError;

/// Canonical's AWS account.
pub const UBUNTU_OWNER_ID: &str = "099720109477";
pub const UBUNTU_NAME_PATTERN: &str = "ubuntu/images/*ubuntu-bionic-18.04-amd64-server-*";

/// Filters passed to `DescribeImages` alongside the owner.
#[must_use]
pub fn base_image_filters() -> Vec<Filter> {
    let f = |name: &'static str, value: &str| Filter {
        name,
        values: vec![value.to_string()],
    };
    vec![
        f("name", UBUNTU_NAME_PATTERN),
        f("owner-id", UBUNTU_OWNER_ID),
        f("state", "available"),
        f("root-device-type", "ebs"),
        f("virtualization-type", "hvm"),
    ]
}

/// Pick the image with the most recent creation date.
///
/// # Errors
///
/// Returns [`LifecycleError::ImageNotFound`] for an empty candidate set, or
/// an error naming the image whose creation date cannot be parsed.
pub fn latest_image(images: &[MachineImage]) -> Result<&MachineImage> {
    let mut latest: Option<(&MachineImage, DateTime<Utc>)> = None;
    for image in images {
        let created = DateTime::parse_from_rfc3339(&image.creation_date)
            .with_context(|| {
                format!(
                    "image {} has unparseable creation date {:?}",
                    image.image_id, image.creation_date
                )
            })?
            .with_timezone(&Utc);
        if latest.is_none_or(|(_, best)| created > best) {
            latest = Some((image, created));
        }
    }
    latest
        .map(|(image, _)| image)
        .ok_or_else(|| LifecycleError::ImageNotFound.into())
}
