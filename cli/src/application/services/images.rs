//! Application service: base image lookup.

use anyhow::{Context, Result};

use crate::application::ports::ComputeProvider;
use crate::domain::image::{UBUNTU_OWNER_ID, base_image_filters, latest_image};

/// Id of the newest image matching the base image filters.
///
/// # Errors
///
/// Returns an error if the lookup fails, nothing matches, or a creation date
/// cannot be parsed.
pub async fn latest_base_image(provider: &impl ComputeProvider) -> Result<String> {
    let images = provider
        .describe_images(&[UBUNTU_OWNER_ID], &base_image_filters())
        .await
        .context("describing base images")?;
    let image = latest_image(&images)?;
    tracing::debug!(
        image_id = %image.image_id,
        name = image.name.as_deref().unwrap_or_default(),
        candidates = images.len(),
        "resolved base image"
    );
    Ok(image.image_id.clone())
}
