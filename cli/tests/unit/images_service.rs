//! Tests for base image resolution.

#![allow(clippy::expect_used)]

use cjob_cli::application::services::images::latest_base_image;
use cjob_cli::domain::error::LifecycleError;
use cjob_cli::domain::image::UBUNTU_OWNER_ID;

use crate::helpers::image;
use crate::mocks::FakeProvider;

#[tokio::test]
async fn newest_creation_date_wins() {
    let provider = FakeProvider::new()
        .with_image(image("ami-mid", "2024-03-01T00:00:00.000Z"))
        .with_image(image("ami-new", "2024-04-15T10:30:00.000Z"))
        .with_image(image("ami-old", "2023-11-20T00:00:00.000Z"));

    let id = latest_base_image(&provider).await.expect("resolve");

    assert_eq!(id, "ami-new");
    assert_eq!(provider.calls(), [format!("describe_images:{UBUNTU_OWNER_ID}")]);
}

#[tokio::test]
async fn empty_result_is_image_not_found() {
    let provider = FakeProvider::new();

    let err = latest_base_image(&provider).await.expect_err("none");

    assert!(matches!(
        err.downcast_ref::<LifecycleError>(),
        Some(LifecycleError::ImageNotFound)
    ));
}

#[tokio::test]
async fn unparseable_date_names_the_image() {
    let provider = FakeProvider::new().with_image(image("ami-bad", "last tuesday"));

    let err = latest_base_image(&provider).await.expect_err("bad date");

    assert!(format!("{err:#}").contains("ami-bad"));
}
