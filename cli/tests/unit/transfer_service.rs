//! Tests for the object storage helpers.

#![allow(clippy::expect_used)]

use std::path::{Path, PathBuf};

use cjob_cli::application::services::transfer::{download, list, upload};

use crate::mocks::{FakeFs, FakeStore};

#[tokio::test]
async fn single_file_uploads_to_the_given_key() {
    let store = FakeStore::new();
    let fs = FakeFs::new().with_file("/data/model.bin");

    let keys = upload(&store, &fs, "jobs", Path::new("/data/model.bin"), "runs/model.bin")
        .await
        .expect("upload");

    assert_eq!(keys, ["runs/model.bin"]);
    assert_eq!(
        store.uploads(),
        [(
            "jobs".to_string(),
            PathBuf::from("/data/model.bin"),
            "runs/model.bin".to_string()
        )]
    );
}

#[tokio::test]
async fn directory_uploads_every_file_under_the_prefix() {
    let store = FakeStore::new();
    let fs = FakeFs::new().with_dir("/data/out", &["a.csv", "logs/run.log"]);

    let keys = upload(&store, &fs, "jobs", Path::new("/data/out"), "runs/42/")
        .await
        .expect("upload");

    assert_eq!(keys, ["runs/42/a.csv", "runs/42/logs/run.log"]);
    let locals: Vec<PathBuf> = store.uploads().into_iter().map(|(_, p, _)| p).collect();
    assert_eq!(
        locals,
        [
            PathBuf::from("/data/out/a.csv"),
            PathBuf::from("/data/out/logs/run.log")
        ]
    );
}

#[tokio::test]
async fn missing_source_is_rejected() {
    let store = FakeStore::new();
    let fs = FakeFs::new();

    let err = upload(&store, &fs, "jobs", Path::new("/nope"), "k")
        .await
        .expect_err("missing");

    assert!(err.to_string().contains("neither a file nor a directory"));
    assert!(store.uploads().is_empty());
}

#[tokio::test]
async fn download_retries_until_success() {
    let store = FakeStore::new().failing_downloads(2);

    download(&store, "jobs", "runs/out.csv", Path::new("/tmp/out.csv"), 3)
        .await
        .expect("third attempt succeeds");

    assert_eq!(store.download_calls(), 3);
}

#[tokio::test]
async fn download_gives_up_after_attempts() {
    let store = FakeStore::new().failing_downloads(5);

    let err = download(&store, "jobs", "runs/out.csv", Path::new("/tmp/out.csv"), 3)
        .await
        .expect_err("exhausted");

    assert_eq!(store.download_calls(), 3);
    let msg = format!("{err:#}");
    assert!(msg.contains("s3://jobs/runs/out.csv"));
    assert!(msg.contains("connection reset"));
}

#[tokio::test]
async fn list_filters_by_suffix() {
    let store = FakeStore::new().with_keys(&["runs/a.csv", "runs/b.log", "runs/c.csv", "other/d.csv"]);

    let keys = list(&store, "jobs", "runs/", ".csv").await.expect("list");

    assert_eq!(keys, ["runs/a.csv", "runs/c.csv"]);
}
