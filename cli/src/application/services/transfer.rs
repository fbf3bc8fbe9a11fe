//! Application service: object storage upload, download and listing.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::{LocalFs, ObjectStore};
use crate::domain::transfer::{filter_suffix, object_key};

/// Upload a file to `key`, or a directory recursively under `key`.
/// Returns the keys written.
///
/// # Errors
///
/// Returns an error if `src` is neither a file nor a directory, or an upload
/// fails.
pub async fn upload(
    store: &impl ObjectStore,
    fs: &impl LocalFs,
    bucket: &str,
    src: &Path,
    key: &str,
) -> Result<Vec<String>> {
    if fs.is_file(src) {
        store.upload_file(bucket, src, key).await?;
        tracing::info!(bucket, key, "uploaded");
        return Ok(vec![key.to_string()]);
    }
    anyhow::ensure!(
        fs.is_dir(src),
        "{} is neither a file nor a directory",
        src.display()
    );

    let mut written = Vec::new();
    for relative in fs.walk_files(src)? {
        let object = object_key(key, &relative);
        store
            .upload_file(bucket, &src.join(&relative), &object)
            .await?;
        tracing::info!(bucket, key = %object, "uploaded");
        written.push(object);
    }
    Ok(written)
}

/// Download `key` to `dest`, retrying up to `attempts` times.
///
/// # Errors
///
/// Returns the last error once every attempt has failed.
pub async fn download(
    store: &impl ObjectStore,
    bucket: &str,
    key: &str,
    dest: &Path,
    attempts: u32,
) -> Result<()> {
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match store.download_file(bucket, key, dest).await {
            Ok(()) => {
                tracing::info!(bucket, key, dest = %dest.display(), "downloaded");
                return Ok(());
            }
            Err(e) if attempt < attempts => {
                tracing::warn!(bucket, key, attempt, error = %format!("{e:#}"), "download failed, retrying");
                attempt += 1;
            }
            Err(e) => {
                tracing::error!(bucket, key, attempts, error = %format!("{e:#}"), "download failed");
                return Err(e.context(format!("downloading s3://{bucket}/{key}")));
            }
        }
    }
}

/// Keys under `prefix` ending with `suffix`.
///
/// # Errors
///
/// Returns an error if listing fails.
pub async fn list(
    store: &impl ObjectStore,
    bucket: &str,
    prefix: &str,
    suffix: &str,
) -> Result<Vec<String>> {
    let keys = store
        .list_keys(bucket, prefix)
        .await
        .with_context(|| format!("listing s3://{bucket}/{prefix}"))?;
    Ok(filter_suffix(keys, suffix))
}
