//! Infrastructure implementation of the `ObjectStore` port over `aws s3`.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::application::ports::{CommandRunner, ObjectStore};
use crate::infra::aws_cli::AwsCli;
use crate::infra::command_runner::TRANSFER_TIMEOUT;

pub struct AwsCliObjectStore<R: CommandRunner> {
    cli: AwsCli<R>,
}

impl<R: CommandRunner> AwsCliObjectStore<R> {
    pub fn new(runner: R, region: impl Into<String>, profile: Option<String>) -> Self {
        Self {
            cli: AwsCli::new(runner, region, profile),
        }
    }

    async fn copy(&self, from: String, to: String) -> Result<()> {
        self.cli
            .call(
                "s3",
                "cp",
                &[from, to, "--only-show-errors".to_string()],
                Some(TRANSFER_TIMEOUT),
            )
            .await
            .map(|_| ())
    }
}

#[must_use]
pub fn s3_url(bucket: &str, key: &str) -> String {
    format!("s3://{bucket}/{}", key.trim_start_matches('/'))
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListObjects {
    #[serde(default)]
    contents: Vec<Object>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Object {
    key: String,
}

/// Keys from a `list-objects-v2` response. The CLI prints nothing at all
/// when the prefix matches no objects.
fn parse_keys(stdout: &[u8]) -> Result<Vec<String>> {
    if stdout.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    let resp: ListObjects =
        serde_json::from_slice(stdout).context("invalid JSON from aws s3api list-objects-v2")?;
    Ok(resp.contents.into_iter().map(|o| o.key).collect())
}

impl<R: CommandRunner> ObjectStore for AwsCliObjectStore<R> {
    async fn upload_file(&self, bucket: &str, local: &Path, key: &str) -> Result<()> {
        self.copy(local.display().to_string(), s3_url(bucket, key))
            .await
    }

    async fn download_file(&self, bucket: &str, key: &str, dest: &Path) -> Result<()> {
        self.copy(s3_url(bucket, key), dest.display().to_string())
            .await
    }

    async fn list_keys(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        let stdout = self
            .cli
            .call(
                "s3api",
                "list-objects-v2",
                &[
                    "--bucket".to_string(),
                    bucket.to_string(),
                    "--prefix".to_string(),
                    prefix.to_string(),
                ],
                None,
            )
            .await?;
        parse_keys(&stdout)
    }
}
