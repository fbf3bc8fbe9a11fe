//! `cjob upload`, `cjob download`, `cjob ls`: object storage helpers.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde_json::json;

use crate::app::AppContext;
use crate::application::services::transfer;
use crate::output::json;

#[derive(Args)]
pub struct UploadArgs {
    /// Local file or directory
    pub src: PathBuf,
    /// Destination key, or key prefix for a directory
    pub key: String,
}

#[derive(Args)]
pub struct DownloadArgs {
    /// Object key
    pub key: String,
    /// Local destination path
    pub dest: PathBuf,
}

#[derive(Args)]
pub struct LsArgs {
    /// Key prefix to list under
    #[arg(default_value = "")]
    pub prefix: String,
    /// Only show keys ending with this suffix
    #[arg(long, default_value = "")]
    pub suffix: String,
}

/// Run `cjob upload <src> <key>`.
///
/// # Errors
///
/// Returns an error if no bucket is configured or an upload fails.
pub async fn upload(args: &UploadArgs, app: &AppContext) -> Result<()> {
    let bucket = app.settings.bucket()?;
    let keys = transfer::upload(&app.store, &app.fs, bucket, &args.src, &args.key).await?;
    if app.is_json() {
        return json::print(&json!({ "bucket": bucket, "uploaded": keys }));
    }
    app.output
        .success(&format!("Uploaded {} object(s) to s3://{bucket}/{}", keys.len(), args.key));
    Ok(())
}

/// Run `cjob download <key> <dest>`.
///
/// # Errors
///
/// Returns an error if no bucket is configured or every attempt fails.
pub async fn download(args: &DownloadArgs, app: &AppContext) -> Result<()> {
    let bucket = app.settings.bucket()?;
    transfer::download(
        &app.store,
        bucket,
        &args.key,
        &args.dest,
        app.settings.transfer_attempts,
    )
    .await?;
    if app.is_json() {
        return json::print(&json!({ "bucket": bucket, "key": args.key, "dest": args.dest }));
    }
    app.output
        .success(&format!("Downloaded s3://{bucket}/{} to {}", args.key, args.dest.display()));
    Ok(())
}

/// Run `cjob ls [prefix] [--suffix S]`.
///
/// # Errors
///
/// Returns an error if no bucket is configured or listing fails.
pub async fn ls(args: &LsArgs, app: &AppContext) -> Result<()> {
    let bucket = app.settings.bucket()?;
    let keys = transfer::list(&app.store, bucket, &args.prefix, &args.suffix).await?;
    if app.is_json() {
        return json::print(&keys);
    }
    app.human().render_keys(&keys);
    Ok(())
}
