//! `cjob cleanup`: terminate long-running instances or delete orphaned
//! volumes.

use anyhow::Result;
use chrono::Utc;
use clap::{Args, Subcommand};
use serde_json::json;

use crate::app::AppContext;
use crate::application::services::cleanup_service::{cleanup_instances, cleanup_volumes};
use crate::output::json;

#[derive(Subcommand)]
pub enum CleanupCommand {
    /// Terminate unprotected instances past EC2_MAX_HOURS
    Instances(CleanupArgs),
    /// Delete every unattached volume
    Volumes(CleanupArgs),
}

#[derive(Args)]
pub struct CleanupArgs {
    /// Report what would be removed without removing anything
    #[arg(long)]
    pub dry_run: bool,
}

/// Run `cjob cleanup <instances|volumes>`.
///
/// # Errors
///
/// Returns an error if a listing or deletion fails.
pub async fn run(cmd: &CleanupCommand, app: &AppContext) -> Result<()> {
    let (decision, dry_run) = match cmd {
        CleanupCommand::Instances(args) => (
            cleanup_instances(&app.provider, &app.settings, Utc::now(), args.dry_run).await?,
            args.dry_run,
        ),
        CleanupCommand::Volumes(args) => {
            (cleanup_volumes(&app.provider, args.dry_run).await?, args.dry_run)
        }
    };

    if app.is_json() {
        return json::print(&json!({
            "dry_run": dry_run,
            "instances": decision.instances,
            "volumes": decision.volumes,
        }));
    }
    app.human().render_cleanup(&decision, dry_run);
    Ok(())
}
