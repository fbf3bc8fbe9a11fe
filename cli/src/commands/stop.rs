//! `cjob stop`: terminate one job, or every job with `stop all`.
//!
//! `--keep` stops a single job's instance instead, so `cjob start` can
//! resume it.

use anyhow::{Result, bail};
use clap::Args;
use cjob_common::{ALL_JOBS, add_prefix};
use serde_json::json;

use crate::app::AppContext;
use crate::application::services::instances::{list_managed, pause_job, stop_all, stop_job};
use crate::output::json;

/// Arguments for the stop command.
#[derive(Args)]
pub struct StopArgs {
    /// Job name, without the cjob- prefix, or `all`
    pub name: String,

    /// Stop the instance but keep it for a later `cjob start`
    #[arg(long)]
    pub keep: bool,
}

/// Run `cjob stop <name|all> [--keep]`.
///
/// # Errors
///
/// Returns an error if the name is invalid or termination fails.
pub async fn run(args: &StopArgs, app: &AppContext) -> Result<()> {
    if args.name == ALL_JOBS {
        if args.keep {
            bail!("--keep needs a single job name, not `{ALL_JOBS}`");
        }
        return run_all(app).await;
    }

    let job_id = add_prefix(&args.name)?;
    if args.keep {
        return run_keep(app, &args.name, &job_id).await;
    }
    let stopped = stop_job(&app.provider, &job_id).await?;

    if app.is_json() {
        return json::print(&json!({ "job": args.name, "terminated": stopped }));
    }
    if stopped.is_empty() {
        app.output.info(&format!("No live instance for {}.", args.name));
    } else {
        app.output
            .success(&format!("Terminating {} ({}).", args.name, stopped.join(", ")));
    }
    Ok(())
}

async fn run_keep(app: &AppContext, name: &str, job_id: &str) -> Result<()> {
    let stopped = pause_job(&app.provider, job_id).await?;

    if app.is_json() {
        return json::print(&json!({ "job": name, "stopped": stopped }));
    }
    if stopped.is_empty() {
        app.output.info(&format!("No running instance for {name}."));
    } else {
        app.output.success(&format!(
            "Stopping {name} ({}). `cjob start {name}` resumes it.",
            stopped.join(", ")
        ));
    }
    Ok(())
}

async fn run_all(app: &AppContext) -> Result<()> {
    let live = list_managed(&app.provider).await?;
    if live.is_empty() {
        if app.is_json() {
            return json::print(&json!({ "terminated": [] }));
        }
        app.output.info("No job instances running.");
        return Ok(());
    }

    if !app.is_json() {
        for instance in &live {
            app.output.kv(instance.job(), instance.id());
        }
    }
    let prompt = format!("Terminate all {} job instances?", live.len());
    if !app.non_interactive && !app.confirm(&prompt, false)? {
        app.output.info("Nothing terminated.");
        return Ok(());
    }

    let stopped = stop_all(&app.provider).await?;
    if app.is_json() {
        let ids: Vec<&str> = stopped.iter().map(|i| i.id()).collect();
        return json::print(&json!({ "terminated": ids }));
    }
    app.output
        .success(&format!("Terminating {} job instances.", stopped.len()));
    Ok(())
}
