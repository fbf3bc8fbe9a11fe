//! `cjob start`: start a job instance, creating it if needed.

use anyhow::Result;
use cjob_common::job_name;
use serde_json::json;

use crate::app::AppContext;
use crate::application::services::provision::{StartOutcome, start_job};
use crate::commands::JobArgs;
use crate::output::json;

/// Run `cjob start <name>`.
///
/// # Errors
///
/// Returns an error if the name is reserved or provisioning fails.
pub async fn run(args: &JobArgs, app: &AppContext) -> Result<()> {
    let job_id = job_name(&args.name)?;
    let reporter = app.reporter();
    let outcome = start_job(&app.provider, &app.fs, &app.settings, &reporter, &job_id).await?;

    if app.is_json() {
        return json::print(&outcome_json(&args.name, &outcome));
    }

    let ctx = &app.output;
    let name = &args.name;
    match outcome {
        StartOutcome::AlreadyRunning(i) => {
            ctx.info(&format!("{name} is already running at {}.", i.public_ip().unwrap_or("-")));
            ctx.info(&format!("Connect: cjob ssh {name}"));
        }
        StartOutcome::Booting(i) => {
            ctx.info(&format!("{name} ({}) is still booting.", i.id()));
        }
        StartOutcome::Resumed(i) => {
            ctx.success(&format!("Resumed {name} ({}).", i.id()));
        }
        StartOutcome::Busy(i) => {
            ctx.warn(&format!("{name} is {}; try again once it settles.", i.state()));
        }
        StartOutcome::Created { instance_id } => {
            ctx.success(&format!("Launched {name} ({instance_id})."));
            ctx.info(&format!("Check progress: cjob status; connect: cjob ssh {name}"));
        }
    }
    Ok(())
}

fn outcome_json(name: &str, outcome: &StartOutcome) -> serde_json::Value {
    let (kind, id, state) = match outcome {
        StartOutcome::AlreadyRunning(i) => ("already_running", i.id(), Some(i.state())),
        StartOutcome::Booting(i) => ("booting", i.id(), Some(i.state())),
        StartOutcome::Resumed(i) => ("resumed", i.id(), Some(i.state())),
        StartOutcome::Busy(i) => ("busy", i.id(), Some(i.state())),
        StartOutcome::Created { instance_id } => ("created", instance_id.as_str(), None),
    };
    json!({
        "job": name,
        "outcome": kind,
        "instance_id": id,
        "state": state,
    })
}
