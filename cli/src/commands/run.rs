//! `cjob run`: run a command on a fresh instance, then terminate it.

use anyhow::Result;
use clap::Args;
use cjob_common::job_name;

use crate::app::AppContext;
use crate::application::services::remote::run_remote;
use crate::application::services::run_job::run_job;

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Job name, without the cjob- prefix
    pub name: String,

    /// Command to run on the instance over SSH
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Run `cjob run <name> -- <cmd...>`.
///
/// Ctrl-C aborts the run; the instance is terminated either way.
///
/// # Errors
///
/// Returns the first failure from provisioning, the remote command, or
/// cancellation.
pub async fn run(args: &RunArgs, app: &AppContext) -> Result<()> {
    let job_id = job_name(&args.name)?;
    let reporter = app.reporter();

    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            // No signal handler available: never cancel.
            std::future::pending::<()>().await;
        }
    };

    run_job(
        &app.provider,
        &app.fs,
        &app.settings,
        &reporter,
        &job_id,
        app.settings.boot_wait(),
        ctrl_c,
        |instance| async move {
            run_remote(&app.shell, &app.settings, &instance, &args.command).await
        },
    )
    .await?;

    app.output
        .success(&format!("{} finished; instance terminated.", args.name));
    Ok(())
}
