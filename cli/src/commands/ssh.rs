//! `cjob ssh`: open an interactive shell on a running job.

use std::process::ExitCode;

use anyhow::Result;
use cjob_common::job_name;

use crate::app::AppContext;
use crate::application::services::instances::find;
use crate::application::services::remote::ssh;
use crate::commands::JobArgs;

/// Run `cjob ssh <name>`. The exit code is the remote shell's.
///
/// # Errors
///
/// Returns an error if the job does not exist, is not running, or `ssh`
/// cannot be started.
pub async fn run(args: &JobArgs, app: &AppContext) -> Result<ExitCode> {
    let job_id = job_name(&args.name)?;
    let Some(instance) = find(&app.provider, &job_id).await? else {
        anyhow::bail!("No live instance for {}. Start one: cjob start {}", args.name, args.name);
    };

    let status = ssh(&app.shell, &app.settings, &instance, &[]).await?;
    let code = status
        .code()
        .and_then(|c| u8::try_from(c).ok())
        .unwrap_or(1);
    Ok(ExitCode::from(code))
}
