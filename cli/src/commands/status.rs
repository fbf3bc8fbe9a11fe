//! `cjob status`: list live job instances.

use anyhow::Result;
use chrono::Utc;
use cjob_common::StatusOutput;

use crate::app::AppContext;
use crate::application::services::instances;
use crate::output::{json, progress};

/// Run `cjob status`.
///
/// # Errors
///
/// Returns an error if the instance listing fails.
pub async fn run(app: &AppContext) -> Result<()> {
    let spinner = app.output.spinner("Listing job instances...");
    let result = instances::status(&app.provider).await;
    if let Some(pb) = &spinner {
        progress::abandon(pb);
    }
    let (instances, duplicates) = result?;

    if app.is_json() {
        return json::print(&StatusOutput {
            instances,
            duplicates,
        });
    }
    app.human().render_status(&instances, &duplicates, Utc::now());
    Ok(())
}
