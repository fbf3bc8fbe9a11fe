//! `cjob settings`: show the loaded settings with secrets redacted.

use anyhow::Result;

use crate::app::AppContext;
use crate::output::json;

/// Run `cjob settings`.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(app: &AppContext) -> Result<()> {
    if app.is_json() {
        return json::print(&app.settings);
    }
    app.human().render_settings(&app.settings);
    Ok(())
}
