//! `cjob ami`: print the newest base image id.

use anyhow::Result;
use serde_json::json;

use crate::app::AppContext;
use crate::application::services::images::latest_base_image;
use crate::output::json;

/// Run `cjob ami`.
///
/// # Errors
///
/// Returns an error if the lookup fails or no image matches.
pub async fn run(app: &AppContext) -> Result<()> {
    let image_id = latest_base_image(&app.provider).await?;
    if app.is_json() {
        return json::print(&json!({ "image_id": image_id }));
    }
    println!("{image_id}");
    Ok(())
}
